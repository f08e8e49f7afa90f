use clap::{Args, Parser, Subcommand};
use rdx::config::Settings;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "rdx")]
#[command(about = "Gray–Scott reaction–diffusion in the terminal, with GIF capture")]
pub(crate) struct Cli {
    /// Settings file (JSON). Defaults to the per-user config dir.
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Grid side length in cells
    #[arg(long, global = true)]
    pub(crate) size: Option<usize>,

    /// Seed token; the same token always gives the same starting field
    #[arg(long, global = true)]
    pub(crate) seed: Option<String>,

    /// Preset name (Mitosis, Worms, Solitons, Spots, Stripes, Coral)
    #[arg(long, global = true)]
    pub(crate) preset: Option<String>,

    /// Time-step multiplier
    #[arg(long, global = true)]
    pub(crate) dt: Option<f32>,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Interactive viewer (default)
    Run {
        /// Frame cap
        #[arg(long)]
        fps_cap: Option<u32>,
    },
    /// Render a capture straight to a GIF file
    Export(ExportArgs),
    /// Print the effective settings, optionally saving them
    Config {
        #[arg(long, default_value_t = false)]
        write: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ExportArgs {
    /// Output file
    #[arg(long, short)]
    pub(crate) out: PathBuf,

    #[arg(long)]
    pub(crate) seconds: Option<f32>,

    #[arg(long)]
    pub(crate) fps: Option<f32>,

    /// Output size relative to the grid
    #[arg(long)]
    pub(crate) scale: Option<f32>,

    /// Frames to simulate before capturing starts
    #[arg(long, default_value_t = 0)]
    pub(crate) warmup: usize,
}

impl Cli {
    /// Flags win over the settings file.
    pub(crate) fn apply(&self, s: &mut Settings) {
        if let Some(n) = self.size {
            s.grid_size = n;
        }
        if let Some(seed) = &self.seed {
            s.seed = seed.clone();
        }
        if let Some(p) = &self.preset {
            s.preset = p.clone();
        }
        if let Some(dt) = self.dt {
            s.dt = dt;
        }
        match &self.command {
            Some(Command::Run { fps_cap: Some(f) }) => s.fps_cap = *f,
            Some(Command::Export(e)) => {
                if let Some(v) = e.seconds {
                    s.capture.seconds = v;
                }
                if let Some(v) = e.fps {
                    s.capture.fps = v;
                }
                if let Some(v) = e.scale {
                    s.capture.scale = v;
                }
            }
            _ => {}
        }
    }
}
