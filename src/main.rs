mod app;
mod cli;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, ExportArgs};
use rdx::config::{
    default_settings_path, load_settings, save_settings_atomic, write_atomic, Settings,
};
use rdx::{GifFrameEncoder, Session};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings_path = match &cli.config {
        Some(p) => p.clone(),
        None => default_settings_path()?,
    };
    let mut settings = load_settings(&settings_path);
    cli.apply(&mut settings);
    settings.validate()?;

    match cli.command.clone() {
        None | Some(Command::Run { .. }) => app::run(settings),
        Some(Command::Export(args)) => export(&settings, &args),
        Some(Command::Config { write }) => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            if write {
                save_settings_atomic(&settings_path, &settings)?;
                eprintln!("wrote {}", settings_path.display());
            }
            Ok(())
        }
    }
}

fn export(settings: &Settings, args: &ExportArgs) -> Result<()> {
    let mut session = Session::new(settings.sim_params()?, settings.seed.clone());
    session.set_resolution(settings.grid_size)?;
    for _ in 0..args.warmup {
        session.tick();
    }

    let blob = session
        .capture(&settings.capture, &mut GifFrameEncoder::default())
        .context("capture failed")?;
    write_atomic(&args.out, &blob)?;
    println!(
        "{}: {} bytes, seed {:?}, {}x{} grid",
        args.out.display(),
        blob.len(),
        session.seed(),
        settings.grid_size,
        settings.grid_size
    );
    Ok(())
}
