use crate::capture::CaptureRequest;
use crate::params::{preset_index, SimParams, PRESETS};
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid_size: usize,
    pub seed: String,
    pub preset: String,
    pub dt: f32,
    pub fps_cap: u32,
    pub capture: CaptureRequest,
    /// Where interactive captures land. Defaults to the current directory.
    pub capture_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: 128,
            seed: "rdx".to_string(),
            preset: PRESETS[1].name.to_string(),
            dt: 1.0,
            fps_cap: 30,
            capture: CaptureRequest::default(),
            capture_dir: None,
        }
    }
}

impl Settings {
    pub fn preset_index(&self) -> Result<usize> {
        match preset_index(&self.preset) {
            Some(i) => Ok(i),
            None => bail!(
                "unknown preset {:?} (known: {})",
                self.preset,
                PRESETS.iter().map(|p| p.name).collect::<Vec<_>>().join(", ")
            ),
        }
    }

    pub fn sim_params(&self) -> Result<SimParams> {
        let mut p = PRESETS[self.preset_index()?].params;
        p.dt = self.dt;
        Ok(p)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            bail!("grid size must be at least 1");
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            bail!("dt must be a positive number");
        }
        self.preset_index()?;
        Ok(())
    }
}

pub fn default_settings_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "rdx", "rdx")
        .context("could not resolve project directories")?;
    let dir = proj.config_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(dir.join("settings.json"))
}

/// Missing or unreadable settings fall back to defaults.
pub fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        match serde_json::from_str::<Settings>(&s) {
            Ok(v) => return v,
            Err(e) => log::warn!("ignoring {}: {e}", path.display()),
        }
    }
    Settings::default()
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let data = serde_json::to_vec_pretty(s)?;
    write_atomic(path, &data)
}

pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // Rename-over-existing is not atomic on Windows.
    if to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).with_context(|| format!("renaming to {}", to.display()))?;
    Ok(())
}
