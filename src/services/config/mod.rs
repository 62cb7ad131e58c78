//! Bootstrap configuration, read once before the UI starts.
//!
//! Covers what the app needs before it can talk to anything: where the
//! event service lives and how eagerly to push edits. UI-facing
//! preferences live in the settings table instead.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

const CONFIG_FILE: &str = "meetgrid.toml";
const DATABASE_FILE: &str = "meetgrid.db";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the event service
    pub server_url: String,
    /// Name pre-filled into the join form
    pub default_name: Option<String>,
    /// Debounce window for availability writes, in milliseconds
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            default_name: None,
            debounce_ms: 500,
        }
    }
}

impl AppConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "meetgrid")
}

/// Load the config file from the platform config directory, falling
/// back to defaults when it does not exist.
pub fn load() -> Result<AppConfig> {
    match project_dirs() {
        Some(dirs) => load_from_path(&dirs.config_dir().join(CONFIG_FILE)),
        None => {
            log::warn!("No home directory found, using default configuration");
            Ok(AppConfig::default())
        }
    }
}

pub fn load_from_path(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .context(format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&raw).context(format!("Failed to parse config file {}", path.display()))
}

/// Where the local cache database lives. Debug builds keep it next to
/// the working directory so development never touches the real profile.
pub fn database_path() -> PathBuf {
    if cfg!(debug_assertions) {
        return PathBuf::from(DATABASE_FILE);
    }

    match project_dirs() {
        Some(dirs) => {
            let dir = dirs.data_dir();
            if let Err(err) = std::fs::create_dir_all(dir) {
                log::warn!("Failed to create data directory {}: {}", dir.display(), err);
                return PathBuf::from(DATABASE_FILE);
            }
            dir.join(DATABASE_FILE)
        }
        None => PathBuf::from(DATABASE_FILE),
    }
}
