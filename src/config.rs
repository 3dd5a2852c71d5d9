//! Runtime configuration.
//!
//! The only thing the CLI needs to decide before opening storage is where
//! the data lives. Precedence: `--data-dir`, then `TASKFLOW_DATA_DIR`, then
//! the platform data directory, then `~/.taskflow`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ConfigError;

pub const DATA_DIR_ENV: &str = "TASKFLOW_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve the data directory and make sure it exists.
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let env_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let data_dir = pick_data_dir(override_dir, env_dir, default_data_dir())?;

        if !data_dir.exists() {
            info!(dir = %data_dir.display(), "creating data directory");
            fs::create_dir_all(&data_dir).map_err(|source| ConfigError::CreateDir {
                path: data_dir.clone(),
                source,
            })?;
        }
        Ok(Self { data_dir })
    }
}

/// Platform default: the OS data directory, falling back to `~/.taskflow`.
fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join("taskflow"))
        .or_else(|| dirs::home_dir().map(|h| h.join(".taskflow")))
}

fn pick_data_dir(
    override_dir: Option<&Path>,
    env_dir: Option<PathBuf>,
    default_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    override_dir
        .map(Path::to_path_buf)
        .or(env_dir)
        .or(default_dir)
        .ok_or(ConfigError::NoDataDir)
}
