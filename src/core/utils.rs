use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

/// Overrides the base directory for data and configuration.
pub const HOME_ENV: &str = "MONEY_CHALLENGE_HOME";

const DEFAULT_DIR_NAME: &str = ".money_challenge";
const DATA_DIR: &str = "data";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const BACKUP_DIR: &str = "backups";

/// Returns the application base directory, defaulting to `~/.money_challenge`.
pub fn app_home_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding the saved state document and its backups.
pub fn data_dir_in(base: &Path) -> PathBuf {
    base.join(DATA_DIR)
}

pub fn config_dir_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    config_dir_in(base).join(CONFIG_FILE)
}

pub fn config_backups_dir_in(base: &Path) -> PathBuf {
    config_dir_in(base).join(BACKUP_DIR)
}

/// Backups directory nested under any storage root.
pub fn backups_dir_in(root: &Path) -> PathBuf {
    root.join(BACKUP_DIR)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}
