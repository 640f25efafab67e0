pub mod json_backend;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::{errors::Result, goal::AppState};

/// Fixed key the whole state document is stored under.
pub const STORAGE_KEY: &str = "tounes_money_challenge_v2";

/// A saved copy of the state document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// File name, used as the identifier on the command line.
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Abstraction over backends that persist the whole application state.
pub trait StateStorage: Send + Sync {
    /// Loads the saved state, or an empty one when nothing was saved yet.
    fn load_state(&self) -> Result<AppState>;
    /// Replaces the saved state wholesale.
    fn save_state(&self, state: &AppState) -> Result<()>;
    fn backup_state(&self, note: Option<&str>) -> Result<BackupInfo>;
    /// Newest first.
    fn list_backups(&self) -> Result<Vec<BackupInfo>>;
    fn restore_backup(&self, backup_id: &str) -> Result<AppState>;
}

pub use json_backend::JsonStorage;
