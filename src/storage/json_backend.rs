use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{backups_dir_in, ensure_dir},
    errors::{ChallengeError, Result},
    goal::{AppState, CURRENT_SCHEMA_VERSION},
    utils::persistence::{next_backup_path, write_atomic},
};

use super::{BackupInfo, StateStorage, STORAGE_KEY};

const EXTENSION: &str = "json";
pub const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed JSON persistence for the application state.
///
/// The document lives at `<root>/tounes_money_challenge_v2.json`; every save
/// first copies the previous document into `<root>/backups/`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    backups_dir: PathBuf,
    state_file: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: PathBuf, retention: Option<usize>) -> Result<Self> {
        ensure_dir(&root)?;
        let backups_dir = backups_dir_in(&root);
        ensure_dir(&backups_dir)?;
        let state_file = root.join(format!("{STORAGE_KEY}.{EXTENSION}"));
        Ok(Self {
            root,
            backups_dir,
            state_file,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_path(&self) -> &Path {
        &self.state_file
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    fn backup_existing_file(&self, note: Option<&str>) -> Result<Option<BackupInfo>> {
        if !self.state_file.exists() {
            return Ok(None);
        }
        let path = next_backup_path(&self.backups_dir, STORAGE_KEY, note, EXTENSION);
        fs::copy(&self.state_file, &path)?;
        let info = backup_info(&path);
        self.prune_backups()?;
        Ok(Some(info))
    }

    fn prune_backups(&self) -> Result<()> {
        let entries = self.list_backups()?;
        for entry in entries.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                tracing::warn!(path = %entry.path.display(), %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StateStorage for JsonStorage {
    fn load_state(&self) -> Result<AppState> {
        if !self.state_file.exists() {
            tracing::info!(path = %self.state_file.display(), "no saved state, starting empty");
            return Ok(AppState::new());
        }
        let state = load_state_from_path(&self.state_file)?;
        tracing::info!(goals = state.goals.len(), "state loaded");
        Ok(state)
    }

    fn save_state(&self, state: &AppState) -> Result<()> {
        self.backup_existing_file(None)?;
        save_state_to_path(state, &self.state_file)?;
        tracing::debug!(goals = state.goals.len(), "state saved");
        Ok(())
    }

    fn backup_state(&self, note: Option<&str>) -> Result<BackupInfo> {
        self.backup_existing_file(note)?.ok_or_else(|| {
            ChallengeError::StorageError("nothing saved yet, no backup created".into())
        })
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION)
            {
                continue;
            }
            entries.push(backup_info(&path));
        }
        entries.sort_by_key(|info| Reverse(info.id.clone()));
        Ok(entries)
    }

    fn restore_backup(&self, backup_id: &str) -> Result<AppState> {
        let source = self.backups_dir.join(backup_id);
        if backup_id.contains(['/', '\\']) || !source.is_file() {
            return Err(ChallengeError::StorageError(format!(
                "backup `{backup_id}` not found"
            )));
        }
        let restored = load_state_from_path(&source)?;
        self.backup_existing_file(Some("before-restore"))?;
        save_state_to_path(&restored, &self.state_file)?;
        tracing::info!(backup = backup_id, "state restored from backup");
        Ok(restored)
    }
}

/// Writes a state document to an arbitrary path via a temp file and rename.
pub fn save_state_to_path(state: &AppState, path: &Path) -> Result<()> {
    let data = if state.schema_version == CURRENT_SCHEMA_VERSION {
        serde_json::to_string_pretty(state)?
    } else {
        let mut upgraded = state.clone();
        upgraded.schema_version = CURRENT_SCHEMA_VERSION;
        serde_json::to_string_pretty(&upgraded)?
    };
    write_atomic(path, &data)
}

/// Reads a state document, rejecting schema versions newer than this build.
pub fn load_state_from_path(path: &Path) -> Result<AppState> {
    let data = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&data)?;
    let found = value
        .get("schema_version")
        .and_then(|v| v.as_u64())
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .unwrap_or(CURRENT_SCHEMA_VERSION);
    if found > CURRENT_SCHEMA_VERSION {
        return Err(ChallengeError::UnsupportedSchema {
            found,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    let mut state: AppState = serde_json::from_value(value)?;
    state.schema_version = CURRENT_SCHEMA_VERSION;
    Ok(state)
}

fn backup_info(path: &Path) -> BackupInfo {
    let id = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    let size_bytes = fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
    BackupInfo {
        created_at: parse_backup_timestamp(&id),
        id,
        size_bytes,
        path: path.to_path_buf(),
    }
}

/// Recovers the timestamp from `<key>_<YYYYmmdd>_<HHMMSSmmm>[_note].json`.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let rest = name.strip_prefix(STORAGE_KEY)?.strip_prefix('_')?;
    let date = rest.get(..8)?;
    let time = rest.get(9..15)?;
    if rest.get(8..9)? != "_" || !is_digits(date) || !is_digits(time) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit())
}
