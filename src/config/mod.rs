use serde::{Deserialize, Serialize};
use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{config_backups_dir_in, config_file_in, data_dir_in, ensure_dir},
    currency::{default_selection, resolve_denominations, Amount},
    errors::{ChallengeError, Result},
    goal::{MAX_TARGET, MIN_TARGET},
    storage::json_backend::DEFAULT_RETENTION,
    utils::persistence::{next_backup_path, write_atomic},
};

const BACKUP_EXTENSION: &str = "json";

/// User preferences and defaults for drafting new goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_duration_days_value")]
    pub default_duration_days: u32,
    #[serde(default = "Config::default_target_value")]
    pub default_target: Amount,
    #[serde(default = "default_selection")]
    pub default_denominations: Vec<String>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    /// Custom directory for the state document. Defaults to `<home>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_duration_days: Self::default_duration_days_value(),
            default_target: Self::default_target_value(),
            default_denominations: default_selection(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            backup_retention: Self::default_backup_retention(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::set`].
    pub const KEYS: [&'static str; 6] = [
        "duration",
        "target",
        "denominations",
        "color",
        "retention",
        "data-dir",
    ];

    pub fn default_duration_days_value() -> u32 {
        365
    }

    pub fn default_target_value() -> Amount {
        Amount::from_dinars(1000)
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        DEFAULT_RETENTION
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| data_dir_in(base))
    }

    /// Default denominations as table values; unknown ids are reported.
    pub fn default_denomination_values(&self) -> Result<Vec<Amount>> {
        resolve_denominations(&self.default_denominations)
    }

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "duration" => {
                let days: u32 = value
                    .parse()
                    .map_err(|_| invalid(key, value, "a whole number of days"))?;
                if days == 0 {
                    return Err(invalid(key, value, "at least one day"));
                }
                self.default_duration_days = days;
            }
            "target" => {
                let target = Amount::parse(value)?;
                if target < MIN_TARGET || target > MAX_TARGET {
                    return Err(invalid(
                        key,
                        value,
                        &format!("an amount between {MIN_TARGET} and {MAX_TARGET}"),
                    ));
                }
                self.default_target = target;
            }
            "denominations" => {
                let ids: Vec<String> = value
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .map(|token| token.to_ascii_lowercase())
                    .collect();
                if resolve_denominations(&ids)?.is_empty() {
                    return Err(invalid(key, value, "at least one denomination"));
                }
                self.default_denominations = ids;
            }
            "color" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => return Err(invalid(key, value, "on or off")),
                }
            }
            "retention" => {
                let count: usize = value
                    .parse()
                    .map_err(|_| invalid(key, value, "a positive number"))?;
                if count == 0 {
                    return Err(invalid(key, value, "a positive number"));
                }
                self.backup_retention = count;
            }
            "data-dir" => {
                self.data_dir = match value {
                    "" | "default" => None,
                    path => Some(PathBuf::from(path)),
                }
            }
            other => {
                return Err(ChallengeError::ConfigError(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Settings as display rows, in [`Config::KEYS`] order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("duration", format!("{} days", self.default_duration_days)),
            ("target", self.default_target.to_string()),
            ("denominations", self.default_denominations.join(", ")),
            (
                "color",
                if self.ui_color_enabled { "on" } else { "off" }.to_string(),
            ),
            ("retention", self.backup_retention.to_string()),
            (
                "data-dir",
                self.data_dir
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "default".into()),
            ),
        ]
    }
}

fn invalid(key: &str, value: &str, expected: &str) -> ChallengeError {
    ChallengeError::ConfigError(format!("`{value}` is not valid for {key}: expected {expected}"))
}

/// Loads, saves and snapshots [`Config`] on disk.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
            retention: DEFAULT_RETENTION,
        }
    }

    pub fn with_base_dir(base: &Path) -> Result<Self> {
        let backups_dir = config_backups_dir_in(base);
        ensure_dir(&backups_dir)?;
        Ok(Self::new(config_file_in(base), backups_dir))
    }

    /// Number of snapshots kept after each [`ConfigManager::backup`].
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention.max(1);
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        serde_json::from_str(&data).map_err(|err| {
            ChallengeError::ConfigError(format!(
                "{} is not a valid configuration file: {err}",
                self.config_path.display()
            ))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.config_path, &json)?;
        tracing::debug!(path = %self.config_path.display(), "configuration saved");
        Ok(())
    }

    /// Writes a timestamped snapshot, prunes old ones and returns the new file name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String> {
        let path = next_backup_path(&self.backups_dir, "config", note, BACKUP_EXTENSION);
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&path, &json)?;
        self.prune_backups()?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        tracing::debug!(backup = %name, "configuration snapshot written");
        Ok(name)
    }

    /// Replaces the live configuration with a snapshot from [`ConfigManager::list_backups`].
    pub fn restore(&self, backup_name: &str) -> Result<Config> {
        let path = self.backups_dir.join(backup_name);
        if backup_name.contains(['/', '\\']) || !path.is_file() {
            return Err(ChallengeError::ConfigError(format!(
                "configuration backup `{backup_name}` not found"
            )));
        }
        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| ChallengeError::ConfigError(err.to_string()))?;
        self.save(&config)?;
        tracing::info!(backup = backup_name, "configuration restored");
        Ok(config)
    }

    /// Newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by_key(|name| Reverse(name.clone()));
        Ok(entries)
    }

    fn prune_backups(&self) -> Result<()> {
        for name in self.list_backups()?.into_iter().skip(self.retention) {
            let path = self.backups_dir.join(&name);
            if let Err(err) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), %err, "failed to prune configuration backup");
            }
        }
        Ok(())
    }
}
