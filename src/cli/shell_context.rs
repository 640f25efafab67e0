//! Shared runtime state for CLI interactions and command execution.

use std::env;

use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    core::{utils::app_home_dir, GoalManager, SystemClock},
    errors::CliError,
    generator::{RandomSource, RngSource},
    storage::JsonStorage,
};

use super::{
    commands,
    output::{self, OutputPreferences},
    registry::CommandRegistry,
};

/// Selects script mode, reading commands from stdin without prompts.
pub const SCRIPT_ENV: &str = "MONEY_CHALLENGE_CLI_SCRIPT";
/// Fixes the generator seed so batch layouts repeat across runs.
pub const SEED_ENV: &str = "MONEY_CHALLENGE_SEED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    pub fn from_env() -> Self {
        if env::var_os(SCRIPT_ENV).is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: GoalManager,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base_dir = app_home_dir();
        let config_manager = ConfigManager::with_base_dir(&base_dir)?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                output::warning(format!("{err}; using default settings"));
                Config::default()
            }
        };
        apply_output_preferences(&config, mode);
        let config_manager = config_manager.with_retention(config.backup_retention);

        let storage = JsonStorage::new(
            config.resolve_data_dir(&base_dir),
            Some(config.backup_retention),
        )?;
        let mut manager = GoalManager::new(Box::new(storage), Box::new(SystemClock), random_source());
        for warning in manager.load()? {
            output::warning(warning);
        }

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            manager,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            running: true,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        match self.manager.active_goal() {
            Some(goal) => format!("money-challenge ({})> ", goal.config.name),
            None => "money-challenge> ".to_string(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }
}

pub(crate) fn apply_output_preferences(config: &Config, mode: CliMode) {
    output::set_preferences(OutputPreferences {
        color: config.ui_color_enabled && mode == CliMode::Interactive,
    });
}

fn random_source() -> Box<dyn RandomSource + Send> {
    let Some(raw) = env::var_os(SEED_ENV) else {
        return Box::new(RngSource::from_entropy());
    };
    match raw.to_string_lossy().trim().parse::<u64>() {
        Ok(seed) => {
            tracing::debug!(seed, "using fixed generator seed");
            Box::new(RngSource::seeded(seed))
        }
        Err(_) => {
            output::warning(format!(
                "ignoring {SEED_ENV}: `{}` is not an unsigned integer",
                raw.to_string_lossy()
            ));
            Box::new(RngSource::from_entropy())
        }
    }
}
