use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the currency, goal, storage, and config layers.
#[derive(Debug, Error)]
pub enum ChallengeError {
    #[error("Goal not found: {0}")]
    GoalNotFound(Uuid),
    #[error("Batch `{batch_id}` not found in goal {goal_id}")]
    BatchNotFound { goal_id: Uuid, batch_id: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid amount `{0}`: expected a non-negative decimal with up to 3 fractional digits")]
    InvalidAmount(String),
    #[error("Unknown denomination: {0}")]
    UnknownDenomination(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("State document uses schema v{found}, newest supported is v{supported}")]
    UnsupportedSchema { found: u32, supported: u32 },
}

pub type Result<T> = StdResult<T, ChallengeError>;

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ChallengeError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<std::io::Error> for ChallengeError {
    fn from(err: std::io::Error) -> Self {
        ChallengeError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for ChallengeError {
    fn from(err: serde_json::Error) -> Self {
        ChallengeError::StorageError(err.to_string())
    }
}
