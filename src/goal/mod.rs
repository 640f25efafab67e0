//! Savings goals, their batches, and progress reporting.

pub mod state;

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    currency::Amount,
    errors::{ChallengeError, Result},
    generator::{self, RandomSource},
};

pub use state::{AppState, CURRENT_SCHEMA_VERSION};

/// Smallest target a new goal may be drafted with.
pub const MIN_TARGET: Amount = Amount::from_dinars(10);

/// Largest target a new goal may be drafted with.
pub const MAX_TARGET: Amount = Amount::from_dinars(1_000_000);

/// Upper bound on `target / smallest denomination`, the worst-case batch count.
pub const MAX_PIECES: i64 = 1_000_000;

/// A bundle of identical pieces that the saver checks off once set aside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: String,
    pub denomination_value: Amount,
    pub count: u32,
    pub total_value: Amount,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Batch {
    /// A regular batch worth `count` pieces of `denomination`.
    pub fn new(id: impl Into<String>, denomination: Amount, count: u32) -> Self {
        let total_value = Amount::from_millimes(denomination.millimes() * i64::from(count));
        Self {
            id: id.into(),
            denomination_value: denomination,
            count,
            total_value,
            is_completed: false,
            completed_at: None,
        }
    }

    /// A single-piece batch whose value is the leftover `remaining` amount.
    pub fn closing(id: impl Into<String>, denomination: Amount, remaining: Amount) -> Self {
        Self {
            id: id.into(),
            denomination_value: denomination,
            count: 1,
            total_value: remaining,
            is_completed: false,
            completed_at: None,
        }
    }

    /// True for the closing batch, whose value is not a whole number of pieces.
    pub fn is_partial(&self) -> bool {
        self.denomination_value.checked_mul(self.count) != Some(self.total_value)
    }

    pub fn set_completed(&mut self, completed: bool, at: DateTime<Utc>) {
        self.is_completed = completed;
        self.completed_at = completed.then_some(at);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub name: String,
    pub target_amount: Amount,
    pub duration_days: u32,
    pub start_date: DateTime<Utc>,
    pub selected_denominations: Vec<Amount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub config: GoalConfig,
    #[serde(default)]
    pub batches: Vec<Batch>,
}

/// User input collected before a goal exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    pub name: String,
    pub target_amount: Amount,
    pub duration_days: u32,
    pub denominations: Vec<Amount>,
}

impl GoalDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ChallengeError::InvalidInput(
                "goal name must not be empty".into(),
            ));
        }
        if self.target_amount < MIN_TARGET {
            return Err(ChallengeError::InvalidInput(format!(
                "target must be at least {MIN_TARGET} (got {})",
                self.target_amount
            )));
        }
        if self.target_amount > MAX_TARGET {
            return Err(ChallengeError::InvalidInput(format!(
                "target must be at most {MAX_TARGET} (got {})",
                self.target_amount
            )));
        }
        if self.duration_days < 1 {
            return Err(ChallengeError::InvalidInput(
                "duration must be at least one day".into(),
            ));
        }
        if self.denominations.is_empty() {
            return Err(ChallengeError::InvalidInput(
                "select at least one denomination".into(),
            ));
        }
        let smallest = self.denominations.iter().copied().filter(|d| d.is_positive()).min();
        if let Some(smallest) = smallest {
            let pieces = self.target_amount.millimes() / smallest.millimes();
            if pieces > MAX_PIECES {
                return Err(ChallengeError::InvalidInput(format!(
                    "{} in pieces of {smallest} needs {pieces} pieces (limit {MAX_PIECES}); \
                     pick larger denominations",
                    self.target_amount
                )));
            }
        }
        Ok(())
    }
}

impl Goal {
    /// Validates the draft and partitions its target into batches in one step.
    pub fn create<S>(draft: GoalDraft, source: &mut S, now: DateTime<Utc>) -> Result<Self>
    where
        S: RandomSource + ?Sized,
    {
        draft.validate()?;
        let batches = generator::generate(draft.target_amount, &draft.denominations, source);
        Ok(Self {
            id: Uuid::new_v4(),
            config: GoalConfig {
                name: draft.name.trim().to_string(),
                target_amount: draft.target_amount,
                duration_days: draft.duration_days,
                start_date: now,
                selected_denominations: draft.denominations,
            },
            batches,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn batch(&self, batch_id: &str) -> Option<&Batch> {
        self.batches.iter().find(|batch| batch.id == batch_id)
    }

    pub fn batch_mut(&mut self, batch_id: &str) -> Option<&mut Batch> {
        self.batches.iter_mut().find(|batch| batch.id == batch_id)
    }

    pub fn batches_total(&self) -> Amount {
        self.batches.iter().map(|batch| batch.total_value).sum()
    }

    pub fn saved_amount(&self) -> Amount {
        self.batches
            .iter()
            .filter(|batch| batch.is_completed)
            .map(|batch| batch.total_value)
            .sum()
    }

    pub fn filtered(&self, filter: BatchFilter) -> impl Iterator<Item = &Batch> + '_ {
        self.batches.iter().filter(move |batch| filter.matches(batch))
    }

    pub fn progress(&self, now: DateTime<Utc>) -> GoalProgress {
        GoalProgress::compute(self, now)
    }
}

/// Derived completion statistics for one goal at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub target: Amount,
    pub saved: Amount,
    pub remaining: Amount,
    pub percent: f64,
    pub batches_completed: usize,
    pub batches_total: usize,
    pub days_elapsed: i64,
    pub days_left: i64,
}

impl GoalProgress {
    pub fn compute(goal: &Goal, now: DateTime<Utc>) -> Self {
        let target = goal.config.target_amount;
        let saved = goal.saved_amount();
        let percent = if target.is_positive() {
            (saved.millimes() as f64 / target.millimes() as f64 * 100.0).min(100.0)
        } else {
            0.0
        };
        let days_elapsed = (now - goal.config.start_date).num_days().max(0);
        let days_left = (i64::from(goal.config.duration_days) - days_elapsed).max(0);
        Self {
            target,
            saved,
            remaining: target - saved,
            percent,
            batches_completed: goal.batches.iter().filter(|b| b.is_completed).count(),
            batches_total: goal.batches.len(),
            days_elapsed,
            days_left,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.batches_total > 0 && self.batches_completed == self.batches_total
    }
}

/// Batch views offered on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl BatchFilter {
    pub fn matches(self, batch: &Batch) -> bool {
        match self {
            BatchFilter::All => true,
            BatchFilter::Pending => !batch.is_completed,
            BatchFilter::Completed => batch.is_completed,
        }
    }
}

impl FromStr for BatchFilter {
    type Err = ChallengeError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(BatchFilter::All),
            "pending" | "open" => Ok(BatchFilter::Pending),
            "completed" | "done" => Ok(BatchFilter::Completed),
            other => Err(ChallengeError::InvalidInput(format!(
                "unknown batch filter `{other}` (expected all, pending or completed)"
            ))),
        }
    }
}

impl fmt::Display for BatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BatchFilter::All => "all",
            BatchFilter::Pending => "pending",
            BatchFilter::Completed => "completed",
        };
        f.write_str(label)
    }
}
