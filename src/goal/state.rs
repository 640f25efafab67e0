//! The whole persisted application state and its transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Goal;
use crate::errors::{ChallengeError, Result};

/// Schema version written into every saved document.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub active_goal_id: Option<Uuid>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            goals: Vec::new(),
            active_goal_id: None,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn goal(&self, goal_id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == goal_id)
    }

    fn goal_mut(&mut self, goal_id: Uuid) -> Result<&mut Goal> {
        self.goals
            .iter_mut()
            .find(|goal| goal.id == goal_id)
            .ok_or(ChallengeError::GoalNotFound(goal_id))
    }

    pub fn active_goal(&self) -> Option<&Goal> {
        self.active_goal_id.and_then(|id| self.goal(id))
    }

    /// Appends a freshly created goal and returns its id.
    pub fn add_goal(&mut self, goal: Goal) -> Uuid {
        let id = goal.id;
        self.goals.push(goal);
        id
    }

    /// Marks one batch as completed or pending.
    ///
    /// Leaves the state untouched when either id is unknown.
    pub fn toggle_batch(
        &mut self,
        goal_id: Uuid,
        batch_id: &str,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let goal = self.goal_mut(goal_id)?;
        let batch = goal
            .batch_mut(batch_id)
            .ok_or_else(|| ChallengeError::BatchNotFound {
                goal_id,
                batch_id: batch_id.to_string(),
            })?;
        batch.set_completed(completed, at);
        Ok(())
    }

    pub fn delete_goal(&mut self, goal_id: Uuid) -> Result<Goal> {
        let position = self
            .goals
            .iter()
            .position(|goal| goal.id == goal_id)
            .ok_or(ChallengeError::GoalNotFound(goal_id))?;
        if self.active_goal_id == Some(goal_id) {
            self.active_goal_id = None;
        }
        Ok(self.goals.remove(position))
    }

    pub fn select_goal(&mut self, goal_id: Uuid) -> Result<()> {
        if self.goal(goal_id).is_none() {
            return Err(ChallengeError::GoalNotFound(goal_id));
        }
        self.active_goal_id = Some(goal_id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.active_goal_id = None;
    }

    /// Finds a goal by 1-based list position, full id, id prefix, or name.
    pub fn resolve_goal(&self, query: &str) -> Option<Uuid> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if let Ok(position) = query.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|idx| self.goals.get(idx))
                .map(|goal| goal.id);
        }
        if let Ok(id) = Uuid::parse_str(query) {
            return self.goal(id).map(|goal| goal.id);
        }
        let lowered = query.to_lowercase();
        if let Some(goal) = self
            .goals
            .iter()
            .find(|goal| goal.config.name.to_lowercase() == lowered)
        {
            return Some(goal.id);
        }
        let mut by_prefix = self
            .goals
            .iter()
            .filter(|goal| goal.id.to_string().starts_with(&lowered));
        match (by_prefix.next(), by_prefix.next()) {
            (Some(goal), None) => Some(goal.id),
            _ => None,
        }
    }

    /// Consistency problems found in a loaded document. Empty when healthy.
    pub fn integrity_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(active) = self.active_goal_id {
            if self.goal(active).is_none() {
                warnings.push(format!("active goal {active} does not exist"));
            }
        }
        for goal in &self.goals {
            let total = goal.batches_total();
            if !goal.batches.is_empty() && total != goal.config.target_amount {
                warnings.push(format!(
                    "goal `{}` batches add up to {total}, target is {}",
                    goal.config.name, goal.config.target_amount
                ));
            }
            let mut ids: Vec<&str> = goal.batches.iter().map(|b| b.id.as_str()).collect();
            ids.sort_unstable();
            if ids.windows(2).any(|pair| pair[0] == pair[1]) {
                warnings.push(format!(
                    "goal `{}` has duplicate batch ids",
                    goal.config.name
                ));
            }
        }
        warnings
    }
}
