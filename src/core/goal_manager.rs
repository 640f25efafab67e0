use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    core::time::Clock,
    errors::{ChallengeError, Result},
    generator::RandomSource,
    goal::{AppState, Goal, GoalDraft, GoalProgress},
    storage::{BackupInfo, StateStorage},
};

/// Outcome of a state change that was applied in memory.
///
/// `warning` carries the persistence failure, if any. The change itself is
/// never rolled back.
#[derive(Debug)]
#[must_use]
pub struct Applied<T> {
    pub value: T,
    pub warning: Option<ChallengeError>,
}

impl<T> Applied<T> {
    pub fn is_persisted(&self) -> bool {
        self.warning.is_none()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Facade that owns the application state and keeps the saved copy in sync.
pub struct GoalManager {
    state: AppState,
    storage: Box<dyn StateStorage>,
    clock: Box<dyn Clock>,
    random: Box<dyn RandomSource + Send>,
}

impl GoalManager {
    pub fn new(
        storage: Box<dyn StateStorage>,
        clock: Box<dyn Clock>,
        random: Box<dyn RandomSource + Send>,
    ) -> Self {
        Self {
            state: AppState::new(),
            storage,
            clock,
            random,
        }
    }

    /// Reads the saved state once. Returns consistency warnings found in it.
    pub fn load(&mut self) -> Result<Vec<String>> {
        self.state = self.storage.load_state()?;
        let warnings = self.state.integrity_warnings();
        for warning in &warnings {
            tracing::warn!(%warning, "saved state is inconsistent");
        }
        Ok(warnings)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn goals(&self) -> &[Goal] {
        &self.state.goals
    }

    pub fn goal(&self, goal_id: Uuid) -> Result<&Goal> {
        self.state
            .goal(goal_id)
            .ok_or(ChallengeError::GoalNotFound(goal_id))
    }

    pub fn active_goal(&self) -> Option<&Goal> {
        self.state.active_goal()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn storage(&self) -> &dyn StateStorage {
        self.storage.as_ref()
    }

    pub fn create_goal(&mut self, draft: GoalDraft) -> Result<Applied<Uuid>> {
        let goal = Goal::create(draft, self.random.as_mut(), self.clock.now())?;
        tracing::info!(
            goal_id = %goal.id,
            batches = goal.batches.len(),
            amount = %goal.config.target_amount,
            "goal created"
        );
        let id = self.state.add_goal(goal);
        Ok(self.persisted(id))
    }

    pub fn toggle_batch(
        &mut self,
        goal_id: Uuid,
        batch_id: &str,
        completed: bool,
    ) -> Result<Applied<()>> {
        self.state
            .toggle_batch(goal_id, batch_id, completed, self.clock.now())?;
        tracing::info!(%goal_id, batch_id, completed, "batch toggled");
        Ok(self.persisted(()))
    }

    pub fn delete_goal(&mut self, goal_id: Uuid) -> Result<Applied<Goal>> {
        let removed = self.state.delete_goal(goal_id)?;
        tracing::info!(%goal_id, name = %removed.config.name, "goal deleted");
        Ok(self.persisted(removed))
    }

    pub fn select_goal(&mut self, goal_id: Uuid) -> Result<Applied<()>> {
        self.state.select_goal(goal_id)?;
        Ok(self.persisted(()))
    }

    pub fn clear_selection(&mut self) -> Applied<()> {
        self.state.clear_selection();
        self.persisted(())
    }

    pub fn progress(&self, goal_id: Uuid) -> Result<GoalProgress> {
        Ok(self.goal(goal_id)?.progress(self.clock.now()))
    }

    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo> {
        self.storage.backup_state(note)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        self.storage.list_backups()
    }

    /// Replaces the in-memory state with a backup and returns its consistency warnings.
    pub fn restore_backup(&mut self, backup_id: &str) -> Result<Vec<String>> {
        self.state = self.storage.restore_backup(backup_id)?;
        Ok(self.state.integrity_warnings())
    }

    fn persisted<T>(&self, value: T) -> Applied<T> {
        let warning = match self.storage.save_state(&self.state) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist state; change kept in memory");
                Some(err)
            }
        };
        Applied { value, warning }
    }
}
