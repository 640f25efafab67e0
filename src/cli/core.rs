use std::io;

use uuid::Uuid;

use crate::{
    core::Applied,
    errors::{ChallengeError, CliError},
    goal::Goal,
};

use super::{help, io as cli_io, output};

pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No goal is open. Use `open <goal>` or `new-goal` first.")]
    NoActiveGoal,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] ChallengeError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::Io(inner) => CliError::Io(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl ShellContext {
    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = help::suggest(&self.registry, input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if !self.is_interactive() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    /// Asks before destructive actions; script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.is_interactive() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::NoActiveGoal => {
                output::error(CommandError::NoActiveGoal);
                output::hint("Use `goals` to list saved goals.");
            }
            other => output::error(other),
        }
        Ok(())
    }

    /// Surfaces a failed save without undoing the change.
    pub(crate) fn report_applied<T>(&self, applied: Applied<T>) -> T {
        if let Some(err) = &applied.warning {
            output::warning(format!(
                "Change kept for this session but could not be saved: {err}"
            ));
        }
        applied.into_inner()
    }

    pub(crate) fn active_goal(&self) -> Result<&Goal, CommandError> {
        self.manager.active_goal().ok_or(CommandError::NoActiveGoal)
    }

    /// Resolves an explicit goal argument, falling back to the open goal.
    pub(crate) fn goal_arg(&self, arg: Option<&str>) -> Result<Uuid, CommandError> {
        match arg {
            Some(query) => self.manager.state().resolve_goal(query).ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "no goal matches `{query}` (use its list number, name or id)"
                ))
            }),
            None => self.active_goal().map(|goal| goal.id),
        }
    }
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {usage}"))
}
