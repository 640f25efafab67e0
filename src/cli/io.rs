use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};

use crate::cli::core::CommandError;

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Prompt for free-form text, pre-filled with `default` when given.
pub fn prompt_text(
    theme: &ColorfulTheme,
    prompt: &str,
    default: Option<String>,
) -> Result<String, CommandError> {
    let mut input = Input::<String>::with_theme(theme).with_prompt(prompt);
    if let Some(value) = default {
        input = input.default(value);
    }
    input.interact_text().map_err(CommandError::from)
}

/// Multi-choice picker; returns the indices the user kept checked.
pub fn prompt_multi_select(
    theme: &ColorfulTheme,
    prompt: &str,
    items: &[String],
    checked: &[bool],
) -> Result<Vec<usize>, CommandError> {
    MultiSelect::with_theme(theme)
        .with_prompt(prompt)
        .items(items)
        .defaults(checked)
        .interact()
        .map_err(CommandError::from)
}
