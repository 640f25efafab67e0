use uuid::Uuid;

use crate::cli::core::{usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::{io, output, render};
use crate::config::Config;
use crate::currency::{denominations, resolve_denominations, Amount};
use crate::goal::GoalDraft;

const NEW_GOAL_USAGE: &str = "new-goal <name> [target] [days] [denominations...]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "new-goal",
            "Create a savings goal and generate its batches",
            NEW_GOAL_USAGE,
            cmd_new_goal,
        ),
        CommandEntry::new("goals", "List saved goals", "goals", cmd_goals),
        CommandEntry::new(
            "open",
            "Open a goal by number, name or id",
            "open <goal>",
            cmd_open,
        ),
        CommandEntry::new("close", "Close the open goal", "close", cmd_close),
        CommandEntry::new(
            "progress",
            "Show progress for the open or given goal",
            "progress [goal]",
            cmd_progress,
        ),
        CommandEntry::new(
            "delete-goal",
            "Delete a goal and all of its batches",
            "delete-goal <goal>",
            cmd_delete_goal,
        ),
    ]
}

fn cmd_new_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = if args.is_empty() && context.is_interactive() {
        prompt_draft(context)?
    } else {
        draft_from_args(&context.config, args)?
    };

    let applied = context.manager.create_goal(draft)?;
    let id = context.report_applied(applied);
    let applied = context.manager.select_goal(id)?;
    context.report_applied(applied);

    let goal = context.manager.goal(id)?;
    output::success(format!(
        "Created goal `{}` with {} batches.",
        goal.config.name,
        goal.batches.len()
    ));
    print_summary(context, id)
}

/// Builds a draft from positional arguments, filling gaps from the config defaults.
pub(crate) fn draft_from_args(config: &Config, args: &[&str]) -> Result<GoalDraft, CommandError> {
    let Some(name) = args.first() else {
        return Err(usage_error(NEW_GOAL_USAGE));
    };
    let target_amount = match args.get(1) {
        Some(raw) => Amount::parse(raw)?,
        None => config.default_target,
    };
    let duration_days = match args.get(2) {
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a whole number of days"))
        })?,
        None => config.default_duration_days,
    };
    let tokens: Vec<&str> = args
        .iter()
        .skip(3)
        .flat_map(|arg| arg.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();
    let denominations = if tokens.is_empty() {
        config.default_denomination_values()?
    } else {
        resolve_denominations(&tokens)?
    };
    Ok(GoalDraft {
        name: name.to_string(),
        target_amount,
        duration_days,
        denominations,
    })
}

fn prompt_draft(context: &ShellContext) -> Result<GoalDraft, CommandError> {
    let theme = &context.theme;
    let config = &context.config;

    let name = io::prompt_text(theme, "Goal name", None)?;
    let target_raw = io::prompt_text(
        theme,
        "Target amount (DT)",
        Some(config.default_target.to_string()),
    )?;
    let days_raw = io::prompt_text(
        theme,
        "Duration (days)",
        Some(config.default_duration_days.to_string()),
    )?;

    let defaults = config.default_denomination_values().unwrap_or_default();
    let table = denominations();
    let labels: Vec<String> = table
        .iter()
        .map(|denom| format!("{} ({})", denom.label, denom.kind))
        .collect();
    let checked: Vec<bool> = table
        .iter()
        .map(|denom| defaults.contains(&denom.value))
        .collect();
    let picked = io::prompt_multi_select(theme, "Denominations to save with", &labels, &checked)?;

    let duration_days = days_raw.trim().parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a whole number of days", days_raw.trim()))
    })?;
    Ok(GoalDraft {
        name,
        target_amount: Amount::parse(&target_raw)?,
        duration_days,
        denominations: picked.into_iter().map(|idx| table[idx].value).collect(),
    })
}

fn cmd_goals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let goals = context.manager.goals();
    if goals.is_empty() {
        output::info("No goals yet. Use `new-goal` to start one.");
        return Ok(());
    }
    output::section("Goals");
    output::block(&render::goal_list(
        goals,
        context.manager.state().active_goal_id,
        context.manager.now(),
    ));
    Ok(())
}

fn cmd_open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [query] = args else {
        return Err(usage_error("open <goal>"));
    };
    let id = context.goal_arg(Some(*query))?;
    let applied = context.manager.select_goal(id)?;
    context.report_applied(applied);
    print_summary(context, id)
}

fn cmd_close(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let name = context.active_goal()?.config.name.clone();
    let applied = context.manager.clear_selection();
    context.report_applied(applied);
    output::info(format!("Closed goal `{name}`."));
    Ok(())
}

fn cmd_progress(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.goal_arg(args.first().copied())?;
    print_summary(context, id)
}

fn cmd_delete_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [query] = args else {
        return Err(usage_error("delete-goal <goal>"));
    };
    let id = context.goal_arg(Some(*query))?;
    let goal = context.manager.goal(id)?;
    let prompt = format!(
        "Delete goal `{}` and its {} batches?",
        goal.config.name,
        goal.batches.len()
    );
    if !context.confirm(&prompt)? {
        output::info("Deletion cancelled.");
        return Ok(());
    }
    let applied = context.manager.delete_goal(id)?;
    let removed = context.report_applied(applied);
    output::success(format!("Deleted goal `{}`.", removed.config.name));
    Ok(())
}

pub(crate) fn print_summary(context: &ShellContext, id: Uuid) -> CommandResult {
    let goal = context.manager.goal(id)?;
    let progress = context.manager.progress(id)?;
    output::section(&goal.config.name);
    output::block(&render::goal_summary(goal, &progress, render::bar_width()));
    if progress.is_complete() {
        output::success("Goal reached! Every batch is set aside.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_uses_config_defaults_for_missing_fields() {
        let config = Config::default();
        let draft = draft_from_args(&config, &["Trip"]).unwrap();
        assert_eq!(draft.name, "Trip");
        assert_eq!(draft.target_amount, Amount::from_dinars(1000));
        assert_eq!(draft.duration_days, 365);
        assert_eq!(draft.denominations.len(), 5);
    }

    #[test]
    fn draft_parses_explicit_fields() {
        let config = Config::default();
        let draft = draft_from_args(&config, &["Trip", "250.5", "30", "1dt,5dt", "0.5"]).unwrap();
        assert_eq!(draft.target_amount, Amount::from_millimes(250_500));
        assert_eq!(draft.duration_days, 30);
        assert_eq!(
            draft.denominations,
            vec![
                Amount::from_millimes(500),
                Amount::from_dinars(1),
                Amount::from_dinars(5)
            ]
        );
    }

    #[test]
    fn draft_rejects_bad_arguments() {
        let config = Config::default();
        assert!(matches!(
            draft_from_args(&config, &[]),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(draft_from_args(&config, &["Trip", "abc"]).is_err());
        assert!(draft_from_args(&config, &["Trip", "100", "soon"]).is_err());
        assert!(draft_from_args(&config, &["Trip", "100", "30", "3dt"]).is_err());
    }
}
