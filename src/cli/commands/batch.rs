use crate::cli::core::{usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::{output, render};
use crate::currency::format_currency;
use crate::goal::BatchFilter;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "batches",
            "List batches of the open goal",
            "batches [all|pending|completed]",
            cmd_batches,
        ),
        CommandEntry::new(
            "check",
            "Mark batches as set aside",
            "check <batch>...",
            cmd_check,
        ),
        CommandEntry::new(
            "uncheck",
            "Mark batches as pending again",
            "uncheck <batch>...",
            cmd_uncheck,
        ),
    ]
}

/// Accepts `batch-7`, `Batch-7` or the bare number `7`.
pub(crate) fn normalize_batch_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("batch-{trimmed}")
    } else {
        trimmed.to_ascii_lowercase()
    }
}

fn cmd_batches(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = match args {
        [] => BatchFilter::All,
        [raw] => raw.parse::<BatchFilter>()?,
        _ => return Err(usage_error("batches [all|pending|completed]")),
    };
    let goal = context.active_goal()?;
    if goal.filtered(filter).next().is_none() {
        output::info(format!("No {filter} batches in `{}`.", goal.config.name));
        return Ok(());
    }
    output::section(format!("{} ({filter})", goal.config.name));
    output::block(&render::batch_table(goal, filter));
    Ok(())
}

fn cmd_check(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    toggle(context, args, true)
}

fn cmd_uncheck(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    toggle(context, args, false)
}

fn toggle(context: &mut ShellContext, args: &[&str], completed: bool) -> CommandResult {
    if args.is_empty() {
        let verb = if completed { "check" } else { "uncheck" };
        return Err(usage_error(&format!("{verb} <batch>...")));
    }
    let goal_id = context.active_goal()?.id;
    let was_complete = context.manager.progress(goal_id)?.is_complete();

    for raw in args {
        let batch_id = normalize_batch_id(raw);
        let applied = context
            .manager
            .toggle_batch(goal_id, &batch_id, completed)
            .map_err(CommandError::from)?;
        context.report_applied(applied);

        let goal = context.manager.goal(goal_id)?;
        let value = goal
            .batch(&batch_id)
            .map(|batch| format_currency(batch.total_value))
            .unwrap_or_default();
        let status = if completed { "done" } else { "pending" };
        output::success(format!("Marked {batch_id} ({value}) as {status}."));
    }

    let progress = context.manager.progress(goal_id)?;
    output::info(format!(
        "Saved {} of {} ({:.1}%).",
        format_currency(progress.saved),
        format_currency(progress.target),
        progress.percent
    ));
    if progress.is_complete() && !was_complete {
        output::success("Goal reached! Every batch is set aside.");
    }
    Ok(())
}
