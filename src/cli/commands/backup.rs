use crate::cli::core::{usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::{output, render};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "backups",
            "List saved state backups, newest first",
            "backups",
            cmd_backups,
        ),
        CommandEntry::new(
            "backup",
            "Snapshot the saved state",
            "backup [note]",
            cmd_backup,
        ),
        CommandEntry::new(
            "restore",
            "Replace the current state with a backup",
            "restore <number|backup>",
            cmd_restore,
        ),
    ]
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.manager.list_backups()?;
    if backups.is_empty() {
        output::info("No backups yet.");
        return Ok(());
    }
    output::section("Backups");
    output::block(&render::backup_table(&backups));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let info = context.manager.backup(note.as_deref())?;
    output::success(format!("Backup created: {}", info.id));
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(usage_error("restore <number|backup>"));
    };
    let backups = context.manager.list_backups()?;
    let backup_id = match reference.parse::<usize>() {
        Ok(position) => position
            .checked_sub(1)
            .and_then(|idx| backups.get(idx))
            .map(|info| info.id.clone())
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "no backup #{position}; run `backups` to list them"
                ))
            })?,
        Err(_) => reference.to_string(),
    };

    if !context.confirm(&format!("Replace all goals with `{backup_id}`?"))? {
        output::info("Restore cancelled.");
        return Ok(());
    }
    for warning in context.manager.restore_backup(&backup_id)? {
        output::warning(warning);
    }
    output::success(format!(
        "Restored {} goal(s) from {backup_id}.",
        context.manager.goals().len()
    ));
    Ok(())
}
