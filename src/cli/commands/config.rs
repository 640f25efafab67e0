use crate::cli::core::{usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::apply_output_preferences;
use crate::cli::table::{Table, TableColumn};
use crate::cli::output;
use crate::config::Config;

const USAGE: &str =
    "config [show | set <key> <value> | reset | backups | restore <number|backup>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change defaults for new goals",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            show(&context.config);
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            let mut updated = context.config.clone();
            updated.set(key, &value.join(" "))?;
            store(context, updated, "before-set")?;
            output::success(format!("Updated `{key}`."));
            if matches!(*key, "retention" | "data-dir") {
                output::hint("Takes effect the next time the shell starts.");
            }
            Ok(())
        }
        ["reset"] => {
            store(context, Config::default(), "before-reset")?;
            output::success("Settings restored to defaults.");
            Ok(())
        }
        ["backups"] => list_backups(context),
        ["restore", reference] => restore(context, reference),
        _ => Err(usage_error(USAGE)),
    }
}

fn show(config: &Config) {
    let mut table = Table::new(vec![TableColumn::left("Key"), TableColumn::left("Value")]);
    for (key, value) in config.entries() {
        table.add_row([key.to_string(), value]);
    }
    output::section("Configuration");
    output::block(&table.render());
}

fn list_backups(context: &ShellContext) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        output::info("No configuration backups yet.");
        return Ok(());
    }
    let mut table = Table::new(vec![TableColumn::right("#"), TableColumn::left("Backup")]);
    for (idx, name) in backups.into_iter().enumerate() {
        table.add_row([(idx + 1).to_string(), name]);
    }
    output::section("Configuration backups");
    output::block(&table.render());
    Ok(())
}

fn restore(context: &mut ShellContext, reference: &str) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    let name = match reference.parse::<usize>() {
        Ok(position) => position
            .checked_sub(1)
            .and_then(|idx| backups.get(idx))
            .cloned()
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "no configuration backup #{position}; run `config backups` to list them"
                ))
            })?,
        Err(_) => reference.to_string(),
    };

    if !context.confirm(&format!("Replace the current settings with `{name}`?"))? {
        output::info("Restore cancelled.");
        return Ok(());
    }
    let restored = context.config_manager.restore(&name)?;
    context
        .config_manager
        .backup(&context.config, Some("before-restore"))?;
    context.config = restored;
    apply_output_preferences(&context.config, context.mode);
    output::success(format!("Settings restored from {name}."));
    Ok(())
}

fn store(context: &mut ShellContext, updated: Config, note: &str) -> CommandResult {
    context
        .config_manager
        .backup(&context.config, Some(note))?;
    context.config_manager.save(&updated)?;
    context.config = updated;
    apply_output_preferences(&context.config, context.mode);
    Ok(())
}
