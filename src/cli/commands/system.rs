use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::{help, output, render};
use crate::goal::CURRENT_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "denominations",
            "List coins and bills with their bundle sizes",
            "denominations",
            cmd_denominations,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_denominations(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let defaults = context.config.default_denomination_values()?;
    output::section("Denominations");
    output::block(&render::denomination_table(&defaults));
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Money Challenge {}", meta.version));
    let mut lines: Vec<String> = meta
        .rows()
        .iter()
        .map(|(label, value)| format!("  {label:<8}: {value}"))
        .collect();
    lines.push(format!("  {:<8}: v{CURRENT_SCHEMA_VERSION}", "schema"));
    output::block(&lines.join("\n"));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(name) => match context.registry.get(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        },
        None => help::print_overview(&context.registry),
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
