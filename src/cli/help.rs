use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::table::{Table, TableColumn};

pub fn overview(registry: &CommandRegistry) -> String {
    let mut table = Table::new(vec![
        TableColumn::left("Command"),
        TableColumn::left("Description"),
    ]);
    for entry in registry.entries() {
        table.add_row([entry.name, entry.description]);
    }
    table.render()
}

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    output::block(&overview(registry));
    output::hint("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::block(&format!(
        "  {}\n  usage: {}",
        entry.description, entry.usage
    ));
}

/// Closest registered name within an edit distance of three.
pub fn suggest(registry: &CommandRegistry, input: &str) -> Option<&'static str> {
    let needle = input.to_ascii_lowercase();
    registry
        .names()
        .map(|name| (strsim::levenshtein(name, &needle), name))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::register_all;

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        registry
    }

    #[test]
    fn typos_suggest_the_nearest_command() {
        let registry = registry();
        assert_eq!(suggest(&registry, "chek"), Some("check"));
        assert_eq!(suggest(&registry, "GOALZ"), Some("goals"));
        assert_eq!(suggest(&registry, "zzzzzzzz"), None);
    }

    #[test]
    fn overview_lists_commands_in_registration_order() {
        let text = overview(&registry());
        let new_goal = text.find("new-goal").unwrap();
        let exit = text.find("exit").unwrap();
        assert!(new_goal < exit);
        assert!(text.contains("Show or change defaults for new goals"));
    }
}
