pub mod backup;
pub mod batch;
pub mod config;
pub mod goal;
pub mod system;

use crate::cli::registry::CommandRegistry;

/// Registers every shell command, in the order `help` lists them.
pub fn register_all(registry: &mut CommandRegistry) {
    let entries = goal::definitions()
        .into_iter()
        .chain(batch::definitions())
        .chain(backup::definitions())
        .chain(config::definitions())
        .chain(system::definitions());
    for entry in entries {
        registry.register(entry);
    }
}
