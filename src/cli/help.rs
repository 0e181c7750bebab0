use crate::cli::output::{hint, info, section};
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry, signed_in: bool) {
    for (title, entries) in registry.groups() {
        section(title);
        for entry in entries {
            let lock = if entry.requires_session && !signed_in { "*" } else { " " };
            info(format!("  {:<16}{lock} {}", entry.name, entry.description));
        }
    }
    if !signed_in {
        hint("Commands marked * need a signed-in session (`login`).");
    }
    info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    section(format!("Help: {}", entry.name));
    info(format!("  {}", entry.description));
    info(format!("  Usage: {}", entry.usage));
    if entry.requires_session {
        info("  Requires a signed-in session.");
    }
}
