pub mod auth;
pub mod dashboard;
pub mod finance;
pub mod guardians;
pub mod settings;
pub mod students;
pub mod system;

use crate::cli::registry::{CommandEntry, CommandRegistry};

/// Command groups in the order `help` lists them.
pub(crate) fn all_groups() -> Vec<(&'static str, Vec<CommandEntry>)> {
    vec![
        ("Shell", system::definitions()),
        ("Account", auth::definitions()),
        ("Overview", dashboard::definitions()),
        ("Students", students::definitions()),
        ("Guardians", guardians::definitions()),
        ("Finance", finance::definitions()),
        ("Preferences", settings::definitions()),
    ]
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for (title, entries) in all_groups() {
        registry.register_group(title, entries);
    }
}

/// First eight characters of a uuid, enough to tell rows apart on screen.
pub(crate) fn short_id(id: uuid::Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}
