use std::collections::HashMap;

use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    /// Only available once signed in.
    pub requires_session: bool,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            requires_session: false,
        }
    }

    pub const fn signed_in(mut self) -> Self {
        self.requires_session = true;
        self
    }
}

/// Commands indexed by name and kept in titled groups for `help`.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    by_name: HashMap<&'static str, usize>,
    groups: Vec<(&'static str, Vec<usize>)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entries` under `title`. A name registered twice keeps its first
    /// handler.
    pub fn register_group(&mut self, title: &'static str, entries: Vec<CommandEntry>) {
        let mut members = Vec::with_capacity(entries.len());
        for entry in entries {
            if self.by_name.contains_key(entry.name) {
                continue;
            }
            let slot = self.entries.len();
            self.by_name.insert(entry.name, slot);
            self.entries.push(entry);
            members.push(slot);
        }
        if !members.is_empty() {
            self.groups.push((title, members));
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.by_name.get(name).map(|slot| &self.entries[*slot])
    }

    pub fn groups(&self) -> impl Iterator<Item = (&'static str, Vec<&CommandEntry>)> + '_ {
        self.groups.iter().map(|(title, members)| {
            (*title, members.iter().map(|slot| &self.entries[*slot]).collect())
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn duplicate_names_keep_the_first_entry() {
        let mut registry = CommandRegistry::new();
        registry.register_group("One", vec![CommandEntry::new("a", "first", "a", noop)]);
        registry.register_group(
            "Two",
            vec![
                CommandEntry::new("a", "second", "a", noop),
                CommandEntry::new("b", "other", "b", noop).signed_in(),
            ],
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("a").unwrap().description, "first");
        let titles: Vec<_> = registry.groups().map(|(title, members)| (title, members.len())).collect();
        assert_eq!(titles, vec![("One", 1), ("Two", 1)]);
        assert!(registry.get("b").unwrap().requires_session);
    }
}
