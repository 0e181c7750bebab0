use std::fmt;
use std::sync::{OnceLock, RwLock};

use colored::{Color, Colorize};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

impl MessageKind {
    fn prefix(self) -> &'static str {
        match self {
            MessageKind::Info | MessageKind::Section => "",
            MessageKind::Success => "[ok] ",
            MessageKind::Warning => "[!] ",
            MessageKind::Error => "Error: ",
            MessageKind::Hint => "Hint: ",
        }
    }

    fn color(self) -> Option<Color> {
        match self {
            MessageKind::Success => Some(Color::BrightGreen),
            MessageKind::Warning => Some(Color::BrightYellow),
            MessageKind::Error => Some(Color::BrightRed),
            MessageKind::Hint => Some(Color::BrightCyan),
            MessageKind::Info | MessageKind::Section => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputPreferences {
    pub color: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self { color: true }
    }
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

fn preferences() -> &'static RwLock<OutputPreferences> {
    PREFERENCES.get_or_init(RwLock::default)
}

pub fn set_preferences(prefs: OutputPreferences) {
    colored::control::set_override(prefs.color);
    if let Ok(mut guard) = preferences().write() {
        *guard = prefs;
    }
}

pub fn current_preferences() -> OutputPreferences {
    preferences()
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

/// Formats one message line without printing it.
pub fn render(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    if kind == MessageKind::Section {
        return format!("\n{}", format!("=== {} ===", text.trim()).bold());
    }
    let line = format!("{}{text}", kind.prefix());
    match kind.color() {
        Some(color) => line.color(color).to_string(),
        None => line,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    println!("{}", render(kind, message));
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

/// Indented `label : value` row used by detail views.
pub fn field(label: &str, value: impl fmt::Display) {
    info(format!("  {label:<15}: {value}"));
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_lines_are_never_decorated() {
        assert_eq!(render(MessageKind::Info, "Saldo: R$ 10,00"), "Saldo: R$ 10,00");
        assert_eq!(MessageKind::Error.prefix(), "Error: ");
        assert!(MessageKind::Section.color().is_none());
    }
}
