use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

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

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
    if prefs.color {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}

pub fn current_preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "INFO",
        MessageKind::Success => "SUCCESS",
        MessageKind::Warning => "WARNING",
        MessageKind::Error => "ERROR",
        MessageKind::Hint => "HINT",
        MessageKind::Section => "",
    }
}

/// Formats a message without printing it.
pub fn format_message(kind: MessageKind, message: impl fmt::Display, color: bool) -> String {
    let text = message.to_string();
    let plain = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => format!("{}: {text}", label(kind)),
    };
    if !color {
        return plain;
    }
    match kind {
        MessageKind::Success => plain.bright_green().to_string(),
        MessageKind::Warning => plain.bright_yellow().to_string(),
        MessageKind::Error => plain.bright_red().to_string(),
        MessageKind::Hint => plain.dimmed().to_string(),
        MessageKind::Section => plain.bold().to_string(),
        MessageKind::Info => plain,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = format_message(kind, message, current_preferences().color);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
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

/// Prints pre-rendered text such as tables verbatim.
pub fn block(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}
