use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use cashflow_core::AlertSeverity;
use colored::Colorize;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Critical,
    Section,
}

impl MessageKind {
    fn label(self) -> &'static str {
        match self {
            MessageKind::Info => "INFO",
            MessageKind::Success => "OK",
            MessageKind::Warning => "WARNING",
            MessageKind::Critical => "CRITICAL",
            MessageKind::Section => "",
        }
    }
}

impl From<AlertSeverity> for MessageKind {
    fn from(severity: AlertSeverity) -> Self {
        match severity {
            AlertSeverity::Warning => MessageKind::Warning,
            AlertSeverity::Critical => MessageKind::Critical,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct OutputPreferences {
    pub color_enabled: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            color_enabled: true,
        }
    }
}

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);

/// Applies the preferences process-wide, including the `colored` override.
pub fn set_preferences(prefs: OutputPreferences) {
    colored::control::set_override(prefs.color_enabled);
    COLOR_ENABLED.store(prefs.color_enabled, Ordering::Relaxed);
}

fn preferences() -> OutputPreferences {
    OutputPreferences {
        color_enabled: COLOR_ENABLED.load(Ordering::Relaxed),
    }
}

fn apply_style(
    kind: MessageKind,
    message: impl fmt::Display,
    prefs: &OutputPreferences,
) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => format!("{}: {}", kind.label(), text),
    };

    if !prefs.color_enabled {
        return formatted;
    }

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Critical => formatted.bright_red().bold().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message, &preferences());
    if kind == MessageKind::Section {
        println!("\n{formatted}");
    } else {
        println!("{formatted}");
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Prints a balance alert styled by its severity.
pub fn alert(severity: AlertSeverity, message: impl fmt::Display) {
    print(severity.into(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_keeps_labels() {
        let prefs = OutputPreferences {
            color_enabled: false,
        };
        assert_eq!(
            apply_style(MessageKind::Warning, "low balance", &prefs),
            "WARNING: low balance"
        );
        assert_eq!(
            apply_style(MessageKind::Section, " Summary ", &prefs),
            "=== Summary ==="
        );
    }

    #[test]
    fn alert_severity_maps_to_message_kind() {
        assert_eq!(
            MessageKind::from(AlertSeverity::Critical),
            MessageKind::Critical
        );
        assert_eq!(
            MessageKind::from(AlertSeverity::Warning),
            MessageKind::Warning
        );
    }
}
