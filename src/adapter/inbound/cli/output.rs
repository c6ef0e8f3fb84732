//! Terminal output formatting.
//!
//! Human-readable output goes to stdout with colored markers. In JSON mode
//! each command prints one pretty JSON document instead, so results can be
//! piped into other tools. Quiet mode suppresses everything but results and
//! errors.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::Result;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Return whether machine-readable JSON output is enabled.
#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

fn decorations_suppressed() -> bool {
    let config = read_config();
    config.json || config.quiet
}

/// Print a command result as pretty JSON.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn json_output<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section header.
pub fn section(title: &str) {
    if decorations_suppressed() {
        return;
    }
    println!();
    println!("{}", title.bold());
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    if is_json() {
        return;
    }
    println!("  {:<12} {}", label.dimmed(), value);
}

/// Print rows as a table.
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) {
    if is_json() {
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

/// Print a success line.
pub fn success(message: &str) {
    if decorations_suppressed() {
        return;
    }
    println!("  {} {}", "✓".green(), message);
}

/// Print a note in dim text.
pub fn note(message: &str) {
    if decorations_suppressed() {
        return;
    }
    println!("  {}", message.dimmed());
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "error": message }));
        return;
    }
    eprintln!("  {} {}", "×".red(), message);
}
