//! Logging utilities with colored output and status lines.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only printed with `--verbose`
//! - status lines (`✓` / `✗` / `⚠`) for operator-facing outcomes
//!
//! # Example
//!
//! ```ignore
//! log!("watch"; "watching {} directories", count);
//! logger::status_success("compiled a.cpp (312ms)");
//! logger::status_error("compile failed: a.cpp", "exit status: 1");
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Serializes status lines coming from the request thread and the signal wait.
static STATUS_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let _guard = STATUS_LOCK.lock();
    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "serve" => prefix.bright_blue().bold().to_string(),
        "watch" => prefix.bright_green().bold().to_string(),
        "run" | "compile" => prefix.bright_cyan().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Status lines
// ============================================================================

/// Get current local time formatted as HH:MM:SS
fn now() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Kind of operator-facing outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
    Warning,
}

impl Status {
    fn marker(self) -> String {
        match self {
            Self::Success => "✓".green().to_string(),
            Self::Failure => "✗".red().to_string(),
            Self::Warning => "⚠".yellow().to_string(),
        }
    }
}

/// Render a status line without printing it.
///
/// `detail` is appended on the following lines when non-empty.
pub fn format_status(status: Status, summary: &str, detail: &str) -> String {
    let timestamp = format!("[{}]", now()).dimmed().to_string();
    let mut line = format!("{timestamp} {} {summary}", status.marker());
    let detail = detail.trim_end();
    if !detail.is_empty() {
        line.push('\n');
        line.push_str(detail);
    }
    line
}

fn print_status(status: Status, summary: &str, detail: &str) {
    let line = format_status(status, summary, detail);

    let _guard = STATUS_LOCK.lock();
    let mut stdout = stdout().lock();
    writeln!(stdout, "{line}").ok();
    stdout.flush().ok();
}

/// Success status (✓ prefix, green).
pub fn status_success(message: &str) {
    print_status(Status::Success, message, "");
}

/// Error status (✗ prefix, red) with optional detail.
pub fn status_error(summary: &str, detail: &str) {
    print_status(Status::Failure, summary, detail);
}

/// Warning status (⚠ prefix, yellow).
pub fn status_warning(message: &str) {
    print_status(Status::Warning, message, "");
}

// ============================================================================
// Tests
// ============================================================================
