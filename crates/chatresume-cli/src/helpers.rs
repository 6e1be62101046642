//! Shared CLI helpers — token printing and timestamp formatting.

use std::time::SystemTime;

use chrono::{DateTime, Local};
use colored::Colorize;

use chatresume_core::ResumeToken;

/// Print a looked-up token (or its absence) to stdout.
pub fn print_token(key: &str, engine: &str, token: Option<&ResumeToken>) {
    match token {
        Some(token) => println!("{}", token.value),
        None => println!(
            "{} {}",
            "(no session)".dimmed(),
            format!("{key} / {engine}").dimmed()
        ),
    }
}

/// Confirm a stored token.
pub fn print_saved(key: &str, engine: &str) {
    println!("{} saved {} session for {}", "✓".green(), engine.bold(), key);
}

/// Confirm a cleared chat.
pub fn print_cleared(key: &str) {
    println!("{} cleared sessions for {}", "✓".green(), key);
}

/// Local-time rendering of a file modification time.
pub fn format_modified(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
