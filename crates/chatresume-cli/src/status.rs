//! `chatresume path` — show where the state file lives and whether it exists.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::helpers::format_modified;

/// Run the path command.
pub fn run(state_path: &Path) -> Result<()> {
    println!();
    println!("{}", "Chatresume state".cyan().bold());
    println!();

    let modified = std::fs::metadata(state_path)
        .ok()
        .and_then(|meta| meta.modified().ok());

    println!(
        "  {:<18} {} {}",
        "State file:".bold(),
        state_path.display(),
        if modified.is_some() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    if let Some(time) = modified {
        println!(
            "  {:<18} {}",
            "Last modified:".bold(),
            format_modified(time).dimmed()
        );
    }

    println!();
    Ok(())
}
