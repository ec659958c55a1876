//! Terminal output for the binary. Everything here writes to stderr.

use console::{style, Style};

use crate::git::WorktreeStatus;

/// Format an error message with a red prefix.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

/// Print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Print each uncommitted change, coloured like `git status --short`.
pub fn display_worktree_status(status: &WorktreeStatus) {
    for entry in status.entries() {
        let colour = if entry.code == "??" {
            Style::new().red()
        } else if entry.code.starts_with(' ') {
            Style::new().yellow()
        } else {
            Style::new().green()
        };
        eprintln!("  {} {}", colour.apply_to(&entry.code), entry.path);
    }
}
