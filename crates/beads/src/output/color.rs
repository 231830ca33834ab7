//! Color and icon helpers for terminal output.

use crate::domain::{IssueStatus, IssueType};
use colored::{ColoredString, Colorize};

/// Status icon, colored to match the status.
#[must_use]
pub fn status_icon(status: IssueStatus, use_ascii: bool) -> ColoredString {
    let icon = if use_ascii {
        match status {
            IssueStatus::Open => "o",
            IssueStatus::InProgress => ">",
            IssueStatus::Blocked => "x",
            IssueStatus::Closed => "*",
        }
    } else {
        match status {
            IssueStatus::Open => "○",
            IssueStatus::InProgress => "◐",
            IssueStatus::Blocked => "⊘",
            IssueStatus::Closed => "●",
        }
    };

    match status {
        IssueStatus::Open => icon.green(),
        IssueStatus::InProgress => icon.yellow(),
        IssueStatus::Blocked => icon.red(),
        IssueStatus::Closed => icon.dimmed(),
    }
}

/// Issue type rendered as a short tag.
#[must_use]
pub fn type_tag(issue_type: IssueType) -> ColoredString {
    match issue_type {
        IssueType::Bug => "bug".red(),
        IssueType::Feature => "feature".cyan(),
        IssueType::Task => "task".normal(),
        IssueType::Epic => "epic".magenta(),
        IssueType::Chore => "chore".dimmed(),
    }
}

/// Priority rendered as `P0`..`P4`, hot colors for urgent work.
#[must_use]
pub fn priority_tag(priority: u8) -> ColoredString {
    let tag = format!("P{priority}");
    match priority {
        0 => tag.red().bold(),
        1 => tag.yellow(),
        2 => tag.normal(),
        _ => tag.dimmed(),
    }
}

/// Print an error message to stderr.
pub fn error(msg: &str) {
    eprintln!("{} {msg}", "error:".red().bold());
}

/// Print a warning message to stderr.
pub fn warning(msg: &str) {
    eprintln!("{} {msg}", "warning:".yellow().bold());
}
