//! Output formatting for CLI commands.
//!
//! Human-readable text by default, machine-readable JSON behind the global
//! `--json` flag. Text output adapts to terminal width and respects
//! `NO_COLOR`.

pub mod color;

use crate::domain::{DependencyEdge, Issue};
use colored::Colorize;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

use color::{priority_tag, status_icon, type_tag};

const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Output format mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format.
    Text,
    /// JSON format for programmatic use.
    Json,
}

/// Settings controlling text rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
}

impl OutputConfig {
    /// Build a config from the environment.
    ///
    /// Reads `BEADS_ASCII` ("1"/"true" for ASCII icons) and honors the
    /// `NO_COLOR` convention (<https://no-color.org/>) by disabling color
    /// output globally. Width comes from the terminal, capped at 80.
    #[must_use]
    pub fn from_env() -> Self {
        if env::var("NO_COLOR").is_ok() {
            colored::control::set_override(false);
        }

        let use_ascii = matches!(
            env::var("BEADS_ASCII").as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        );

        let max_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(DEFAULT_MAX_CONTENT_WIDTH)
            .min(DEFAULT_MAX_CONTENT_WIDTH);

        Self {
            max_width,
            use_ascii,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
        }
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

/// Print a one-line issue summary.
pub fn print_issue(issue: &Issue, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match mode {
        OutputMode::Text => print_issue_line(&mut handle, issue, &OutputConfig::from_env()),
        OutputMode::Json => {
            let json = serde_json::to_string_pretty(issue)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(handle, "{json}")
        }
    }
}

/// Print a list of issues.
pub fn print_issues(issues: &[Issue], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(&issues),
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let config = OutputConfig::from_env();

            if issues.is_empty() {
                writeln!(handle, "No issues found.")?;
                return Ok(());
            }
            for issue in issues {
                print_issue_line(&mut handle, issue, &config)?;
            }
            Ok(())
        }
    }
}

fn print_issue_line<W: Write>(w: &mut W, issue: &Issue, config: &OutputConfig) -> io::Result<()> {
    writeln!(
        w,
        "{} {} {} [{}] {}",
        status_icon(issue.status, config.use_ascii),
        issue.id.to_string().cyan(),
        priority_tag(issue.priority),
        type_tag(issue.issue_type),
        issue.title,
    )
}

/// Print full issue details (for the `show` command).
pub fn print_issue_details(
    issue: &Issue,
    deps: &[DependencyEdge],
    dependents: &[DependencyEdge],
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut w = stdout.lock();
    let config = OutputConfig::from_env();

    writeln!(
        w,
        "{} {} [{}]",
        issue.id.to_string().cyan().bold(),
        priority_tag(issue.priority),
        type_tag(issue.issue_type),
    )?;
    writeln!(w, "{}", issue.title.bold())?;
    writeln!(w)?;
    writeln!(
        w,
        "Status:   {} {}",
        status_icon(issue.status, config.use_ascii),
        issue.status
    )?;
    if let Some(assignee) = &issue.assignee {
        writeln!(w, "Assignee: {assignee}")?;
    }
    writeln!(
        w,
        "Created:  {}",
        issue.created_at.format("%Y-%m-%d %H:%M UTC")
    )?;
    if let Some(closed_at) = issue.closed_at {
        writeln!(w, "Closed:   {}", closed_at.format("%Y-%m-%d %H:%M UTC"))?;
    }
    if let Some(reason) = &issue.close_reason {
        let by = issue.closed_by.as_deref().unwrap_or("unknown");
        writeln!(w, "Reason:   {reason} (by {by})")?;
    }

    print_text_section(&mut w, "Description", &issue.description, &config)?;
    if let Some(design) = &issue.design {
        print_text_section(&mut w, "Design", design, &config)?;
    }
    if let Some(acceptance) = &issue.acceptance_criteria {
        print_text_section(&mut w, "Acceptance Criteria", acceptance, &config)?;
    }
    if let Some(notes) = &issue.notes {
        print_text_section(&mut w, "Notes", notes, &config)?;
    }

    if !deps.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", "Depends on:".bold())?;
        for dep in deps {
            writeln!(w, "  └── {} ({})", dep.depends_on_id, dep.dep_type)?;
        }
    }
    if !dependents.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", "Depended on by:".bold())?;
        for dep in dependents {
            writeln!(w, "  └── {} ({})", dep.issue_id, dep.dep_type)?;
        }
    }

    Ok(())
}

fn print_text_section<W: Write>(
    w: &mut W,
    title: &str,
    content: &str,
    config: &OutputConfig,
) -> io::Result<()> {
    if content.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}:", title.bold())?;
    for line in textwrap::wrap(content, config.max_width.saturating_sub(2)) {
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

/// Print blocked issues with their blockers.
pub fn print_blocked_issues(blocked: &[(Issue, Vec<Issue>)], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => {
            let entries: Vec<_> = blocked
                .iter()
                .map(|(issue, blockers)| {
                    serde_json::json!({
                        "issue": issue,
                        "blockers": blockers,
                    })
                })
                .collect();
            print_json(&entries)
        }
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut w = stdout.lock();
            let config = OutputConfig::from_env();

            if blocked.is_empty() {
                writeln!(w, "No blocked issues.")?;
                return Ok(());
            }

            for (issue, blockers) in blocked {
                print_issue_line(&mut w, issue, &config)?;
                for blocker in blockers {
                    writeln!(
                        w,
                        "    blocked by {} ({})",
                        blocker.id.to_string().cyan(),
                        blocker.status
                    )?;
                }
            }
            Ok(())
        }
    }
}

/// Print duplicate groups with the chosen merge target marked.
pub fn print_duplicate_groups(
    groups: &[(Vec<Issue>, crate::domain::IssueId)],
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => {
            let entries: Vec<_> = groups
                .iter()
                .map(|(members, target)| {
                    serde_json::json!({
                        "target": target,
                        "members": members.iter().map(|i| i.id.clone()).collect::<Vec<_>>(),
                        "title": members.first().map(|i| i.title.clone()),
                    })
                })
                .collect();
            print_json(&entries)
        }
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut w = stdout.lock();

            if groups.is_empty() {
                writeln!(w, "No duplicate issues found.")?;
                return Ok(());
            }

            writeln!(w, "Found {} duplicate group(s):", groups.len())?;
            for (i, (members, target)) in groups.iter().enumerate() {
                writeln!(w)?;
                let title = members.first().map_or("", |m| m.title.as_str());
                writeln!(w, "Group {}: {}", i + 1, title.bold())?;
                for member in members {
                    let marker = if &member.id == target {
                        "→ target".green().to_string()
                    } else {
                        "  merge into target".dimmed().to_string()
                    };
                    writeln!(w, "  {} {}", member.id.to_string().cyan(), marker)?;
                }
            }
            Ok(())
        }
    }
}
