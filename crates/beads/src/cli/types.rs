//! CLI value enums and domain type conversions.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::{DependencyType, Issue, IssueStatus, IssueType};

/// Issue type for CLI arguments.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueTypeArg {
    /// Bug fix.
    Bug,
    /// New feature.
    Feature,
    /// General task.
    Task,
    /// Epic (parent issue).
    Epic,
    /// Maintenance/chore.
    Chore,
}

/// Issue status for CLI arguments.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueStatusArg {
    /// Open and ready to work on.
    Open,
    /// Currently being worked on.
    #[value(name = "in_progress", alias = "in-progress")]
    InProgress,
    /// Blocked by dependencies.
    Blocked,
    /// Completed.
    Closed,
}

/// Dependency type for CLI arguments.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyTypeArg {
    /// Hard blocker - prevents work.
    Blocks,
    /// Soft link - informational.
    Related,
    /// Hierarchical - epic to task.
    #[value(name = "parent-child")]
    ParentChild,
    /// Found during work.
    #[value(name = "discovered-from")]
    DiscoveredFrom,
}

impl std::fmt::Display for DependencyTypeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        DependencyType::from(*self).fmt(f)
    }
}

/// Sort order for the list command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrderArg {
    /// Sort by priority (highest first).
    #[default]
    Priority,
    /// Sort by creation date (newest first).
    Newest,
    /// Sort by creation date (oldest first).
    Oldest,
}

/// Sort policy for the ready command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPolicyArg {
    /// Recent issues (48h) by priority, older by age.
    #[default]
    Hybrid,
    /// Strict priority ordering (P0 -> P4).
    Priority,
    /// Oldest issues first.
    Oldest,
}

impl From<IssueTypeArg> for IssueType {
    fn from(arg: IssueTypeArg) -> Self {
        match arg {
            IssueTypeArg::Bug => IssueType::Bug,
            IssueTypeArg::Feature => IssueType::Feature,
            IssueTypeArg::Task => IssueType::Task,
            IssueTypeArg::Epic => IssueType::Epic,
            IssueTypeArg::Chore => IssueType::Chore,
        }
    }
}

impl From<IssueStatusArg> for IssueStatus {
    fn from(arg: IssueStatusArg) -> Self {
        match arg {
            IssueStatusArg::Open => IssueStatus::Open,
            IssueStatusArg::InProgress => IssueStatus::InProgress,
            IssueStatusArg::Blocked => IssueStatus::Blocked,
            IssueStatusArg::Closed => IssueStatus::Closed,
        }
    }
}

impl From<DependencyTypeArg> for DependencyType {
    fn from(arg: DependencyTypeArg) -> Self {
        match arg {
            DependencyTypeArg::Blocks => DependencyType::Blocks,
            DependencyTypeArg::Related => DependencyType::Related,
            DependencyTypeArg::ParentChild => DependencyType::ParentChild,
            DependencyTypeArg::DiscoveredFrom => DependencyType::DiscoveredFrom,
        }
    }
}

/// A single failed operation within a batch command.
#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    /// The issue the operation targeted.
    pub issue_id: String,
    /// Why it failed.
    pub error: String,
}

/// Result of a batch command (update/close over several IDs).
#[derive(Debug, Default, Serialize)]
pub struct BatchResult {
    /// Issues the operation succeeded on.
    pub succeeded: Vec<Issue>,
    /// Failures, in input order.
    pub failed: Vec<BatchError>,
}

impl BatchResult {
    /// New empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any operation failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Total operations attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}
