//! Domain types for issue tracking.
//!
//! Core model: issues identified by `prefix-N` counter IDs, connected by
//! typed dependency edges. The free-text fields (title, description, design,
//! acceptance criteria) double as the duplicate-detection fingerprint, and
//! description/notes are scanned for cross-issue ID references, so none of
//! them is ever normalized on the way in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest (most urgent) priority value.
pub const MIN_PRIORITY: u8 = 0;

/// Highest (least urgent) priority value.
pub const MAX_PRIORITY: u8 = 4;

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Unique identifier for an issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IssueId(pub String);

impl IssueId {
    /// Create a new issue ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IssueId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IssueId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Represents an issue in the tracking system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier for the issue.
    pub id: IssueId,

    /// Issue title.
    pub title: String,

    /// Issue description.
    pub description: String,

    /// Current status.
    pub status: IssueStatus,

    /// Priority level (0 = highest, 4 = lowest).
    pub priority: u8,

    /// Issue type.
    pub issue_type: IssueType,

    /// Assignee (optional).
    pub assignee: Option<String>,

    /// Design notes (optional).
    pub design: Option<String>,

    /// Acceptance criteria (optional).
    pub acceptance_criteria: Option<String>,

    /// Additional notes.
    pub notes: Option<String>,

    /// Dependencies on other issues.
    pub dependencies: Vec<Dependency>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,

    /// Close timestamp, set the first time the issue is closed.
    pub closed_at: Option<DateTime<Utc>>,

    /// Reason recorded when the issue was closed.
    pub close_reason: Option<String>,

    /// Actor that closed the issue.
    pub closed_by: Option<String>,
}

impl Issue {
    /// Validate invariants that must hold for a stored issue.
    ///
    /// Used both for new issues and for records loaded from the JSONL
    /// mirror, which may have been hand-edited.
    pub fn validate(&self) -> std::result::Result<(), String> {
        validate_title(&self.title)?;
        validate_priority(self.priority)?;
        Ok(())
    }
}

/// Status of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Issue is open and ready to work on.
    Open,

    /// Issue is currently being worked on.
    #[serde(rename = "in_progress")]
    InProgress,

    /// Issue is blocked by dependencies.
    Blocked,

    /// Issue has been completed.
    Closed,
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Blocked => write!(f, "blocked"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Type of issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
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

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bug => write!(f, "bug"),
            Self::Feature => write!(f, "feature"),
            Self::Task => write!(f, "task"),
            Self::Epic => write!(f, "epic"),
            Self::Chore => write!(f, "chore"),
        }
    }
}

/// Dependency of an issue on another, as embedded in the issue record.
///
/// The owning issue's ID is implicit; [`DependencyEdge`] carries the full
/// triple for graph-level operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dependency {
    /// ID of the issue this depends on.
    pub depends_on_id: IssueId,

    /// Type of dependency.
    pub dep_type: DependencyType,
}

/// A directed, typed dependency edge between two issues.
///
/// The `(issue_id, depends_on_id, dep_type)` triple is unique in the store;
/// both endpoints must exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The issue that has the dependency.
    pub issue_id: IssueId,

    /// The issue being depended upon.
    pub depends_on_id: IssueId,

    /// Type of dependency.
    pub dep_type: DependencyType,
}

/// Type of dependency relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyType {
    /// Hard blocker - prevents work.
    Blocks,

    /// Soft link - informational.
    Related,

    /// Hierarchical - epic to task.
    ParentChild,

    /// Found during work.
    DiscoveredFrom,
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocks => write!(f, "blocks"),
            Self::Related => write!(f, "related"),
            Self::ParentChild => write!(f, "parent-child"),
            Self::DiscoveredFrom => write!(f, "discovered-from"),
        }
    }
}

/// Data for creating a new issue.
#[derive(Debug, Clone)]
pub struct NewIssue {
    /// Issue title.
    pub title: String,

    /// Issue description.
    pub description: String,

    /// Priority level (0-4).
    pub priority: u8,

    /// Issue type.
    pub issue_type: IssueType,

    /// Assignee (optional).
    pub assignee: Option<String>,

    /// Design notes (optional).
    pub design: Option<String>,

    /// Acceptance criteria (optional).
    pub acceptance_criteria: Option<String>,

    /// Additional notes.
    pub notes: Option<String>,

    /// Dependencies.
    pub dependencies: Vec<(IssueId, DependencyType)>,
}

impl NewIssue {
    /// Validate the data before an issue is created from it.
    pub fn validate(&self) -> std::result::Result<(), String> {
        validate_title(&self.title)?;
        validate_priority(self.priority)?;
        Ok(())
    }
}

/// Data for updating an existing issue.
#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    /// New title (if updating).
    pub title: Option<String>,

    /// New description (if updating).
    pub description: Option<String>,

    /// New status (if updating).
    pub status: Option<IssueStatus>,

    /// New priority (if updating).
    pub priority: Option<u8>,

    /// New assignee (if updating, inner `None` to clear).
    pub assignee: Option<Option<String>>,

    /// New design notes (if updating).
    pub design: Option<String>,

    /// New acceptance criteria (if updating).
    pub acceptance_criteria: Option<String>,

    /// New notes (if updating).
    pub notes: Option<String>,
}

/// Filter for querying issues.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    /// Filter by status.
    pub status: Option<IssueStatus>,

    /// Filter by priority.
    pub priority: Option<u8>,

    /// Filter by issue type.
    pub issue_type: Option<IssueType>,

    /// Filter by assignee.
    pub assignee: Option<String>,

    /// Limit number of results.
    pub limit: Option<usize>,
}

impl IssueFilter {
    /// Whether an issue passes every criterion set on this filter.
    ///
    /// The `limit` field is not applied here; callers truncate after
    /// sorting.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(status) = &self.status {
            if &issue.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if issue.priority != priority {
                return false;
            }
        }
        if let Some(issue_type) = &self.issue_type {
            if &issue.issue_type != issue_type {
                return false;
            }
        }
        if let Some(assignee) = &self.assignee {
            if issue.assignee.as_ref() != Some(assignee) {
                return false;
            }
        }
        true
    }
}

/// Sort policy for the ready-to-work queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPolicy {
    /// Recent issues (< 48h) by priority, older issues by age.
    #[default]
    Hybrid,

    /// Strict P0 -> P4 ordering.
    Priority,

    /// Creation date ascending (oldest first).
    Oldest,
}

fn validate_title(title: &str) -> std::result::Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title cannot exceed {} characters, got {}",
            MAX_TITLE_LENGTH,
            title.len()
        ));
    }
    if title.contains('\n') || title.contains('\r') {
        return Err("Title cannot contain newline characters".to_string());
    }
    Ok(())
}

fn validate_priority(priority: u8) -> std::result::Result<(), String> {
    if priority > MAX_PRIORITY {
        return Err(format!(
            "Priority must be between {MIN_PRIORITY} and {MAX_PRIORITY}, got {priority}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_issue(id: &str, title: &str) -> Issue {
        Issue {
            id: IssueId::new(id),
            title: title.to_string(),
            description: String::new(),
            status: IssueStatus::Open,
            priority: 2,
            issue_type: IssueType::Task,
            assignee: None,
            design: None,
            acceptance_criteria: None,
            notes: None,
            dependencies: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            closed_at: None,
            close_reason: None,
            closed_by: None,
        }
    }

    #[test]
    fn issue_id_ordering_is_bytewise() {
        // "beads-10" sorts before "beads-9": '1' < '9' at the first
        // differing byte. The merge target selector depends on this.
        assert!(IssueId::new("beads-10") < IssueId::new("beads-9"));
        assert!(IssueId::new("beads-1") < IssueId::new("beads-2"));
    }

    #[test]
    fn validate_rejects_bad_titles() {
        let mut issue = bare_issue("bd-1", "ok");
        assert!(issue.validate().is_ok());

        issue.title = String::new();
        assert!(issue.validate().is_err());

        issue.title = "a".repeat(MAX_TITLE_LENGTH + 1);
        assert!(issue.validate().is_err());

        issue.title = "two\nlines".to_string();
        assert!(issue.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_priority() {
        let mut issue = bare_issue("bd-1", "ok");
        issue.priority = 5;
        assert!(issue.validate().is_err());
        issue.priority = MAX_PRIORITY;
        assert!(issue.validate().is_ok());
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&IssueStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&DependencyType::ParentChild).unwrap(),
            "\"parent-child\""
        );
    }

    #[test]
    fn filter_matches_combined_criteria() {
        let mut issue = bare_issue("bd-1", "ok");
        issue.assignee = Some("alice".to_string());

        let filter = IssueFilter {
            status: Some(IssueStatus::Open),
            assignee: Some("alice".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&issue));

        let filter = IssueFilter {
            status: Some(IssueStatus::Closed),
            ..Default::default()
        };
        assert!(!filter.matches(&issue));
    }

    #[test]
    fn dependencies_sort_deterministically() {
        let mut deps = vec![
            Dependency {
                depends_on_id: IssueId::new("bd-3"),
                dep_type: DependencyType::Related,
            },
            Dependency {
                depends_on_id: IssueId::new("bd-2"),
                dep_type: DependencyType::Blocks,
            },
        ];
        deps.sort();
        assert_eq!(deps[0].depends_on_id.as_str(), "bd-2");
    }
}
