//! Error types for beads operations.

use crate::domain::{DependencyType, IssueId};
use std::io;
use thiserror::Error;

/// The error type for beads operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend-specific storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Issue not found.
    #[error("Issue not found: {0}")]
    IssueNotFound(IssueId),

    /// Priority outside the 0-4 range.
    #[error("Invalid priority {0}: must be between 0 and 4")]
    InvalidPriority(u8),

    /// The dependency edge does not exist.
    #[error("Dependency not found: {from} -> {to}")]
    DependencyNotFound {
        /// Issue carrying the dependency.
        from: IssueId,
        /// Issue depended upon.
        to: IssueId,
    },

    /// The identical dependency edge (same endpoints and type) is already
    /// present. The merge executor relies on this distinguished condition to
    /// treat re-adds as no-ops.
    #[error("Dependency already exists: {from} --[{dep_type}]--> {to}")]
    DependencyExists {
        /// Issue carrying the dependency.
        from: IssueId,
        /// Issue depended upon.
        to: IssueId,
        /// Relationship kind.
        dep_type: DependencyType,
    },

    /// Adding the edge would create a dependency cycle.
    #[error("Circular dependency: adding {from} -> {to} would create a cycle")]
    CircularDependency {
        /// Issue carrying the dependency.
        from: IssueId,
        /// Issue depended upon.
        to: IssueId,
    },

    /// The issue cannot be deleted while other issues depend on it.
    #[error("Cannot delete {issue_id}: {dependent_count} issue(s) depend on it")]
    HasDependents {
        /// Issue targeted for deletion.
        issue_id: IssueId,
        /// Number of issues depending on it.
        dependent_count: usize,
        /// The depending issues.
        dependents: Vec<IssueId>,
    },

    /// A merge listed the target among its own sources.
    #[error("cannot merge issue into itself: {0}")]
    CannotMergeIntoSelf(IssueId),

    /// The merge target does not exist.
    #[error("target issue not found: {0}")]
    MergeTargetNotFound(IssueId),

    /// A merge source does not exist.
    #[error("source issue not found: {0}")]
    MergeSourceNotFound(IssueId),

    /// A merge was cancelled between sources.
    #[error("merge cancelled after {completed} source(s)")]
    MergeCancelled {
        /// Sources fully processed before the cancellation was honored.
        completed: usize,
    },
}

impl From<beads_jsonl::Error> for Error {
    fn from(e: beads_jsonl::Error) -> Self {
        match e {
            beads_jsonl::Error::Io(io_err) => Error::Io(io_err),
            beads_jsonl::Error::Json(json_err) => Error::Json(json_err),
        }
    }
}

/// A specialized Result type for beads operations.
pub type Result<T> = std::result::Result<T, Error>;
