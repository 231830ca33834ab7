//! JSONL persistence for the in-memory store.

use super::inner::InMemoryStoreInner;
use crate::domain::{Issue, IssueId};
use crate::error::Result;
use crate::storage::IssueStore;
use beads_jsonl::{read_jsonl_resilient, write_jsonl_atomic, Warning as JsonlWarning};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Non-fatal problems encountered while loading the JSONL mirror.
///
/// Loading continues past each of these; the problematic record or edge is
/// skipped. Callers should surface them, since they indicate data that needs
/// manual attention.
#[derive(Debug, Clone)]
pub enum LoadWarning {
    /// A line could not be parsed as an issue record.
    MalformedJson {
        /// 1-based file line number.
        line_number: usize,
        /// Parse failure description.
        error: String,
    },

    /// An issue failed validation and was not loaded.
    InvalidIssueData {
        /// ID of the skipped issue.
        issue_id: IssueId,
        /// 1-based record index among parsed records.
        record_number: usize,
        /// Validation failure description.
        error: String,
    },

    /// A dependency referenced an issue that is not in the file; the edge
    /// was skipped, both issues were still loaded.
    OrphanedDependency {
        /// The dependent issue.
        from: IssueId,
        /// The missing dependency target.
        to: IssueId,
    },
}

/// Load a store from a JSONL file.
///
/// Malformed lines, invalid issues, and orphaned dependency edges are
/// skipped with warnings. Dependency cycles are NOT broken here: merge
/// migration can legitimately leave cycles in the graph, and dropping those
/// edges on reload would silently lose merged state.
///
/// # Errors
///
/// Fails only when the file cannot be read at all.
pub async fn load_from_jsonl(
    path: &Path,
    prefix: String,
) -> Result<(Box<dyn IssueStore>, Vec<LoadWarning>)> {
    let (parsed, jsonl_warnings) = read_jsonl_resilient::<Issue, _>(path).await?;

    let mut warnings: Vec<LoadWarning> = jsonl_warnings
        .into_iter()
        .map(|w| match w {
            JsonlWarning::MalformedJson { line_number, error } => {
                LoadWarning::MalformedJson { line_number, error }
            }
        })
        .collect();

    let mut issues = Vec::new();
    for (index, issue) in parsed.into_iter().enumerate() {
        if let Err(error) = issue.validate() {
            warnings.push(LoadWarning::InvalidIssueData {
                issue_id: issue.id.clone(),
                record_number: index + 1,
                error,
            });
            continue;
        }
        issues.push(issue);
    }

    let store = Arc::new(Mutex::new(InMemoryStoreInner::new(prefix)));
    {
        let mut inner = store.lock().await;

        for issue in &issues {
            let node = inner.graph.add_node(issue.id.clone());
            inner.node_map.insert(issue.id.clone(), node);
            inner.issues.insert(issue.id.clone(), issue.clone());
            inner.id_generator.register_id(issue.id.as_str());
        }

        for issue in &issues {
            for dep in &issue.dependencies {
                if !inner.node_map.contains_key(&dep.depends_on_id) {
                    warnings.push(LoadWarning::OrphanedDependency {
                        from: issue.id.clone(),
                        to: dep.depends_on_id.clone(),
                    });
                    continue;
                }

                let from_node = inner.node_map[&issue.id];
                let to_node = inner.node_map[&dep.depends_on_id];
                if !inner.edge_exists(from_node, to_node, dep.dep_type) {
                    inner.graph.add_edge(from_node, to_node, dep.dep_type);
                }
            }
        }
    }

    Ok((Box::new(store), warnings))
}

/// Save a store to a JSONL file atomically.
///
/// Issues are written sorted by ID and each issue's dependencies are sorted,
/// so identical store states always serialize identically and version
/// control diffs stay minimal.
pub async fn save_to_jsonl(store: &dyn IssueStore, path: &Path) -> Result<()> {
    let mut issues = store.export_all().await?;

    issues.sort_by(|a, b| a.id.cmp(&b.id));
    for issue in &mut issues {
        issue.dependencies.sort();
    }

    write_jsonl_atomic(path, &issues).await?;

    Ok(())
}
