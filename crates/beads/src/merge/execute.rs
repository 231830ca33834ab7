//! The merge executor.

use crate::domain::{DependencyEdge, IssueId, IssueStatus, IssueUpdate};
use crate::error::{Error, Result};
use crate::storage::IssueStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error as ThisError;

/// Context carried through a merge: the acting user plus a cancellation
/// flag.
///
/// Cancellation is checked between sources only. A source whose
/// close-and-migrate sequence has started always completes, so every state
/// a cancelled merge leaves behind is a valid resumption point for a retry
/// with the same arguments.
#[derive(Debug, Clone)]
pub struct MergeContext {
    actor: String,
    cancelled: Arc<AtomicBool>,
}

impl MergeContext {
    /// Create a context for the given actor.
    #[must_use]
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The acting user recorded on closes and dependency writes.
    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Request cancellation; honored before the next source starts.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Counts of the work performed by a single `perform_merge` call.
///
/// Counts are per-call, not cumulative across retries: a second run over an
/// already-merged argument set reports zero closes and zero added edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MergeOutcome {
    /// Sources transitioned to Closed by this call.
    pub issues_closed: usize,

    /// Sources found already Closed and left untouched.
    pub issues_skipped: usize,

    /// Dependency edges newly created by migration.
    pub deps_added: usize,
}

/// A merge that stopped early, carrying the progress made before the fault.
///
/// There is no rollback: sources closed before the failure stay closed.
/// The caller retries the identical invocation to drive the merge to
/// completion; redundant closes and edge re-adds are harmless.
#[derive(Debug, ThisError)]
#[error("merge aborted: {source}")]
pub struct MergeAborted {
    /// Work completed by this call before the abort.
    pub partial: MergeOutcome,

    /// The underlying store fault or cancellation.
    #[source]
    pub source: Error,
}

/// Close each source issue and migrate its dependency edges to the target.
///
/// Sources are processed strictly in the given order. Per source:
///
/// 1. An already-Closed source is counted as skipped and keeps its original
///    close reason; its edges are still migrated. This is what makes a
///    retry of a partially completed merge converge instead of redoing or
///    double-counting work.
/// 2. An open source is closed with a reason recording the target.
/// 3. Every edge touching the source (either endpoint) is re-created with
///    the target substituted in. Edges that already exist after
///    substitution, and edges that would loop the target onto itself, are
///    skipped; only genuinely new edges count toward `deps_added`.
/// 4. A "merged into" note is appended to the source unless an identical
///    note is already present.
///
/// Callers run [`crate::merge::validate_merge`] first; this function fails
/// only on store-layer faults (and cancellation), returning the partial
/// counts alongside the error.
pub async fn perform_merge(
    store: &mut dyn IssueStore,
    ctx: &MergeContext,
    target: &IssueId,
    sources: &[IssueId],
) -> std::result::Result<MergeOutcome, MergeAborted> {
    let mut outcome = MergeOutcome::default();

    for (index, source) in sources.iter().enumerate() {
        if ctx.is_cancelled() {
            return Err(MergeAborted {
                partial: outcome,
                source: Error::MergeCancelled { completed: index },
            });
        }

        if let Err(e) = merge_one_source(store, ctx, target, source, &mut outcome).await {
            return Err(MergeAborted {
                partial: outcome,
                source: e,
            });
        }

        tracing::debug!(source = %source, target = %target, "merged source into target");
    }

    Ok(outcome)
}

async fn merge_one_source(
    store: &mut dyn IssueStore,
    ctx: &MergeContext,
    target: &IssueId,
    source: &IssueId,
    outcome: &mut MergeOutcome,
) -> Result<()> {
    let issue = store
        .get(source)
        .await?
        .ok_or_else(|| Error::IssueNotFound(source.clone()))?;

    if issue.status == IssueStatus::Closed {
        // Leave the original close reason in place.
        outcome.issues_skipped += 1;
    } else {
        store
            .close(source, &format!("Merged into {target}"), ctx.actor())
            .await?;
        outcome.issues_closed += 1;
    }

    outcome.deps_added += migrate_edges(store, ctx, target, source).await?;

    annotate_merged_source(store, target, source).await?;

    Ok(())
}

/// Re-point every edge touching `source` at `target`.
///
/// Existing edges on the source are left in place (sources are never
/// mutated structurally); only the substituted counterparts are created.
/// Returns the number of edges actually added.
async fn migrate_edges(
    store: &mut dyn IssueStore,
    ctx: &MergeContext,
    target: &IssueId,
    source: &IssueId,
) -> Result<usize> {
    let mut migrated = Vec::new();

    for edge in store.get_dependencies(source).await? {
        migrated.push(DependencyEdge {
            issue_id: target.clone(),
            depends_on_id: edge.depends_on_id,
            dep_type: edge.dep_type,
        });
    }
    for edge in store.get_dependents(source).await? {
        migrated.push(DependencyEdge {
            issue_id: edge.issue_id,
            depends_on_id: target.clone(),
            dep_type: edge.dep_type,
        });
    }

    let mut added = 0;
    for edge in migrated {
        // Substitution can collapse an edge between source and target into
        // a self-loop on the target; that edge carries no information.
        if edge.issue_id == edge.depends_on_id {
            continue;
        }

        match store.add_dependency(&edge, ctx.actor()).await {
            Ok(()) => added += 1,
            Err(Error::DependencyExists { .. }) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(added)
}

/// Append a "merged into" note to the source, once.
///
/// Re-applying after a retry finds the note already present and rewrites
/// nothing, so the observable state is identical no matter how many times
/// the step runs.
async fn annotate_merged_source(
    store: &mut dyn IssueStore,
    target: &IssueId,
    source: &IssueId,
) -> Result<()> {
    let issue = store
        .get(source)
        .await?
        .ok_or_else(|| Error::IssueNotFound(source.clone()))?;

    let annotation = format!("Merged into {target}");
    if let Some(notes) = &issue.notes {
        if notes.contains(&annotation) {
            return Ok(());
        }
    }

    let notes = match issue.notes {
        Some(existing) => format!("{existing}\n\n{annotation}"),
        None => annotation,
    };

    store
        .update(
            source,
            IssueUpdate {
                notes: Some(notes),
                ..Default::default()
            },
        )
        .await?;

    Ok(())
}
