//! Storage abstraction for the issue database.
//!
//! The store owns durability and atomicity of the individual operations;
//! everything above it (including the merge executor) is written against
//! this trait and relies on each operation being atomic and independently
//! idempotent, never on cross-operation transactions.
//!
//! Backends:
//!
//! - **In-memory**: `HashMap` + petgraph dependency graph behind a mutex.
//! - **JSONL-backed**: the in-memory store wrapped with persistence to
//!   `.beads/issues.jsonl`, written atomically on [`IssueStore::save`].

use crate::domain::{
    DependencyEdge, Issue, IssueFilter, IssueId, IssueUpdate, NewIssue, SortPolicy,
};
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub mod in_memory;

/// Core storage trait for issue management.
///
/// Object-safe (`Box<dyn IssueStore>`) and `Send + Sync` for use from async
/// contexts.
///
/// # Error contract
///
/// - `get` returns `Ok(None)` for a missing issue; other operations on a
///   missing issue return [`crate::error::Error::IssueNotFound`].
/// - `add_dependency` returns the distinguished
///   [`crate::error::Error::DependencyExists`] when the identical
///   `(issue, depends_on, type)` triple is already present. Callers that
///   need re-add-as-no-op semantics (the merge executor) match on it.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Create a new issue, generating the next counter ID.
    async fn create(&mut self, issue: NewIssue) -> Result<Issue>;

    /// Get an issue by ID. `None` when absent.
    async fn get(&self, id: &IssueId) -> Result<Option<Issue>>;

    /// Update fields of an existing issue. Only fields present in `updates`
    /// are modified.
    async fn update(&mut self, id: &IssueId, updates: IssueUpdate) -> Result<Issue>;

    /// Close an issue, recording the reason and the acting user.
    ///
    /// Sets status to Closed and stamps `closed_at` the first time; a close
    /// of an already-closed issue overwrites reason and actor, so callers
    /// that must preserve an earlier close reason check status first.
    async fn close(&mut self, id: &IssueId, reason: &str, actor: &str) -> Result<Issue>;

    /// Delete an issue and its outgoing dependencies.
    ///
    /// Fails with `HasDependents` while other issues depend on it.
    async fn delete(&mut self, id: &IssueId) -> Result<()>;

    /// Search issues by free-text query plus filter.
    ///
    /// The query is matched as a case-insensitive substring of title and
    /// description. An empty query with an empty filter returns the full
    /// corpus, closed issues included.
    async fn search(&self, query: &str, filter: &IssueFilter) -> Result<Vec<Issue>>;

    /// Add a dependency edge.
    ///
    /// Both endpoints must exist. Returns `DependencyExists` when the
    /// identical triple is present. Cycles are not rejected here; advisory
    /// cycle checking is available via [`IssueStore::has_cycle`].
    async fn add_dependency(&mut self, edge: &DependencyEdge, actor: &str) -> Result<()>;

    /// Remove a dependency edge.
    async fn remove_dependency(&mut self, from: &IssueId, to: &IssueId) -> Result<()>;

    /// All edges where `id` is the dependent (outgoing).
    async fn get_dependencies(&self, id: &IssueId) -> Result<Vec<DependencyEdge>>;

    /// All edges where `id` is the dependency (incoming).
    async fn get_dependents(&self, id: &IssueId) -> Result<Vec<DependencyEdge>>;

    /// Whether adding `from -> to` would create a cycle.
    async fn has_cycle(&self, from: &IssueId, to: &IssueId) -> Result<bool>;

    /// Issues that are open and not blocked, ordered by the sort policy.
    async fn ready_to_work(
        &self,
        filter: Option<&IssueFilter>,
        sort_policy: Option<SortPolicy>,
    ) -> Result<Vec<Issue>>;

    /// Blocked issues paired with their blockers.
    async fn blocked_issues(&self) -> Result<Vec<(Issue, Vec<Issue>)>>;

    /// Bulk-load issues (JSONL import). Dependencies are resolved after all
    /// issues are inserted.
    async fn import_issues(&mut self, issues: Vec<Issue>) -> Result<()>;

    /// All issues, unordered; suitable for export or backup.
    async fn export_all(&self) -> Result<Vec<Issue>>;

    /// Persist current state. No-op for the plain in-memory backend.
    async fn save(&self) -> Result<()>;

    /// Discard in-memory changes and reload from persistent storage.
    async fn reload(&mut self) -> Result<()>;
}

/// Storage backend selection.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral).
    InMemory,

    /// In-memory storage persisted to a JSONL file.
    Jsonl(PathBuf),
}

/// Wrapper that adds JSONL file persistence to the in-memory store.
struct JsonlBackedStore {
    inner: Box<dyn IssueStore>,
    path: PathBuf,
    prefix: String,
}

#[async_trait]
impl IssueStore for JsonlBackedStore {
    async fn create(&mut self, issue: NewIssue) -> Result<Issue> {
        self.inner.create(issue).await
    }

    async fn get(&self, id: &IssueId) -> Result<Option<Issue>> {
        self.inner.get(id).await
    }

    async fn update(&mut self, id: &IssueId, updates: IssueUpdate) -> Result<Issue> {
        self.inner.update(id, updates).await
    }

    async fn close(&mut self, id: &IssueId, reason: &str, actor: &str) -> Result<Issue> {
        self.inner.close(id, reason, actor).await
    }

    async fn delete(&mut self, id: &IssueId) -> Result<()> {
        self.inner.delete(id).await
    }

    async fn search(&self, query: &str, filter: &IssueFilter) -> Result<Vec<Issue>> {
        self.inner.search(query, filter).await
    }

    async fn add_dependency(&mut self, edge: &DependencyEdge, actor: &str) -> Result<()> {
        self.inner.add_dependency(edge, actor).await
    }

    async fn remove_dependency(&mut self, from: &IssueId, to: &IssueId) -> Result<()> {
        self.inner.remove_dependency(from, to).await
    }

    async fn get_dependencies(&self, id: &IssueId) -> Result<Vec<DependencyEdge>> {
        self.inner.get_dependencies(id).await
    }

    async fn get_dependents(&self, id: &IssueId) -> Result<Vec<DependencyEdge>> {
        self.inner.get_dependents(id).await
    }

    async fn has_cycle(&self, from: &IssueId, to: &IssueId) -> Result<bool> {
        self.inner.has_cycle(from, to).await
    }

    async fn ready_to_work(
        &self,
        filter: Option<&IssueFilter>,
        sort_policy: Option<SortPolicy>,
    ) -> Result<Vec<Issue>> {
        self.inner.ready_to_work(filter, sort_policy).await
    }

    async fn blocked_issues(&self) -> Result<Vec<(Issue, Vec<Issue>)>> {
        self.inner.blocked_issues().await
    }

    async fn import_issues(&mut self, issues: Vec<Issue>) -> Result<()> {
        self.inner.import_issues(issues).await
    }

    async fn export_all(&self) -> Result<Vec<Issue>> {
        self.inner.export_all().await
    }

    async fn save(&self) -> Result<()> {
        in_memory::save_to_jsonl(self.inner.as_ref(), &self.path).await
    }

    async fn reload(&mut self) -> Result<()> {
        if self.path.exists() {
            let (store, warnings) =
                in_memory::load_from_jsonl(&self.path, self.prefix.clone()).await?;
            for warning in &warnings {
                tracing::warn!(warning = ?warning, "JSONL reload warning");
            }
            self.inner = store;
        } else {
            self.inner = in_memory::new_in_memory_store(self.prefix.clone());
        }
        Ok(())
    }
}

/// Create a store for the given backend.
///
/// # Errors
///
/// Fails when the JSONL file exists but cannot be read.
pub async fn create_store(backend: StorageBackend, prefix: String) -> Result<Box<dyn IssueStore>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_store(prefix)),
        StorageBackend::Jsonl(path) => {
            let inner = if path.exists() {
                let (store, warnings) = in_memory::load_from_jsonl(&path, prefix.clone()).await?;
                for warning in &warnings {
                    tracing::warn!(warning = ?warning, "JSONL load warning");
                }
                store
            } else {
                in_memory::new_in_memory_store(prefix.clone())
            };
            Ok(Box::new(JsonlBackedStore {
                inner,
                path,
                prefix,
            }))
        }
    }
}
