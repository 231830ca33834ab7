//! Core in-memory storage data structures.

use crate::domain::{DependencyType, Issue, IssueId};
use crate::id_generation::IdGenerator;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Inner storage structure (not thread-safe on its own).
///
/// Wrapped in `Arc<Mutex<_>>` by the public store type. Every issue in
/// `issues` has a corresponding node in `graph` via `node_map`.
pub(crate) struct InMemoryStoreInner {
    /// Issues indexed by ID.
    pub(super) issues: HashMap<IssueId, Issue>,

    /// Dependency graph; edge direction is dependent -> dependency.
    pub(super) graph: DiGraph<IssueId, DependencyType>,

    /// Mapping from IssueId to graph NodeIndex.
    pub(super) node_map: HashMap<IssueId, NodeIndex>,

    /// Counter-based ID generator.
    pub(super) id_generator: IdGenerator,
}

impl InMemoryStoreInner {
    /// Create a new empty store.
    pub(crate) fn new(prefix: String) -> Self {
        Self {
            issues: HashMap::new(),
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            id_generator: IdGenerator::new(prefix),
        }
    }

    /// Generate the next unused issue ID.
    pub(super) fn generate_id(&mut self) -> IssueId {
        IssueId::new(self.id_generator.generate())
    }

    /// Whether the exact `(from, to, dep_type)` edge is present.
    pub(super) fn edge_exists(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        dep_type: DependencyType,
    ) -> bool {
        self.graph
            .edges_connecting(from, to)
            .any(|edge| *edge.weight() == dep_type)
    }
}
