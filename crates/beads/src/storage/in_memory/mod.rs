//! In-memory storage backend using `HashMap` and petgraph.
//!
//! All data is held in RAM; durability comes from the optional JSONL mirror
//! ([`load_from_jsonl`] / [`save_to_jsonl`]) that the `Jsonl` backend wraps
//! around this store.
//!
//! # Graph representation
//!
//! The dependency graph is a `petgraph::DiGraph` with edges directed from
//! **dependent to dependency**: an edge `A -> B` with weight `Blocks` means
//! A is blocked by B. Parallel edges between the same pair of nodes are
//! allowed when their types differ; the `(from, to, type)` triple itself is
//! unique.
//!
//! # Blocking semantics
//!
//! An issue is blocked if it has a `Blocks` edge to an unclosed issue, or
//! transitively through `ParentChild` when its parent is blocked. `Related`
//! and `DiscoveredFrom` never block. Propagation is capped at 50 levels;
//! cycles (which merge migration can legitimately produce) are therefore
//! tolerated.
//!
//! # Thread safety
//!
//! The inner structure is wrapped in `Arc<tokio::sync::Mutex<_>>`; every
//! trait method takes the lock, making each individual operation atomic
//! with respect to other callers.

mod graph;
mod inner;
mod jsonl;
mod sorting;
mod trait_impl;

use crate::storage::IssueStore;
use inner::InMemoryStoreInner;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use jsonl::{load_from_jsonl, save_to_jsonl, LoadWarning};

/// Thread-safe in-memory store.
pub(crate) type InMemoryStore = Arc<Mutex<InMemoryStoreInner>>;

/// Create a new in-memory store with the given issue ID prefix.
pub fn new_in_memory_store(prefix: String) -> Box<dyn IssueStore> {
    Box::new(Arc::new(Mutex::new(InMemoryStoreInner::new(prefix))))
}
