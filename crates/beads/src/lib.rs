//! Beads - a dependency-aware issue tracker.
//!
//! Issues and their typed dependency graph persist in a store mirrored to
//! JSONL for version control. The library exposes the store abstraction,
//! the duplicate-detection pipeline ([`dedupe`]), and the idempotent merge
//! executor ([`merge`]); the `beads` binary wires them to a CLI.

#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod commands;
pub mod dedupe;
pub mod domain;
pub mod error;
pub mod id_generation;
pub mod merge;
pub mod output;
pub mod storage;
