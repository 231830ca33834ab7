//! JSONL (JSON Lines) support for beads.
//!
//! The issue database is mirrored to a line-oriented text file so it can live
//! in version control next to the code it tracks. This crate provides the two
//! halves of that mirror:
//!
//! - [`read_jsonl_resilient`]: parse a JSONL file line by line, skipping
//!   malformed lines and reporting them as [`Warning`]s instead of failing
//!   the whole load. Hand-edited or merge-conflicted files stay loadable.
//! - [`write_jsonl_atomic`]: serialize records one per line through a
//!   temp-file-then-rename so a crash mid-write never truncates the mirror.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod warning;
pub mod writer;

pub use error::{Error, Result};
pub use reader::read_jsonl_resilient;
pub use warning::Warning;
pub use writer::write_jsonl_atomic;
