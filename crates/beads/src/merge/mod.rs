//! Merging duplicate issues.
//!
//! A merge closes each source issue and migrates every dependency edge
//! touching it onto the target, so the graph keeps its shape while the
//! duplicates stop showing up as actionable work. Source issues are never
//! deleted and stay addressable by ID.
//!
//! The two halves are deliberately separated: [`validate::validate_merge`]
//! is a pure pre-flight check that must pass before any mutation, and
//! [`execute::perform_merge`] is the only component in the crate with side
//! effects. The executor is safe to re-run with identical arguments after a
//! crash or partial failure; it converges on the fully merged state and
//! reports only the work done by the current call.

pub mod execute;
pub mod validate;

pub use execute::{perform_merge, MergeAborted, MergeContext, MergeOutcome};
pub use validate::validate_merge;
