//! Pre-flight merge validation.

use crate::domain::IssueId;
use crate::error::{Error, Result};
use crate::storage::IssueStore;

/// Validate a merge request without mutating anything.
///
/// Checks run in a fixed order and stop at the first failure:
///
/// 1. `sources` is scanned left to right; the first entry equal to
///    `target` fails with [`Error::CannotMergeIntoSelf`]. A list with
///    several self-references still yields exactly one error, for the first
///    occurrence.
/// 2. `target` must exist ([`Error::MergeTargetNotFound`]).
/// 3. Every source must exist ([`Error::MergeSourceNotFound`] naming the
///    missing ID).
///
/// Read-only; safe to call repeatedly or concurrently with other reads.
/// [`crate::merge::perform_merge`] assumes these checks have passed.
pub async fn validate_merge(
    store: &dyn IssueStore,
    target: &IssueId,
    sources: &[IssueId],
) -> Result<()> {
    for source in sources {
        if source == target {
            return Err(Error::CannotMergeIntoSelf(target.clone()));
        }
    }

    if store.get(target).await?.is_none() {
        return Err(Error::MergeTargetNotFound(target.clone()));
    }

    for source in sources {
        if store.get(source).await?.is_none() {
            return Err(Error::MergeSourceNotFound(source.clone()));
        }
    }

    Ok(())
}
