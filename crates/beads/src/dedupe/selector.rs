//! Canonical merge target selection.

use crate::domain::{Issue, IssueId};
use std::collections::HashMap;

/// Choose the canonical survivor of a duplicate group.
///
/// The most-referenced issue wins; ties break by ascending byte-wise ID
/// comparison. The function is pure and deterministic over its inputs and
/// independent of the group's member order, which is what makes a merge
/// retried over the same snapshot converge on the same target every time.
///
/// Returns `None` only for an empty group.
#[must_use]
pub fn choose_merge_target<'a>(
    group: &'a [Issue],
    ref_counts: &HashMap<IssueId, usize>,
) -> Option<&'a Issue> {
    let count = |issue: &Issue| ref_counts.get(&issue.id).copied().unwrap_or(0);

    group.iter().min_by(|a, b| {
        count(b)
            .cmp(&count(a))
            .then_with(|| a.id.cmp(&b.id))
    })
}
