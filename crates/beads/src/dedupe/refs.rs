//! Cross-issue reference counting.

use crate::domain::{Issue, IssueId};
use std::collections::HashMap;

/// Count textual mentions of each issue's ID across the corpus.
///
/// For every issue, the description and notes fields are scanned
/// independently for occurrences of every other issue's ID as a literal
/// substring. Matches are counted left to right, non-overlapping. The result
/// maps every known ID to its total mention count (zero when unmentioned),
/// which the merge target selector uses as a connectedness signal.
///
/// The scan is plain substring search, not word-boundary matching: an ID
/// that is a textual prefix of a longer ID (`beads-1` inside `beads-10`)
/// registers a match. That is a known limitation of the counting scheme, and
/// downstream consumers depend on the current counts; tightening it to
/// word-boundary matching would be a breaking change.
#[must_use]
pub fn count_references(issues: &[Issue]) -> HashMap<IssueId, usize> {
    let mut counts: HashMap<IssueId, usize> =
        issues.iter().map(|issue| (issue.id.clone(), 0)).collect();

    for issue in issues {
        for target in issues {
            if target.id == issue.id {
                continue;
            }

            let mentions = count_occurrences(&issue.description, target.id.as_str())
                + issue
                    .notes
                    .as_deref()
                    .map_or(0, |notes| count_occurrences(notes, target.id.as_str()));

            if mentions > 0 {
                *counts.entry(target.id.clone()).or_default() += mentions;
            }
        }
    }

    counts
}

/// Non-overlapping, left-to-right substring occurrences of `needle` in
/// `haystack`.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
