//! Exact-fingerprint duplicate grouping.

use crate::domain::{Issue, IssueStatus};
use std::collections::HashMap;

/// Content fingerprint used to group duplicates.
///
/// Equality is exact, case-sensitive string equality over the four text
/// fields plus the status. Status is deliberately part of the key: a closed
/// issue is never grouped with a textually identical open one, because a
/// resolved duplicate is not an actionable merge candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Fingerprint {
    title: String,
    description: String,
    design: Option<String>,
    acceptance_criteria: Option<String>,
    status: IssueStatus,
}

impl Fingerprint {
    fn of(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            description: issue.description.clone(),
            design: issue.design.clone(),
            acceptance_criteria: issue.acceptance_criteria.clone(),
            status: issue.status,
        }
    }
}

/// Partition issues into duplicate groups by content fingerprint.
///
/// Every issue belongs to at most one group. Groups of size 1 are discarded.
/// Members appear in first-seen input order, and groups are ordered by the
/// first appearance of their first member, so the result is deterministic
/// for a given snapshot ordering.
#[must_use]
pub fn find_duplicate_groups(issues: &[Issue]) -> Vec<Vec<Issue>> {
    let mut index: HashMap<Fingerprint, usize> = HashMap::new();
    let mut groups: Vec<Vec<Issue>> = Vec::new();

    for issue in issues {
        let key = Fingerprint::of(issue);
        match index.get(&key) {
            Some(&slot) => groups[slot].push(issue.clone()),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![issue.clone()]);
            }
        }
    }

    groups.retain(|group| group.len() >= 2);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IssueId, IssueType};
    use chrono::Utc;

    fn issue(id: &str, title: &str, status: IssueStatus) -> Issue {
        Issue {
            id: IssueId::new(id),
            title: title.to_string(),
            description: String::new(),
            status,
            priority: 1,
            issue_type: IssueType::Task,
            assignee: None,
            design: None,
            acceptance_criteria: None,
            notes: None,
            dependencies: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            closed_at: None,
            close_reason: None,
            closed_by: None,
        }
    }

    fn with_text(mut base: Issue, description: &str, design: &str, acceptance: &str) -> Issue {
        base.description = description.to_string();
        base.design = Some(design.to_string());
        base.acceptance_criteria = Some(acceptance.to_string());
        base
    }

    #[test]
    fn no_duplicates_yields_no_groups() {
        let issues = vec![
            issue("beads-1", "Task 1", IssueStatus::Open),
            issue("beads-2", "Task 2", IssueStatus::Open),
        ];
        assert!(find_duplicate_groups(&issues).is_empty());
    }

    #[test]
    fn identical_open_issues_form_one_group() {
        let issues = vec![
            issue("beads-1", "Task 1", IssueStatus::Open),
            issue("beads-2", "Task 1", IssueStatus::Open),
        ];
        let groups = find_duplicate_groups(&issues);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn differing_status_is_not_a_duplicate() {
        let issues = vec![
            issue("beads-1", "Task 1", IssueStatus::Open),
            issue("beads-2", "Task 1", IssueStatus::Closed),
        ];
        assert!(find_duplicate_groups(&issues).is_empty());
    }

    #[test]
    fn multiple_independent_groups() {
        let issues = vec![
            issue("beads-1", "Task 1", IssueStatus::Open),
            issue("beads-2", "Task 1", IssueStatus::Open),
            issue("beads-3", "Task 2", IssueStatus::Open),
            issue("beads-4", "Task 2", IssueStatus::Open),
        ];
        let groups = find_duplicate_groups(&issues);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn differing_descriptions_are_not_duplicates() {
        let mut a = issue("beads-1", "Task 1", IssueStatus::Open);
        a.description = "Desc 1".to_string();
        let mut b = issue("beads-2", "Task 1", IssueStatus::Open);
        b.description = "Desc 2".to_string();

        assert!(find_duplicate_groups(&[a, b]).is_empty());
    }

    #[test]
    fn full_fingerprint_match_is_a_duplicate() {
        let a = with_text(
            issue("beads-1", "Task 1", IssueStatus::Open),
            "Desc 1",
            "Design 1",
            "AC 1",
        );
        let b = with_text(
            issue("beads-2", "Task 1", IssueStatus::Open),
            "Desc 1",
            "Design 1",
            "AC 1",
        );

        let groups = find_duplicate_groups(&[a, b]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn three_way_duplicate_is_one_group() {
        let issues = vec![
            issue("beads-1", "Task 1", IssueStatus::Open),
            issue("beads-2", "Task 1", IssueStatus::Open),
            issue("beads-3", "Task 1", IssueStatus::Open),
        ];
        let groups = find_duplicate_groups(&issues);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
    }

    #[test]
    fn closed_twin_is_excluded_from_open_group() {
        let issues = vec![
            issue("beads-1", "Task 1", IssueStatus::Open),
            issue("beads-2", "Task 1", IssueStatus::Closed),
            issue("beads-3", "Task 1", IssueStatus::Open),
        ];

        let groups = find_duplicate_groups(&issues);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
        assert!(groups[0].iter().all(|i| i.id.as_str() != "beads-2"));
    }

    #[test]
    fn members_keep_first_seen_order() {
        let issues = vec![
            issue("beads-9", "Task 1", IssueStatus::Open),
            issue("beads-1", "Task 1", IssueStatus::Open),
            issue("beads-5", "Task 1", IssueStatus::Open),
        ];

        let groups = find_duplicate_groups(&issues);
        let ids: Vec<_> = groups[0].iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["beads-9", "beads-1", "beads-5"]);
    }

    #[test]
    fn case_sensitive_comparison() {
        let issues = vec![
            issue("beads-1", "Task 1", IssueStatus::Open),
            issue("beads-2", "task 1", IssueStatus::Open),
        ];
        assert!(find_duplicate_groups(&issues).is_empty());
    }

    #[test]
    fn missing_design_differs_from_empty_design() {
        let a = issue("beads-1", "Task 1", IssueStatus::Open);
        let mut b = issue("beads-2", "Task 1", IssueStatus::Open);
        b.design = Some(String::new());

        assert!(find_duplicate_groups(&[a, b]).is_empty());
    }
}
