//! Integration tests for the in-memory store: CRUD, close semantics,
//! dependency edge uniqueness, search, and JSONL persistence.

use beads::domain::{
    DependencyEdge, DependencyType, IssueFilter, IssueId, IssueStatus, IssueType, IssueUpdate,
    NewIssue,
};
use beads::error::Error;
use beads::storage::in_memory::{load_from_jsonl, new_in_memory_store, save_to_jsonl};
use beads::storage::IssueStore;
use tempfile::tempdir;

fn new_issue(title: &str) -> NewIssue {
    NewIssue {
        title: title.to_string(),
        description: "Test description".to_string(),
        priority: 2,
        issue_type: IssueType::Task,
        assignee: None,
        design: None,
        acceptance_criteria: None,
        notes: None,
        dependencies: vec![],
    }
}

fn id(s: &str) -> IssueId {
    IssueId::new(s)
}

fn edge(from: &str, to: &str, dep_type: DependencyType) -> DependencyEdge {
    DependencyEdge {
        issue_id: id(from),
        depends_on_id: id(to),
        dep_type,
    }
}

#[tokio::test]
async fn create_assigns_sequential_counter_ids() {
    let mut store = new_in_memory_store("test".to_string());

    let first = store.create(new_issue("First")).await.unwrap();
    let second = store.create(new_issue("Second")).await.unwrap();

    assert_eq!(first.id.as_str(), "test-1");
    assert_eq!(second.id.as_str(), "test-2");
    assert_eq!(first.status, IssueStatus::Open);
}

#[tokio::test]
async fn get_returns_none_for_missing_issue() {
    let store = new_in_memory_store("test".to_string());
    assert!(store.get(&id("test-404")).await.unwrap().is_none());
}

#[tokio::test]
async fn update_modifies_only_provided_fields() {
    let mut store = new_in_memory_store("test".to_string());
    let created = store.create(new_issue("Original")).await.unwrap();

    let updated = store
        .update(
            &created.id,
            IssueUpdate {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.description, "Test description");
    assert_eq!(updated.status, IssueStatus::Open);
}

#[tokio::test]
async fn close_records_reason_actor_and_timestamp() {
    let mut store = new_in_memory_store("test".to_string());
    let created = store.create(new_issue("To close")).await.unwrap();

    let closed = store
        .close(&created.id, "Duplicate work", "alice")
        .await
        .unwrap();

    assert_eq!(closed.status, IssueStatus::Closed);
    assert_eq!(closed.close_reason.as_deref(), Some("Duplicate work"));
    assert_eq!(closed.closed_by.as_deref(), Some("alice"));
    assert!(closed.closed_at.is_some());
}

#[tokio::test]
async fn close_is_an_error_for_missing_issue() {
    let mut store = new_in_memory_store("test".to_string());
    let result = store.close(&id("test-404"), "reason", "actor").await;
    assert!(matches!(result, Err(Error::IssueNotFound(_))));
}

#[tokio::test]
async fn add_dependency_rejects_exact_duplicate_edge() {
    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("A")).await.unwrap();
    store.create(new_issue("B")).await.unwrap();

    let e = edge("test-1", "test-2", DependencyType::Blocks);
    store.add_dependency(&e, "test").await.unwrap();

    let result = store.add_dependency(&e, "test").await;
    assert!(matches!(result, Err(Error::DependencyExists { .. })));
}

#[tokio::test]
async fn same_endpoints_different_type_is_a_distinct_edge() {
    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("A")).await.unwrap();
    store.create(new_issue("B")).await.unwrap();

    store
        .add_dependency(&edge("test-1", "test-2", DependencyType::Blocks), "test")
        .await
        .unwrap();
    store
        .add_dependency(&edge("test-1", "test-2", DependencyType::Related), "test")
        .await
        .unwrap();

    let deps = store.get_dependencies(&id("test-1")).await.unwrap();
    assert_eq!(deps.len(), 2);
}

#[tokio::test]
async fn add_dependency_requires_both_endpoints() {
    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("A")).await.unwrap();

    let result = store
        .add_dependency(&edge("test-1", "test-404", DependencyType::Blocks), "test")
        .await;
    assert!(matches!(result, Err(Error::IssueNotFound(_))));
}

#[tokio::test]
async fn dependents_are_the_reverse_view() {
    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("A")).await.unwrap();
    store.create(new_issue("B")).await.unwrap();

    store
        .add_dependency(&edge("test-1", "test-2", DependencyType::Blocks), "test")
        .await
        .unwrap();

    let dependents = store.get_dependents(&id("test-2")).await.unwrap();
    assert_eq!(dependents.len(), 1);
    assert_eq!(dependents[0].issue_id, id("test-1"));
    assert_eq!(dependents[0].depends_on_id, id("test-2"));
}

#[tokio::test]
async fn has_cycle_detects_back_path() {
    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("A")).await.unwrap();
    store.create(new_issue("B")).await.unwrap();

    store
        .add_dependency(&edge("test-1", "test-2", DependencyType::Blocks), "test")
        .await
        .unwrap();

    assert!(store.has_cycle(&id("test-2"), &id("test-1")).await.unwrap());
    assert!(!store.has_cycle(&id("test-1"), &id("test-2")).await.unwrap());
}

#[tokio::test]
async fn delete_refuses_while_dependents_exist() {
    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("A")).await.unwrap();
    store.create(new_issue("B")).await.unwrap();

    store
        .add_dependency(&edge("test-1", "test-2", DependencyType::Blocks), "test")
        .await
        .unwrap();

    let result = store.delete(&id("test-2")).await;
    assert!(matches!(result, Err(Error::HasDependents { .. })));

    // The dependent itself can go.
    store.delete(&id("test-1")).await.unwrap();
    store.delete(&id("test-2")).await.unwrap();
}

#[tokio::test]
async fn search_matches_title_and_description() {
    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("Fix login crash")).await.unwrap();
    let mut other = new_issue("Unrelated");
    other.description = "also mentions LOGIN flow".to_string();
    store.create(other).await.unwrap();
    store.create(new_issue("Third")).await.unwrap();

    let hits = store
        .search("login", &IssueFilter::default())
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn empty_search_returns_full_corpus_including_closed() {
    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("A")).await.unwrap();
    store.create(new_issue("B")).await.unwrap();
    store.close(&id("test-1"), "done", "test").await.unwrap();

    let all = store.search("", &IssueFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn search_applies_status_filter() {
    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("A")).await.unwrap();
    store.create(new_issue("B")).await.unwrap();
    store.close(&id("test-1"), "done", "test").await.unwrap();

    let open_only = store
        .search(
            "",
            &IssueFilter {
                status: Some(IssueStatus::Open),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(open_only.len(), 1);
    assert_eq!(open_only[0].id, id("test-2"));
}

#[tokio::test]
async fn ready_excludes_blocked_and_closed() {
    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("Blocker")).await.unwrap();
    store.create(new_issue("Blocked")).await.unwrap();
    store.create(new_issue("Free")).await.unwrap();
    store.create(new_issue("Done")).await.unwrap();

    store
        .add_dependency(&edge("test-2", "test-1", DependencyType::Blocks), "test")
        .await
        .unwrap();
    store.close(&id("test-4"), "done", "test").await.unwrap();

    let ready = store.ready_to_work(None, None).await.unwrap();
    let ids: Vec<_> = ready.iter().map(|i| i.id.as_str().to_string()).collect();

    assert!(ids.contains(&"test-1".to_string()));
    assert!(ids.contains(&"test-3".to_string()));
    assert!(!ids.contains(&"test-2".to_string()));
    assert!(!ids.contains(&"test-4".to_string()));
}

#[tokio::test]
async fn closing_the_blocker_unblocks() {
    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("Blocker")).await.unwrap();
    store.create(new_issue("Blocked")).await.unwrap();

    store
        .add_dependency(&edge("test-2", "test-1", DependencyType::Blocks), "test")
        .await
        .unwrap();

    let blocked = store.blocked_issues().await.unwrap();
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].0.id, id("test-2"));

    store.close(&id("test-1"), "done", "test").await.unwrap();

    assert!(store.blocked_issues().await.unwrap().is_empty());
}

#[tokio::test]
async fn jsonl_round_trip_preserves_issues_and_edges() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("issues.jsonl");

    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("A")).await.unwrap();
    store.create(new_issue("B")).await.unwrap();
    store
        .add_dependency(&edge("test-1", "test-2", DependencyType::Blocks), "test")
        .await
        .unwrap();
    store.close(&id("test-2"), "finished", "alice").await.unwrap();

    save_to_jsonl(store.as_ref(), &path).await.unwrap();

    let (loaded, warnings) = load_from_jsonl(&path, "test".to_string()).await.unwrap();
    assert!(warnings.is_empty());

    let a = loaded.get(&id("test-1")).await.unwrap().unwrap();
    assert_eq!(a.title, "A");
    assert_eq!(a.dependencies.len(), 1);

    let b = loaded.get(&id("test-2")).await.unwrap().unwrap();
    assert_eq!(b.status, IssueStatus::Closed);
    assert_eq!(b.close_reason.as_deref(), Some("finished"));

    let deps = loaded.get_dependencies(&id("test-1")).await.unwrap();
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].depends_on_id, id("test-2"));
}

#[tokio::test]
async fn loaded_store_continues_the_id_counter() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("issues.jsonl");

    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("A")).await.unwrap();
    store.create(new_issue("B")).await.unwrap();
    save_to_jsonl(store.as_ref(), &path).await.unwrap();

    let (mut loaded, _) = load_from_jsonl(&path, "test".to_string()).await.unwrap();
    let next = loaded.create(new_issue("C")).await.unwrap();
    assert_eq!(next.id.as_str(), "test-3");
}

#[tokio::test]
async fn cyclic_edges_survive_a_reload() {
    // Merge migration can leave cycles; persistence must not drop them.
    let dir = tempdir().unwrap();
    let path = dir.path().join("issues.jsonl");

    let mut store = new_in_memory_store("test".to_string());
    store.create(new_issue("A")).await.unwrap();
    store.create(new_issue("B")).await.unwrap();
    store
        .add_dependency(&edge("test-1", "test-2", DependencyType::Related), "test")
        .await
        .unwrap();
    store
        .add_dependency(&edge("test-2", "test-1", DependencyType::Related), "test")
        .await
        .unwrap();

    save_to_jsonl(store.as_ref(), &path).await.unwrap();
    let (loaded, warnings) = load_from_jsonl(&path, "test".to_string()).await.unwrap();

    assert!(warnings.is_empty());
    assert_eq!(loaded.get_dependencies(&id("test-1")).await.unwrap().len(), 1);
    assert_eq!(loaded.get_dependencies(&id("test-2")).await.unwrap().len(), 1);
}
