//! `IssueStore` trait implementation for the in-memory backend.

use super::graph::{find_blocked_issues, has_cycle_impl};
use super::sorting::sort_by_policy;
use super::InMemoryStore;
use crate::domain::{
    Dependency, DependencyEdge, Issue, IssueFilter, IssueId, IssueStatus, IssueUpdate, NewIssue,
    SortPolicy,
};
use crate::error::{Error, Result};
use crate::storage::IssueStore;
use async_trait::async_trait;
use chrono::Utc;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

#[async_trait]
impl IssueStore for InMemoryStore {
    async fn create(&mut self, new_issue: NewIssue) -> Result<Issue> {
        let mut inner = self.lock().await;

        new_issue
            .validate()
            .map_err(|e| Error::Storage(format!("Validation failed: {e}")))?;

        // All dependency targets must exist before anything is mutated.
        for (depends_on_id, _dep_type) in &new_issue.dependencies {
            if !inner.issues.contains_key(depends_on_id) {
                return Err(Error::IssueNotFound(depends_on_id.clone()));
            }
        }

        let id = inner.generate_id();
        let now = Utc::now();

        let dependencies: Vec<Dependency> = new_issue
            .dependencies
            .iter()
            .map(|(depends_on_id, dep_type)| Dependency {
                depends_on_id: depends_on_id.clone(),
                dep_type: *dep_type,
            })
            .collect();

        let issue = Issue {
            id: id.clone(),
            title: new_issue.title,
            description: new_issue.description,
            status: IssueStatus::Open,
            priority: new_issue.priority,
            issue_type: new_issue.issue_type,
            assignee: new_issue.assignee,
            design: new_issue.design,
            acceptance_criteria: new_issue.acceptance_criteria,
            notes: new_issue.notes,
            dependencies,
            created_at: now,
            updated_at: now,
            closed_at: None,
            close_reason: None,
            closed_by: None,
        };

        let node = inner.graph.add_node(id.clone());
        inner.node_map.insert(id.clone(), node);
        inner.issues.insert(id.clone(), issue.clone());

        // A freshly created node has no incoming edges, so its outgoing
        // edges cannot close a cycle.
        for dep in &issue.dependencies {
            let to_node = inner.node_map[&dep.depends_on_id];
            inner.graph.add_edge(node, to_node, dep.dep_type);
        }

        Ok(issue)
    }

    async fn get(&self, id: &IssueId) -> Result<Option<Issue>> {
        let inner = self.lock().await;
        Ok(inner.issues.get(id).cloned())
    }

    async fn update(&mut self, id: &IssueId, updates: IssueUpdate) -> Result<Issue> {
        let mut inner = self.lock().await;

        let issue = inner
            .issues
            .get_mut(id)
            .ok_or_else(|| Error::IssueNotFound(id.clone()))?;

        if let Some(title) = updates.title {
            issue.title = title;
        }
        if let Some(description) = updates.description {
            issue.description = description;
        }
        if let Some(status) = updates.status {
            issue.status = status;
            if status == IssueStatus::Closed && issue.closed_at.is_none() {
                issue.closed_at = Some(Utc::now());
            }
        }
        if let Some(priority) = updates.priority {
            if priority > crate::domain::MAX_PRIORITY {
                return Err(Error::InvalidPriority(priority));
            }
            issue.priority = priority;
        }
        if let Some(assignee) = updates.assignee {
            issue.assignee = assignee;
        }
        if let Some(design) = updates.design {
            issue.design = Some(design);
        }
        if let Some(acceptance_criteria) = updates.acceptance_criteria {
            issue.acceptance_criteria = Some(acceptance_criteria);
        }
        if let Some(notes) = updates.notes {
            issue.notes = Some(notes);
        }

        issue
            .validate()
            .map_err(|e| Error::Storage(format!("Validation failed: {e}")))?;

        issue.updated_at = Utc::now();

        Ok(issue.clone())
    }

    async fn close(&mut self, id: &IssueId, reason: &str, actor: &str) -> Result<Issue> {
        let mut inner = self.lock().await;

        let issue = inner
            .issues
            .get_mut(id)
            .ok_or_else(|| Error::IssueNotFound(id.clone()))?;

        issue.status = IssueStatus::Closed;
        if issue.closed_at.is_none() {
            issue.closed_at = Some(Utc::now());
        }
        issue.close_reason = Some(reason.to_string());
        issue.closed_by = Some(actor.to_string());
        issue.updated_at = Utc::now();

        tracing::debug!(issue = %id, actor, "closed issue");

        Ok(issue.clone())
    }

    async fn delete(&mut self, id: &IssueId) -> Result<()> {
        let mut inner = self.lock().await;

        if !inner.issues.contains_key(id) {
            return Err(Error::IssueNotFound(id.clone()));
        }

        let node = inner.node_map[id];
        let dependents: Vec<IssueId> = inner
            .graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| inner.graph[edge.source()].clone())
            .collect();

        if !dependents.is_empty() {
            return Err(Error::HasDependents {
                issue_id: id.clone(),
                dependent_count: dependents.len(),
                dependents,
            });
        }

        inner.graph.remove_node(node);
        // remove_node swaps the last node into the removed slot; rebuild the
        // affected mapping entry.
        if let Some(moved) = inner.graph.node_weight(node).cloned() {
            inner.node_map.insert(moved, node);
        }
        inner.node_map.remove(id);
        inner.issues.remove(id);

        Ok(())
    }

    async fn search(&self, query: &str, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let inner = self.lock().await;

        let needle = query.to_lowercase();
        let mut issues: Vec<Issue> = inner
            .issues
            .values()
            .filter(|issue| {
                if !filter.matches(issue) {
                    return false;
                }
                if needle.is_empty() {
                    return true;
                }
                issue.title.to_lowercase().contains(&needle)
                    || issue.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        issues.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        if let Some(limit) = filter.limit {
            issues.truncate(limit);
        }

        Ok(issues)
    }

    async fn add_dependency(&mut self, edge: &DependencyEdge, actor: &str) -> Result<()> {
        let mut inner = self.lock().await;

        if !inner.issues.contains_key(&edge.issue_id) {
            return Err(Error::IssueNotFound(edge.issue_id.clone()));
        }
        if !inner.issues.contains_key(&edge.depends_on_id) {
            return Err(Error::IssueNotFound(edge.depends_on_id.clone()));
        }

        let from_node = inner.node_map[&edge.issue_id];
        let to_node = inner.node_map[&edge.depends_on_id];

        if inner.edge_exists(from_node, to_node, edge.dep_type) {
            return Err(Error::DependencyExists {
                from: edge.issue_id.clone(),
                to: edge.depends_on_id.clone(),
                dep_type: edge.dep_type,
            });
        }

        inner.graph.add_edge(from_node, to_node, edge.dep_type);

        // Mirror into the issue record for JSONL serialization.
        let issue = inner
            .issues
            .get_mut(&edge.issue_id)
            .ok_or_else(|| Error::IssueNotFound(edge.issue_id.clone()))?;
        issue.dependencies.push(Dependency {
            depends_on_id: edge.depends_on_id.clone(),
            dep_type: edge.dep_type,
        });

        tracing::debug!(
            from = %edge.issue_id,
            to = %edge.depends_on_id,
            dep_type = %edge.dep_type,
            actor,
            "added dependency"
        );

        Ok(())
    }

    async fn remove_dependency(&mut self, from: &IssueId, to: &IssueId) -> Result<()> {
        let mut inner = self.lock().await;

        let from_node = *inner
            .node_map
            .get(from)
            .ok_or_else(|| Error::IssueNotFound(from.clone()))?;
        let to_node = *inner
            .node_map
            .get(to)
            .ok_or_else(|| Error::IssueNotFound(to.clone()))?;

        let edges: Vec<_> = inner
            .graph
            .edges_connecting(from_node, to_node)
            .map(|edge| edge.id())
            .collect();

        if edges.is_empty() {
            return Err(Error::DependencyNotFound {
                from: from.clone(),
                to: to.clone(),
            });
        }

        for edge_id in edges {
            inner.graph.remove_edge(edge_id);
        }

        let issue = inner
            .issues
            .get_mut(from)
            .ok_or_else(|| Error::IssueNotFound(from.clone()))?;
        issue.dependencies.retain(|dep| dep.depends_on_id != *to);

        Ok(())
    }

    async fn get_dependencies(&self, id: &IssueId) -> Result<Vec<DependencyEdge>> {
        let inner = self.lock().await;

        let node = inner
            .node_map
            .get(id)
            .ok_or_else(|| Error::IssueNotFound(id.clone()))?;

        Ok(inner
            .graph
            .edges(*node)
            .map(|edge| DependencyEdge {
                issue_id: id.clone(),
                depends_on_id: inner.graph[edge.target()].clone(),
                dep_type: *edge.weight(),
            })
            .collect())
    }

    async fn get_dependents(&self, id: &IssueId) -> Result<Vec<DependencyEdge>> {
        let inner = self.lock().await;

        let node = inner
            .node_map
            .get(id)
            .ok_or_else(|| Error::IssueNotFound(id.clone()))?;

        Ok(inner
            .graph
            .edges_directed(*node, Direction::Incoming)
            .map(|edge| DependencyEdge {
                issue_id: inner.graph[edge.source()].clone(),
                depends_on_id: id.clone(),
                dep_type: *edge.weight(),
            })
            .collect())
    }

    async fn has_cycle(&self, from: &IssueId, to: &IssueId) -> Result<bool> {
        let inner = self.lock().await;
        has_cycle_impl(&inner.graph, &inner.node_map, from, to)
    }

    async fn ready_to_work(
        &self,
        filter: Option<&IssueFilter>,
        sort_policy: Option<SortPolicy>,
    ) -> Result<Vec<Issue>> {
        let inner = self.lock().await;

        let blocked = find_blocked_issues(&inner.graph, &inner.node_map, &inner.issues);

        let mut ready: Vec<Issue> = inner
            .issues
            .values()
            .filter(|issue| issue.status != IssueStatus::Closed && !blocked.contains(&issue.id))
            .cloned()
            .collect();

        if let Some(filter) = filter {
            ready.retain(|issue| filter.matches(issue));
        }

        sort_by_policy(&mut ready, sort_policy.unwrap_or_default());

        if let Some(limit) = filter.and_then(|f| f.limit) {
            ready.truncate(limit);
        }

        Ok(ready)
    }

    async fn blocked_issues(&self) -> Result<Vec<(Issue, Vec<Issue>)>> {
        let inner = self.lock().await;

        let mut blocked_list = Vec::new();

        for (id, issue) in &inner.issues {
            if issue.status == IssueStatus::Closed {
                continue;
            }

            let node = inner.node_map[id];
            let mut blockers = Vec::new();

            for edge in inner.graph.edges(node) {
                if edge.weight() == &crate::domain::DependencyType::Blocks {
                    let blocker_id = &inner.graph[edge.target()];
                    if let Some(blocker) = inner.issues.get(blocker_id) {
                        if blocker.status != IssueStatus::Closed {
                            blockers.push(blocker.clone());
                        }
                    }
                }
            }

            if !blockers.is_empty() {
                blocked_list.push((issue.clone(), blockers));
            }
        }

        blocked_list.sort_by(|a, b| a.0.id.cmp(&b.0.id));

        Ok(blocked_list)
    }

    async fn import_issues(&mut self, issues: Vec<Issue>) -> Result<()> {
        let mut inner = self.lock().await;

        for issue in &issues {
            let node = inner.graph.add_node(issue.id.clone());
            inner.node_map.insert(issue.id.clone(), node);
            inner.issues.insert(issue.id.clone(), issue.clone());
            inner.id_generator.register_id(issue.id.as_str());
        }

        // Edges second, once every endpoint is present. Orphaned edges are
        // skipped; the JSONL loader reports them as warnings before calling
        // this.
        for issue in &issues {
            for dep in &issue.dependencies {
                if !inner.node_map.contains_key(&dep.depends_on_id) {
                    continue;
                }
                let from_node = inner.node_map[&issue.id];
                let to_node = inner.node_map[&dep.depends_on_id];
                if !inner.edge_exists(from_node, to_node, dep.dep_type) {
                    inner.graph.add_edge(from_node, to_node, dep.dep_type);
                }
            }
        }

        Ok(())
    }

    async fn export_all(&self) -> Result<Vec<Issue>> {
        let inner = self.lock().await;
        Ok(inner.issues.values().cloned().collect())
    }

    async fn save(&self) -> Result<()> {
        // No backing file; the JSONL wrapper persists.
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        // No backing file to reload from.
        Ok(())
    }
}
