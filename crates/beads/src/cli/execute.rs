//! Command execution logic.

use anyhow::Result;

use super::args::{
    BlockedArgs, CloseArgs, CreateArgs, DeleteArgs, DepAction, DepArgs, DuplicatesArgs, InfoArgs,
    InitArgs, ListArgs, MergeArgs, ReadyArgs, ShowArgs, UpdateArgs,
};
use super::types::{BatchError, BatchResult, SortOrderArg, SortPolicyArg};
use crate::app::{resolve_actor, App};
use crate::dedupe::{choose_merge_target, count_references, find_duplicate_groups};
use crate::domain::{
    DependencyEdge, DependencyType, Issue, IssueFilter, IssueId, IssueStatus, IssueUpdate,
    NewIssue, SortPolicy,
};
use crate::merge::{perform_merge, validate_merge, MergeContext, MergeOutcome};
use crate::output::{self, OutputMode};

/// Execute the init command.
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;
    let result = init::init(&current_dir, args.prefix.as_deref()).await?;

    if !args.quiet {
        println!("Initialized beads in {}", result.beads_dir.display());
        println!("  Config: {}", result.config_file.display());
        println!("  Issues: {}", result.issues_file.display());
        println!("  Issue prefix: {}", result.prefix);
    }

    Ok(())
}

/// Execute the info command.
pub async fn execute_info(app: &App, _args: &InfoArgs, mode: OutputMode) -> Result<()> {
    let all_issues = app.store().search("", &IssueFilter::default()).await?;
    let (total, open, in_progress, closed) =
        all_issues
            .iter()
            .fold((0, 0, 0, 0), |(t, o, ip, c), issue| match issue.status {
                IssueStatus::Open => (t + 1, o + 1, ip, c),
                IssueStatus::InProgress => (t + 1, o, ip + 1, c),
                IssueStatus::Closed => (t + 1, o, ip, c + 1),
                IssueStatus::Blocked => (t + 1, o, ip, c),
            });

    match mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "database_path": app.beads_dir().join("issues.jsonl").display().to_string(),
                "issue_prefix": app.prefix(),
                "issues": {
                    "total": total,
                    "open": open,
                    "in_progress": in_progress,
                    "closed": closed
                }
            }))?;
        }
        OutputMode::Text => {
            println!("Beads repository");
            println!();
            println!("Database:     {}", app.beads_dir().join("issues.jsonl").display());
            println!("Issue prefix: {}", app.prefix());
            println!();
            println!(
                "Issues: {total} total ({open} open, {in_progress} in progress, {closed} closed)"
            );
        }
    }

    Ok(())
}

/// Execute the create command.
pub async fn execute_create(app: &mut App, args: &CreateArgs, mode: OutputMode) -> Result<()> {
    let title = match &args.title {
        Some(t) => t.clone(),
        None => {
            eprint!("Title: ");
            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            super::validators::validate_title(input.trim()).map_err(|e| anyhow::anyhow!("{e}"))?
        }
    };

    let mut dependencies: Vec<(IssueId, DependencyType)> = Vec::new();
    for dep_str in &args.deps {
        if let Some((dep_type_str, issue_id)) = dep_str.split_once(':') {
            let dep_type = match dep_type_str {
                "blocks" => DependencyType::Blocks,
                "related" => DependencyType::Related,
                "parent-child" => DependencyType::ParentChild,
                "discovered-from" => DependencyType::DiscoveredFrom,
                _ => anyhow::bail!(
                    "Invalid dependency type '{dep_type_str}'. Valid types: blocks, related, parent-child, discovered-from"
                ),
            };
            dependencies.push((IssueId::new(issue_id), dep_type));
        } else {
            dependencies.push((IssueId::new(dep_str.as_str()), DependencyType::Blocks));
        }
    }

    let new_issue = NewIssue {
        title,
        description: args.description.clone().unwrap_or_default(),
        priority: args.priority,
        issue_type: args.issue_type.into(),
        assignee: args.assignee.clone(),
        design: args.design.clone(),
        acceptance_criteria: args.acceptance.clone(),
        notes: args.notes.clone(),
        dependencies,
    };

    let issue = app.store_mut().create(new_issue).await?;
    app.save().await?;

    match mode {
        OutputMode::Json => output::print_json(&issue)?,
        OutputMode::Text => println!("Created issue: {}", issue.id),
    }

    Ok(())
}

/// Execute the list command.
pub async fn execute_list(app: &App, args: &ListArgs, mode: OutputMode) -> Result<()> {
    let filter = IssueFilter {
        status: args.status.map(Into::into),
        priority: args.priority,
        issue_type: args.issue_type.map(Into::into),
        assignee: args.assignee.clone(),
        limit: None,
    };

    let mut issues = app.store().search(&args.query, &filter).await?;

    match args.sort {
        SortOrderArg::Priority => issues.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        SortOrderArg::Newest => issues.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrderArg::Oldest => issues.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }

    issues.truncate(args.limit);

    output::print_issues(&issues, mode)?;

    Ok(())
}

/// Execute the show command.
pub async fn execute_show(app: &App, args: &ShowArgs, mode: OutputMode) -> Result<()> {
    let mut results: Vec<(Issue, Vec<DependencyEdge>, Vec<DependencyEdge>)> = Vec::new();

    for id_str in &args.issue_ids {
        let issue_id = IssueId::new(id_str.as_str());

        let issue = app
            .store()
            .get(&issue_id)
            .await?
            .ok_or_else(|| crate::error::Error::IssueNotFound(issue_id.clone()))?;

        let deps = app.store().get_dependencies(&issue_id).await?;
        let dependents = app.store().get_dependents(&issue_id).await?;

        results.push((issue, deps, dependents));
    }

    match mode {
        OutputMode::Json => {
            let entries: Vec<_> = results
                .iter()
                .map(|(issue, deps, dependents)| {
                    serde_json::json!({
                        "issue": issue,
                        "dependencies": deps,
                        "dependents": dependents,
                    })
                })
                .collect();
            output::print_json(&entries)?;
        }
        OutputMode::Text => {
            for (i, (issue, deps, dependents)) in results.iter().enumerate() {
                if i > 0 {
                    println!();
                    println!("---");
                    println!();
                }
                output::print_issue_details(issue, deps, dependents)?;
            }
        }
    }

    Ok(())
}

/// Record a batch step: save on success, reload to stay consistent on a
/// failed save.
async fn save_or_record_failure(
    app: &mut App,
    result: &mut BatchResult,
    issue_id: &str,
    step: crate::error::Result<Issue>,
) {
    match step {
        Ok(issue) => {
            if let Err(save_err) = app.save().await {
                if let Err(reload_err) = app.store_mut().reload().await {
                    eprintln!("Warning: failed to reload after save error: {reload_err}");
                }
                result.failed.push(BatchError {
                    issue_id: issue_id.to_string(),
                    error: format!("Save failed: {save_err}"),
                });
            } else {
                result.succeeded.push(issue);
            }
        }
        Err(e) => {
            result.failed.push(BatchError {
                issue_id: issue_id.to_string(),
                error: e.to_string(),
            });
        }
    }
}

fn output_batch_result(result: &BatchResult, action: &str, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => output::print_json(result)?,
        OutputMode::Text => {
            if !result.succeeded.is_empty() {
                let ids: Vec<_> = result.succeeded.iter().map(|i| i.id.to_string()).collect();
                println!(
                    "{action} {} issue(s): {}",
                    result.succeeded.len(),
                    ids.join(", ")
                );
            }
            if !result.failed.is_empty() {
                eprintln!("Failed {} issue(s):", result.failed.len());
                for err in &result.failed {
                    eprintln!("  {}: {}", err.issue_id, err.error);
                }
            }
        }
    }
    Ok(())
}

/// Execute the update command. Issues are processed independently with
/// save-after-each-success semantics.
pub async fn execute_update(app: &mut App, args: &UpdateArgs, mode: OutputMode) -> Result<()> {
    let mut result = BatchResult::new();

    for id_str in &args.issue_ids {
        let issue_id = IssueId::new(id_str.as_str());

        let update = IssueUpdate {
            title: args.title.clone(),
            description: args.description.clone(),
            status: args.status.map(Into::into),
            priority: args.priority,
            assignee: args.assignee.clone().map(Some),
            design: args.design.clone(),
            acceptance_criteria: args.acceptance.clone(),
            notes: args.notes.clone(),
        };

        let step = app.store_mut().update(&issue_id, update).await;
        save_or_record_failure(app, &mut result, id_str, step).await;
    }

    output_batch_result(&result, "Updated", mode)?;

    if result.has_failures() {
        anyhow::bail!(
            "{} of {} update(s) failed",
            result.failed.len(),
            result.total()
        );
    }

    Ok(())
}

/// Execute the close command.
pub async fn execute_close(app: &mut App, args: &CloseArgs, mode: OutputMode) -> Result<()> {
    let actor = resolve_actor();
    let mut result = BatchResult::new();

    for id_str in &args.issue_ids {
        let issue_id = IssueId::new(id_str.as_str());
        let step = app.store_mut().close(&issue_id, &args.reason, &actor).await;
        save_or_record_failure(app, &mut result, id_str, step).await;
    }

    output_batch_result(&result, "Closed", mode)?;

    if result.has_failures() {
        anyhow::bail!(
            "{} of {} close(s) failed",
            result.failed.len(),
            result.total()
        );
    }

    Ok(())
}

/// Execute the delete command.
pub async fn execute_delete(app: &mut App, args: &DeleteArgs, mode: OutputMode) -> Result<()> {
    let issue_id = IssueId::new(args.issue_id.as_str());

    let issue = app
        .store()
        .get(&issue_id)
        .await?
        .ok_or_else(|| crate::error::Error::IssueNotFound(issue_id.clone()))?;

    if !args.force {
        eprint!("Delete issue '{}' ({})? [y/N]: ", issue.id, issue.title);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let response = input.trim().to_lowercase();
        if response != "y" && response != "yes" {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    app.store_mut().delete(&issue_id).await?;
    app.save().await?;

    match mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "deleted": args.issue_id,
            "status": "success"
        }))?,
        OutputMode::Text => println!("Deleted issue: {}", args.issue_id),
    }

    Ok(())
}

/// Execute the ready command.
pub async fn execute_ready(app: &App, args: &ReadyArgs, mode: OutputMode) -> Result<()> {
    let filter = if args.assignee.is_some() || args.priority.is_some() {
        Some(IssueFilter {
            assignee: args.assignee.clone(),
            priority: args.priority,
            ..Default::default()
        })
    } else {
        None
    };

    let sort_policy = match args.sort {
        SortPolicyArg::Hybrid => SortPolicy::Hybrid,
        SortPolicyArg::Priority => SortPolicy::Priority,
        SortPolicyArg::Oldest => SortPolicy::Oldest,
    };

    let mut issues = app
        .store()
        .ready_to_work(filter.as_ref(), Some(sort_policy))
        .await?;
    issues.truncate(args.limit);

    match mode {
        OutputMode::Json => output::print_json(&issues)?,
        OutputMode::Text => {
            if issues.is_empty() {
                println!("No ready issues found.");
            } else {
                println!("Ready to work ({} issue(s)):", issues.len());
                println!();
                output::print_issues(&issues, mode)?;
            }
        }
    }

    Ok(())
}

/// Execute the blocked command.
pub async fn execute_blocked(app: &App, _args: &BlockedArgs, mode: OutputMode) -> Result<()> {
    let blocked = app.store().blocked_issues().await?;
    output::print_blocked_issues(&blocked, mode)?;
    Ok(())
}

/// Execute the dep command.
pub async fn execute_dep(app: &mut App, args: &DepArgs, mode: OutputMode) -> Result<()> {
    match &args.action {
        DepAction::Add { from, to, dep_type } => {
            let from_id = IssueId::new(from.as_str());
            let to_id = IssueId::new(to.as_str());

            // The store itself accepts any edge; refuse obvious mistakes at
            // the CLI boundary.
            if app.store().has_cycle(&from_id, &to_id).await? {
                return Err(crate::error::Error::CircularDependency {
                    from: from_id,
                    to: to_id,
                }
                .into());
            }

            let edge = DependencyEdge {
                issue_id: from_id,
                depends_on_id: to_id,
                dep_type: (*dep_type).into(),
            };
            app.store_mut()
                .add_dependency(&edge, &resolve_actor())
                .await?;
            app.save().await?;

            match mode {
                OutputMode::Json => output::print_json(&serde_json::json!({
                    "action": "add",
                    "from": from,
                    "to": to,
                    "type": dep_type.to_string(),
                    "status": "success"
                }))?,
                OutputMode::Text => {
                    println!("Added dependency: {from} --[{dep_type}]--> {to}");
                }
            }
        }
        DepAction::Remove { from, to } => {
            let from_id = IssueId::new(from.as_str());
            let to_id = IssueId::new(to.as_str());

            app.store_mut().remove_dependency(&from_id, &to_id).await?;
            app.save().await?;

            match mode {
                OutputMode::Json => output::print_json(&serde_json::json!({
                    "action": "remove",
                    "from": from,
                    "to": to,
                    "status": "success"
                }))?,
                OutputMode::Text => println!("Removed dependency: {from} --> {to}"),
            }
        }
        DepAction::List { issue_id, reverse } => {
            let id = IssueId::new(issue_id.as_str());

            let deps = if *reverse {
                app.store().get_dependents(&id).await?
            } else {
                app.store().get_dependencies(&id).await?
            };

            match mode {
                OutputMode::Json => output::print_json(&deps)?,
                OutputMode::Text => {
                    if deps.is_empty() {
                        if *reverse {
                            println!("No issues depend on {issue_id}");
                        } else {
                            println!("{issue_id} has no dependencies");
                        }
                    } else if *reverse {
                        println!("Issues depending on {issue_id} ({}):", deps.len());
                        for dep in &deps {
                            println!("  └── {} ({})", dep.issue_id, dep.dep_type);
                        }
                    } else {
                        println!("Dependencies of {issue_id} ({}):", deps.len());
                        for dep in &deps {
                            println!("  └── {} ({})", dep.depends_on_id, dep.dep_type);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Execute the merge command: validate, then run the executor.
pub async fn execute_merge(app: &mut App, args: &MergeArgs, mode: OutputMode) -> Result<()> {
    let target = IssueId::new(args.target.as_str());
    let sources: Vec<IssueId> = args
        .sources
        .iter()
        .map(|s| IssueId::new(s.as_str()))
        .collect();

    validate_merge(app.store(), &target, &sources).await?;

    let ctx = MergeContext::new(resolve_actor());
    let merge_result = perform_merge(app.store_mut(), &ctx, &target, &sources).await;

    // Persist whatever happened; a partially applied merge must survive so
    // a retry converges instead of redoing work.
    app.save().await?;

    match merge_result {
        Ok(outcome) => {
            print_merge_outcome(&target, &outcome, mode)?;
            Ok(())
        }
        Err(aborted) => {
            match mode {
                OutputMode::Json => output::print_json(&serde_json::json!({
                    "error": aborted.source.to_string(),
                    "partial": aborted.partial,
                }))?,
                OutputMode::Text => {
                    eprintln!(
                        "Merge aborted after closing {} and adding {} dependency(ies): {}",
                        aborted.partial.issues_closed,
                        aborted.partial.deps_added,
                        aborted.source
                    );
                }
            }
            anyhow::bail!("merge into {target} did not complete; retry with the same arguments")
        }
    }
}

fn print_merge_outcome(target: &IssueId, outcome: &MergeOutcome, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => output::print_json(outcome)?,
        OutputMode::Text => {
            println!(
                "Merged into {target}: {} closed, {} skipped, {} dependency(ies) migrated",
                outcome.issues_closed, outcome.issues_skipped, outcome.deps_added
            );
        }
    }
    Ok(())
}

/// Execute the duplicates command: detect groups, pick targets, and either
/// report or merge.
pub async fn execute_duplicates(
    app: &mut App,
    args: &DuplicatesArgs,
    mode: OutputMode,
) -> Result<()> {
    // One snapshot feeds detection, counting, and selection.
    let snapshot = app.store().search("", &IssueFilter::default()).await?;

    let groups = find_duplicate_groups(&snapshot);
    let ref_counts = count_references(&snapshot);

    let mut planned: Vec<(Vec<Issue>, IssueId)> = Vec::new();
    for group in groups {
        let Some(target) = choose_merge_target(&group, &ref_counts) else {
            continue;
        };
        let target_id = target.id.clone();
        planned.push((group, target_id));
    }

    if !args.merge {
        output::print_duplicate_groups(&planned, mode)?;
        return Ok(());
    }

    let ctx = MergeContext::new(resolve_actor());
    let mut total = MergeOutcome::default();
    let mut merged_groups = 0;

    for (group, target) in &planned {
        let sources: Vec<IssueId> = group
            .iter()
            .map(|issue| issue.id.clone())
            .filter(|id| id != target)
            .collect();

        validate_merge(app.store(), target, &sources).await?;
        let outcome = match perform_merge(app.store_mut(), &ctx, target, &sources).await {
            Ok(outcome) => outcome,
            Err(aborted) => {
                app.save().await?;
                anyhow::bail!(
                    "merge into {target} aborted ({}); completed {merged_groups} group(s) before the failure",
                    aborted.source
                );
            }
        };
        app.save().await?;

        total.issues_closed += outcome.issues_closed;
        total.issues_skipped += outcome.issues_skipped;
        total.deps_added += outcome.deps_added;
        merged_groups += 1;
    }

    match mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "groups_merged": merged_groups,
            "issues_closed": total.issues_closed,
            "issues_skipped": total.issues_skipped,
            "deps_added": total.deps_added,
        }))?,
        OutputMode::Text => {
            if merged_groups == 0 {
                println!("No duplicate issues found.");
            } else {
                println!(
                    "Merged {merged_groups} group(s): {} closed, {} skipped, {} dependency(ies) migrated",
                    total.issues_closed, total.issues_skipped, total.deps_added
                );
            }
        }
    }

    Ok(())
}
