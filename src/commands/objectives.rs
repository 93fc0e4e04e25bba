use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use questgraph::graph::Status;
use questgraph::objective::{ObjectiveProgress, compute_objective_progress, objective_progress_entry};
use questgraph::status::compute_status;

#[derive(Debug, Serialize)]
struct ObjectiveChange<'a> {
    id: &'a str,
    title: &'a str,
    from: Status,
    to: Status,
    objectives: ObjectiveProgress,
}

#[derive(Debug, Serialize)]
struct ObjectivesOutput<'a> {
    changes: Vec<ObjectiveChange<'a>>,
    applied: bool,
}

/// List quests whose objective progress implies a new status, writing them with `--apply`
pub fn run(dir: &Path, apply: bool, json: bool) -> Result<()> {
    let project = super::load_project(dir)?;
    let graph = &project.graph;
    let now = Utc::now();

    let mut progress = project.progress.clone();
    let mut changes = Vec::new();
    for quest in graph.quests() {
        let Some(entry) = objective_progress_entry(quest, graph, now) else {
            continue;
        };
        changes.push(ObjectiveChange {
            id: &quest.id,
            title: &quest.title,
            from: compute_status(quest, graph),
            to: entry.status,
            objectives: compute_objective_progress(&quest.objectives),
        });
        progress.insert(quest.id.clone(), entry);
    }

    if apply && !changes.is_empty() {
        project.save_progress(&progress)?;
        tracing::info!(changed = changes.len(), "applied objective progress");
    }

    if json {
        let output = ObjectivesOutput { changes, applied: apply };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if changes.is_empty() {
        println!("Quest statuses agree with objective progress");
        return Ok(());
    }

    let verb = if apply { "Updated" } else { "Would update" };
    println!("{} {} quest(s):", verb, changes.len());
    for change in &changes {
        let (done, total) = change.objectives.effective();
        println!(
            "  {:<16} {} -> {}  ({}/{} objectives)  {}",
            change.id, change.from, change.to, done, total, change.title
        );
    }
    if !apply {
        println!();
        println!("Run with --apply to write progress");
    }
    Ok(())
}
