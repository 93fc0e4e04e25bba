use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use questgraph::chain::get_incomplete_prerequisites;
use questgraph::graph::{ProgressEntry, Status};

#[derive(Debug, Serialize)]
struct SkipOutput<'a> {
    id: &'a str,
    /// Prerequisites before dependents
    prerequisites: Vec<&'a str>,
    applied: bool,
}

/// List the incomplete prerequisites of a quest, completing them with `--apply`
pub fn run(dir: &Path, id: &str, apply: bool, json: bool) -> Result<()> {
    let project = super::load_project(dir)?;
    let graph = &project.graph;
    let quest = graph.get_quest_or_err(id)?;

    let prerequisites = get_incomplete_prerequisites(&quest.id, graph);

    if apply && !prerequisites.is_empty() {
        let now = Utc::now();
        let mut progress = project.progress.clone();
        for prereq in &prerequisites {
            progress.insert(
                prereq.id.clone(),
                ProgressEntry {
                    status: Status::Completed,
                    updated_at: Some(now),
                },
            );
        }
        project.save_progress(&progress)?;
        tracing::info!(quest_id = %id, completed = prerequisites.len(), "skipped to quest");
    }

    if json {
        let output = SkipOutput {
            id,
            prerequisites: prerequisites.iter().map(|q| q.id.as_str()).collect(),
            applied: apply,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if prerequisites.is_empty() {
        println!("'{}' has no incomplete prerequisites", id);
        return Ok(());
    }

    let verb = if apply { "Completed" } else { "Would complete" };
    println!("{} {} prerequisite(s) of '{}':", verb, prerequisites.len(), id);
    for prereq in &prerequisites {
        println!("  {:<16} {}", prereq.id, prereq.title);
    }
    if !apply {
        println!();
        println!("Run with --apply to mark them completed");
    }
    Ok(())
}
