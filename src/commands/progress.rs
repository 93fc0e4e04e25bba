use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use questgraph::graph::{ProgressEntry, Status};
use questgraph::status::compute_status;

/// Set an explicit progress status on a quest
pub fn set(dir: &Path, id: &str, status: Status) -> Result<()> {
    let project = super::load_project(dir)?;
    let quest = project.graph.get_quest_or_err(id)?;
    let previous = compute_status(quest, &project.graph);

    let mut progress = project.progress.clone();
    progress.insert(
        id.to_string(),
        ProgressEntry {
            status,
            updated_at: Some(Utc::now()),
        },
    );
    project.save_progress(&progress)?;

    println!("Set '{}' to {} (was {})", id, status, previous);
    Ok(())
}

/// Drop a quest's explicit progress so its status is derived again
pub fn reset(dir: &Path, id: &str) -> Result<()> {
    let project = super::load_project(dir)?;
    project.graph.get_quest_or_err(id)?;

    let mut progress = project.progress.clone();
    if progress.remove(id).is_none() {
        println!("'{}' has no explicit progress", id);
        return Ok(());
    }
    project.save_progress(&progress)?;

    let graph = project.graph.with_progress(&progress);
    let derived = graph
        .get_quest(id)
        .map(|q| compute_status(q, &graph))
        .unwrap_or(Status::Locked);
    println!("Reset '{}' (now {})", id, derived);
    Ok(())
}
