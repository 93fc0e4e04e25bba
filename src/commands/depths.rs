use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use questgraph::depth::compute_global_depths;

#[derive(Debug, Serialize)]
struct DepthEntry<'a> {
    id: &'a str,
    title: &'a str,
    depth: usize,
}

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let project = super::load_project(dir)?;
    let graph = &project.graph;
    let depths = compute_global_depths(graph.quests());

    let mut entries: Vec<DepthEntry> = graph
        .quests()
        .map(|q| DepthEntry {
            id: &q.id,
            title: &q.title,
            depth: depths.get(&q.id).copied().unwrap_or(0),
        })
        .collect();
    entries.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.id.cmp(b.id)));

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let max_depth = entries.last().map(|e| e.depth).unwrap_or(0);
    for entry in &entries {
        println!("{:>3}  {:<16} {}", entry.depth, entry.id, entry.title);
    }
    println!();
    println!("{} quests, max depth {}", entries.len(), max_depth);
    Ok(())
}
