use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use questgraph::check::{OrphanRef, check_all};

#[derive(Serialize)]
struct CheckJsonOutput {
    ok: bool,
    cycles: Vec<Vec<String>>,
    orphan_refs: Vec<OrphanRef>,
    quest_count: usize,
    edge_count: usize,
}

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let project = super::load_project(dir)?;
    let graph = &project.graph;
    let result = check_all(graph);

    if json {
        let output = CheckJsonOutput {
            ok: result.ok,
            cycles: result.cycles,
            orphan_refs: result.orphan_refs,
            quest_count: graph.len(),
            edge_count: graph.edges().count(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    // Status and layout tolerate both, so these are warnings only
    if !result.cycles.is_empty() {
        eprintln!("Warning: Dependency cycles (quests on a cycle stay locked):");
        for cycle in &result.cycles {
            eprintln!("  {}", cycle.join(" <-> "));
        }
    }

    if !result.orphan_refs.is_empty() {
        eprintln!("Warning: Prerequisites missing from the catalog:");
        for orphan in &result.orphan_refs {
            eprintln!("  {} --[depends on]--> {} (not found)", orphan.from, orphan.to);
        }
    }

    if result.ok {
        println!("Graph OK: {} quests, {} edges", graph.len(), graph.edges().count());
    } else {
        println!(
            "Found {} cycle(s) and {} missing prerequisite(s)",
            result.cycles.len(),
            result.orphan_refs.len()
        );
    }
    Ok(())
}
