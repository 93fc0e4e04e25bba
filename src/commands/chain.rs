use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use questgraph::chain::{ancestors_of, descendants_of, get_full_chain};
use questgraph::graph::QuestGraph;
use questgraph::status::{resolve_statuses, status_of};

#[derive(Debug, Serialize)]
struct ChainOutput {
    id: String,
    ancestors: Vec<String>,
    descendants: Vec<String>,
    chain_size: usize,
}

/// Ids in catalog order, without the focal quest
fn ordered(graph: &QuestGraph, ids: &HashSet<String>, exclude: &str) -> Vec<String> {
    graph
        .quests()
        .filter(|q| q.id != exclude && ids.contains(&q.id))
        .map(|q| q.id.clone())
        .collect()
}

pub fn run(dir: &Path, id: &str, json: bool) -> Result<()> {
    let project = super::load_project(dir)?;
    let graph = &project.graph;
    graph.get_quest_or_err(id)?;

    let ancestors = ordered(graph, &ancestors_of(id, graph), id);
    let descendants = ordered(graph, &descendants_of(id, graph), id);
    let output = ChainOutput {
        id: id.to_string(),
        chain_size: get_full_chain(id, graph).len(),
        ancestors,
        descendants,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let statuses = resolve_statuses(graph);
    println!("Chain for {} ({} quests)", output.id, output.chain_size);
    println!();
    println!("Ancestors ({}):", output.ancestors.len());
    for ancestor in &output.ancestors {
        println!("  {} {}", super::status::status_marker(status_of(&statuses, ancestor)), ancestor);
    }
    println!();
    println!("Descendants ({}):", output.descendants.len());
    for descendant in &output.descendants {
        println!("  {} {}", super::status::status_marker(status_of(&statuses, descendant)), descendant);
    }
    Ok(())
}
