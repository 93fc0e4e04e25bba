use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use questgraph::graph::{Quest, Status};
use questgraph::partition::{compute_trader_order, split_by_trader};
use questgraph::status::{resolve_statuses, status_of};

#[derive(Debug, Serialize)]
struct TraderSummary<'a> {
    trader_id: &'a str,
    trader_name: &'a str,
    color: &'a str,
    quests: usize,
    completed: usize,
    roots: Vec<&'a str>,
    intra_edges: usize,
    cross_edges: usize,
}

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let project = super::load_project(dir)?;
    let graph = &project.graph;
    let statuses = resolve_statuses(graph);

    let quests: Vec<&Quest> = graph.quests().collect();
    let groups = split_by_trader(&quests);
    let order = compute_trader_order(&groups, &project.config.traders.order);

    let summaries: Vec<TraderSummary> = order
        .iter()
        .filter_map(|id| groups.get(id))
        .map(|group| TraderSummary {
            trader_id: &group.trader_id,
            trader_name: &group.trader_name,
            color: &group.color,
            quests: group.quests.len(),
            completed: group
                .quests
                .iter()
                .filter(|q| status_of(&statuses, &q.id) == Status::Completed)
                .count(),
            roots: group.root_quests.iter().map(|q| q.id.as_str()).collect(),
            intra_edges: group.intra_edges.len(),
            cross_edges: group.cross_edges.len(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No traders");
        return Ok(());
    }

    for s in &summaries {
        println!(
            "{:<14} {:>3}/{:<3} completed  roots: {:<3} edges: {} intra, {} cross  {}",
            s.trader_name,
            s.completed,
            s.quests,
            s.roots.len(),
            s.intra_edges,
            s.cross_edges,
            s.color
        );
    }
    Ok(())
}
