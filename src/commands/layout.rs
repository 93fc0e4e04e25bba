use anyhow::Result;
use std::path::Path;
use questgraph::layout::{FocusState, build_layout};
use questgraph::query::{QuestFilters, apply_filters};
use questgraph::status::resolve_statuses;

pub fn run(dir: &Path, focus: Option<&str>, filters: &QuestFilters, json: bool) -> Result<()> {
    let project = super::load_project(dir)?;
    let graph = &project.graph;

    // Statuses over the full graph, before filtering
    let statuses = resolve_statuses(graph);
    let visible = apply_filters(graph, &statuses, filters);

    let focus = match focus {
        Some(id) => {
            graph.get_quest_or_err(id)?;
            FocusState::on(id, graph)
        }
        None => FocusState::none(),
    };

    let layout = build_layout(&visible, &statuses, &project.config, &focus);

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    if layout.quest_nodes.is_empty() {
        println!("Nothing to lay out");
        return Ok(());
    }

    for header in &layout.trader_nodes {
        println!(
            "{} ({}/{} completed) y={} height={}",
            header.trader_name, header.completed_count, header.quest_count, header.y, header.lane_height
        );
        let mut nodes: Vec<_> = layout
            .quest_nodes
            .iter()
            .filter(|n| n.trader_id == header.trader_id)
            .collect();
        nodes.sort_by(|a, b| a.column.cmp(&b.column).then(a.y.total_cmp(&b.y)));
        for node in nodes {
            let mark = if node.is_focused {
                "*"
            } else if node.is_in_focus_chain {
                "+"
            } else {
                " "
            };
            println!(
                "  {}col {:<2} ({:>6.0},{:>6.0}) {:<16} {}",
                mark, node.column, node.x, node.y, node.quest_id, node.status
            );
        }
    }
    let cross = layout.edges.iter().filter(|e| e.cross_trader).count();
    println!();
    println!(
        "{} quests in {} lanes, {} edges ({} cross-trader)",
        layout.quest_nodes.len(),
        layout.trader_nodes.len(),
        layout.edges.len(),
        cross
    );
    Ok(())
}
