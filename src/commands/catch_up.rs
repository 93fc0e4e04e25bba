use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use questgraph::catch_up::{CatchUp, CatchUpPlan, CatchUpSelection, calculate_catch_up, group_by_trader, plan_catch_up};

#[derive(Debug, Serialize)]
struct CatchUpOutput {
    recommendation: CatchUp,
    plan: CatchUpPlan,
    applied: bool,
}

pub fn run(dir: &Path, targets: &[String], branches: &[String], apply: bool, json: bool) -> Result<()> {
    let project = super::load_project(dir)?;
    let graph = &project.graph;
    super::ensure_known(graph, targets)?;
    super::ensure_known(graph, branches)?;

    let recommendation = calculate_catch_up(targets, graph);
    let plan = plan_catch_up(targets, graph, branches);

    if apply && !plan.is_empty() {
        let progress = plan.apply(&project.progress, Utc::now());
        project.save_progress(&progress)?;
        tracing::info!(
            completed = plan.complete.len(),
            available = plan.make_available.len(),
            "applied catch-up"
        );
    }

    if json {
        let output = CatchUpOutput {
            recommendation,
            plan,
            applied: apply,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Prerequisites ({}):", recommendation.prerequisites.len());
    print_grouped(&recommendation.prerequisites);

    if !recommendation.sibling_branches.is_empty() {
        println!();
        println!("Sibling branches you may have finished ({}):", recommendation.sibling_branches.len());
        for branch in &recommendation.sibling_branches {
            let confirmed = if branches.contains(&branch.quest_id) { "[x]" } else { "[ ]" };
            println!(
                "  {} {:<16} L{:<3} {} ({})",
                confirmed, branch.quest_id, branch.level_required, branch.quest_title, branch.trader_name
            );
        }
        println!("  Confirm with --branch <ID>");
    }

    println!();
    let verb = if apply { "Applied" } else { "Plan" };
    println!(
        "{}: {} to complete, {} to make available",
        verb,
        plan.complete.len(),
        plan.make_available.len()
    );
    if !apply && !plan.is_empty() {
        println!("Run with --apply to write progress");
    }
    Ok(())
}

fn print_grouped(selections: &[CatchUpSelection]) {
    for (trader_id, group) in group_by_trader(selections) {
        println!("  {}:", trader_id);
        for selection in group {
            println!(
                "    {:<16} L{:<3} {}",
                selection.quest_id, selection.level_required, selection.quest_title
            );
        }
    }
}
