use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use questgraph::catch_up::get_chain_length;
use questgraph::depth::compute_global_depths;
use questgraph::graph::{QuestGraph, RequirementSet, Status};
use questgraph::objective::{ObjectiveProgress, compute_objective_progress};
use questgraph::query::{QuestFilters, StatusCounts, apply_filters, count_by_status, quest_maps};
use questgraph::status::{StatusMap, resolve_statuses, status_of};

#[derive(Debug, Serialize)]
struct QuestStatusEntry<'a> {
    id: &'a str,
    title: &'a str,
    trader_id: &'a str,
    level_required: u32,
    kappa_required: bool,
    status: Status,
}

#[derive(Debug, Serialize)]
struct StatusListOutput<'a> {
    counts: StatusCounts,
    /// Values accepted by `--map`
    maps: Vec<String>,
    quests: Vec<QuestStatusEntry<'a>>,
}

/// Prerequisite or dependent with its status
#[derive(Debug, Serialize)]
struct LinkInfo {
    id: String,
    status: Status,
    requirement_status: RequirementSet,
    /// False when the id is not in the catalog
    known: bool,
}

#[derive(Debug, Serialize)]
struct QuestDetails<'a> {
    id: &'a str,
    title: &'a str,
    trader_id: &'a str,
    trader_name: &'a str,
    level_required: u32,
    kappa_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    wiki_link: Option<&'a str>,
    status: Status,
    explicit: bool,
    depth: usize,
    chain_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    objectives: Option<ObjectiveProgress>,
    depends_on: Vec<LinkInfo>,
    depended_on_by: Vec<LinkInfo>,
}

pub fn run(dir: &Path, id: Option<&str>, filters: &QuestFilters, json: bool) -> Result<()> {
    let project = super::load_project(dir)?;
    let graph = &project.graph;
    let statuses = resolve_statuses(graph);

    match id {
        Some(id) => show_quest(graph, &statuses, id, json),
        None => list_quests(graph, &statuses, filters, json),
    }
}

fn list_quests(graph: &QuestGraph, statuses: &StatusMap, filters: &QuestFilters, json: bool) -> Result<()> {
    let visible = apply_filters(graph, statuses, filters);
    let counts = count_by_status(visible.iter().copied(), statuses);

    if json {
        let output = StatusListOutput {
            counts,
            maps: quest_maps(graph),
            quests: visible
                .iter()
                .map(|q| QuestStatusEntry {
                    id: &q.id,
                    title: &q.title,
                    trader_id: &q.trader_id,
                    level_required: q.level_required,
                    kappa_required: q.kappa_required,
                    status: status_of(statuses, &q.id),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if visible.is_empty() {
        if filters.is_empty() {
            println!("No quests in catalog");
        } else {
            println!("No quests match");
        }
        return Ok(());
    }

    for quest in &visible {
        let status = status_of(statuses, &quest.id);
        let kappa = if quest.kappa_required { " [kappa]" } else { "" };
        println!(
            "{} {:<12} {:<12} L{:<3} {}{}",
            status_marker(status),
            quest.id,
            quest.trader_id,
            quest.level_required,
            quest.title,
            kappa
        );
    }
    println!();
    let breakdown: Vec<String> = Status::ALL
        .iter()
        .map(|s| format!("{} {}", counts.get(*s), s))
        .collect();
    println!("{} quests: {}", counts.total(), breakdown.join(", "));
    Ok(())
}

fn show_quest(graph: &QuestGraph, statuses: &StatusMap, id: &str, json: bool) -> Result<()> {
    let quest = graph.get_quest_or_err(id)?;
    let depths = compute_global_depths(graph.quests());

    let depends_on: Vec<LinkInfo> = quest
        .depends_on
        .iter()
        .map(|dep| LinkInfo {
            id: dep.quest_id.clone(),
            status: status_of(statuses, &dep.quest_id),
            requirement_status: dep.requirement_status,
            known: graph.contains(&dep.quest_id),
        })
        .collect();
    let depended_on_by: Vec<LinkInfo> = quest
        .depended_on_by
        .iter()
        .map(|dep| LinkInfo {
            id: dep.quest_id.clone(),
            status: status_of(statuses, &dep.quest_id),
            requirement_status: dep.requirement_status,
            known: true,
        })
        .collect();

    let details = QuestDetails {
        id: &quest.id,
        title: &quest.title,
        trader_id: &quest.trader_id,
        trader_name: quest.trader_name(),
        level_required: quest.level_required,
        kappa_required: quest.kappa_required,
        wiki_link: quest.wiki_link.as_deref(),
        status: status_of(statuses, &quest.id),
        explicit: quest.progress.is_some(),
        depth: depths.get(&quest.id).copied().unwrap_or(0),
        chain_length: get_chain_length(&quest.id, graph),
        objectives: (!quest.objectives.is_empty()).then(|| compute_objective_progress(&quest.objectives)),
        depends_on,
        depended_on_by,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("Quest: {}", details.id);
    println!("Title: {}", details.title);
    println!("Trader: {} ({})", details.trader_name, details.trader_id);
    println!("Level: {}", details.level_required);
    if details.kappa_required {
        println!("Kappa: required");
    }
    if let Some(link) = details.wiki_link {
        println!("Wiki: {}", link);
    }
    let source = if details.explicit { "explicit" } else { "derived" };
    println!("Status: {} ({})", details.status, source);
    println!("Depth: {}", details.depth);
    println!("Prerequisites in chain: {}", details.chain_length);
    if let Some(objectives) = details.objectives {
        println!(
            "Objectives: {}/{} done ({}/{} required)",
            objectives.completed, objectives.total, objectives.required_completed, objectives.required_total
        );
    }

    if !details.depends_on.is_empty() {
        println!();
        println!("Depends on:");
        for link in &details.depends_on {
            if link.known {
                let active = if link.requirement_status.is_active_only() { " (start only)" } else { "" };
                println!("  {} {}{}", status_marker(link.status), link.id, active);
            } else {
                println!("  ? {} (not in catalog)", link.id);
            }
        }
    }
    if !details.depended_on_by.is_empty() {
        println!();
        println!("Unlocks:");
        for link in &details.depended_on_by {
            println!("  {} {}", status_marker(link.status), link.id);
        }
    }
    Ok(())
}

pub fn status_marker(status: Status) -> &'static str {
    match status {
        Status::Completed => "[x]",
        Status::InProgress => "[~]",
        Status::Available => "[ ]",
        Status::Locked => "[-]",
    }
}
