use crate::graph::QuestGraph;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::HashMap;

/// Result of checking the quest graph for structural issues
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckResult {
    pub cycles: Vec<Vec<String>>,
    pub orphan_refs: Vec<OrphanRef>,
    pub ok: bool,
}

/// A dependency on a quest id that is not in the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrphanRef {
    pub from: String,
    pub to: String,
}

/// Dependency cycles, one entry per strongly connected component with more
/// than one quest, plus self-dependencies. Ids inside a cycle are sorted and
/// cycles are ordered by their first id.
pub fn check_cycles(graph: &QuestGraph) -> Vec<Vec<String>> {
    let mut digraph: DiGraph<&str, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    for quest in graph.quests() {
        nodes.insert(quest.id.as_str(), digraph.add_node(quest.id.as_str()));
    }

    let mut self_loops = Vec::new();
    for quest in graph.quests() {
        for dep in &quest.depends_on {
            let Some(&from) = nodes.get(dep.quest_id.as_str()) else {
                continue;
            };
            let to = nodes[quest.id.as_str()];
            if from == to {
                self_loops.push(vec![quest.id.clone()]);
            } else {
                digraph.add_edge(from, to, ());
            }
        }
    }

    let mut cycles: Vec<Vec<String>> = tarjan_scc(&digraph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut ids: Vec<String> = component.iter().map(|&ix| digraph[ix].to_string()).collect();
            ids.sort();
            ids
        })
        .chain(self_loops)
        .collect();
    cycles.sort();
    cycles.dedup();
    cycles
}

/// Dependencies whose prerequisite id is missing from the catalog
pub fn check_orphans(graph: &QuestGraph) -> Vec<OrphanRef> {
    let mut orphans = Vec::new();

    for quest in graph.quests() {
        for dep in &quest.depends_on {
            if !graph.contains(&dep.quest_id) {
                orphans.push(OrphanRef {
                    from: quest.id.clone(),
                    to: dep.quest_id.clone(),
                });
            }
        }
    }

    orphans
}

/// Run all checks and return a summary
pub fn check_all(graph: &QuestGraph) -> CheckResult {
    let cycles = check_cycles(graph);
    let orphan_refs = check_orphans(graph);

    // Status, depth and layout all tolerate both; `ok` is informational
    let ok = cycles.is_empty() && orphan_refs.is_empty();

    CheckResult {
        cycles,
        orphan_refs,
        ok,
    }
}
