//! Transitive prerequisite/dependent walks over the quest graph.
//!
//! Every walk records visited ids before recursing, so cycles terminate.

use crate::graph::{Quest, QuestGraph, Status};
use crate::status::compute_status;
use std::collections::HashSet;

/// Add `quest_id` and all of its transitive prerequisites to `visited`.
///
/// Ids already in `visited` are not explored again, which lets callers reuse
/// one set across several roots. Unknown ids are ignored.
pub fn collect_ancestors(quest_id: &str, graph: &QuestGraph, visited: &mut HashSet<String>) {
    if visited.contains(quest_id) {
        return;
    }
    let Some(quest) = graph.get_quest(quest_id) else {
        return;
    };
    visited.insert(quest_id.to_string());

    for dep in &quest.depends_on {
        collect_ancestors(&dep.quest_id, graph, visited);
    }
}

/// Add `quest_id` and all quests that transitively depend on it to `visited`.
pub fn collect_descendants(quest_id: &str, graph: &QuestGraph, visited: &mut HashSet<String>) {
    if visited.contains(quest_id) {
        return;
    }
    let Some(quest) = graph.get_quest(quest_id) else {
        return;
    };
    visited.insert(quest_id.to_string());

    for dependent in &quest.depended_on_by {
        collect_descendants(&dependent.quest_id, graph, visited);
    }
}

/// The quest itself plus all of its ancestors
pub fn ancestors_of(quest_id: &str, graph: &QuestGraph) -> HashSet<String> {
    let mut visited = HashSet::new();
    collect_ancestors(quest_id, graph, &mut visited);
    visited
}

/// The quest itself plus all of its descendants
pub fn descendants_of(quest_id: &str, graph: &QuestGraph) -> HashSet<String> {
    let mut visited = HashSet::new();
    collect_descendants(quest_id, graph, &mut visited);
    visited
}

/// The focus chain: the quest, every ancestor and every descendant.
/// Empty when the quest is unknown.
pub fn get_full_chain(quest_id: &str, graph: &QuestGraph) -> HashSet<String> {
    let mut chain = ancestors_of(quest_id, graph);
    chain.extend(descendants_of(quest_id, graph));
    chain
}

/// Prerequisites that still need completing before `quest_id` unlocks, in an
/// order where no quest precedes one of its own prerequisites.
///
/// Completed prerequisites are left out but still walked through, so an
/// incomplete quest deeper in the chain is reported even behind a completed one.
pub fn get_incomplete_prerequisites<'a>(quest_id: &str, graph: &'a QuestGraph) -> Vec<&'a Quest> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    collect_incomplete_prerequisites(quest_id, graph, &mut seen, &mut out);
    // A cycle can lead back to the quest itself
    out.retain(|q| q.id != quest_id);
    out
}

/// Shared-seen-set form of `get_incomplete_prerequisites`, for walking several
/// targets without reporting a prerequisite twice.
pub fn collect_incomplete_prerequisites<'a>(
    quest_id: &str,
    graph: &'a QuestGraph,
    seen: &mut HashSet<String>,
    out: &mut Vec<&'a Quest>,
) {
    if !seen.insert(quest_id.to_string()) {
        return;
    }
    let Some(quest) = graph.get_quest(quest_id) else {
        return;
    };

    for dep in &quest.depends_on {
        // Post-order: deeper prerequisites first
        collect_incomplete_prerequisites(&dep.quest_id, graph, seen, out);

        if let Some(prereq) = graph.get_quest(&dep.quest_id)
            && compute_status(prereq, graph) != Status::Completed
            && !out.iter().any(|q| q.id == prereq.id)
        {
            out.push(prereq);
        }
    }
}
