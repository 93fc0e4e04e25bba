//! Catch-up recommendations: fast-forwarding progress to a set of quests the
//! player is currently on.
//!
//! The recommender lists every prerequisite of the targets plus "sibling
//! branches", terminal quests that fork off a shared ancestor and were
//! probably finished on the way. A [`CatchUpPlan`] turns a confirmed selection
//! into concrete progress changes.

use crate::chain::{ancestors_of, collect_ancestors, collect_descendants, collect_incomplete_prerequisites};
use crate::graph::{ProgressEntry, ProgressMap, Quest, QuestGraph, Status};
use crate::partition::trader_color;
use crate::status::compute_status;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Lightweight summary of a quest for a catch-up selection list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchUpSelection {
    pub quest_id: String,
    pub quest_title: String,
    pub trader_id: String,
    pub trader_name: String,
    pub trader_color: String,
    pub level_required: u32,
    /// Number of transitive prerequisites
    pub chain_length: usize,
}

impl CatchUpSelection {
    fn from_quest(quest: &Quest, graph: &QuestGraph) -> Self {
        let trader_id = quest.trader_key();
        let trader_color = quest
            .trader
            .as_ref()
            .and_then(|t| t.color.clone())
            .unwrap_or_else(|| trader_color(&trader_id).to_string());
        Self {
            quest_id: quest.id.clone(),
            quest_title: quest.title.clone(),
            trader_name: quest.trader_name().to_string(),
            trader_color,
            trader_id,
            level_required: quest.level_required,
            chain_length: get_chain_length(&quest.id, graph),
        }
    }
}

/// Result of [`calculate_catch_up`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatchUp {
    /// The known target quests, in the order given
    pub target_quests: Vec<CatchUpSelection>,
    /// Every prerequisite of the targets, shallowest first
    pub prerequisites: Vec<CatchUpSelection>,
    pub sibling_branches: Vec<CatchUpSelection>,
    /// Reserved; always empty
    pub ancestors: Vec<String>,
    /// Reserved; always empty
    pub blocked_quests: Vec<String>,
}

/// Number of transitive prerequisites of a quest (0 for unknown ids)
pub fn get_chain_length(quest_id: &str, graph: &QuestGraph) -> usize {
    ancestors_of(quest_id, graph).len().saturating_sub(1)
}

/// Union of all targets' ancestors, minus the targets, sorted by chain length.
/// Ties keep catalog order.
pub fn get_prerequisites_for_selection<S: AsRef<str>>(
    target_ids: &[S],
    graph: &QuestGraph,
) -> Vec<CatchUpSelection> {
    let targets: HashSet<&str> = target_ids.iter().map(|t| t.as_ref()).collect();
    let mut prereqs = HashSet::new();
    for target in &targets {
        let mut ancestors = ancestors_of(target, graph);
        ancestors.remove(*target);
        prereqs.extend(ancestors);
    }
    // A cycle can make one target an ancestor of another
    prereqs.retain(|id| !targets.contains(id.as_str()));

    let mut selections: Vec<CatchUpSelection> = graph
        .quests()
        .filter(|q| prereqs.contains(&q.id))
        .map(|q| CatchUpSelection::from_quest(q, graph))
        .collect();
    selections.sort_by_key(|s| s.chain_length);
    selections
}

/// Terminal quests that share an ancestor with some target but are neither a
/// target nor an ancestor or descendant of one. Sorted by level, then trader name.
pub fn get_completed_branches<S: AsRef<str>>(
    target_ids: &[S],
    graph: &QuestGraph,
) -> Vec<CatchUpSelection> {
    let targets: HashSet<&str> = target_ids.iter().map(|t| t.as_ref()).collect();

    // One visited set per closure; a shared set is fine within it
    let mut target_ancestors = HashSet::new();
    let mut target_descendants = HashSet::new();
    for target in &targets {
        collect_ancestors(target, graph, &mut target_ancestors);
        collect_descendants(target, graph, &mut target_descendants);
    }

    let mut branches: Vec<CatchUpSelection> = graph
        .quests()
        .filter(|q| q.is_terminal())
        .filter(|q| !targets.contains(q.id.as_str()))
        .filter(|q| !target_ancestors.contains(&q.id) && !target_descendants.contains(&q.id))
        .filter(|q| {
            ancestors_of(&q.id, graph)
                .iter()
                .any(|a| target_ancestors.contains(a))
        })
        .map(|q| CatchUpSelection::from_quest(q, graph))
        .collect();

    branches.sort_by(|a, b| {
        a.level_required
            .cmp(&b.level_required)
            .then_with(|| a.trader_name.to_lowercase().cmp(&b.trader_name.to_lowercase()))
    });
    branches
}

/// Full catch-up recommendation for a set of targets. Unknown ids are skipped.
pub fn calculate_catch_up<S: AsRef<str>>(target_ids: &[S], graph: &QuestGraph) -> CatchUp {
    let target_quests = target_ids
        .iter()
        .filter_map(|id| graph.get_quest(id.as_ref()))
        .map(|q| CatchUpSelection::from_quest(q, graph))
        .collect();

    let catch_up = CatchUp {
        target_quests,
        prerequisites: get_prerequisites_for_selection(target_ids, graph),
        sibling_branches: get_completed_branches(target_ids, graph),
        ..CatchUp::default()
    };
    tracing::debug!(
        targets = catch_up.target_quests.len(),
        prerequisites = catch_up.prerequisites.len(),
        sibling_branches = catch_up.sibling_branches.len(),
        "calculated catch-up"
    );
    catch_up
}

/// Group selections by trader id, keeping each group's input order
pub fn group_by_trader(selections: &[CatchUpSelection]) -> BTreeMap<String, Vec<CatchUpSelection>> {
    let mut groups: BTreeMap<String, Vec<CatchUpSelection>> = BTreeMap::new();
    for selection in selections {
        let key = if selection.trader_id.is_empty() {
            "unknown".to_string()
        } else {
            selection.trader_id.clone()
        };
        groups.entry(key).or_default().push(selection.clone());
    }
    groups
}

/// Concrete progress changes for a confirmed catch-up
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatchUpPlan {
    /// Quests to mark completed, prerequisites before dependents
    pub complete: Vec<String>,
    /// Targets to mark available
    pub make_available: Vec<String>,
}

impl CatchUpPlan {
    pub fn is_empty(&self) -> bool {
        self.complete.is_empty() && self.make_available.is_empty()
    }

    pub fn total_changed(&self) -> usize {
        self.complete.len() + self.make_available.len()
    }

    /// A copy of `progress` with the plan applied, stamped at `now`
    pub fn apply(&self, progress: &ProgressMap, now: DateTime<Utc>) -> ProgressMap {
        let mut updated = progress.clone();
        let stamp = |status| ProgressEntry {
            status,
            updated_at: Some(now),
        };
        for id in &self.complete {
            updated.insert(id.clone(), stamp(Status::Completed));
        }
        for id in &self.make_available {
            updated.insert(id.clone(), stamp(Status::Available));
        }
        updated
    }
}

/// Plan a catch-up: every incomplete prerequisite of the targets is completed,
/// along with each confirmed sibling branch (terminal quest and ancestors), and
/// targets that are not already completed become available.
///
/// Unknown target and branch ids are skipped.
pub fn plan_catch_up<S: AsRef<str>, B: AsRef<str>>(
    target_ids: &[S],
    graph: &QuestGraph,
    confirmed_branches: &[B],
) -> CatchUpPlan {
    let targets: Vec<&Quest> = target_ids
        .iter()
        .filter_map(|id| graph.get_quest(id.as_ref()))
        .collect();
    let target_set: HashSet<&str> = targets.iter().map(|q| q.id.as_str()).collect();

    let mut seen = HashSet::new();
    let mut to_complete: Vec<&Quest> = Vec::new();
    for target in &targets {
        collect_incomplete_prerequisites(&target.id, graph, &mut seen, &mut to_complete);
    }
    for branch in confirmed_branches {
        let Some(terminal) = graph.get_quest(branch.as_ref()) else {
            continue;
        };
        collect_incomplete_prerequisites(&terminal.id, graph, &mut seen, &mut to_complete);
        if compute_status(terminal, graph) != Status::Completed
            && !to_complete.iter().any(|q| q.id == terminal.id)
        {
            to_complete.push(terminal);
        }
    }

    let complete: Vec<String> = to_complete
        .into_iter()
        .filter(|q| !target_set.contains(q.id.as_str()))
        .map(|q| q.id.clone())
        .collect();

    let mut make_available = Vec::new();
    for target in targets {
        let already_completed = target
            .progress
            .as_ref()
            .is_some_and(|p| p.status == Status::Completed);
        if !already_completed && !make_available.contains(&target.id) {
            make_available.push(target.id.clone());
        }
    }

    CatchUpPlan {
        complete,
        make_available,
    }
}
