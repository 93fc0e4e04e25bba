use crate::graph::{Quest, QuestGraph, Status};
use std::collections::HashMap;

/// Computed status per quest id for one snapshot of the graph
pub type StatusMap = HashMap<String, Status>;

/// Determine a quest's status: explicit progress wins, otherwise it is
/// available iff every prerequisite is completed.
///
/// Derived statuses are only ever `Available` or `Locked`, so a prerequisite
/// counts as completed exactly when it carries a `Completed` override. The
/// requirement tags on the edge (`active`) only affect edge styling.
pub fn compute_status(quest: &Quest, graph: &QuestGraph) -> Status {
    if let Some(progress) = &quest.progress {
        return progress.status;
    }

    let all_deps_completed = quest.depends_on.iter().all(|dep| {
        graph
            .get_quest(&dep.quest_id)
            .and_then(|q| q.progress.as_ref())
            .map(|p| p.status == Status::Completed)
            .unwrap_or(false) // Missing prerequisite is never satisfied
    });

    if all_deps_completed {
        Status::Available
    } else {
        Status::Locked
    }
}

/// Resolve every quest's status once for the current progress snapshot
pub fn resolve_statuses(graph: &QuestGraph) -> StatusMap {
    graph
        .quests()
        .map(|q| (q.id.clone(), compute_status(q, graph)))
        .collect()
}

/// Status lookup that falls back to `Locked` for ids the map doesn't know
pub fn status_of(statuses: &StatusMap, id: &str) -> Status {
    statuses.get(id).copied().unwrap_or(Status::Locked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Dependency, ProgressEntry, RequirementSet};

    fn make_quest(id: &str, deps: &[(&str, RequirementSet)]) -> Quest {
        Quest {
            id: id.to_string(),
            title: id.to_string(),
            trader_id: "prapor".to_string(),
            depends_on: deps
                .iter()
                .map(|(d, req)| Dependency {
                    quest_id: d.to_string(),
                    requirement_status: *req,
                })
                .collect(),
            ..Quest::default()
        }
    }

    fn chain_graph() -> QuestGraph {
        QuestGraph::from_quests(vec![
            make_quest("a", &[]),
            make_quest("b", &[("a", RequirementSet::COMPLETE)]),
            make_quest("c", &[("b", RequirementSet::COMPLETE)]),
        ])
    }

    fn status(graph: &QuestGraph, id: &str) -> Status {
        compute_status(graph.get_quest(id).unwrap(), graph)
    }

    #[test]
    fn test_no_dependencies_is_available() {
        let graph = chain_graph();
        assert_eq!(status(&graph, "a"), Status::Available);
        assert_eq!(status(&graph, "b"), Status::Locked);
        assert_eq!(status(&graph, "c"), Status::Locked);
    }

    #[test]
    fn test_completion_unlocks_direct_dependents_only() {
        let mut graph = chain_graph();
        graph.set_progress("a", Some(ProgressEntry::new(Status::Completed)));
        assert_eq!(status(&graph, "b"), Status::Available);
        assert_eq!(status(&graph, "c"), Status::Locked);

        graph.set_progress("b", Some(ProgressEntry::new(Status::Completed)));
        assert_eq!(status(&graph, "c"), Status::Available);
    }

    #[test]
    fn test_explicit_progress_wins() {
        let mut graph = chain_graph();
        graph.set_progress("c", Some(ProgressEntry::new(Status::InProgress)));
        assert_eq!(status(&graph, "c"), Status::InProgress);
    }

    #[test]
    fn test_active_requirement_still_needs_completion() {
        let mut graph = QuestGraph::from_quests(vec![
            make_quest("a", &[]),
            make_quest("b", &[("a", RequirementSet::ACTIVE)]),
        ]);
        graph.set_progress("a", Some(ProgressEntry::new(Status::InProgress)));
        assert_eq!(status(&graph, "b"), Status::Locked);
    }

    #[test]
    fn test_missing_prerequisite_locks() {
        let graph = QuestGraph::from_quests(vec![make_quest(
            "b",
            &[("nowhere", RequirementSet::COMPLETE)],
        )]);
        assert_eq!(status(&graph, "b"), Status::Locked);
    }

    #[test]
    fn test_cycle_without_progress_is_locked() {
        let graph = QuestGraph::from_quests(vec![
            make_quest("a", &[("b", RequirementSet::COMPLETE)]),
            make_quest("b", &[("a", RequirementSet::COMPLETE)]),
        ]);
        let statuses = resolve_statuses(&graph);
        assert_eq!(statuses["a"], Status::Locked);
        assert_eq!(statuses["b"], Status::Locked);
    }

    #[test]
    fn test_resolve_statuses_empty_graph() {
        assert!(resolve_statuses(&QuestGraph::new()).is_empty());
        assert_eq!(status_of(&StatusMap::new(), "x"), Status::Locked);
    }
}
