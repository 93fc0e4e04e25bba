use crate::graph::{Quest, QuestGraph, Status};
use crate::status::{StatusMap, status_of};
use serde::Serialize;
use std::collections::BTreeSet;

/// Which quests to show. The default shows everything.
#[derive(Debug, Clone, Default)]
pub struct QuestFilters {
    /// Trader id, compared case-insensitively
    pub trader_id: Option<String>,
    /// Empty means all statuses
    pub statuses: Vec<Status>,
    /// Case-insensitive title substring
    pub search: Option<String>,
    pub kappa_only: bool,
    /// Map tag of any objective, compared case-insensitively
    pub map: Option<String>,
}

impl QuestFilters {
    pub fn is_empty(&self) -> bool {
        self.trader_id.is_none()
            && self.statuses.is_empty()
            && self.search.as_deref().is_none_or(str::is_empty)
            && !self.kappa_only
            && self.map.is_none()
    }

    pub fn matches(&self, quest: &Quest, statuses: &StatusMap) -> bool {
        if let Some(trader) = &self.trader_id
            && !quest.trader_id.eq_ignore_ascii_case(trader)
        {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&status_of(statuses, &quest.id)) {
            return false;
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty())
            && !quest.title.to_lowercase().contains(&search.to_lowercase())
        {
            return false;
        }
        if self.kappa_only && !quest.kappa_required {
            return false;
        }
        if let Some(map) = &self.map {
            let on_map = quest
                .objectives
                .iter()
                .filter_map(|o| o.map.as_deref())
                .any(|m| m.eq_ignore_ascii_case(map));
            if !on_map {
                return false;
            }
        }
        true
    }
}

/// Quests passing `filters`, in catalog order.
///
/// `statuses` must be resolved over the whole graph first, so filtering never
/// changes the status of a quest that stays visible.
pub fn apply_filters<'a>(graph: &'a QuestGraph, statuses: &StatusMap, filters: &QuestFilters) -> Vec<&'a Quest> {
    graph
        .quests()
        .filter(|q| filters.matches(q, statuses))
        .collect()
}

/// Quest counts per status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub locked: usize,
    pub available: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.locked + self.available + self.in_progress + self.completed
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Locked => self.locked,
            Status::Available => self.available,
            Status::InProgress => self.in_progress,
            Status::Completed => self.completed,
        }
    }
}

pub fn count_by_status<'a>(quests: impl IntoIterator<Item = &'a Quest>, statuses: &StatusMap) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for quest in quests {
        match status_of(statuses, &quest.id) {
            Status::Locked => counts.locked += 1,
            Status::Available => counts.available += 1,
            Status::InProgress => counts.in_progress += 1,
            Status::Completed => counts.completed += 1,
        }
    }
    counts
}

/// Sorted, de-duplicated map tags across all objectives
pub fn quest_maps(graph: &QuestGraph) -> Vec<String> {
    let maps: BTreeSet<&str> = graph
        .quests()
        .flat_map(|q| q.objectives.iter())
        .filter_map(|o| o.map.as_deref())
        .collect();
    maps.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Dependency, Objective, ProgressEntry, RequirementSet};
    use crate::status::resolve_statuses;

    fn make_quest(id: &str, title: &str, trader: &str, deps: &[&str]) -> Quest {
        Quest {
            id: id.to_string(),
            title: title.to_string(),
            trader_id: trader.to_string(),
            depends_on: deps
                .iter()
                .map(|d| Dependency {
                    quest_id: d.to_string(),
                    requirement_status: RequirementSet::COMPLETE,
                })
                .collect(),
            ..Quest::default()
        }
    }

    fn sample() -> QuestGraph {
        let mut debut = make_quest("debut", "Debut", "Prapor", &[]);
        debut.objectives = vec![Objective {
            description: "Eliminate Scavs".to_string(),
            map: Some("Customs".to_string()),
            ..Objective::default()
        }];
        let mut checking = make_quest("checking", "Checking", "prapor", &["debut"]);
        checking.kappa_required = true;
        checking.objectives = vec![
            Objective {
                description: "Find the watch".to_string(),
                map: Some("Customs".to_string()),
                ..Objective::default()
            },
            Objective {
                description: "Hand it over".to_string(),
                map: None,
                ..Objective::default()
            },
        ];
        let mut shortage = make_quest("shortage", "Shortage", "therapist", &[]);
        shortage.objectives = vec![Objective {
            description: "Find Salewa".to_string(),
            map: Some("Interchange".to_string()),
            ..Objective::default()
        }];
        let mut graph = QuestGraph::from_quests(vec![debut, checking, shortage]);
        graph.set_progress("shortage", Some(ProgressEntry::new(Status::Completed)));
        graph
    }

    fn ids(quests: &[&Quest]) -> Vec<String> {
        quests.iter().map(|q| q.id.clone()).collect()
    }

    #[test]
    fn test_default_filters_show_everything() {
        let graph = sample();
        let statuses = resolve_statuses(&graph);
        let filters = QuestFilters::default();
        assert!(filters.is_empty());
        assert_eq!(apply_filters(&graph, &statuses, &filters).len(), 3);
    }

    #[test]
    fn test_filter_by_trader_case_insensitive() {
        let graph = sample();
        let statuses = resolve_statuses(&graph);
        let filters = QuestFilters {
            trader_id: Some("PRAPOR".to_string()),
            ..QuestFilters::default()
        };
        assert_eq!(ids(&apply_filters(&graph, &statuses, &filters)), vec!["debut", "checking"]);
    }

    #[test]
    fn test_filter_by_statuses() {
        let graph = sample();
        let statuses = resolve_statuses(&graph);
        let filters = QuestFilters {
            statuses: vec![Status::Available, Status::Completed],
            ..QuestFilters::default()
        };
        assert_eq!(ids(&apply_filters(&graph, &statuses, &filters)), vec!["debut", "shortage"]);
    }

    #[test]
    fn test_filter_search_kappa_and_map() {
        let graph = sample();
        let statuses = resolve_statuses(&graph);

        let search = QuestFilters {
            search: Some("CHECK".to_string()),
            ..QuestFilters::default()
        };
        assert_eq!(ids(&apply_filters(&graph, &statuses, &search)), vec!["checking"]);

        let kappa = QuestFilters {
            kappa_only: true,
            ..QuestFilters::default()
        };
        assert_eq!(ids(&apply_filters(&graph, &statuses, &kappa)), vec!["checking"]);

        let map = QuestFilters {
            map: Some("customs".to_string()),
            ..QuestFilters::default()
        };
        assert_eq!(ids(&apply_filters(&graph, &statuses, &map)), vec!["debut", "checking"]);
    }

    #[test]
    fn test_hiding_prerequisite_keeps_status() {
        let graph = sample();
        let statuses = resolve_statuses(&graph);
        let filters = QuestFilters {
            search: Some("checking".to_string()),
            ..QuestFilters::default()
        };
        let visible = apply_filters(&graph, &statuses, &filters);
        assert_eq!(visible.len(), 1);
        assert_eq!(status_of(&statuses, "checking"), Status::Locked);
    }

    #[test]
    fn test_count_by_status() {
        let graph = sample();
        let statuses = resolve_statuses(&graph);
        let counts = count_by_status(graph.quests(), &statuses);
        assert_eq!(counts.available, 1);
        assert_eq!(counts.locked, 1);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.get(Status::InProgress), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_quest_maps_sorted_unique() {
        let graph = sample();
        assert_eq!(quest_maps(&graph), vec!["Customs", "Interchange"]);
    }
}
