use crate::graph::{Quest, RequirementSet};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Curated lane order; traders not listed go last
pub const DEFAULT_TRADER_ORDER: &[&str] = &[
    "prapor",
    "therapist",
    "skier",
    "peacekeeper",
    "mechanic",
    "ragman",
    "jaeger",
    "fence",
    "lightkeeper",
    "ref",
];

const FALLBACK_TRADER_COLOR: &str = "#c4aa6a";

/// Display color for a trader id (case-insensitive)
pub fn trader_color(trader_id: &str) -> &'static str {
    match trader_id.to_lowercase().as_str() {
        "prapor" => "#c41e3a",
        "therapist" => "#ff69b4",
        "skier" => "#1e90ff",
        "peacekeeper" => "#228b22",
        "mechanic" => "#ff8c00",
        "ragman" => "#9370db",
        "jaeger" => "#8b4513",
        "fence" => "#708090",
        "lightkeeper" => "#ffd700",
        "ref" => "#20b2aa",
        _ => FALLBACK_TRADER_COLOR,
    }
}

/// Dependency edge between two quests of the same trader
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntraTraderEdge {
    pub source: String,
    pub target: String,
    pub requirement_status: RequirementSet,
}

/// Dependency edge whose endpoints belong to different traders
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CrossTraderEdge {
    pub source_quest_id: String,
    pub source_trader_id: String,
    pub target_quest_id: String,
    pub target_trader_id: String,
    pub requirement_status: RequirementSet,
}

/// One trader's slice of the quest graph
#[derive(Debug, Clone)]
pub struct TraderGroup<'a> {
    /// Lower-cased trader id
    pub trader_id: String,
    pub trader_name: String,
    pub color: String,
    /// Quests in input order
    pub quests: Vec<&'a Quest>,
    /// Quests with no prerequisite from the same trader
    pub root_quests: Vec<&'a Quest>,
    pub intra_edges: Vec<IntraTraderEdge>,
    /// Recorded in both the source's and the target's group
    pub cross_edges: Vec<CrossTraderEdge>,
}

impl<'a> TraderGroup<'a> {
    fn new(quest: &'a Quest, trader_id: String) -> Self {
        let color = quest
            .trader
            .as_ref()
            .and_then(|t| t.color.clone())
            .unwrap_or_else(|| trader_color(&trader_id).to_string());
        Self {
            trader_name: quest.trader_name().to_string(),
            color,
            trader_id,
            quests: Vec::new(),
            root_quests: Vec::new(),
            intra_edges: Vec::new(),
            cross_edges: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

pub type TraderGroups<'a> = BTreeMap<String, TraderGroup<'a>>;

/// Partition quests into per-trader groups and classify every dependency edge
/// between them. Prerequisites outside `quests` are not edges.
pub fn split_by_trader<'a>(quests: &[&'a Quest]) -> TraderGroups<'a> {
    let mut groups: TraderGroups<'a> = BTreeMap::new();
    let trader_of: HashMap<&str, String> = quests
        .iter()
        .map(|q| (q.id.as_str(), q.trader_key()))
        .collect();

    for &quest in quests {
        let key = quest.trader_key();
        groups
            .entry(key.clone())
            .or_insert_with(|| TraderGroup::new(quest, key))
            .quests
            .push(quest);
    }

    let mut has_intra_prereq: HashSet<&str> = HashSet::new();
    for &quest in quests {
        let quest_trader = &trader_of[quest.id.as_str()];
        for dep in &quest.depends_on {
            let Some(prereq_trader) = trader_of.get(dep.quest_id.as_str()) else {
                continue;
            };

            if prereq_trader == quest_trader {
                has_intra_prereq.insert(quest.id.as_str());
                if let Some(group) = groups.get_mut(quest_trader) {
                    group.intra_edges.push(IntraTraderEdge {
                        source: dep.quest_id.clone(),
                        target: quest.id.clone(),
                        requirement_status: dep.requirement_status,
                    });
                }
            } else {
                let edge = CrossTraderEdge {
                    source_quest_id: dep.quest_id.clone(),
                    source_trader_id: prereq_trader.clone(),
                    target_quest_id: quest.id.clone(),
                    target_trader_id: quest_trader.clone(),
                    requirement_status: dep.requirement_status,
                };
                if let Some(group) = groups.get_mut(prereq_trader) {
                    group.cross_edges.push(edge.clone());
                }
                if let Some(group) = groups.get_mut(quest_trader) {
                    group.cross_edges.push(edge);
                }
            }
        }
    }

    for group in groups.values_mut() {
        group.root_quests = group
            .quests
            .iter()
            .copied()
            .filter(|q| !has_intra_prereq.contains(q.id.as_str()))
            .collect();
    }

    groups
}

/// Order trader ids by the preferred list, then alphabetically for the rest
pub fn compute_trader_order<S: AsRef<str>>(groups: &TraderGroups<'_>, preferred: &[S]) -> Vec<String> {
    let rank = |id: &str| {
        preferred
            .iter()
            .position(|p| p.as_ref().eq_ignore_ascii_case(id))
            .unwrap_or(usize::MAX)
    };
    let mut order: Vec<String> = groups.keys().cloned().collect();
    // `groups` iterates alphabetically and the sort is stable
    order.sort_by_key(|id| rank(id));
    order
}
