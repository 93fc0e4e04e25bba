//! Trader-lane layout of the quest graph.
//!
//! Each trader gets a horizontal lane laid out left to right by dependency
//! depth (`lane`), and lanes are stacked vertically into one canvas
//! (`stack`). Cross-trader prerequisites are honoured by invisible spacer
//! nodes so a quest's column reflects its global depth, not just its depth
//! inside its own lane.

pub mod lane;
pub mod layered;
pub mod stack;

pub use lane::{LaneContext, layout_trader_lane};
pub use stack::{StackedLayout, stack_lanes};

use crate::chain::get_full_chain;
use crate::config::Config;
use crate::depth::compute_global_depths;
use crate::graph::{Quest, QuestGraph, RequirementSet, Status};
use crate::partition::{compute_trader_order, split_by_trader};
use crate::status::{StatusMap, status_of};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

const EDGE_WIDTH: f64 = 2.0;
const EDGE_WIDTH_EMPHASIZED: f64 = 3.0;

/// Stroke color for an edge, keyed by the dependent quest's status
pub fn edge_color(target_status: Status) -> &'static str {
    match target_status {
        Status::Completed => "#10B981",
        Status::Available => "#3B82F6",
        Status::Locked => "#9CA3AF",
        Status::InProgress => "#6B7280",
    }
}

/// A positioned quest node (top-left anchored)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestNode {
    pub quest_id: String,
    pub title: String,
    pub trader_id: String,
    pub status: Status,
    pub level_required: u32,
    pub kappa_required: bool,
    /// Dependency column inside the lane
    pub column: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// No prerequisite from the same trader
    pub is_root: bool,
    /// No dependent from the same trader
    pub is_leaf: bool,
    pub is_focused: bool,
    pub is_in_focus_chain: bool,
    pub has_focus_mode: bool,
}

/// Lane header node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraderNode {
    pub trader_id: String,
    pub trader_name: String,
    pub color: String,
    pub quest_count: usize,
    pub completed_count: usize,
    pub lane_height: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A styled dependency edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_status: Status,
    pub target_status: Status,
    pub requirement_status: RequirementSet,
    pub animated: bool,
    pub stroke: &'static str,
    pub stroke_width: f64,
    /// Satisfied by starting the prerequisite rather than completing it
    pub dashed: bool,
    pub cross_trader: bool,
}

/// Vertical extent of one trader's lane in the stacked canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaneBounds {
    pub y: f64,
    pub height: f64,
}

/// One trader's lane before stacking, in lane-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneLayout {
    pub trader_id: String,
    pub nodes: Vec<QuestNode>,
    pub edges: Vec<QuestEdge>,
    pub lane_height: f64,
    pub lane_width: f64,
}

/// Full result of one layout pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuestLayout {
    pub quest_nodes: Vec<QuestNode>,
    pub trader_nodes: Vec<TraderNode>,
    pub edges: Vec<QuestEdge>,
    pub lane_bounds: BTreeMap<String, LaneBounds>,
}

/// Focus mode: one quest and its full chain are highlighted, the rest dimmed
#[derive(Debug, Clone, Default)]
pub struct FocusState {
    pub focused: Option<String>,
    pub chain: HashSet<String>,
}

impl FocusState {
    pub fn none() -> Self {
        Self::default()
    }

    /// Focus on `quest_id`; an unknown id yields no focus
    pub fn on(quest_id: &str, graph: &QuestGraph) -> Self {
        let chain = get_full_chain(quest_id, graph);
        if chain.is_empty() {
            return Self::none();
        }
        Self {
            focused: Some(quest_id.to_string()),
            chain,
        }
    }

    pub fn is_active(&self) -> bool {
        self.focused.is_some()
    }

    pub fn is_focused(&self, quest_id: &str) -> bool {
        self.focused.as_deref() == Some(quest_id)
    }

    pub fn in_chain(&self, quest_id: &str) -> bool {
        self.chain.contains(quest_id)
    }

    fn edge_in_chain(&self, source: &str, target: &str) -> bool {
        self.is_active() && self.in_chain(source) && self.in_chain(target)
    }

    fn edge_dimmed(&self, source: &str, target: &str) -> bool {
        self.is_active() && !(self.in_chain(source) && self.in_chain(target))
    }
}

/// Style one dependency edge from the statuses of its endpoints.
pub fn style_edge(
    source: &Quest,
    target: &Quest,
    requirement_status: RequirementSet,
    statuses: &StatusMap,
    focus: &FocusState,
    cross_trader: bool,
) -> QuestEdge {
    let source_status = status_of(statuses, &source.id);
    let target_status = status_of(statuses, &target.id);
    let kappa_relevant = source.kappa_required && target.kappa_required;
    let emphasized = kappa_relevant || focus.edge_in_chain(&source.id, &target.id);

    QuestEdge {
        id: format!("{}-{}", source.id, target.id),
        source: source.id.clone(),
        target: target.id.clone(),
        source_status,
        target_status,
        requirement_status,
        animated: target_status == Status::Available && !focus.edge_dimmed(&source.id, &target.id),
        stroke: edge_color(target_status),
        stroke_width: if emphasized { EDGE_WIDTH_EMPHASIZED } else { EDGE_WIDTH },
        dashed: requirement_status.is_active_only(),
        cross_trader,
    }
}

/// Lay out `visible` quests in trader lanes.
///
/// `statuses` must come from the full graph so that hiding a quest never
/// changes the status of the quests still shown.
pub fn build_layout(
    visible: &[&Quest],
    statuses: &StatusMap,
    config: &Config,
    focus: &FocusState,
) -> QuestLayout {
    if visible.is_empty() {
        return QuestLayout::default();
    }

    let depths = compute_global_depths(visible.iter().copied());
    let groups = split_by_trader(visible);
    let order = compute_trader_order(&groups, &config.traders.order);

    let ctx = LaneContext {
        statuses,
        focus,
        config: &config.layout,
    };
    let lanes: BTreeMap<String, LaneLayout> = groups
        .values()
        .filter_map(|group| layout_trader_lane(group, &depths, &ctx))
        .map(|lane| (lane.trader_id.clone(), lane))
        .collect();

    let mut stacked = stack_lanes(&lanes, &order, &groups, statuses, &config.layout);

    // Cross-trader edges are recorded in both groups; emit each once
    let by_id: HashMap<&str, &Quest> = visible.iter().map(|q| (q.id.as_str(), *q)).collect();
    let mut seen = HashSet::new();
    for edge in groups.values().flat_map(|g| &g.cross_edges) {
        if !seen.insert((edge.source_quest_id.as_str(), edge.target_quest_id.as_str())) {
            continue;
        }
        if let (Some(source), Some(target)) = (
            by_id.get(edge.source_quest_id.as_str()),
            by_id.get(edge.target_quest_id.as_str()),
        ) {
            stacked.edges.push(style_edge(
                source,
                target,
                edge.requirement_status,
                statuses,
                focus,
                true,
            ));
        }
    }

    tracing::debug!(
        quests = stacked.quest_nodes.len(),
        lanes = stacked.trader_nodes.len(),
        edges = stacked.edges.len(),
        "layout pass complete"
    );

    QuestLayout {
        quest_nodes: stacked.quest_nodes,
        trader_nodes: stacked.trader_nodes,
        edges: stacked.edges,
        lane_bounds: stacked.lane_bounds,
    }
}
