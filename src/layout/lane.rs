use super::layered::{self, LayeredGraph, Spacing};
use super::{FocusState, LaneLayout, QuestNode, style_edge};
use crate::config::LayoutConfig;
use crate::depth::DepthMap;
use crate::graph::Quest;
use crate::partition::TraderGroup;
use crate::status::{StatusMap, status_of};
use std::collections::{HashMap, HashSet};

/// Spacers are invisible; they only need a column slot
const SPACER_HEIGHT: f64 = 1.0;

/// Shared inputs for laying out every lane of one pass
pub struct LaneContext<'a> {
    pub statuses: &'a StatusMap,
    pub focus: &'a FocusState,
    pub config: &'a LayoutConfig,
}

fn spacer_id(trader_id: &str, level: usize) -> String {
    format!("__spacer__{}__{}", trader_id, level)
}

/// Lay out one trader's lane in lane-local coordinates (top-left anchored,
/// minimum y = 0). Returns `None` for an empty group.
///
/// Columns follow intra-trader dependencies. A quest whose global depth is
/// deeper than its position inside the lane (because of a cross-trader
/// prerequisite) is pushed right by a chain of invisible spacer nodes, one per
/// depth level, so that it lines up with its true depth.
pub fn layout_trader_lane(
    group: &TraderGroup<'_>,
    global_depths: &DepthMap,
    ctx: &LaneContext<'_>,
) -> Option<LaneLayout> {
    if group.is_empty() {
        return None;
    }
    let config = ctx.config;

    let by_id: HashMap<&str, &Quest> = group.quests.iter().map(|q| (q.id.as_str(), *q)).collect();
    let mut graph = LayeredGraph::default();
    for quest in &group.quests {
        graph.add_node(
            quest.id.as_str(),
            config.node_width,
            config.node_height_for(&quest.title),
        );
    }
    for edge in &group.intra_edges {
        graph.add_edge(edge.source.as_str(), edge.target.as_str());
    }

    let spacers = inject_spacers(group, global_depths, &mut graph, config.node_width);

    let placements = layered::layout(
        &graph,
        Spacing {
            node_sep: config.node_sep,
            rank_sep: config.rank_sep,
        },
    );

    let has_intra_dependent: HashSet<&str> =
        group.intra_edges.iter().map(|e| e.source.as_str()).collect();
    let roots: HashSet<&str> = group.root_quests.iter().map(|q| q.id.as_str()).collect();

    let mut nodes: Vec<QuestNode> = group
        .quests
        .iter()
        .filter_map(|quest| {
            let placed = placements.get(&quest.id)?;
            Some(QuestNode {
                quest_id: quest.id.clone(),
                title: quest.title.clone(),
                trader_id: group.trader_id.clone(),
                status: status_of(ctx.statuses, &quest.id),
                level_required: quest.level_required,
                kappa_required: quest.kappa_required,
                column: placed.rank,
                // Center-anchored -> top-left
                x: placed.center_x - placed.width / 2.0,
                y: placed.center_y - placed.height / 2.0,
                width: placed.width,
                height: placed.height,
                is_root: roots.contains(quest.id.as_str()),
                is_leaf: !has_intra_dependent.contains(quest.id.as_str()),
                is_focused: ctx.focus.is_focused(&quest.id),
                is_in_focus_chain: ctx.focus.in_chain(&quest.id),
                has_focus_mode: ctx.focus.is_active(),
            })
        })
        .collect();

    let min_y = nodes.iter().map(|n| n.y).fold(f64::INFINITY, f64::min);
    if min_y.is_finite() {
        for node in &mut nodes {
            node.y -= min_y;
        }
    }
    let content_height = nodes.iter().map(|n| n.y + n.height).fold(0.0, f64::max);
    let lane_width = nodes.iter().map(|n| n.x + n.width).fold(0.0, f64::max);
    let lane_height = config.min_lane_height.max(content_height + config.lane_margin);

    let edges = group
        .intra_edges
        .iter()
        .filter_map(|edge| {
            let source = by_id.get(edge.source.as_str())?;
            let target = by_id.get(edge.target.as_str())?;
            Some(style_edge(
                source,
                target,
                edge.requirement_status,
                ctx.statuses,
                ctx.focus,
                false,
            ))
        })
        .collect();

    tracing::debug!(
        trader = %group.trader_id,
        quests = nodes.len(),
        spacers,
        lane_height,
        "laid out trader lane"
    );

    Some(LaneLayout {
        trader_id: group.trader_id.clone(),
        nodes,
        edges,
        lane_height,
        lane_width,
    })
}

/// Depth of each quest counting intra-trader edges only
fn local_depths<'a>(group: &'a TraderGroup<'_>) -> HashMap<&'a str, usize> {
    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &group.intra_edges {
        parents
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }

    fn visit<'a>(
        id: &'a str,
        parents: &HashMap<&'a str, Vec<&'a str>>,
        memo: &mut HashMap<&'a str, usize>,
        visiting: &mut HashSet<&'a str>,
    ) -> usize {
        if let Some(&d) = memo.get(id) {
            return d;
        }
        if !visiting.insert(id) {
            return 0;
        }
        let depth = parents
            .get(id)
            .map(|ps| {
                ps.iter()
                    .map(|p| visit(*p, parents, memo, visiting) + 1)
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        visiting.remove(id);
        memo.insert(id, depth);
        depth
    }

    let mut memo = HashMap::new();
    let mut visiting = HashSet::new();
    for quest in &group.quests {
        visit(quest.id.as_str(), &parents, &mut memo, &mut visiting);
    }
    memo
}

/// Add spacer chains for quests that sit deeper globally than locally.
/// Returns the number of spacer nodes added.
fn inject_spacers(
    group: &TraderGroup<'_>,
    global_depths: &DepthMap,
    graph: &mut LayeredGraph,
    spacer_width: f64,
) -> usize {
    let global = |id: &str| global_depths.get(id).copied().unwrap_or(0);
    let lane_min = group.quests.iter().map(|q| global(&q.id)).min().unwrap_or(0);
    let local = local_depths(group);

    // (quest id, depth relative to the lane's shallowest quest)
    let pulled: Vec<(&str, usize)> = group
        .quests
        .iter()
        .map(|q| (q.id.as_str(), global(&q.id) - lane_min))
        .filter(|(id, required)| *required > local.get(id).copied().unwrap_or(0))
        .collect();
    let Some(max_required) = pulled.iter().map(|(_, d)| *d).max() else {
        return 0;
    };

    let pulled_ids: HashSet<&str> = pulled.iter().map(|(id, _)| *id).collect();
    let anchors: Vec<&str> = group
        .root_quests
        .iter()
        .map(|q| q.id.as_str())
        .filter(|id| !pulled_ids.contains(id))
        .collect();

    // Level 0 is the anchor roots, or a synthetic spacer when every root is pulled
    let mut added = 0;
    let level0: Vec<String> = if anchors.is_empty() {
        let id = spacer_id(&group.trader_id, 0);
        graph.add_node(id.as_str(), spacer_width, SPACER_HEIGHT);
        added += 1;
        vec![id]
    } else {
        anchors.iter().map(|s| s.to_string()).collect()
    };

    for level in 1..max_required {
        let id = spacer_id(&group.trader_id, level);
        graph.add_node(id.as_str(), spacer_width, SPACER_HEIGHT);
        added += 1;
        if level == 1 {
            for anchor in &level0 {
                graph.add_edge(anchor.as_str(), id.as_str());
            }
        } else {
            graph.add_edge(spacer_id(&group.trader_id, level - 1), id);
        }
    }

    for (quest_id, required) in pulled {
        if required == 1 {
            for anchor in &level0 {
                graph.add_edge(anchor.as_str(), quest_id);
            }
        } else {
            graph.add_edge(spacer_id(&group.trader_id, required - 1), quest_id);
        }
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::compute_global_depths;
    use crate::graph::{Dependency, QuestGraph, RequirementSet, Status};
    use crate::partition::split_by_trader;
    use crate::status::resolve_statuses;

    fn make_quest(id: &str, trader: &str, deps: &[&str]) -> Quest {
        Quest {
            id: id.to_string(),
            title: id.to_string(),
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

    fn lanes(graph: &QuestGraph) -> HashMap<String, LaneLayout> {
        let quests: Vec<&Quest> = graph.quests().collect();
        let depths = compute_global_depths(quests.iter().copied());
        let groups = split_by_trader(&quests);
        let statuses = resolve_statuses(graph);
        let focus = FocusState::none();
        let config = LayoutConfig::default();
        let ctx = LaneContext {
            statuses: &statuses,
            focus: &focus,
            config: &config,
        };
        groups
            .values()
            .filter_map(|g| layout_trader_lane(g, &depths, &ctx))
            .map(|l| (l.trader_id.clone(), l))
            .collect()
    }

    fn node<'a>(lane: &'a LaneLayout, id: &str) -> &'a QuestNode {
        lane.nodes.iter().find(|n| n.quest_id == id).unwrap()
    }

    #[test]
    fn test_intra_trader_order_left_to_right() {
        let graph = QuestGraph::from_quests(vec![
            make_quest("a", "prapor", &[]),
            make_quest("b", "prapor", &["a"]),
            make_quest("c", "prapor", &["b"]),
        ]);
        let lanes = lanes(&graph);
        let lane = &lanes["prapor"];
        assert!(node(lane, "a").x < node(lane, "b").x);
        assert!(node(lane, "b").x < node(lane, "c").x);
        assert_eq!(node(lane, "c").column, 2);
        assert!(node(lane, "a").is_root);
        assert!(!node(lane, "a").is_leaf);
        assert!(node(lane, "c").is_leaf);
        assert_eq!(lane.edges.len(), 2);
        assert_eq!(node(lane, "a").status, Status::Available);
    }

    #[test]
    fn test_cross_trader_prerequisite_pulls_quest_deeper() {
        let graph = QuestGraph::from_quests(vec![
            make_quest("y0", "ragman", &[]),
            make_quest("y1", "ragman", &["y0"]),
            make_quest("y2", "ragman", &["y1"]),
            make_quest("y3", "ragman", &["y2"]),
            make_quest("x1", "mechanic", &[]),
            make_quest("x2", "mechanic", &["x1", "y3"]),
        ]);
        let lanes = lanes(&graph);
        let lane = &lanes["mechanic"];
        // Local depth alone would put x2 in column 1
        assert!(node(lane, "x2").column >= 3);
        assert_eq!(node(lane, "x2").column, 4);
        assert_eq!(node(lane, "x1").column, 0);
        // Spacers are never emitted
        assert_eq!(lane.nodes.len(), 2);
        assert_eq!(lane.edges.len(), 1);
    }

    #[test]
    fn test_pulled_root_is_not_an_anchor() {
        let graph = QuestGraph::from_quests(vec![
            make_quest("y0", "ragman", &[]),
            make_quest("y1", "ragman", &["y0"]),
            make_quest("x0", "mechanic", &[]),
            make_quest("x1", "mechanic", &["y1"]),
        ]);
        let lanes = lanes(&graph);
        let lane = &lanes["mechanic"];
        assert_eq!(node(lane, "x0").column, 0);
        assert_eq!(node(lane, "x1").column, 2);
        assert!(node(lane, "x1").is_root);
        let min_y = lane.nodes.iter().map(|n| n.y).fold(f64::INFINITY, f64::min);
        assert_eq!(min_y, 0.0);
    }

    #[test]
    fn test_lane_height_has_minimum_and_grows() {
        let graph = QuestGraph::from_quests(vec![make_quest("a", "prapor", &[])]);
        let lanes_small = lanes(&graph);
        let config = LayoutConfig::default();
        assert_eq!(lanes_small["prapor"].lane_height, config.min_lane_height);

        let many: Vec<Quest> = (0..6).map(|i| make_quest(&format!("q{}", i), "prapor", &[])).collect();
        let graph = QuestGraph::from_quests(many);
        let laid_out = lanes(&graph);
        let lane = &laid_out["prapor"];
        let expected = 6.0 * config.node_height + 5.0 * config.node_sep + config.lane_margin;
        assert_eq!(lane.lane_height, expected);
        let min_y = lane.nodes.iter().map(|n| n.y).fold(f64::INFINITY, f64::min);
        assert_eq!(min_y, 0.0);
    }

    #[test]
    fn test_long_titles_capped_at_two_lines() {
        let mut quest = make_quest("a", "prapor", &[]);
        quest.title = "An extremely long quest title that keeps on going for many lines".to_string();
        let graph = QuestGraph::from_quests(vec![quest]);
        let laid_out = lanes(&graph);
        let lane = &laid_out["prapor"];
        let config = LayoutConfig::default();
        assert_eq!(node(lane, "a").height, config.node_height + config.line_height);
    }

    #[test]
    fn test_empty_group_is_skipped() {
        let group = TraderGroup {
            trader_id: "prapor".to_string(),
            trader_name: "Prapor".to_string(),
            color: "#c41e3a".to_string(),
            quests: vec![],
            root_quests: vec![],
            intra_edges: vec![],
            cross_edges: vec![],
        };
        let statuses = StatusMap::new();
        let focus = FocusState::none();
        let config = LayoutConfig::default();
        let ctx = LaneContext {
            statuses: &statuses,
            focus: &focus,
            config: &config,
        };
        assert!(layout_trader_lane(&group, &DepthMap::new(), &ctx).is_none());
    }
}
