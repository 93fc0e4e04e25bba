use super::{LaneBounds, LaneLayout, QuestEdge, QuestNode, TraderNode};
use crate::config::LayoutConfig;
use crate::graph::Status;
use crate::partition::TraderGroups;
use crate::status::{StatusMap, status_of};
use std::collections::BTreeMap;

/// Lanes merged into one canvas
#[derive(Debug, Clone, Default)]
pub struct StackedLayout {
    pub quest_nodes: Vec<QuestNode>,
    pub trader_nodes: Vec<TraderNode>,
    pub edges: Vec<QuestEdge>,
    pub lane_bounds: BTreeMap<String, LaneBounds>,
}

/// Stack lanes top to bottom in `order`, each preceded by a header node.
///
/// Traders in `order` without a lane are skipped. The result is shifted so the
/// top-left-most node sits exactly at (`canvas_margin`, `canvas_margin`).
pub fn stack_lanes(
    lanes: &BTreeMap<String, LaneLayout>,
    order: &[String],
    groups: &TraderGroups<'_>,
    statuses: &StatusMap,
    config: &LayoutConfig,
) -> StackedLayout {
    let mut stacked = StackedLayout::default();
    let mut cursor_y = 0.0;
    let lane_x = config.header_width + config.header_gap;

    for trader_id in order {
        let Some(lane) = lanes.get(trader_id) else {
            continue;
        };
        let (trader_name, color, quest_count, completed_count) = match groups.get(trader_id) {
            Some(group) => (
                group.trader_name.clone(),
                group.color.clone(),
                group.quests.len(),
                group
                    .quests
                    .iter()
                    .filter(|q| status_of(statuses, &q.id) == Status::Completed)
                    .count(),
            ),
            None => (trader_id.clone(), String::new(), lane.nodes.len(), 0),
        };

        stacked.trader_nodes.push(TraderNode {
            trader_id: trader_id.clone(),
            trader_name,
            color,
            quest_count,
            completed_count,
            lane_height: lane.lane_height,
            x: 0.0,
            y: cursor_y,
            width: config.header_width,
            height: lane.lane_height,
        });

        stacked.quest_nodes.extend(lane.nodes.iter().map(|node| QuestNode {
            x: node.x + lane_x,
            y: node.y + cursor_y,
            ..node.clone()
        }));
        stacked.edges.extend(lane.edges.iter().cloned());

        cursor_y += lane.lane_height + config.lane_spacing;
    }

    normalize(&mut stacked, config.canvas_margin);

    stacked.lane_bounds = stacked
        .trader_nodes
        .iter()
        .map(|t| {
            (
                t.trader_id.clone(),
                LaneBounds {
                    y: t.y,
                    height: t.lane_height,
                },
            )
        })
        .collect();

    stacked
}

fn normalize(stacked: &mut StackedLayout, margin: f64) {
    let xs = stacked
        .quest_nodes
        .iter()
        .map(|n| n.x)
        .chain(stacked.trader_nodes.iter().map(|t| t.x));
    let min_x = xs.fold(f64::INFINITY, f64::min);
    let ys = stacked
        .quest_nodes
        .iter()
        .map(|n| n.y)
        .chain(stacked.trader_nodes.iter().map(|t| t.y));
    let min_y = ys.fold(f64::INFINITY, f64::min);
    if !min_x.is_finite() || !min_y.is_finite() {
        return;
    }

    let (dx, dy) = (margin - min_x, margin - min_y);
    for node in &mut stacked.quest_nodes {
        node.x += dx;
        node.y += dy;
    }
    for header in &mut stacked.trader_nodes {
        header.x += dx;
        header.y += dy;
    }
}
