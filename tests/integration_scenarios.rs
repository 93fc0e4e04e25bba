//! End-to-end scenarios through the library: status propagation, depths,
//! trader-lane layout and catch-up planning over one graph.

use questgraph::catch_up::{calculate_catch_up, plan_catch_up};
use questgraph::chain::get_incomplete_prerequisites;
use questgraph::config::Config;
use questgraph::depth::compute_global_depths;
use questgraph::graph::{ProgressEntry, Quest, QuestGraph, Status};
use questgraph::layout::{FocusState, build_layout};
use questgraph::query::{QuestFilters, apply_filters};
use questgraph::status::{compute_status, resolve_statuses};
use questgraph::test_helpers::{make_quest_with_deps, progress_with};

fn status(graph: &QuestGraph, id: &str) -> Status {
    compute_status(graph.get_quest(id).unwrap(), graph)
}

// ===========================================================================
// 1. Status propagation along a chain
// ===========================================================================

#[test]
fn test_chain_unlocks_step_by_step() {
    let mut graph = QuestGraph::from_quests(vec![
        make_quest_with_deps("A", "prapor", &[]),
        make_quest_with_deps("B", "prapor", &["A"]),
        make_quest_with_deps("C", "prapor", &["B"]),
    ]);

    assert_eq!(status(&graph, "A"), Status::Available);
    assert_eq!(status(&graph, "B"), Status::Locked);
    assert_eq!(status(&graph, "C"), Status::Locked);

    let depths = compute_global_depths(graph.quests());
    assert_eq!(depths["A"], 0);
    assert_eq!(depths["B"], 1);
    assert_eq!(depths["C"], 2);

    let prereqs: Vec<&str> = get_incomplete_prerequisites("C", &graph)
        .iter()
        .map(|q| q.id.as_str())
        .collect();
    assert_eq!(prereqs, vec!["A", "B"]);

    graph.set_progress("A", Some(ProgressEntry::new(Status::Completed)));
    assert_eq!(status(&graph, "B"), Status::Available);
    assert_eq!(status(&graph, "C"), Status::Locked);

    graph.set_progress("B", Some(ProgressEntry::new(Status::Completed)));
    assert_eq!(status(&graph, "C"), Status::Available);
}

#[test]
fn test_clearing_completion_relocks_only_direct_dependents() {
    let mut graph = QuestGraph::from_quests(vec![
        make_quest_with_deps("A", "prapor", &[]),
        make_quest_with_deps("B", "prapor", &["A"]),
        make_quest_with_deps("C", "prapor", &["B"]),
        make_quest_with_deps("X", "skier", &[]),
        make_quest_with_deps("Y", "skier", &["X"]),
    ])
    .with_progress(&progress_with(&["A", "X"], Status::Completed));

    let before = resolve_statuses(&graph);
    assert_eq!(before["B"], Status::Available);
    assert_eq!(before["Y"], Status::Available);

    graph.set_progress("A", None);
    let after = resolve_statuses(&graph);
    assert_eq!(after["A"], Status::Available);
    assert_eq!(after["B"], Status::Locked);
    assert_eq!(after["C"], Status::Locked);
    for id in ["X", "Y"] {
        assert_eq!(after[id], before[id], "{} changed", id);
    }
}

#[test]
fn test_status_resolution_is_idempotent() {
    let graph = QuestGraph::from_quests(vec![
        make_quest_with_deps("a", "prapor", &[]),
        make_quest_with_deps("b", "prapor", &["a"]),
        make_quest_with_deps("c", "skier", &["b", "ghost"]),
    ])
    .with_progress(&progress_with(&["a"], Status::Completed));

    let first = resolve_statuses(&graph);
    let second = resolve_statuses(&graph);
    assert_eq!(first, second);
    // Missing prerequisite never satisfies
    assert_eq!(first["c"], Status::Locked);
}

#[test]
fn test_depth_monotonic_over_every_edge() {
    let graph = QuestGraph::from_quests(vec![
        make_quest_with_deps("a", "prapor", &[]),
        make_quest_with_deps("b", "skier", &["a"]),
        make_quest_with_deps("c", "prapor", &["a", "b"]),
        make_quest_with_deps("d", "mechanic", &["c"]),
        make_quest_with_deps("e", "mechanic", &["a"]),
    ]);
    let depths = compute_global_depths(graph.quests());
    for edge in graph.edges() {
        assert!(depths[&edge.target] > depths[&edge.source]);
    }
    assert_eq!(depths["d"], 3);
}

// ===========================================================================
// 2. Trader-lane layout
// ===========================================================================

fn cross_trader_graph() -> QuestGraph {
    QuestGraph::from_quests(vec![
        make_quest_with_deps("Y0", "ragman", &[]),
        make_quest_with_deps("Y1", "ragman", &["Y0"]),
        make_quest_with_deps("Y2", "ragman", &["Y1"]),
        make_quest_with_deps("Y3", "ragman", &["Y2"]),
        make_quest_with_deps("X1", "mechanic", &[]),
        make_quest_with_deps("X2", "mechanic", &["X1", "Y3"]),
    ])
}

#[test]
fn test_cross_trader_dependency_aligns_columns() {
    let graph = cross_trader_graph();
    let statuses = resolve_statuses(&graph);
    let visible: Vec<&Quest> = graph.quests().collect();
    let layout = build_layout(&visible, &statuses, &Config::default(), &FocusState::none());

    let node = |id: &str| layout.quest_nodes.iter().find(|n| n.quest_id == id).unwrap();
    assert!(node("X2").column >= 3);
    // X2 sits right of Y3 even though they are in different lanes
    assert!(node("X2").x > node("Y3").x);

    // Spacers never leak into the output
    assert_eq!(layout.quest_nodes.len(), 6);
    assert!(layout.quest_nodes.iter().all(|n| !n.quest_id.starts_with("__spacer")));

    let cross: Vec<_> = layout.edges.iter().filter(|e| e.cross_trader).collect();
    assert_eq!(cross.len(), 1);
    assert_eq!(cross[0].source, "Y3");
    assert_eq!(cross[0].target, "X2");
    assert_eq!(layout.edges.len(), graph.edges().count());
}

#[test]
fn test_lanes_do_not_overlap() {
    let graph = cross_trader_graph();
    let statuses = resolve_statuses(&graph);
    let visible: Vec<&Quest> = graph.quests().collect();
    let config = Config::default();
    let layout = build_layout(&visible, &statuses, &config, &FocusState::none());

    let mut bounds: Vec<_> = layout.lane_bounds.values().copied().collect();
    bounds.sort_by(|a, b| a.y.total_cmp(&b.y));
    for pair in bounds.windows(2) {
        assert!(pair[0].y + pair[0].height <= pair[1].y);
    }
    // Mechanic comes before ragman in the curated order
    assert_eq!(layout.trader_nodes[0].trader_id, "mechanic");
    assert_eq!(layout.trader_nodes[1].trader_id, "ragman");
}

#[test]
fn test_focus_marks_chain_and_dims_others() {
    let graph = QuestGraph::from_quests(vec![
        make_quest_with_deps("a", "prapor", &[]),
        make_quest_with_deps("b", "prapor", &["a"]),
        make_quest_with_deps("x", "skier", &[]),
        make_quest_with_deps("y", "skier", &["x"]),
    ]);
    let statuses = resolve_statuses(&graph);
    let visible: Vec<&Quest> = graph.quests().collect();
    let focus = FocusState::on("b", &graph);
    let layout = build_layout(&visible, &statuses, &Config::default(), &focus);

    let node = |id: &str| layout.quest_nodes.iter().find(|n| n.quest_id == id).unwrap();
    assert!(node("b").is_focused);
    assert!(node("a").is_in_focus_chain);
    assert!(!node("x").is_in_focus_chain);
    assert!(layout.quest_nodes.iter().all(|n| n.has_focus_mode));

    let dimmed = layout.edges.iter().find(|e| e.source == "x").unwrap();
    assert!(!dimmed.animated);
}

#[test]
fn test_filtered_layout_keeps_full_graph_statuses() {
    let graph = QuestGraph::from_quests(vec![
        make_quest_with_deps("a", "prapor", &[]),
        make_quest_with_deps("b", "prapor", &["a"]),
    ])
    .with_progress(&progress_with(&["a"], Status::Completed));
    let statuses = resolve_statuses(&graph);
    let filters = QuestFilters {
        statuses: vec![Status::Available],
        ..QuestFilters::default()
    };
    let visible = apply_filters(&graph, &statuses, &filters);
    let layout = build_layout(&visible, &statuses, &Config::default(), &FocusState::none());

    assert_eq!(layout.quest_nodes.len(), 1);
    assert_eq!(layout.quest_nodes[0].quest_id, "b");
    assert_eq!(layout.quest_nodes[0].status, Status::Available);
    assert!(layout.edges.is_empty());
}

#[test]
fn test_empty_graph_produces_empty_outputs() {
    let graph = QuestGraph::new();
    let statuses = resolve_statuses(&graph);
    assert!(statuses.is_empty());
    assert!(compute_global_depths(graph.quests()).is_empty());
    let layout = build_layout(&[], &statuses, &Config::default(), &FocusState::none());
    assert!(layout.quest_nodes.is_empty());
    assert!(layout.lane_bounds.is_empty());
    let catch_up = calculate_catch_up(&["anything"], &graph);
    assert!(catch_up.prerequisites.is_empty());
}

// ===========================================================================
// 3. Catch-up
// ===========================================================================

fn branching_graph() -> QuestGraph {
    QuestGraph::from_quests(vec![
        make_quest_with_deps("intro", "prapor", &[]),
        make_quest_with_deps("mid", "prapor", &["intro"]),
        make_quest_with_deps("current", "prapor", &["mid"]),
        make_quest_with_deps("next", "prapor", &["current"]),
        make_quest_with_deps("side1", "therapist", &["intro"]),
        make_quest_with_deps("side2", "therapist", &["side1"]),
        make_quest_with_deps("other", "skier", &[]),
    ])
}

#[test]
fn test_catch_up_recommendation_and_plan() {
    let graph = branching_graph();
    let catch_up = calculate_catch_up(&["current"], &graph);

    let prereqs: Vec<&str> = catch_up.prerequisites.iter().map(|s| s.quest_id.as_str()).collect();
    assert_eq!(prereqs, vec!["intro", "mid"]);
    let branches: Vec<&str> = catch_up.sibling_branches.iter().map(|s| s.quest_id.as_str()).collect();
    assert_eq!(branches, vec!["side2"]);

    let plan = plan_catch_up(&["current"], &graph, &["side2"]);
    assert_eq!(plan.complete, vec!["intro", "mid", "side1", "side2"]);
    assert_eq!(plan.make_available, vec!["current"]);

    let progress = plan.apply(&graph.progress(), chrono::Utc::now());
    let caught_up = graph.with_progress(&progress);
    let statuses = resolve_statuses(&caught_up);
    assert_eq!(statuses["current"], Status::Available);
    assert_eq!(statuses["side2"], Status::Completed);
    assert_eq!(statuses["next"], Status::Locked);
    assert_eq!(statuses["other"], Status::Available);
}

#[test]
fn test_catch_up_on_cycle_terminates() {
    let graph = QuestGraph::from_quests(vec![
        make_quest_with_deps("a", "prapor", &["c"]),
        make_quest_with_deps("b", "prapor", &["a"]),
        make_quest_with_deps("c", "prapor", &["b"]),
        make_quest_with_deps("d", "prapor", &["c"]),
    ]);
    let catch_up = calculate_catch_up(&["d"], &graph);
    assert_eq!(catch_up.prerequisites.len(), 3);

    let none: [&str; 0] = [];
    let plan = plan_catch_up(&["b"], &graph, &none);
    assert!(!plan.complete.contains(&"b".to_string()));
    assert_eq!(plan.complete.len(), 2);
}
