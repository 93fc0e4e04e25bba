//! Quest dependency graph engine.
//!
//! Resolves quest unlock status from a dependency graph, computes dependency
//! depth, lays quests out in per-trader lanes and recommends catch-up
//! selections from partial progress.

pub mod catch_up;
pub mod chain;
pub mod check;
pub mod config;
pub mod depth;
pub mod graph;
pub mod layout;
pub mod objective;
pub mod parser;
pub mod partition;
pub mod query;
pub mod status;

#[cfg(any(test, feature = "test-support"))]
pub mod test_helpers;

pub use catch_up::{CatchUp, CatchUpPlan, CatchUpSelection, calculate_catch_up, plan_catch_up};
pub use chain::{get_full_chain, get_incomplete_prerequisites};
pub use check::{CheckResult, check_all, check_cycles, check_orphans};
pub use config::{Config, LayoutConfig};
pub use depth::{DepthMap, compute_global_depths};
pub use graph::{
    Dependency, DependencyEdge, ProgressEntry, ProgressMap, Quest, QuestGraph, Requirement,
    RequirementSet, Status, Trader,
};
pub use layout::{FocusState, QuestLayout, build_layout};
pub use objective::{ObjectiveProgress, compute_objective_progress, compute_quest_status, objective_progress_entry};
pub use parser::{ParseError, load_catalog, load_progress, save_progress};
pub use partition::{TraderGroup, compute_trader_order, split_by_trader};
pub use query::{QuestFilters, apply_filters, count_by_status};
pub use status::{StatusMap, compute_status, resolve_statuses};
