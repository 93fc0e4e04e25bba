//! Quest status implied by objective progress.
//!
//! The dependency resolver in `status` never looks at objectives. These
//! helpers turn objective completion into an explicit progress entry, the
//! way the sync backend promotes a quest once its objectives are ticked off.

use crate::graph::{Objective, ProgressEntry, Quest, QuestGraph, Status};
use crate::status::compute_status;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ObjectiveProgress {
    pub total: usize,
    pub completed: usize,
    pub required_total: usize,
    pub required_completed: usize,
}

impl ObjectiveProgress {
    /// (completed, total) over the objectives that decide completion: the
    /// required ones, or all of them when none are required
    pub fn effective(&self) -> (usize, usize) {
        if self.required_total > 0 {
            (self.required_completed, self.required_total)
        } else {
            (self.completed, self.total)
        }
    }
}

pub fn compute_objective_progress(objectives: &[Objective]) -> ObjectiveProgress {
    let mut progress = ObjectiveProgress::default();
    for objective in objectives {
        progress.total += 1;
        if objective.completed {
            progress.completed += 1;
        }
        if !objective.optional {
            progress.required_total += 1;
            if objective.completed {
                progress.required_completed += 1;
            }
        }
    }
    progress
}

/// Status a quest should show given its stored status and objective progress.
///
/// A stored `Locked` stays locked. Otherwise every deciding objective done
/// means `Completed`, some done means `InProgress`, and none done (or no
/// objectives at all) falls back to the stored status, then `default`.
pub fn compute_quest_status(stored: Option<Status>, objectives: &[Objective], default: Status) -> Status {
    if stored == Some(Status::Locked) {
        return Status::Locked;
    }
    let fallback = stored.unwrap_or(default);

    let (done, _) = compute_objective_progress(objectives).effective();
    if should_auto_complete(objectives) {
        Status::Completed
    } else if done > 0 {
        Status::InProgress
    } else {
        fallback
    }
}

/// True when every deciding objective is complete. A quest without
/// objectives never auto-completes.
pub fn should_auto_complete(objectives: &[Objective]) -> bool {
    let (done, total) = compute_objective_progress(objectives).effective();
    total > 0 && done == total
}

/// Explicit progress that `quest`'s objectives call for, or `None` when the
/// quest's current status already agrees.
///
/// The current status comes from the resolver, so a quest whose
/// prerequisites are unmet counts as stored `Locked` and is left alone.
pub fn objective_progress_entry(quest: &Quest, graph: &QuestGraph, now: DateTime<Utc>) -> Option<ProgressEntry> {
    let current = compute_status(quest, graph);
    let next = compute_quest_status(Some(current), &quest.objectives, current);
    (next != current).then(|| ProgressEntry {
        status: next,
        updated_at: Some(now),
    })
}
