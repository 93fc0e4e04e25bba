use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Quest status, either explicit (user progress) or derived from dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Locked,
    Available,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Locked,
        Status::Available,
        Status::InProgress,
        Status::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Locked => "locked",
            Status::Available => "available",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    /// Case-insensitive; the sync backend reports `COMPLETED`, `IN_PROGRESS`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "locked" => Ok(Status::Locked),
            "available" => Ok(Status::Available),
            "in_progress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            other => Err(format!("unknown quest status '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single requirement tag on a dependency edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Complete,
    Active,
}

/// Non-empty set of requirement tags: which states of the prerequisite satisfy the edge
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Requirement>", into = "Vec<Requirement>")]
pub struct RequirementSet(u8);

impl RequirementSet {
    const COMPLETE_BIT: u8 = 0b01;
    const ACTIVE_BIT: u8 = 0b10;

    pub const COMPLETE: RequirementSet = RequirementSet(Self::COMPLETE_BIT);
    pub const ACTIVE: RequirementSet = RequirementSet(Self::ACTIVE_BIT);
    pub const COMPLETE_OR_ACTIVE: RequirementSet =
        RequirementSet(Self::COMPLETE_BIT | Self::ACTIVE_BIT);

    fn bit(req: Requirement) -> u8 {
        match req {
            Requirement::Complete => Self::COMPLETE_BIT,
            Requirement::Active => Self::ACTIVE_BIT,
        }
    }

    pub fn contains(&self, req: Requirement) -> bool {
        self.0 & Self::bit(req) != 0
    }

    /// An edge that is satisfied by merely starting the prerequisite
    pub fn is_active_only(&self) -> bool {
        self.contains(Requirement::Active) && !self.contains(Requirement::Complete)
    }
}

impl Default for RequirementSet {
    fn default() -> Self {
        Self::COMPLETE
    }
}

impl fmt::Debug for RequirementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(Vec::<Requirement>::from(*self)).finish()
    }
}

impl TryFrom<Vec<Requirement>> for RequirementSet {
    type Error = String;

    fn try_from(reqs: Vec<Requirement>) -> Result<Self, Self::Error> {
        if reqs.is_empty() {
            return Err("requirementStatus must name at least one of complete, active".to_string());
        }
        Ok(RequirementSet(
            reqs.into_iter().fold(0, |acc, r| acc | Self::bit(r)),
        ))
    }
}

impl From<RequirementSet> for Vec<Requirement> {
    fn from(set: RequirementSet) -> Self {
        [Requirement::Complete, Requirement::Active]
            .into_iter()
            .filter(|r| set.contains(*r))
            .collect()
    }
}

/// Prerequisite edge as stored on the dependent quest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub quest_id: String,
    #[serde(default)]
    pub requirement_status: RequirementSet,
}

/// Mirror of a `Dependency`, stored on the prerequisite quest
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependent {
    pub quest_id: String,
    pub requirement_status: RequirementSet,
}

/// Directed prerequisite relationship (source is required by target)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    pub requirement_status: RequirementSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trader {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One quest objective, with the player's completion as reported by the sync backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Objective {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    /// Optional objectives only count when a quest has no required ones
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub completed: bool,
}

/// Explicit user progress on a quest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProgressEntry {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            updated_at: None,
        }
    }
}

/// Progress overrides keyed by quest id
pub type ProgressMap = HashMap<String, ProgressEntry>;

/// A quest from the catalog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub trader_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trader: Option<Trader>,
    #[serde(default)]
    pub level_required: u32,
    #[serde(default)]
    pub kappa_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objectives: Vec<Objective>,
    /// Layout hints from the catalog; never read by the layout engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_hints: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<Dependency>,
    /// Rebuilt from `depends_on` by `QuestGraph::from_quests`; never read from input
    #[serde(skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub depended_on_by: Vec<Dependent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressEntry>,
}

impl Quest {
    /// Lower-cased trader id, the grouping key for lanes
    pub fn trader_key(&self) -> String {
        self.trader_id.to_lowercase()
    }

    pub fn trader_name(&self) -> &str {
        match &self.trader {
            Some(t) if !t.name.is_empty() => &t.name,
            _ => &self.trader_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.depended_on_by.is_empty()
    }
}

/// The quest graph: quests in catalog order with mirrored dependency edges
#[derive(Debug, Clone, Default)]
pub struct QuestGraph {
    quests: Vec<Quest>,
    index: HashMap<String, usize>,
}

impl QuestGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph, deriving every `depended_on_by` list from the `depends_on` lists.
    pub fn from_quests(quests: impl IntoIterator<Item = Quest>) -> Self {
        let mut graph = QuestGraph::new();
        for mut quest in quests {
            quest.depended_on_by.clear();
            if let Some(&idx) = graph.index.get(&quest.id) {
                tracing::warn!(
                    quest_id = %quest.id,
                    "duplicate quest id (overwriting previous definition)"
                );
                graph.quests[idx] = quest;
            } else {
                graph.index.insert(quest.id.clone(), graph.quests.len());
                graph.quests.push(quest);
            }
        }
        graph.mirror_edges();
        graph
    }

    fn mirror_edges(&mut self) {
        let mut mirrored: Vec<(usize, Dependent)> = Vec::new();
        for quest in &self.quests {
            for dep in &quest.depends_on {
                if let Some(&idx) = self.index.get(&dep.quest_id) {
                    mirrored.push((
                        idx,
                        Dependent {
                            quest_id: quest.id.clone(),
                            requirement_status: dep.requirement_status,
                        },
                    ));
                }
            }
        }
        for (idx, dependent) in mirrored {
            self.quests[idx].depended_on_by.push(dependent);
        }
    }

    pub fn get_quest(&self, id: &str) -> Option<&Quest> {
        self.index.get(id).map(|&idx| &self.quests[idx])
    }

    pub fn get_quest_or_err(&self, id: &str) -> anyhow::Result<&Quest> {
        self.get_quest(id)
            .ok_or_else(|| anyhow::anyhow!("Quest '{}' not found", id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Quests in catalog order
    pub fn quests(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter()
    }

    /// Every resolvable dependency edge, prerequisite first
    pub fn edges(&self) -> impl Iterator<Item = DependencyEdge> + '_ {
        self.quests.iter().flat_map(move |quest| {
            quest
                .depends_on
                .iter()
                .filter(|dep| self.contains(&dep.quest_id))
                .map(move |dep| DependencyEdge {
                    source: dep.quest_id.clone(),
                    target: quest.id.clone(),
                    requirement_status: dep.requirement_status,
                })
        })
    }

    pub fn set_progress(&mut self, id: &str, progress: Option<ProgressEntry>) -> bool {
        match self.index.get(id) {
            Some(&idx) => {
                self.quests[idx].progress = progress;
                true
            }
            None => false,
        }
    }

    /// Merge a progress snapshot onto the quests. Quests absent from the map lose any override.
    ///
    /// Entries for ids outside the catalog are skipped here; callers that save
    /// progress keep their own copy of the map so those entries survive.
    pub fn apply_progress(&mut self, progress: &ProgressMap) {
        for quest in &mut self.quests {
            quest.progress = progress.get(&quest.id).cloned();
        }
        for id in progress.keys().filter(|id| !self.index.contains_key(*id)) {
            tracing::warn!(quest_id = %id, "progress entry for quest not in catalog ignored");
        }
    }

    pub fn with_progress(mut self, progress: &ProgressMap) -> Self {
        self.apply_progress(progress);
        self
    }

    /// Snapshot of the explicit overrides currently on the graph
    pub fn progress(&self) -> ProgressMap {
        self.quests
            .iter()
            .filter_map(|q| q.progress.clone().map(|p| (q.id.clone(), p)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}
