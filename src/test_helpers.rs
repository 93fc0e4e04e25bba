use crate::config::Config;
use crate::graph::{Dependency, ProgressEntry, ProgressMap, Quest, RequirementSet, Status};
use crate::parser::save_progress;
use std::path::{Path, PathBuf};

/// Create a quest with the given id, title and trader, with all other fields defaulted.
pub fn make_quest(id: &str, title: &str, trader: &str) -> Quest {
    Quest {
        id: id.to_string(),
        title: title.to_string(),
        trader_id: trader.to_string(),
        ..Quest::default()
    }
}

/// Create a quest that requires each of `deps` to be completed.
pub fn make_quest_with_deps(id: &str, trader: &str, deps: &[&str]) -> Quest {
    Quest {
        depends_on: deps
            .iter()
            .map(|d| Dependency {
                quest_id: d.to_string(),
                requirement_status: RequirementSet::COMPLETE,
            })
            .collect(),
        ..make_quest(id, &format!("Quest {}", id), trader)
    }
}

/// Progress snapshot with every listed quest set to `status`.
pub fn progress_with(ids: &[&str], status: Status) -> ProgressMap {
    ids.iter()
        .map(|id| (id.to_string(), ProgressEntry::new(status)))
        .collect()
}

/// Create a `.questgraph` project at `dir` with a default config, the given
/// catalog and progress, and return the catalog path.
pub fn setup_project(dir: &Path, quests: &[Quest], progress: &ProgressMap) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let config = Config::default();
    config.save(dir).unwrap();

    let catalog_path = dir.join(&config.catalog.file);
    std::fs::write(&catalog_path, serde_json::to_string_pretty(quests).unwrap()).unwrap();
    save_progress(progress, dir.join(&config.catalog.progress_file)).unwrap();
    catalog_path
}
