pub mod catch_up;
pub mod chain;
pub mod check;
pub mod depths;
pub mod init;
pub mod layout;
pub mod objectives;
pub mod progress;
pub mod skip;
pub mod status;
pub mod traders;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use questgraph::config::Config;
use questgraph::graph::{ProgressMap, QuestGraph};
use questgraph::parser::{load_catalog, load_progress, save_progress};

/// A loaded project: config, and the catalog with progress applied
pub struct Project {
    pub config: Config,
    pub graph: QuestGraph,
    /// Progress as loaded, including entries for quests the catalog no longer lists.
    /// Edits go through this map so saving never drops them.
    pub progress: ProgressMap,
    pub progress_path: PathBuf,
}

impl Project {
    /// Persist a progress snapshot atomically
    pub fn save_progress(&self, progress: &ProgressMap) -> Result<()> {
        save_progress(progress, &self.progress_path).with_context(|| {
            format!("Failed to save progress to {}", self.progress_path.display())
        })
    }
}

/// Load the project in `dir`: config, quest catalog and progress snapshot.
pub fn load_project(dir: &Path) -> Result<Project> {
    if !dir.exists() {
        anyhow::bail!("Questgraph not initialized. Run 'qg init' first.");
    }
    let config = Config::load(dir)?;

    let catalog_path = dir.join(&config.catalog.file);
    let graph = load_catalog(&catalog_path)
        .with_context(|| format!("Failed to load quest catalog {}", catalog_path.display()))?;

    let progress_path = dir.join(&config.catalog.progress_file);
    let progress = load_progress(&progress_path)
        .with_context(|| format!("Failed to load progress {}", progress_path.display()))?;

    Ok(Project {
        config,
        graph: graph.with_progress(&progress),
        progress,
        progress_path,
    })
}

/// Bail with every id in `ids` that the catalog doesn't contain
pub fn ensure_known(graph: &QuestGraph, ids: &[String]) -> Result<()> {
    let missing: Vec<&str> = ids
        .iter()
        .filter(|id| !graph.contains(id))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        anyhow::bail!("Quest not found: {}", missing.join(", "));
    }
    Ok(())
}
