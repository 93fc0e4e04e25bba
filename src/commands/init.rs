use anyhow::{Context, Result};
use questgraph::config::Config;
use std::fs;
use std::path::Path;

pub fn run(dir: &Path) -> Result<()> {
    if dir.join("config.toml").exists() {
        anyhow::bail!("Questgraph already initialized at {}", dir.display());
    }

    fs::create_dir_all(dir).context("Failed to create questgraph directory")?;
    Config::init(dir)?;
    let config = Config::load(dir)?;

    let catalog_path = dir.join(&config.catalog.file);
    if !catalog_path.exists() {
        fs::write(&catalog_path, "[]\n")
            .with_context(|| format!("Failed to create {}", catalog_path.display()))?;
    }

    println!("Initialized questgraph at {}", dir.display());
    println!("Add quests to {}", catalog_path.display());
    Ok(())
}
