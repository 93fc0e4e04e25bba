//! Project configuration for questgraph
//!
//! Configuration is stored in `.questgraph/config.toml` and controls layout
//! geometry, the curated trader lane order and where the catalog lives.

use crate::partition::DEFAULT_TRADER_ORDER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Layout geometry
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Trader lane settings
    #[serde(default)]
    pub traders: TraderConfig,

    /// Catalog and progress file names
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Geometry used by the lane layout and stacker (pixels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_node_width")]
    pub node_width: f64,

    /// Height of a quest node with a single-line title
    #[serde(default = "default_node_height")]
    pub node_height: f64,

    /// Extra height per wrapped title line
    #[serde(default = "default_line_height")]
    pub line_height: f64,

    /// Estimated characters per title line
    #[serde(default = "default_chars_per_line")]
    pub chars_per_line: usize,

    /// Title lines beyond this are clipped and add no height
    #[serde(default = "default_max_title_lines")]
    pub max_title_lines: usize,

    /// Gap between nodes in the same column
    #[serde(default = "default_node_sep")]
    pub node_sep: f64,

    /// Gap between dependency columns
    #[serde(default = "default_rank_sep")]
    pub rank_sep: f64,

    /// Margin added below a lane's content
    #[serde(default = "default_lane_margin")]
    pub lane_margin: f64,

    #[serde(default = "default_min_lane_height")]
    pub min_lane_height: f64,

    /// Vertical gap between stacked lanes
    #[serde(default = "default_lane_spacing")]
    pub lane_spacing: f64,

    #[serde(default = "default_header_width")]
    pub header_width: f64,

    /// Gap between a lane header and the lane's first column
    #[serde(default = "default_header_gap")]
    pub header_gap: f64,

    /// Offset of the whole canvas from the origin
    #[serde(default = "default_canvas_margin")]
    pub canvas_margin: f64,
}

fn default_node_width() -> f64 {
    200.0
}

fn default_node_height() -> f64 {
    60.0
}

fn default_line_height() -> f64 {
    16.0
}

fn default_chars_per_line() -> usize {
    24
}

fn default_max_title_lines() -> usize {
    2
}

fn default_node_sep() -> f64 {
    50.0
}

fn default_rank_sep() -> f64 {
    120.0
}

fn default_lane_margin() -> f64 {
    40.0
}

fn default_min_lane_height() -> f64 {
    120.0
}

fn default_lane_spacing() -> f64 {
    40.0
}

fn default_header_width() -> f64 {
    160.0
}

fn default_header_gap() -> f64 {
    40.0
}

fn default_canvas_margin() -> f64 {
    20.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: default_node_width(),
            node_height: default_node_height(),
            line_height: default_line_height(),
            chars_per_line: default_chars_per_line(),
            max_title_lines: default_max_title_lines(),
            node_sep: default_node_sep(),
            rank_sep: default_rank_sep(),
            lane_margin: default_lane_margin(),
            min_lane_height: default_min_lane_height(),
            lane_spacing: default_lane_spacing(),
            header_width: default_header_width(),
            header_gap: default_header_gap(),
            canvas_margin: default_canvas_margin(),
        }
    }
}

impl LayoutConfig {
    /// Estimated node height for a title, wrapping at `chars_per_line` and
    /// capped at `max_title_lines`
    pub fn node_height_for(&self, title: &str) -> f64 {
        let chars = title.chars().count();
        let per_line = self.chars_per_line.max(1);
        let lines = chars.div_ceil(per_line).clamp(1, self.max_title_lines.max(1));
        self.node_height + (lines - 1) as f64 * self.line_height
    }
}

/// Trader lane configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderConfig {
    /// Preferred lane order (trader ids, case-insensitive)
    #[serde(default = "default_trader_order")]
    pub order: Vec<String>,
}

fn default_trader_order() -> Vec<String> {
    DEFAULT_TRADER_ORDER.iter().map(|s| s.to_string()).collect()
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            order: default_trader_order(),
        }
    }
}

/// Where the quest catalog and progress snapshot live, relative to the project dir
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Quest catalog (`.json`, `.yaml` or `.yml`)
    #[serde(default = "default_catalog_file")]
    pub file: String,

    #[serde(default = "default_progress_file")]
    pub progress_file: String,
}

fn default_catalog_file() -> String {
    "quests.json".to_string()
}

fn default_progress_file() -> String {
    "progress.json".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            file: default_catalog_file(),
            progress_file: default_progress_file(),
        }
    }
}

impl Config {
    /// Load configuration from .questgraph/config.toml
    /// Returns default config if file doesn't exist
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let config_path = dir.join("config.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to read config: {}", e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))?;

        Ok(config)
    }

    /// Save configuration to .questgraph/config.toml
    pub fn save(&self, dir: &Path) -> anyhow::Result<()> {
        let config_path = dir.join("config.toml");

        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

        fs::write(&config_path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write config: {}", e))?;

        Ok(())
    }

    /// Initialize default config file if it doesn't exist
    pub fn init(dir: &Path) -> anyhow::Result<bool> {
        let config_path = dir.join("config.toml");

        if config_path.exists() {
            return Ok(false); // Already exists
        }

        fs::create_dir_all(dir)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", dir.display(), e))?;
        let config = Self::default();
        config.save(dir)?;
        Ok(true) // Created new
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.layout.max_title_lines, 2);
        assert_eq!(config.traders.order.first().map(String::as_str), Some("prapor"));
        assert_eq!(config.catalog.file, "quests.json");
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = Config::default();
        config.layout.rank_sep = 200.0;
        config.traders.order = vec!["skier".to_string()];
        config.save(temp_dir.path()).unwrap();

        let loaded = Config::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.layout.rank_sep, 200.0);
        assert_eq!(loaded.traders.order, vec!["skier"]);
    }

    #[test]
    fn test_init_config() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(".questgraph");

        // First init should create file
        let created = Config::init(&dir).unwrap();
        assert!(created);

        // Second init should not overwrite
        let created = Config::init(&dir).unwrap();
        assert!(!created);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[layout]
node_width = 240.0
chars_per_line = 30

[catalog]
file = "quests.yaml"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.layout.node_width, 240.0);
        assert_eq!(config.layout.chars_per_line, 30);
        assert_eq!(config.layout.node_height, 60.0);
        assert_eq!(config.catalog.file, "quests.yaml");
        assert_eq!(config.catalog.progress_file, "progress.json");
    }

    #[test]
    fn test_node_height_caps_at_two_lines() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.node_height_for(""), 60.0);
        assert_eq!(layout.node_height_for("Debut"), 60.0);
        assert_eq!(layout.node_height_for(&"x".repeat(30)), 76.0);
        assert_eq!(layout.node_height_for(&"x".repeat(200)), 76.0);
    }
}
