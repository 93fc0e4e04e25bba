use crate::graph::{ProgressMap, Quest, QuestGraph};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("JSON error on line {line}: {source}")]
    JsonLine {
        line: usize,
        source: serde_json::Error,
    },
    #[error("YAML error in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Unsupported catalog format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Load a quest catalog and build the graph.
///
/// The format follows the extension: `.json` holds an array of quests,
/// `.jsonl` one quest per line (blank lines and `#` comments skipped) and
/// `.yaml`/`.yml` a list of quests.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<QuestGraph, ParseError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let quests: Vec<Quest> = match extension.as_deref() {
        Some("json") => {
            let file = File::open(path)?;
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ParseError::Json {
                path: path.to_path_buf(),
                source,
            })?
        }
        Some("jsonl") => load_jsonl(path)?,
        Some("yaml") | Some("yml") => {
            let file = File::open(path)?;
            serde_yaml::from_reader(BufReader::new(file)).map_err(|source| ParseError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => return Err(ParseError::UnsupportedFormat(path.to_path_buf())),
    };

    tracing::debug!(path = %path.display(), quests = quests.len(), "loaded quest catalog");
    Ok(QuestGraph::from_quests(quests))
}

fn load_jsonl(path: &Path) -> Result<Vec<Quest>, ParseError> {
    let reader = BufReader::new(File::open(path)?);
    let mut quests = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let quest: Quest = serde_json::from_str(trimmed).map_err(|e| ParseError::JsonLine {
            line: line_num + 1,
            source: e,
        })?;
        quests.push(quest);
    }

    Ok(quests)
}

/// Load a progress snapshot (a JSON object keyed by quest id).
/// A missing file is an empty snapshot.
pub fn load_progress<P: AsRef<Path>>(path: P) -> Result<ProgressMap, ParseError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(ProgressMap::new());
    }
    let file = File::open(path)?;
    let progress: ProgressMap =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ParseError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(progress)
}

/// Save a progress snapshot with an atomic write (temp file + rename) so a
/// crash mid-write leaves the previous snapshot intact. Keys are written sorted.
pub fn save_progress<P: AsRef<Path>>(progress: &ProgressMap, path: P) -> Result<(), ParseError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or(Path::new("."));
    if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = parent.join(format!(".progress.tmp.{}", std::process::id()));

    let sorted: std::collections::BTreeMap<_, _> = progress.iter().collect();
    let result = (|| -> Result<(), ParseError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;

        let json = serde_json::to_string_pretty(&sorted).map_err(|source| ParseError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writeln!(file, "{}", json)?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    })();

    if result.is_ok() {
        std::fs::rename(&tmp_path, path)?;
    } else {
        // Clean up temp file on failure
        let _ = std::fs::remove_file(&tmp_path);
    }

    result
}
