//! Loading a dataset directory from disk.
//!
//! Layout:
//! - `items.json`: array of raw items (required)
//! - `hero-profiles.json`: array of hero profiles (required)
//! - `hero-abilities.json`: slug -> `{name, abilities}` (optional)
//! - `hero-stats.json`: slug -> hero statistics (optional)

use scout_catalog::{HeroDataMap, KnowledgeBase};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ITEMS_FILE: &str = "items.json";
pub const PROFILES_FILE: &str = "hero-profiles.json";
pub const ABILITIES_FILE: &str = "hero-abilities.json";
pub const STATS_FILE: &str = "hero-stats.json";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("dataset directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("required dataset file {0} is missing")]
    MissingFile(PathBuf),

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Static content plus scraped statistics.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub knowledge: KnowledgeBase,
    pub stats: HeroDataMap,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let body = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_required<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, DatasetError> {
    let path = dir.join(name);
    if !path.is_file() {
        return Err(DatasetError::MissingFile(path));
    }
    read_json(&path)
}

fn read_optional<T: DeserializeOwned + Default>(dir: &Path, name: &str) -> Result<T, DatasetError> {
    let path = dir.join(name);
    if !path.is_file() {
        tracing::debug!(target: "scout::dataset", file = name, "Optional dataset file absent");
        return Ok(T::default());
    }
    read_json(&path)
}

pub fn load_dataset(dir: &Path) -> Result<Dataset, DatasetError> {
    if !dir.is_dir() {
        return Err(DatasetError::MissingDirectory(dir.to_path_buf()));
    }
    let knowledge = KnowledgeBase {
        items: read_required(dir, ITEMS_FILE)?,
        heroes: read_required(dir, PROFILES_FILE)?,
        abilities: read_optional(dir, ABILITIES_FILE)?,
    };
    let stats: HeroDataMap = read_optional(dir, STATS_FILE)?;

    tracing::debug!(
        target: "scout::dataset",
        dir = %dir.display(),
        items = knowledge.items.len(),
        heroes = knowledge.heroes.len(),
        abilities = knowledge.abilities.len(),
        stats = stats.len(),
        "Loaded dataset"
    );

    Ok(Dataset { knowledge, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_test_utils::DatasetFixture;

    #[test]
    fn loads_the_sample_dataset() {
        let fixture = DatasetFixture::new().unwrap();
        let dataset = load_dataset(fixture.path()).unwrap();
        assert!(!dataset.knowledge.items.is_empty());
        assert_eq!(dataset.knowledge.heroes.len(), 6);
        assert!(dataset.knowledge.abilities.contains_key("steel"));
        assert!(dataset.stats.contains_key("grux"));
    }

    #[test]
    fn optional_files_default_to_empty() {
        let fixture = DatasetFixture::new().unwrap();
        fixture.remove(ABILITIES_FILE).unwrap();
        fixture.remove(STATS_FILE).unwrap();
        let dataset = load_dataset(fixture.path()).unwrap();
        assert!(dataset.knowledge.abilities.is_empty());
        assert!(dataset.stats.is_empty());
    }

    #[test]
    fn missing_required_file_is_reported() {
        let fixture = DatasetFixture::new().unwrap();
        fixture.remove(ITEMS_FILE).unwrap();
        let err = load_dataset(fixture.path()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingFile(p) if p.ends_with(ITEMS_FILE)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let fixture = DatasetFixture::new().unwrap();
        fixture.write_raw(PROFILES_FILE, "{not json").unwrap();
        let err = load_dataset(fixture.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }

    #[test]
    fn missing_directory() {
        let fixture = DatasetFixture::empty().unwrap();
        let err = load_dataset(&fixture.path().join("nope")).unwrap_err();
        assert!(matches!(err, DatasetError::MissingDirectory(_)));
    }
}
