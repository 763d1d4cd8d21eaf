//! Engine tuning knobs.
//!
//! Every field defaults to the built-in constant, so a config file only needs
//! the values it changes:
//!
//! ```toml
//! [thresholds]
//! high_physical_power = 70.0
//!
//! [extractor]
//! slow_percent_threshold = 15.0
//!
//! [synthesis]
//! also_consider_count = 6
//! ```

use crate::analyze::Thresholds;
use scout_catalog::CcExtractorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Sizes and cut-offs used while synthesizing builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Items picked by the greedy loop before slot filling.
    pub core_slots: usize,
    /// Minimum matches for a build to be considered best; retried at 1.
    pub min_build_matches: u32,
    /// Matches needed before a head-to-head record yields a counter build.
    pub counter_data_min_matches: u32,
    /// Variants with at least this many matches sort ahead of the rest.
    pub confident_variant_matches: u32,
    pub variant_min_matches: u32,
    pub max_variants: usize,
    pub also_consider_count: usize,
    pub alt_crest_count: usize,
    /// Enemy augments above this win rate are flagged.
    pub augment_warning_win_rate: f64,
    /// Average win rate above which a proven item earns its extra bonus.
    pub proven_win_rate: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            core_slots: 3,
            min_build_matches: 2,
            counter_data_min_matches: 5,
            confident_variant_matches: 30,
            variant_min_matches: 2,
            max_variants: 2,
            also_consider_count: 4,
            alt_crest_count: 2,
            augment_warning_win_rate: 55.0,
            proven_win_rate: 55.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: Thresholds,
    pub extractor: CcExtractorConfig,
    pub synthesis: SynthesisConfig,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;

        tracing::debug!(
            target: "scout::config",
            path = %path.display(),
            "Loaded configuration file"
        );

        Ok(config)
    }
}

/// Loads an engine config from `path`.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    EngineConfig::load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.synthesis.core_slots, 3);
        assert_eq!(config.thresholds.tanky_health, 400.0);
    }

    #[test]
    fn parse_partial_config() {
        let config = EngineConfig::from_toml_str(
            r#"
            [thresholds]
            high_physical_power = 70.0

            [extractor]
            slow_percent_threshold = 15.0

            [synthesis]
            also_consider_count = 6
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.high_physical_power, 70.0);
        assert_eq!(config.thresholds.high_magical_power, 80.0);
        assert_eq!(config.extractor.slow_percent_threshold, 15.0);
        assert_eq!(config.extractor.slow_default_duration, 1.0);
        assert_eq!(config.synthesis.also_consider_count, 6);
        assert_eq!(config.synthesis.max_variants, 2);
    }

    #[test]
    fn parse_invalid_config_is_an_error() {
        let err = EngineConfig::from_toml_str("[synthesis]\ncore_slots = \"three\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[synthesis]\nmax_variants = 3").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.synthesis.max_variants, 3);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
