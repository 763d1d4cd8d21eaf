//! Engine configuration lookup for the CLI.
//!
//! Precedence: `--config` flag > `SCOUT_CONFIG` env (both arrive through
//! clap) > `~/.scout/config.toml` > built-in defaults.
//!
//! ```toml
//! # ~/.scout/config.toml
//! [synthesis]
//! also_consider_count = 6
//! ```

use anyhow::{Context, Result};
use scout_engine::{load_config, EngineConfig};
use std::path::{Path, PathBuf};

/// Returns the path to the default config file (~/.scout/config.toml).
fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".scout").join("config.toml"))
}

/// Loads the engine config. An explicit path must exist; the default path is
/// only read when present.
pub fn resolve_config(explicit: Option<&Path>) -> Result<EngineConfig> {
    if let Some(path) = explicit {
        return load_config(path).with_context(|| format!("loading config {}", path.display()));
    }

    let Some(path) = default_config_path().filter(|p| p.exists()) else {
        tracing::trace!(target: "scout::config", "No config file; using defaults");
        return Ok(EngineConfig::default());
    };
    load_config(&path).with_context(|| format!("loading config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn explicit_config_is_loaded() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("scout.toml");
        fs::write(&path, "[synthesis]\ncore_slots = 4\n").unwrap();
        let config = resolve_config(Some(&path)).unwrap();
        assert_eq!(config.synthesis.core_slots, 4);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let tmp = tempdir().unwrap();
        let err = resolve_config(Some(&tmp.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[synthesis]\ncore_slots = \"three\"\n").unwrap();
        assert!(resolve_config(Some(&path)).is_err());
    }

    #[test]
    fn home_config_is_used_without_explicit_path() {
        let _g = scout_test_utils::env_guard();
        let home = tempdir().unwrap();
        fs::create_dir_all(home.path().join(".scout")).unwrap();
        fs::write(
            home.path().join(".scout").join("config.toml"),
            "[synthesis]\nalso_consider_count = 6\n",
        )
        .unwrap();
        let _home = scout_test_utils::set_env_var("HOME", home.path().to_str());

        let config = resolve_config(None).unwrap();
        assert_eq!(config.synthesis.also_consider_count, 6);
    }

    #[test]
    fn defaults_without_any_config_file() {
        let _g = scout_test_utils::env_guard();
        let home = tempdir().unwrap();
        let _home = scout_test_utils::set_env_var("HOME", home.path().to_str());

        let config = resolve_config(None).unwrap();
        assert_eq!(config.synthesis.core_slots, EngineConfig::default().synthesis.core_slots);
    }
}
