use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::WeightPolicy;
use crate::engine::repeat_guard::DEFAULT_HISTORY_SIZE;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub katakana: bool,
    #[serde(default = "default_true")]
    pub hiragana: bool,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub vocab_files: Vec<PathBuf>,
    #[serde(default = "default_history_size")]
    pub history_size: usize,
    #[serde(default = "default_report_top")]
    pub report_top: usize,
    #[serde(default)]
    pub weights: WeightPolicy,
}

fn default_true() -> bool {
    true
}
fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}
fn default_report_top() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            katakana: default_true(),
            hiragana: default_true(),
            limit: 0,
            vocab_files: Vec::new(),
            history_size: default_history_size(),
            report_top: default_report_top(),
            weights: WeightPolicy::default(),
        }
    }
}

impl Config {
    /// Load `path`, falling back to defaults when no file exists.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kanadrill")
            .join("config.toml")
    }

    /// Reset values that would break the weight invariants back to defaults.
    pub fn normalize(&mut self) {
        if !self.weights.is_valid() {
            warn!(policy = ?self.weights, "invalid weight policy, using defaults");
            self.weights = WeightPolicy::default();
        }
        if self.report_top == 0 {
            self.report_top = default_report_top();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.katakana);
        assert!(config.hiragana);
        assert_eq!(config.limit, 0);
        assert_eq!(config.history_size, 5);
        assert_eq!(config.report_top, 10);
        assert_eq!(config.weights, WeightPolicy::default());
    }

    #[test]
    fn test_config_partial_weights_table() {
        let toml_str = r#"
hiragana = false
limit = 12

[weights]
increase_factor = 4.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.katakana);
        assert!(!config.hiragana);
        assert_eq!(config.limit, 12);
        assert_eq!(config.weights.increase_factor, 4.0);
        assert_eq!(config.weights.decrease_factor, 2.0);
        assert_eq!(config.weights.max, 512.0);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.vocab_files.push(PathBuf::from("/tmp/greek.toml"));
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.vocab_files, deserialized.vocab_files);
        assert_eq!(config.weights, deserialized.weights);
    }

    #[test]
    fn test_normalize_resets_invalid_policy() {
        let mut config = Config::default();
        config.weights.decrease_factor = 0.5;
        config.report_top = 0;
        config.normalize();
        assert_eq!(config.weights, WeightPolicy::default());
        assert_eq!(config.report_top, 10);
    }

    #[test]
    fn test_load_from_missing_path_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.history_size, 5);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.limit = 7;
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.limit, 7);
    }
}
