//! Pipeline configuration.
//!
//! An optional `config.toml` in the content root overrides the stock
//! defaults. Only the keys being changed need to be written; everything else
//! keeps its default.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_url = "/"               # Where the reader is served from
//!
//! [sync]
//! include_drafts = false       # Publish draft zines too
//! strict = true                # Refuse to sync when any document is rejected
//!
//! [offline]
//! cache_name = "zine-offline-assets-v1"
//! fallback_image = "cube.svg"  # Shown when a zine image is unavailable
//! fallback_stem = "cube"       # Raster fallbacks are `<stem>-<size>.png`
//! fallback_sizes = [192, 512]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the content root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Content pipeline configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Public base URL of the reader; asset URLs are resolved against it.
    pub base_url: String,
    pub sync: SyncConfig,
    pub offline: AssetConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            sync: SyncConfig::default(),
            offline: AssetConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("base_url must not be empty".into()));
        }
        if self.offline.cache_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "offline.cache_name must not be empty".into(),
            ));
        }
        if self.offline.fallback_sizes.contains(&0) {
            return Err(ConfigError::Validation(
                "offline.fallback_sizes values must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Publication settings for the sync stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Publish zines whose status is `draft`.
    pub include_drafts: bool,
    /// Abort the sync when any document is rejected.
    pub strict: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            include_drafts: false,
            strict: true,
        }
    }
}

/// Offline asset settings: the cache the reader stores assets in and the
/// fallback images it needs even when no zine references them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    pub cache_name: String,
    pub fallback_image: String,
    pub fallback_stem: String,
    pub fallback_sizes: Vec<u32>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            cache_name: "zine-offline-assets-v1".to_string(),
            fallback_image: "cube.svg".to_string(),
            fallback_stem: "cube".to_string(),
            fallback_sizes: vec![192, 512],
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse and validate config text. Keys left out keep their defaults.
pub fn parse_config(content: &str) -> Result<PipelineConfig, ConfigError> {
    let config: PipelineConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from a content root, or the stock defaults when the
/// root has none.
pub fn load_config(root: &Path) -> Result<PipelineConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(PipelineConfig::default());
    }
    parse_config(&fs::read_to_string(&config_path)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Zine Weaver Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file in the content root.
# Unknown keys will cause an error.

# Public base URL of the reader. Asset URLs in precache.json are resolved
# against it, e.g. "/zines/" turns "images/cover.webp" into
# "/zines/images/cover.webp".
base_url = "/"

# ---------------------------------------------------------------------------
# Sync
# ---------------------------------------------------------------------------
[sync]
# Publish zines whose metadata.status is "draft".
include_drafts = false

# Refuse to write anything when a document fails validation.
# When false, rejected documents are reported and left out of the bundle.
strict = true

# ---------------------------------------------------------------------------
# Offline assets
# ---------------------------------------------------------------------------
[offline]
# Cache the reader stores pre-fetched assets in.
cache_name = "zine-offline-assets-v1"

# Vector fallback shown when an image is unavailable.
fallback_image = "cube.svg"

# Raster fallbacks, written as <fallback_stem>-<size>.png.
fallback_stem = "cube"
fallback_sizes = [192, 512]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.base_url, "/");
        assert!(config.sync.strict);
        assert!(!config.sync.include_drafts);
        assert_eq!(config.offline.cache_name, "zine-offline-assets-v1");
        assert_eq!(config.offline.fallback_sizes, vec![192, 512]);
    }

    #[test]
    fn parse_partial_config() {
        let config: PipelineConfig = toml::from_str("[sync]\ninclude_drafts = true\n").unwrap();
        assert!(config.sync.include_drafts);
        // Sibling key in the same table keeps its default
        assert!(config.sync.strict);
        assert_eq!(config.offline.fallback_image, "cube.svg");
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<PipelineConfig, _> = toml::from_str("[sync]\nstrcit = false\n");
        assert!(result.is_err());
    }

    #[test]
    fn nested_override_keeps_sibling_defaults() {
        let config = parse_config("[offline]\ncache_name = \"v2\"\n").unwrap();
        assert_eq!(config.offline.cache_name, "v2");
        assert_eq!(config.offline.fallback_stem, "cube");
        assert_eq!(config.base_url, "/");
    }

    #[test]
    fn parse_config_validates() {
        let result = parse_config("[offline]\nfallback_sizes = [0]\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_without_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "base_url = \"/reader/\"\n").unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.base_url, "/reader/");
    }

    #[test]
    fn load_config_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "base_url = [").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn validation_rejects_empty_cache_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[offline]\ncache_name = \"  \"\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_zero_fallback_size() {
        let mut config = PipelineConfig::default();
        config.offline.fallback_sizes = vec![192, 0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_empty_base_url() {
        let mut config = PipelineConfig::default();
        config.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: PipelineConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }
}
