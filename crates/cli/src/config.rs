use anyhow::{Context, Result};
use codenn_ast::SampleConfig;
use codenn_cluster::{ModelConfig, ProjectionConfig};
use codenn_scene::SceneConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is not
/// given
pub const DEFAULT_CONFIG_FILE: &str = "codenn-vis.toml";

/// What the session does when a sample identity is submitted again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Every submission is a new observation
    #[default]
    Append,
    /// Render views again but do not embed a sample already in the store
    SkipSeen,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub duplicate_policy: DuplicatePolicy,
}

/// Top-level configuration (`codenn-vis.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisConfig {
    pub sample: SampleConfig,
    pub scene: SceneConfig,
    pub model: ModelConfig,
    pub projection: ProjectionConfig,
    pub session: SessionConfig,
}

impl VisConfig {
    /// Load from an explicit path, or from [`DEFAULT_CONFIG_FILE`] when it
    /// exists, or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path: PathBuf = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    log::debug!("No {DEFAULT_CONFIG_FILE}; using default configuration");
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Validate every section that has constraints
    pub fn validate(&self) -> Result<(), String> {
        self.scene.validate().map_err(|e| format!("[scene] {e}"))?;
        self.model.validate().map_err(|e| format!("[model] {e}"))?;
        self.projection
            .validate()
            .map_err(|e| format!("[projection] {e}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codenn_cluster::Algorithm;
    use codenn_scene::Rgb;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_valid() {
        assert!(VisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sections_parse_from_toml() {
        let config = VisConfig::from_toml(
            r#"
            [sample]
            latin1_fallback = false

            [scene]
            comment_row = true
            paint_comments = false
            line_height_px = 18.0

            [scene.palette]
            comment = "rgb(120, 120, 120)"

            [model]
            dimension = 4

            [projection]
            default_algorithm = "tsne"
            tsne_seed = 7

            [session]
            duplicate_policy = "skip-seen"
            "#,
        )
        .unwrap();

        assert!(!config.sample.latin1_fallback);
        assert!(config.scene.comment_row);
        assert!(!config.scene.paint_comments);
        assert_eq!(config.scene.palette.comment, Rgb(120, 120, 120));
        assert_eq!(config.scene.palette.require, Rgb(248, 172, 97));
        assert_eq!(config.model.dimension, 4);
        assert_eq!(config.model.sequence_length, 512);
        assert_eq!(config.projection.default_algorithm, Algorithm::Tsne);
        assert_eq!(config.session.duplicate_policy, DuplicatePolicy::SkipSeen);
    }

    #[test]
    fn test_invalid_section_is_reported() {
        let err = VisConfig::from_toml("[model]\ndimension = 1\n").unwrap_err();
        assert!(err.to_string().contains("[model]"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(VisConfig::load(Some(&tmp.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vis.toml");
        std::fs::write(&path, "[session]\nduplicate_policy = \"append\"\n").unwrap();
        let config = VisConfig::load(Some(&path)).unwrap();
        assert_eq!(config, VisConfig::default());
    }
}
