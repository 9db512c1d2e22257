use crate::palette::CategoryPalette;
use codenn_ast::Category;
use serde::{Deserialize, Serialize};

/// Presentation settings shared by every renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub palette: CategoryPalette,

    /// Marker diameter in px
    pub marker_size: f64,

    /// Marker opacity (0.0 - 1.0)
    pub opacity: f64,

    /// Height of one source line in px; seesoft scroll offsets are multiples
    /// of it
    pub line_height_px: f64,

    /// Paint comment spans in the source and seesoft views
    pub paint_comments: bool,

    /// Add a comment row to the scatterplot
    pub comment_row: bool,

    pub show_legend: bool,

    /// Include node source text in scatterplot hover labels
    pub show_text: bool,

    /// Lay the tree out left to right (depth on x)
    pub horizontal_tree: bool,

    /// Element id of the source view; unit ids are `{view_id}{key}`
    pub view_id: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            palette: CategoryPalette::default(),
            marker_size: 10.0,
            opacity: 0.8,
            line_height_px: 15.0,
            paint_comments: true,
            comment_row: false,
            show_legend: false,
            show_text: false,
            horizontal_tree: true,
            view_id: "source-code-content".to_string(),
        }
    }
}

impl SceneConfig {
    /// Scatterplot rows, top category first
    #[must_use]
    pub fn rows(&self) -> &'static [Category] {
        if self.comment_row {
            &Category::ALL
        } else {
            &Category::CODE
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.marker_size.is_finite() && self.marker_size > 0.0) {
            return Err(format!("marker_size ({}) must be positive", self.marker_size));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(format!("opacity ({}) must be between 0 and 1", self.opacity));
        }
        if !(self.line_height_px.is_finite() && self.line_height_px > 0.0) {
            return Err(format!(
                "line_height_px ({}) must be positive",
                self.line_height_px
            ));
        }
        if self.view_id.is_empty() {
            return Err("view_id must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rows().len(), 5);
    }

    #[test]
    fn test_comment_row_is_opt_in() {
        let config = SceneConfig {
            comment_row: true,
            ..SceneConfig::default()
        };
        assert_eq!(config.rows().last(), Some(&Category::Comment));
        assert!(SceneConfig::default().paint_comments);
    }

    #[test]
    fn test_invalid_opacity() {
        let config = SceneConfig {
            opacity: 1.5,
            ..SceneConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
