//! Editor configuration.

use crate::error::{EditorError, EditorResult};
use crate::shapes::ShapeStyle;
use serde::{Deserialize, Serialize};

/// Tunables for an editor instance. Every field has a default, so a partial
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Style of newly drawn shapes.
    pub default_style: ShapeStyle,
    /// Style of the selection marquee.
    pub selection_style: ShapeStyle,
    /// Radius of the handle circles.
    pub handle_radius: f64,
    /// Pick distance for handles and shape outlines.
    pub hit_tolerance: f64,
    /// Maximum number of history nodes kept (`None` = unbounded).
    pub history_limit: Option<usize>,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
    /// Zoom factor applied per wheel notch.
    pub zoom_step: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_style: ShapeStyle::default(),
            selection_style: ShapeStyle::selection(),
            handle_radius: 3.0,
            hit_tolerance: 4.0,
            history_limit: None,
            min_zoom: 0.1,
            max_zoom: 10.0,
            zoom_step: 1.1,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EditorResult<()> {
        if self.handle_radius <= 0.0 {
            return Err(EditorError::Config(format!(
                "handle_radius must be positive, got {}",
                self.handle_radius
            )));
        }
        if self.hit_tolerance < 0.0 {
            return Err(EditorError::Config(format!(
                "hit_tolerance must not be negative, got {}",
                self.hit_tolerance
            )));
        }
        if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
            return Err(EditorError::Config(format!(
                "invalid zoom range {}..{}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_step <= 1.0 {
            return Err(EditorError::Config(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if self.history_limit == Some(0) {
            return Err(EditorError::Config("history_limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "handle_radius": 5.0, "history_limit": 20 }"#)
            .unwrap();
        assert!((config.handle_radius - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.history_limit, Some(20));
        assert_eq!(config.default_style, ShapeStyle::default());
    }

    #[test]
    fn test_empty_object() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let err = EditorConfig::from_json(r#"{ "min_zoom": 5.0, "max_zoom": 1.0 }"#).unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = EditorConfig::from_json("{ handle_radius: }").unwrap_err();
        assert!(matches!(err, EditorError::ConfigParse(_)));
    }
}
