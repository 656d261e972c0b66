//! # Configuration
//!
//! Per-canvas defaults, loadable from TOML. Any field left out takes its default.

use crate::color::Color;
use crate::image::ImageRenderingMode;
use crate::smoothing::DEFAULT_REGION_SLACK;
use crate::stroke::StrokeStyle;

/// Prefixed onto saved configs.
const DOCUMENTATION: &str = r#"# Canvas defaults.
# line_color is straight RGBA, each channel in [0, 1].
# rendering_mode is one of "scale", "original".

"#;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("couldn't parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("couldn't write config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Width of new strokes, in view units.
    pub line_width: f32,
    pub line_color: [f32; 4],
    pub line_alpha: f32,
    /// Moves accepted in one gesture before it is cut over and a backup is requested.
    pub max_samples_per_stroke: usize,
    pub rendering_mode: ImageRenderingMode,
    /// Extra margin around incremental redraw regions.
    pub region_slack: f32,
}
impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            line_width: 10.0,
            line_color: Color::BLACK.as_array(),
            line_alpha: 1.0,
            max_samples_per_stroke: 1000,
            rendering_mode: ImageRenderingMode::Original,
            region_slack: DEFAULT_REGION_SLACK,
        }
    }
}
impl SketchConfig {
    /// Parse and validate.
    pub fn from_toml_str(string: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(string)?;
        config.validate()?;
        Ok(config)
    }
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let string = toml::ser::to_string_pretty(self)?;
        Ok(DOCUMENTATION.to_owned() + &string)
    }
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| {
            log::warn!("config field `{field}` rejected: {reason}");
            Err(ConfigError::InvalidValue { field, reason })
        };
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return invalid("line_width", "must be finite and greater than zero");
        }
        if !(0.0..=1.0).contains(&self.line_alpha) {
            return invalid("line_alpha", "must be within [0, 1]");
        }
        if self.line_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return invalid("line_color", "every channel must be within [0, 1]");
        }
        if self.max_samples_per_stroke == 0 {
            return invalid("max_samples_per_stroke", "must be at least one");
        }
        if !(self.region_slack.is_finite() && self.region_slack >= 0.0) {
            return invalid("region_slack", "must be finite and non-negative");
        }
        Ok(())
    }
    /// The style new strokes start with.
    pub fn stroke_style(&self) -> Result<StrokeStyle, ConfigError> {
        self.validate()?;
        let color = Color::from_array(self.line_color).map_err(|_| ConfigError::InvalidValue {
            field: "line_color",
            reason: "every channel must be finite",
        })?;
        Ok(StrokeStyle {
            color,
            width: self.line_width,
            alpha: self.line_alpha,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{ConfigError, SketchConfig};
    use crate::image::ImageRenderingMode;

    #[test]
    fn missing_fields_default() {
        let config = SketchConfig::from_toml_str("line_width = 4.5\nrendering_mode = \"scale\"")
            .unwrap();
        assert_eq!(config.line_width, 4.5);
        assert_eq!(config.rendering_mode, ImageRenderingMode::Scale);
        assert_eq!(config.max_samples_per_stroke, 1000);
        assert_eq!(config.line_color, [0.0, 0.0, 0.0, 1.0]);
    }
    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            SketchConfig::from_toml_str("line_width = 0.0"),
            Err(ConfigError::InvalidValue {
                field: "line_width",
                ..
            })
        ));
        assert!(matches!(
            SketchConfig::from_toml_str("line_alpha = 1.5"),
            Err(ConfigError::InvalidValue {
                field: "line_alpha",
                ..
            })
        ));
        assert!(matches!(
            SketchConfig::from_toml_str("max_samples_per_stroke = 0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            SketchConfig::from_toml_str("line_width = \"wide\""),
            Err(ConfigError::Toml(_))
        ));
    }
    #[test]
    fn saved_config_reloads() {
        let config = SketchConfig {
            line_alpha: 0.25,
            ..SketchConfig::default()
        };
        let string = config.to_toml_string().unwrap();
        assert!(string.starts_with('#'));
        assert_eq!(SketchConfig::from_toml_str(&string).unwrap(), config);
    }
    #[test]
    fn style_from_defaults() {
        let style = SketchConfig::default().stroke_style().unwrap();
        assert_eq!(style, crate::stroke::StrokeStyle::default());
    }
}
