//! Picker configuration and validation.

use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::ValueRange;

/// Configuration errors, reported when a picker is constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("max ({max}) must be greater than min ({min})")]
    EmptyRange { min: f64, max: f64 },
    #[error("step must be greater than zero, got {0}")]
    InvalidStep(f64),
    #[error("radius is required")]
    MissingRadius,
    #[error("radius must be greater than zero, got {0}")]
    InvalidRadius(f64),
    #[error("radius {radius} does not fit a drawing surface of side {side}")]
    RadiusTooLarge { radius: f64, side: f64 },
    #[error("invalid color '{0}', expected #rgb or #rrggbb")]
    InvalidColor(String),
    #[error("invalid container size {width}x{height}")]
    InvalidContainer { width: f64, height: f64 },
    #[error("invalid options: {0}")]
    Parse(String),
}

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Construction options for a radial picker.
///
/// Every field except `radius` has a default, so `{"radius": 120}` is a
/// complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickerConfig {
    /// Stroke, fill and text color.
    pub color: String,
    /// Lower bound of the value.
    pub min: f64,
    /// Upper bound of the value.
    pub max: f64,
    /// Quantization step.
    pub step: f64,
    /// Track radius in layout units.
    pub radius: Option<f64>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            color: "#000".to_string(),
            min: 0.0,
            max: 100.0,
            step: 1.0,
            radius: None,
        }
    }
}

impl PickerConfig {
    /// Create a configuration with the given radius and default options.
    pub fn new(radius: f64) -> Self {
        Self {
            radius: Some(radius),
            ..Self::default()
        }
    }

    /// Set the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the value bounds.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the quantization step.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every option and return the validated form.
    pub fn validate(&self) -> ConfigResult<ValidatedConfig> {
        let range = ValueRange::new(self.min, self.max, self.step)?;

        let radius = self.radius.ok_or(ConfigError::MissingRadius)?;
        if !radius.is_finite() {
            return Err(ConfigError::NonFinite { field: "radius", value: radius });
        }
        if radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(radius));
        }

        let color = PickerColor::parse(&self.color)?;

        Ok(ValidatedConfig { range, radius, color })
    }
}

/// A configuration that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub range: ValueRange,
    pub radius: f64,
    pub color: PickerColor,
}

/// An opaque sRGB color parsed from a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PickerColor {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    /// Parse `#rgb` or `#rrggbb`.
    pub fn parse(s: &str) -> ConfigResult<Self> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }

        match hex.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (channel, digit) in channels.iter_mut().zip(hex.chars()) {
                    let v = digit.to_digit(16).ok_or_else(invalid)? as u8;
                    *channel = v * 17;
                }
                Ok(Self { r: channels[0], g: channels[1], b: channels[2] })
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
                let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
                let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
                Ok(Self { r, g, b })
            }
            _ => Err(invalid()),
        }
    }

    /// CSS hex form, always `#rrggbb`.
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// The color with the given opacity (0.0–1.0) applied.
    pub fn with_opacity(&self, opacity: f64) -> Color {
        let alpha = (255.0 * opacity.clamp(0.0, 1.0)).round() as u8;
        Color::from_rgba8(self.r, self.g, self.b, alpha)
    }
}

impl From<PickerColor> for Color {
    fn from(color: PickerColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PickerConfig::from_json(r#"{"radius": 120}"#).unwrap();
        assert_eq!(config.color, "#000");
        assert_eq!(config.min, 0.0);
        assert_eq!(config.max, 100.0);
        assert_eq!(config.step, 1.0);

        let validated = config.validate().unwrap();
        assert_eq!(validated.radius, 120.0);
        assert_eq!(validated.color, PickerColor::BLACK);
    }

    #[test]
    fn test_json_camel_case_options() {
        let config = PickerConfig::from_json(
            r##"{"color": "#ff8800", "min": -50, "max": 50, "step": 5, "radius": 80}"##,
        )
        .unwrap();
        let validated = config.validate().unwrap();
        assert_eq!(validated.range.min(), -50.0);
        assert_eq!(validated.range.max(), 50.0);
        assert_eq!(validated.range.step(), 5.0);
        assert_eq!(validated.color, PickerColor { r: 255, g: 136, b: 0 });
    }

    #[test]
    fn test_missing_radius() {
        let config = PickerConfig::default();
        assert_eq!(config.validate(), Err(ConfigError::MissingRadius));
    }

    #[test]
    fn test_invalid_range() {
        let config = PickerConfig::new(100.0).with_range(10.0, 10.0);
        assert!(matches!(config.validate(), Err(ConfigError::EmptyRange { .. })));

        let config = PickerConfig::new(100.0).with_range(10.0, 5.0);
        assert!(matches!(config.validate(), Err(ConfigError::EmptyRange { .. })));
    }

    #[test]
    fn test_invalid_step() {
        let config = PickerConfig::new(100.0).with_step(0.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidStep(0.0)));

        let config = PickerConfig::new(100.0).with_step(-1.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidStep(-1.0)));
    }

    #[test]
    fn test_non_finite_values() {
        let config = PickerConfig::new(100.0).with_range(f64::NAN, 10.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "min", .. })
        ));

        let config = PickerConfig::new(f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "radius", .. })
        ));
    }

    #[test]
    fn test_invalid_radius() {
        assert_eq!(PickerConfig::new(0.0).validate(), Err(ConfigError::InvalidRadius(0.0)));
        assert_eq!(PickerConfig::new(-3.0).validate(), Err(ConfigError::InvalidRadius(-3.0)));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let err = PickerConfig::new(100.0).with_range(5.0, 1.0).validate().unwrap_err();
        assert_eq!(err.to_string(), "max (1) must be greater than min (5)");
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(PickerColor::parse("#000").unwrap(), PickerColor::BLACK);
        assert_eq!(PickerColor::parse("#fff").unwrap(), PickerColor { r: 255, g: 255, b: 255 });
        assert_eq!(PickerColor::parse("#3b82f6").unwrap(), PickerColor { r: 59, g: 130, b: 246 });
        assert_eq!(PickerColor::parse(" #3B82F6 ").unwrap().to_css(), "#3b82f6");
    }

    #[test]
    fn test_parse_color_rejects_garbage() {
        for input in ["", "red", "#12", "#12345", "#gggggg", "3b82f6", "#ééé"] {
            assert!(
                matches!(PickerColor::parse(input), Err(ConfigError::InvalidColor(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            PickerConfig::from_json(r#"{"radius": "big"}"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
