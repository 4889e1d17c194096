//! Canvas configuration (TOML)

use std::time::Duration;

use dotmatrix_paint::{Color, Rotation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse canvas config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize canvas config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Rotation must be 0, 90, 180 or 270 degrees, got {0}")]
    InvalidRotation(u32),

    #[error("Invalid pen color '{0}', expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("Stroke must be at least 1")]
    InvalidStroke,
}

/// Initial canvas settings
///
/// ```toml
/// rotation = 90
/// stroke = 2
/// pen_color = "#FF8000"
/// ignore_out_of_bounds = true
/// min_frame_interval_ms = 33
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Clockwise rotation in degrees
    pub rotation: u32,
    pub stroke: u32,
    /// Hex color string
    pub pen_color: String,
    /// Drop writes outside the drawing area instead of passing them on
    pub ignore_out_of_bounds: bool,
    /// Minimum time between throttled presents
    pub min_frame_interval_ms: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            rotation: 0,
            stroke: 1,
            pen_color: "#FFFFFF".to_string(),
            ignore_out_of_bounds: true,
            min_frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

fn default_frame_interval_ms() -> u64 {
    16
}

impl CanvasConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CanvasConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rotation()?;
        self.pen_color()?;
        if self.stroke == 0 {
            return Err(ConfigError::InvalidStroke);
        }
        Ok(())
    }

    pub fn rotation(&self) -> Result<Rotation, ConfigError> {
        Rotation::from_degrees(self.rotation).ok_or(ConfigError::InvalidRotation(self.rotation))
    }

    pub fn pen_color(&self) -> Result<Color, ConfigError> {
        Color::parse_hex(&self.pen_color)
            .ok_or_else(|| ConfigError::InvalidColor(self.pen_color.clone()))
    }

    pub fn min_frame_interval(&self) -> Duration {
        Duration::from_millis(self.min_frame_interval_ms)
    }
}
