//! Canvas configuration.
//!
//! Values normally come from the application's settings file. Every field
//! has a default so partial configurations load fine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, Result};
use crate::model::ShapeKind;
use crate::undo::DEFAULT_NUM_BACKUPS;

/// Default hit-test radius in screen pixels.
pub const DEFAULT_EPSILON: f64 = 10.0;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// What a double click does while drawing a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DoubleClickAction {
    /// Finish the polygon
    #[default]
    #[serde(rename = "close")]
    Close,
    /// Ignore double clicks
    #[serde(rename = "", alias = "none")]
    Nothing,
}

/// Settings consumed by the canvas engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Hit-test radius in screen pixels, divided by the display scale before use
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Double-click behaviour while drawing
    #[serde(default)]
    pub double_click: DoubleClickAction,

    /// Number of undo steps kept
    #[serde(default = "default_num_backups")]
    pub num_backups: usize,

    /// Whether to draw a full-canvas crosshair while creating each kind
    #[serde(default = "default_crosshair")]
    pub crosshair: BTreeMap<ShapeKind, bool>,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

fn default_num_backups() -> usize {
    DEFAULT_NUM_BACKUPS
}

fn default_crosshair() -> BTreeMap<ShapeKind, bool> {
    ShapeKind::all()
        .iter()
        .map(|&kind| (kind, kind == ShapeKind::Rectangle))
        .collect()
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            double_click: DoubleClickAction::default(),
            num_backups: default_num_backups(),
            crosshair: default_crosshair(),
            log_level: LogLevel::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CanvasConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the canvas cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(CanvasError::invalid_config(format!(
                "epsilon must be a finite, non-negative number, got {}",
                self.epsilon
            )));
        }
        if self.num_backups == 0 {
            return Err(CanvasError::invalid_config(
                "num_backups must be at least 1",
            ));
        }
        Ok(())
    }

    /// Crosshair rendering hint for a shape kind. Missing kinds default to off.
    pub fn crosshair_for(&self, kind: ShapeKind) -> bool {
        self.crosshair.get(&kind).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.epsilon, 10.0);
        assert_eq!(config.num_backups, 10);
        assert_eq!(config.double_click, DoubleClickAction::Close);
        assert!(config.crosshair_for(ShapeKind::Rectangle));
        assert!(!config.crosshair_for(ShapeKind::Polygon));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = CanvasConfig::from_json(r#"{"epsilon": 4.5, "double_click": ""}"#).unwrap();
        assert_eq!(config.epsilon, 4.5);
        assert_eq!(config.double_click, DoubleClickAction::Nothing);
        assert_eq!(config.num_backups, 10);
        assert_eq!(config.crosshair, default_crosshair());
    }

    #[test]
    fn test_crosshair_keys_are_kind_names() {
        let config = CanvasConfig::from_json(r#"{"crosshair": {"linestrip": true}}"#).unwrap();
        assert!(config.crosshair_for(ShapeKind::LineStrip));
        assert!(!config.crosshair_for(ShapeKind::Rectangle));
    }

    #[test]
    fn test_unknown_double_click_is_rejected() {
        assert!(CanvasConfig::from_json(r#"{"double_click": "explode"}"#).is_err());
    }

    #[test]
    fn test_validation() {
        let err = CanvasConfig::from_json(r#"{"epsilon": -1.0}"#).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidConfig { .. }));

        let err = CanvasConfig::from_json(r#"{"num_backups": 0}"#).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidConfig { .. }));
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut config = CanvasConfig::default();
        config.log_level = LogLevel::Debug;
        let json = config.to_json().unwrap();
        assert!(json.contains("\"double_click\": \"close\""));
        assert_eq!(CanvasConfig::from_json(&json).unwrap(), config);
    }
}
