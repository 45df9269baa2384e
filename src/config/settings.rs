//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::pcbnew::engine::layers;
use crate::pcbnew::BoardDefaults;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Fallback layers and sizes for new board items.
    #[serde(default)]
    pub board: BoardDefaults,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let board = &self.board;

        if board.graphic_line_width.is_nan() || board.graphic_line_width <= 0.0 {
            return Err(ConfigError::validation(format!(
                "board.graphic_line_width must be positive, got {}",
                board.graphic_line_width
            )));
        }
        if board.fallback_via_drill.is_nan() || board.fallback_via_drill <= 0.0 {
            return Err(ConfigError::validation(format!(
                "board.fallback_via_drill must be positive, got {}",
                board.fallback_via_drill
            )));
        }

        let named_layers = [
            ("board.copper_layer", &board.copper_layer),
            ("board.graphic_layer", &board.graphic_layer),
            ("board.via_layer_pair[0]", &board.via_layer_pair.0),
            ("board.via_layer_pair[1]", &board.via_layer_pair.1),
        ];
        for (field, name) in named_layers {
            if name.trim().is_empty() {
                return Err(ConfigError::validation(format!("{field} must not be empty")));
            }
        }

        // Copper-only settings are checked against the standard layer table
        for (field, name) in [
            ("board.copper_layer", &board.copper_layer),
            ("board.via_layer_pair[0]", &board.via_layer_pair.0),
            ("board.via_layer_pair[1]", &board.via_layer_pair.1),
        ] {
            if !layers::parse(name).is_some_and(|id| id.is_copper()) {
                return Err(ConfigError::validation(format!(
                    "{field} '{name}' is not a copper layer"
                )));
            }
        }

        if layers::parse(&board.graphic_layer).is_none() {
            return Err(ConfigError::validation(format!(
                "board.graphic_layer '{}' is not a known layer",
                board.graphic_layer
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            )));
        }

        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let json = r"{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.board, BoardDefaults::default());
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "board": {
                "copper_layer": "B.Cu",
                "graphic_layer": "Dwgs.User",
                "graphic_line_width": 0.2,
                "via_layer_pair": ["In1.Cu", "F.Cu"],
                "fallback_via_drill": 0.3
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.board.copper_layer, "B.Cu");
        assert_eq!(config.board.graphic_layer, "Dwgs.User");
        assert!((config.board.graphic_line_width - 0.2).abs() < f64::EPSILON);
        assert_eq!(
            config.board.via_layer_pair,
            ("In1.Cu".to_string(), "F.Cu".to_string())
        );
        assert!((config.board.fallback_via_drill - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn board_defaults() {
        let defaults = BoardDefaults::default();
        assert_eq!(defaults.copper_layer, "F.Cu");
        assert_eq!(defaults.graphic_layer, "F.SilkS");
        assert!((defaults.graphic_line_width - 0.15).abs() < f64::EPSILON);
        assert!((defaults.fallback_via_drill - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn reject_non_positive_widths() {
        let json = r#"{ "board": { "graphic_line_width": 0.0 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());

        let json = r#"{ "board": { "fallback_via_drill": -0.1 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_non_copper_via_layer() {
        let json = r#"{ "board": { "via_layer_pair": ["B.Cu", "F.SilkS"] } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("via_layer_pair[1]"));
    }

    #[test]
    fn reject_empty_graphic_layer() {
        let json = r#"{ "board": { "graphic_layer": " " } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_misspelt_graphic_layer() {
        let json = r#"{ "board": { "graphic_layer": "F.Silks" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("F.Silks"));

        let json = r#"{ "board": { "graphic_layer": "Edge.Cuts" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reject_invalid_log_level() {
        let json = r#"{ "logging": { "level": "loud" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{
            "unknown_field": "value"
        }"#;

        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());

        let json = r#"{ "board": { "track_width": 0.3 } }"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
