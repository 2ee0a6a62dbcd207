//! Configuration loading for SparkiNav
//!
//! One TOML file, every section optional. An empty file gives the
//! reference calibration of the stock robot.

use crate::error::{NavError, Result};
use crate::explore::{ExploreConfig, TurnConfig};
use serde::{Deserialize, Serialize};
use sparki_link::LinkConfig;
use sparki_map::{ConeConfig, GridConfig, OdometryConfig};
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SparkiConfig {
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub robot: OdometryConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub cone: ConeConfig,
    #[serde(default)]
    pub explore: ExploreConfig,
    #[serde(default)]
    pub turn: TurnConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset (trace, debug, info, warn, error)
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
    "info".to_string()
}

impl SparkiConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: SparkiConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NavError::Config(e.to_string()))
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.link.validate()?;
        self.grid.validate().map_err(NavError::Config)?;
        self.cone.validate().map_err(NavError::Config)?;
        self.turn.validate().map_err(NavError::Config)?;

        let robot = &self.robot;
        if robot.steps_per_revolution <= 0.0
            || robot.wheel_diameter_cm <= 0.0
            || robot.wheel_base_cm <= 0.0
        {
            return Err(NavError::Config(
                "robot geometry values must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_reference_calibration() {
        let config = SparkiConfig::from_toml("").unwrap();
        assert_eq!(config.link.baud_rate, 9600);
        assert_eq!(config.link.read_timeout_ms, 1000);
        assert_eq!(config.grid.width, 500);
        assert_eq!(config.cone.passes, 15);
        assert_eq!(config.explore.obstacle_threshold_cm, 25);
        assert_eq!(config.turn.target_deg, 57.0);
        assert_eq!(config.turn.heading_increment_deg, 90.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_toml_sections() {
        let config = SparkiConfig::from_toml(
            r#"
[link]
port = "/dev/ttyACM0"

[robot]
wheel_base_cm = 8.6

[cone]
passes = 3

[explore]
obstacle_threshold_cm = 30

[turn]
poll_delay_ms = 50

[logging]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.link.port, "/dev/ttyACM0");
        assert_eq!(config.robot.wheel_base_cm, 8.6);
        assert_eq!(config.robot.wheel_diameter_cm, 5.0);
        assert_eq!(config.cone.passes, 3);
        assert_eq!(config.explore.obstacle_threshold_cm, 30);
        assert_eq!(config.turn.poll_delay_ms, 50);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            SparkiConfig::from_toml("[link]\nbaud_rate = 115200"),
            Err(NavError::Link(_))
        ));
        assert!(matches!(
            SparkiConfig::from_toml("[grid]\nwidth = 0"),
            Err(NavError::Config(_))
        ));
        assert!(matches!(
            SparkiConfig::from_toml("[robot]\nwheel_diameter_cm = 0.0"),
            Err(NavError::Config(_))
        ));
        assert!(matches!(
            SparkiConfig::from_toml("[turn]\ntarget_deg = 1.0\ntolerance_deg = 2.0"),
            Err(NavError::Config(_))
        ));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = SparkiConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[link]"));
        assert!(text.contains("[turn]"));
        let parsed = SparkiConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.grid, config.grid);
    }
}
