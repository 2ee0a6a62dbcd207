//! Configuration types for the occupancy grid.

use serde::{Deserialize, Serialize};

/// Grid configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid width in cells (one cell per centimeter)
    #[serde(default = "default_width")]
    pub width: usize,

    /// Grid height in cells
    #[serde(default = "default_height")]
    pub height: usize,

    /// Confidence every cell starts at (must be > 0)
    #[serde(default = "default_initial_confidence")]
    pub initial_confidence: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            initial_confidence: default_initial_confidence(),
        }
    }
}

impl GridConfig {
    /// Check that the grid can be allocated and the invariant `confidence > 0` holds
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "grid must be non-empty (got {}x{})",
                self.width, self.height
            ));
        }
        if !(self.initial_confidence.is_finite() && self.initial_confidence > 0.0) {
            return Err(format!(
                "initial_confidence must be a positive number (got {})",
                self.initial_confidence
            ));
        }
        Ok(())
    }
}

/// Rangefinder cone configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConeConfig {
    /// Half-width of the sensor cone around the heading (degrees)
    #[serde(default = "default_half_angle_deg")]
    pub half_angle_deg: f64,

    /// Cells farther than this from the robot are never updated (cm)
    #[serde(default = "default_max_range_cm")]
    pub max_range_cm: f64,

    /// Full-grid sweeps per reading; each sweep reapplies the same reading
    #[serde(default = "default_passes")]
    pub passes: usize,
}

impl Default for ConeConfig {
    fn default() -> Self {
        Self {
            half_angle_deg: default_half_angle_deg(),
            max_range_cm: default_max_range_cm(),
            passes: default_passes(),
        }
    }
}

impl ConeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.half_angle_deg > 0.0 && self.half_angle_deg < 180.0) {
            return Err(format!(
                "half_angle_deg must be in (0, 180) (got {})",
                self.half_angle_deg
            ));
        }
        if self.max_range_cm.is_nan() || self.max_range_cm <= 0.0 {
            return Err(format!(
                "max_range_cm must be positive (got {})",
                self.max_range_cm
            ));
        }
        Ok(())
    }
}

fn default_width() -> usize {
    500
}
fn default_height() -> usize {
    500
}
fn default_initial_confidence() -> f64 {
    1.0
}
fn default_half_angle_deg() -> f64 {
    7.0
}
fn default_max_range_cm() -> f64 {
    50.0
}
fn default_passes() -> usize {
    15
}
