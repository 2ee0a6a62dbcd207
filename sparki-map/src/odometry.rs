//! Dead reckoning from wheel step counters.
//!
//! The firmware reports cumulative stepper counts. The estimator keeps the
//! last consumed count as a baseline; the difference to a fresh reading is
//! converted to either straight-line travel or turned angle, depending on
//! which maneuver produced it.

use crate::core::{normalize_degrees, Pose};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Drive geometry used to turn step counts into distance and angle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OdometryConfig {
    /// Stepper steps per wheel revolution
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: f64,

    /// Wheel diameter (cm)
    #[serde(default = "default_wheel_diameter_cm")]
    pub wheel_diameter_cm: f64,

    /// Distance between the wheel contact points (cm)
    #[serde(default = "default_wheel_base_cm")]
    pub wheel_base_cm: f64,
}

impl OdometryConfig {
    /// Steps per centimeter of straight travel (~254.6 for the stock robot)
    #[inline]
    pub fn steps_per_cm(&self) -> f64 {
        self.steps_per_revolution / (self.wheel_diameter_cm * PI)
    }

    /// Steps on one wheel per degree of in-place rotation (~18.9 for the stock robot)
    #[inline]
    pub fn steps_per_degree(&self) -> f64 {
        (self.wheel_base_cm / self.wheel_diameter_cm) * self.steps_per_revolution / 360.0
    }
}

impl Default for OdometryConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: default_steps_per_revolution(),
            wheel_diameter_cm: default_wheel_diameter_cm(),
            wheel_base_cm: default_wheel_base_cm(),
        }
    }
}

fn default_steps_per_revolution() -> f64 {
    4000.0
}
fn default_wheel_diameter_cm() -> f64 {
    5.0
}
fn default_wheel_base_cm() -> f64 {
    8.51
}

/// Pose estimator driven by left-wheel step deltas.
///
/// Straight moves advance x/y along the current heading. Turns are
/// modeled as in-place rotation: [`PoseEstimator::rotate`] changes heading only.
pub struct PoseEstimator {
    pose: Pose,
    /// Step count consumed by the last update
    baseline_steps: f64,
    config: OdometryConfig,
}

impl PoseEstimator {
    /// Create an estimator at `pose` with a zero baseline
    pub fn new(pose: Pose, config: OdometryConfig) -> Self {
        log::debug!(
            "PoseEstimator: Initialized at ({:.1}, {:.1}, {:.1}°), {:.2} steps/cm, {:.2} steps/°",
            pose.x,
            pose.y,
            pose.heading_deg,
            config.steps_per_cm(),
            config.steps_per_degree()
        );

        Self {
            pose,
            baseline_steps: 0.0,
            config,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = Pose::new(pose.x, pose.y, pose.heading_deg);
    }

    pub fn config(&self) -> &OdometryConfig {
        &self.config
    }

    /// Last consumed step count
    pub fn baseline(&self) -> f64 {
        self.baseline_steps
    }

    pub fn set_baseline(&mut self, steps: f64) {
        self.baseline_steps = steps;
    }

    /// Straight-line distance (cm) since the baseline
    #[inline]
    pub fn distance_traveled(&self, current_steps: f64) -> f64 {
        (current_steps - self.baseline_steps).abs() / self.config.steps_per_cm()
    }

    /// In-place rotation (degrees) since the baseline
    #[inline]
    pub fn turned_degrees(&self, current_steps: f64) -> f64 {
        (current_steps - self.baseline_steps).abs() / self.config.steps_per_degree()
    }

    /// Move `distance` cm along the current heading
    pub fn advance(&mut self, distance: f64) {
        let (sin, cos) = self.pose.heading_rad().sin_cos();
        self.pose.x += cos * distance;
        self.pose.y += sin * distance;
    }

    /// Rotate in place by `delta_deg` and keep heading in [0, 360)
    pub fn rotate(&mut self, delta_deg: f64) {
        self.pose.heading_deg = normalize_degrees(self.pose.heading_deg + delta_deg);
    }

    /// Consume a straight-move reading: advance by the traveled distance
    /// and make `current_steps` the new baseline.
    ///
    /// Returns the distance traveled (cm).
    pub fn consume_straight(&mut self, current_steps: f64) -> f64 {
        let distance = self.distance_traveled(current_steps);
        self.advance(distance);
        self.baseline_steps = current_steps;

        if distance > 0.0 {
            log::debug!(
                "PoseEstimator: Moved {:.2}cm -> ({:.1}, {:.1})",
                distance,
                self.pose.x,
                self.pose.y
            );
        }
        distance
    }
}
