//! In-place left turn driven by wheel step polling.

use serde::{Deserialize, Serialize};
use sparki_map::PoseEstimator;
use std::time::Duration;

use crate::robot::RobotLink;

/// Turn maneuver configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TurnConfig {
    /// Commanded rotation as measured by the wheels (degrees).
    /// 57 measured degrees is a 90 degree physical turn on the stock robot.
    #[serde(default = "default_target_deg")]
    pub target_deg: f64,

    /// Accepted band around the target (degrees)
    #[serde(default = "default_tolerance_deg")]
    pub tolerance_deg: f64,

    /// Heading change credited to the pose when a turn ends (degrees)
    #[serde(default = "default_heading_increment_deg")]
    pub heading_increment_deg: f64,

    /// Motor run time between wheel polls (ms)
    #[serde(default = "default_poll_delay_ms")]
    pub poll_delay_ms: u64,

    /// Upper bound on polls before the turn is abandoned
    #[serde(default = "default_max_polls")]
    pub max_polls: usize,
}

fn default_target_deg() -> f64 {
    57.0
}
fn default_tolerance_deg() -> f64 {
    2.0
}
fn default_heading_increment_deg() -> f64 {
    90.0
}
fn default_poll_delay_ms() -> u64 {
    200
}
fn default_max_polls() -> usize {
    100
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            target_deg: default_target_deg(),
            tolerance_deg: default_tolerance_deg(),
            heading_increment_deg: default_heading_increment_deg(),
            poll_delay_ms: default_poll_delay_ms(),
            max_polls: default_max_polls(),
        }
    }
}

impl TurnConfig {
    pub fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.poll_delay_ms)
    }

    /// Lowest measured rotation that ends the turn
    pub fn lower_bound(&self) -> f64 {
        self.target_deg - self.tolerance_deg
    }

    pub fn upper_bound(&self) -> f64 {
        self.target_deg + self.tolerance_deg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.target_deg.is_nan() || self.target_deg <= 0.0 {
            return Err(format!("turn target must be positive, got {}", self.target_deg));
        }
        if self.tolerance_deg.is_nan()
            || self.tolerance_deg < 0.0
            || self.tolerance_deg >= self.target_deg
        {
            return Err(format!(
                "turn tolerance must be in [0, {}), got {}",
                self.target_deg, self.tolerance_deg
            ));
        }
        if self.max_polls == 0 {
            return Err("turn max_polls must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Result of one turn maneuver
#[derive(Clone, Debug, PartialEq)]
pub struct TurnOutcome {
    /// Wheel polls made inside the loop
    pub polls: usize,
    /// Rotation measured at the last good poll (degrees)
    pub turned_deg: f64,
    /// Whether the measured rotation reached the lower bound
    pub completed: bool,
}

/// Left turn in place until the wheels report the target rotation.
#[derive(Clone, Debug)]
pub struct TurnManeuver {
    config: TurnConfig,
}

impl TurnManeuver {
    pub fn new(config: TurnConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TurnConfig {
        &self.config
    }

    /// Run the turn and credit the heading change to `estimator`.
    ///
    /// Each poll is move-left, delay, wheel read, stop. Rotation is measured
    /// against the estimator's baseline. Afterwards the motors are stopped,
    /// the heading advances by `heading_increment_deg` and the baseline is
    /// reset to the current wheel count. Not cancellable once started.
    pub fn execute<R: RobotLink + ?Sized>(
        &self,
        robot: &mut R,
        estimator: &mut PoseEstimator,
    ) -> TurnOutcome {
        let lower = self.config.lower_bound();
        let delay = self.config.poll_delay();

        let mut turned = 0.0;
        let mut polls = 0;
        let mut last_steps = None;

        robot.move_left();
        while turned < lower && polls < self.config.max_polls {
            robot.move_left();
            robot.delay(delay);
            match robot.request_wheels() {
                Ok(steps) => {
                    let current = f64::from(steps.left);
                    turned = estimator.turned_degrees(current);
                    last_steps = Some(current);
                }
                Err(e) => log::warn!("[Turn] Wheel poll {} failed: {}", polls + 1, e),
            }
            robot.stop();
            polls += 1;
        }
        robot.stop();

        let completed = turned >= lower;
        if !completed {
            log::warn!(
                "[Turn] Gave up after {} polls at {:.1}° (target {:.1}°)",
                polls,
                turned,
                self.config.target_deg
            );
        } else if turned > self.config.upper_bound() {
            log::warn!(
                "[Turn] Overshot: {:.1}° (target {:.1}° ± {:.1}°)",
                turned,
                self.config.target_deg,
                self.config.tolerance_deg
            );
        }

        estimator.rotate(self.config.heading_increment_deg);

        let baseline = match robot.request_wheels() {
            Ok(steps) => Some(f64::from(steps.left)),
            Err(e) => {
                log::warn!("[Turn] Baseline read failed: {}", e);
                last_steps
            }
        };
        if let Some(steps) = baseline {
            estimator.set_baseline(steps);
        }

        log::debug!(
            "[Turn] {:.1}° in {} polls, heading now {:.0}°",
            turned,
            polls,
            estimator.pose().heading_deg
        );

        TurnOutcome {
            polls,
            turned_deg: turned,
            completed,
        }
    }
}
