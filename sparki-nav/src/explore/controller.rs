//! Explore/Avoid controller.

use serde::{Deserialize, Serialize};
use sparki_map::{ConfidenceGrid, GridSink, OccupancyMapper, Pose, PoseEstimator};
use std::sync::atomic::{AtomicBool, Ordering};

use super::state::{CycleOutcome, ExploreState, Reading};
use super::turn::{TurnConfig, TurnManeuver};
use crate::config::SparkiConfig;
use crate::robot::RobotLink;

/// Explore phase configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExploreConfig {
    /// Readings strictly below this distance trigger a turn (cm)
    #[serde(default = "default_obstacle_threshold_cm")]
    pub obstacle_threshold_cm: u32,
}

fn default_obstacle_threshold_cm() -> u32 {
    25
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            obstacle_threshold_cm: default_obstacle_threshold_cm(),
        }
    }
}

/// Reactive exploration controller.
///
/// Owns the pose estimate and the map. Each [`step`](Self::step) is either
/// one Explore cycle (ping, map, forward, odometry) or one Avoid turn.
pub struct ExploreController {
    config: ExploreConfig,
    turn: TurnManeuver,
    estimator: PoseEstimator,
    mapper: OccupancyMapper,
    state: ExploreState,
    cycles: u64,
}

impl ExploreController {
    pub fn new(
        config: ExploreConfig,
        turn: TurnConfig,
        estimator: PoseEstimator,
        mapper: OccupancyMapper,
    ) -> Self {
        Self {
            config,
            turn: TurnManeuver::new(turn),
            estimator,
            mapper,
            state: ExploreState::Explore,
            cycles: 0,
        }
    }

    /// Controller at the grid center, facing +X
    pub fn from_config(config: &SparkiConfig) -> Self {
        let grid = ConfidenceGrid::from_config(&config.grid);
        let start = Pose::grid_center(grid.width(), grid.height());
        Self::new(
            config.explore.clone(),
            config.turn.clone(),
            PoseEstimator::new(start, config.robot.clone()),
            OccupancyMapper::new(grid, config.cone.clone()),
        )
    }

    pub fn state(&self) -> ExploreState {
        self.state
    }

    pub fn pose(&self) -> Pose {
        self.estimator.pose()
    }

    pub fn estimator(&self) -> &PoseEstimator {
        &self.estimator
    }

    pub fn mapper(&self) -> &OccupancyMapper {
        &self.mapper
    }

    pub fn grid(&self) -> &ConfidenceGrid {
        self.mapper.grid()
    }

    /// Steps completed so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Use the robot's current left wheel count as the odometry baseline.
    ///
    /// The firmware counters are cumulative, so this must run before the
    /// first cycle or the first move is credited with all prior travel.
    pub fn sync_baseline<R: RobotLink + ?Sized>(&mut self, robot: &mut R) -> bool {
        match robot.request_wheels() {
            Ok(steps) => {
                self.estimator.set_baseline(f64::from(steps.left));
                log::info!("[Explore] Odometry baseline at {} steps", steps.left);
                true
            }
            Err(e) => {
                log::warn!("[Explore] Could not read wheels for baseline: {}", e);
                false
            }
        }
    }

    /// Run one cycle of the state machine
    pub fn step<R, S>(&mut self, robot: &mut R, sink: &mut S) -> CycleOutcome
    where
        R: RobotLink + ?Sized,
        S: GridSink + ?Sized,
    {
        let outcome = match self.state {
            ExploreState::Explore => self.explore(robot, sink),
            ExploreState::Avoid => {
                let turn = self.turn.execute(robot, &mut self.estimator);
                self.state = ExploreState::Explore;
                CycleOutcome::Avoided(turn)
            }
        };
        self.cycles += 1;
        outcome
    }

    /// Step until `running` is cleared, then stop the motors.
    ///
    /// The flag is checked between steps; a turn in progress runs to the end.
    /// Returns the number of steps taken.
    pub fn run<R, S>(&mut self, robot: &mut R, sink: &mut S, running: &AtomicBool) -> u64
    where
        R: RobotLink + ?Sized,
        S: GridSink + ?Sized,
    {
        log::info!("[Explore] Starting at {:?}", self.pose());
        let start = self.cycles;

        while running.load(Ordering::SeqCst) {
            self.step(robot, sink);
        }
        robot.stop();

        let stats = self.grid().stats();
        let pose = self.pose();
        log::info!(
            "[Explore] Stopped after {} cycles at ({:.1}, {:.1}, {:.0}°): {} free, {} occupied, {} untouched",
            self.cycles - start,
            pose.x,
            pose.y,
            pose.heading_deg,
            stats.free,
            stats.occupied,
            stats.untouched
        );
        self.cycles - start
    }

    fn explore<R, S>(&mut self, robot: &mut R, sink: &mut S) -> CycleOutcome
    where
        R: RobotLink + ?Sized,
        S: GridSink + ?Sized,
    {
        let reading = match robot.request_ping() {
            Ok(cm) => Reading::Distance(cm),
            Err(e) => {
                log::warn!("[Explore] No ping reading: {}", e);
                Reading::Missing
            }
        };

        let Some(distance_cm) = reading.distance() else {
            // Nothing known ahead; hold position and try again next cycle
            robot.stop();
            return CycleOutcome::Explored {
                reading,
                moved_cm: 0.0,
                sweep: None,
            };
        };

        let pose = self.estimator.pose();
        let sweep = self.mapper.integrate_reading(&pose, distance_cm, sink);

        robot.move_forward();
        let moved_cm = match robot.request_wheels() {
            Ok(steps) => self.estimator.consume_straight(f64::from(steps.left)),
            Err(e) => {
                log::warn!("[Explore] Wheel read failed, no progress credited: {}", e);
                0.0
            }
        };

        if reading.is_obstacle(self.config.obstacle_threshold_cm) {
            log::info!(
                "[Explore] Obstacle at {}cm (threshold {}cm), turning",
                distance_cm,
                self.config.obstacle_threshold_cm
            );
            self.state = ExploreState::Avoid;
        }

        log::debug!(
            "[Explore] Cycle {}: ping {}cm, moved {:.2}cm, pose ({:.1}, {:.1}, {:.0}°)",
            self.cycles,
            distance_cm,
            moved_cm,
            self.estimator.pose().x,
            self.estimator.pose().y,
            self.estimator.pose().heading_deg
        );

        CycleOutcome::Explored {
            reading,
            moved_cm,
            sweep: Some(sweep),
        }
    }
}
