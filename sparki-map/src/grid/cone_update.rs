//! Rangefinder cone update for the confidence grid.
//!
//! One reading covers a narrow cone around the robot heading. For each cell
//! inside the cone and within range:
//!
//! - **In front of the reading** (`distance < reading`): free-space evidence.
//!   Two multipliers compound: one by angular closeness to the cone edge,
//!   one by absolute distance from the robot.
//! - **At or behind the reading**: obstacle evidence banded by how far past
//!   the reading the cell lies. Cells more than 7cm past it are left alone.
//!
//! ```text
//!   edge tier (deg to nearest edge)   range band (cm)      past reading (cm)
//!   <= 2  x0.80                       < 10   x0.70         <= 2  x1.4
//!   <= 4  x0.90                       <= 20  x0.80         <= 5  x1.2
//!   <= 7  x0.95                       <= 30  x0.85         <= 7  x1.1
//!                                     else   x0.90         else  -
//! ```

use super::config::ConeConfig;
use super::sink::GridSink;
use super::storage::ConfidenceGrid;
use crate::core::math::{bearing_deg, distance};
use crate::core::Pose;

/// Free-space multiplier by angle (degrees) to the nearest cone edge
pub fn edge_multiplier(angle_to_edge: f64) -> Option<f64> {
    if angle_to_edge <= 2.0 {
        Some(0.8)
    } else if angle_to_edge <= 4.0 {
        Some(0.9)
    } else if angle_to_edge <= 7.0 {
        Some(0.95)
    } else {
        None
    }
}

/// Free-space multiplier by distance (cm) from the robot
///
/// Callers only pass cells within the configured max range.
pub fn range_multiplier(distance: f64) -> f64 {
    if distance < 10.0 {
        0.7
    } else if distance <= 20.0 {
        0.8
    } else if distance <= 30.0 {
        0.85
    } else {
        0.9
    }
}

/// Obstacle multiplier by distance (cm) past the reading
pub fn obstacle_multiplier(past_reading: f64) -> Option<f64> {
    if past_reading <= 2.0 {
        Some(1.4)
    } else if past_reading <= 5.0 {
        Some(1.2)
    } else if past_reading <= 7.0 {
        Some(1.1)
    } else {
        None
    }
}

/// What one reading says about one cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellEvidence {
    /// Outside the cone or beyond max range
    Skipped,
    /// Between the robot and the reading
    Free {
        edge: Option<f64>,
        range: f64,
    },
    /// At or just past the reading
    Obstacle(f64),
    /// Too far past the reading to say anything
    Unresolved,
}

impl CellEvidence {
    /// Multipliers to apply, in order
    pub fn multipliers(&self) -> impl Iterator<Item = f64> {
        let (a, b) = match *self {
            CellEvidence::Free { edge, range } => (edge, Some(range)),
            CellEvidence::Obstacle(m) => (Some(m), None),
            CellEvidence::Skipped | CellEvidence::Unresolved => (None, None),
        };
        a.into_iter().chain(b)
    }
}

/// Counters for one or more sweeps
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Sweeps performed
    pub passes: usize,
    /// Cells inside the cone and range, summed over passes
    pub cells_in_cone: usize,
    /// Cells that received free-space evidence
    pub free_cells: usize,
    /// Cells that received obstacle evidence
    pub obstacle_cells: usize,
}

impl SweepStats {
    fn merge(&mut self, other: SweepStats) {
        self.passes += other.passes;
        self.cells_in_cone += other.cells_in_cone;
        self.free_cells += other.free_cells;
        self.obstacle_cells += other.obstacle_cells;
    }
}

/// Cone model of the rangefinder
#[derive(Clone, Debug)]
pub struct ConeMapper {
    config: ConeConfig,
}

impl ConeMapper {
    pub fn new(config: ConeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConeConfig {
        &self.config
    }

    /// Classify the cell at `(x, y)` for a reading taken from `pose`
    pub fn classify(&self, pose: &Pose, x: f64, y: f64, reading_cm: f64) -> CellEvidence {
        let dist = distance(pose.x, pose.y, x, y);
        if dist > self.config.max_range_cm {
            return CellEvidence::Skipped;
        }

        // No wraparound: at heading 0 the cone spans bearings [0, 7]
        let bearing = bearing_deg(pose.x, pose.y, x, y);
        let half = self.config.half_angle_deg;
        let upper = pose.heading_deg + half;
        let lower = pose.heading_deg - half;
        if bearing > upper || bearing < lower {
            return CellEvidence::Skipped;
        }

        if dist < reading_cm {
            let to_upper_edge = upper - bearing;
            let to_lower_edge = bearing - lower;
            CellEvidence::Free {
                edge: edge_multiplier(to_upper_edge.min(to_lower_edge)),
                range: range_multiplier(dist),
            }
        } else {
            match obstacle_multiplier(dist - reading_cm) {
                Some(m) => CellEvidence::Obstacle(m),
                None => CellEvidence::Unresolved,
            }
        }
    }

    /// One sweep: apply a reading to every cell it covers
    ///
    /// Evidence goes into `grid` and is forwarded to `sink`; the frame is
    /// committed on both once the sweep is done.
    pub fn sweep<S: GridSink + ?Sized>(
        &self,
        grid: &mut ConfidenceGrid,
        pose: &Pose,
        reading_cm: f64,
        sink: &mut S,
    ) -> SweepStats {
        let mut stats = SweepStats {
            passes: 1,
            ..SweepStats::default()
        };

        // Cells outside the range box cannot be within max range
        let (Some(xs), Some(ys)) = (
            self.span(pose.x, grid.width()),
            self.span(pose.y, grid.height()),
        ) else {
            grid.commit_frame();
            sink.commit_frame();
            return stats;
        };

        for y in ys {
            for x in xs.clone() {
                let evidence = self.classify(pose, x as f64, y as f64, reading_cm);
                match evidence {
                    CellEvidence::Skipped => continue,
                    CellEvidence::Free { .. } => stats.free_cells += 1,
                    CellEvidence::Obstacle(_) => stats.obstacle_cells += 1,
                    CellEvidence::Unresolved => {}
                }
                stats.cells_in_cone += 1;

                for m in evidence.multipliers() {
                    grid.apply_evidence(y, x, m);
                    sink.submit_evidence(y, x, m);
                }
            }
        }

        grid.commit_frame();
        sink.commit_frame();
        stats
    }

    /// Run the configured number of sweeps with the same reading
    ///
    /// Repeating the sweep does not add information; it compounds the
    /// same evidence `passes` times.
    pub fn integrate<S: GridSink + ?Sized>(
        &self,
        grid: &mut ConfidenceGrid,
        pose: &Pose,
        reading_cm: f64,
        sink: &mut S,
    ) -> SweepStats {
        let mut total = SweepStats::default();
        for _ in 0..self.config.passes {
            total.merge(self.sweep(grid, pose, reading_cm, sink));
        }

        log::debug!(
            "ConeMapper: reading={}cm at ({:.1}, {:.1}, {:.1}°): {} passes, {} free / {} obstacle cell updates",
            reading_cm,
            pose.x,
            pose.y,
            pose.heading_deg,
            total.passes,
            total.free_cells,
            total.obstacle_cells
        );
        total
    }

    /// Index range of cells within max range of `center` along one axis
    fn span(&self, center: f64, len: usize) -> Option<std::ops::Range<usize>> {
        let r = self.config.max_range_cm;
        let lo = (center - r).floor().max(0.0);
        let hi = ((center + r).ceil() + 1.0).min(len as f64);
        (hi > lo).then(|| lo as usize..hi as usize)
    }
}

/// Occupancy grid plus the cone model that feeds it
#[derive(Clone, Debug)]
pub struct OccupancyMapper {
    grid: ConfidenceGrid,
    cone: ConeMapper,
}

impl OccupancyMapper {
    pub fn new(grid: ConfidenceGrid, cone: ConeConfig) -> Self {
        Self {
            grid,
            cone: ConeMapper::new(cone),
        }
    }

    pub fn grid(&self) -> &ConfidenceGrid {
        &self.grid
    }

    /// Fuse one rangefinder reading taken at `pose`
    pub fn integrate_reading<S: GridSink + ?Sized>(
        &mut self,
        pose: &Pose,
        reading_cm: u32,
        sink: &mut S,
    ) -> SweepStats {
        self.cone
            .integrate(&mut self.grid, pose, f64::from(reading_cm), sink)
    }
}
