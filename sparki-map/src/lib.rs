//! # Sparki-Map: dead reckoning and cone-based occupancy mapping
//!
//! Mapping support for a robot with one forward-facing rangefinder and
//! stepper-driven differential wheels.
//!
//! ## Quick Start
//!
//! ```rust
//! use sparki_map::{ConeConfig, ConfidenceGrid, NullSink, OccupancyMapper, Pose};
//!
//! let grid = ConfidenceGrid::new(500, 500, 1.0);
//! let mut mapper = OccupancyMapper::new(grid, ConeConfig::default());
//!
//! // Robot at the grid center facing +X sees something 30cm ahead
//! let pose = Pose::new(250.0, 250.0, 0.0);
//! let stats = mapper.integrate_reading(&pose, 30, &mut NullSink);
//! assert_eq!(stats.passes, 15);
//! assert!(mapper.grid().get(280, 250).unwrap() > 1.0);
//! ```
//!
//! ## Coordinate Frame
//!
//! - One grid cell per centimeter; cell `(x, y)` is row `y`, column `x`
//! - The robot starts at the grid center
//! - Heading in degrees, counter-clockwise from +X, in [0, 360)
//!
//! ## Modules
//!
//! - [`core`]: [`Pose`] and degree-based angle helpers
//! - [`odometry`]: [`PoseEstimator`], wheel steps to pose
//! - [`grid`]: [`ConfidenceGrid`], [`ConeMapper`], [`GridSink`]

pub mod core;
pub mod grid;
pub mod odometry;

pub use crate::core::Pose;
pub use grid::{
    CellEvidence, ConeConfig, ConeMapper, ConfidenceGrid, GridConfig, GridSink, GridStats,
    NullSink, OccupancyMapper, SweepStats,
};
pub use odometry::{OdometryConfig, PoseEstimator};
