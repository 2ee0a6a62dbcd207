//! Occupancy grid implementation.
//!
//! - [`ConfidenceGrid`]: per-cell confidence storage
//! - [`cone_update`]: rangefinder cone model that turns one reading into
//!   multiplicative evidence
//! - [`GridSink`]: seam for an external renderer

mod config;
pub mod cone_update;
mod sink;
mod storage;

pub use config::{ConeConfig, GridConfig};
pub use cone_update::{CellEvidence, ConeMapper, OccupancyMapper, SweepStats};
pub use sink::{GridSink, NullSink};
pub use storage::{ConfidenceGrid, GridStats};
