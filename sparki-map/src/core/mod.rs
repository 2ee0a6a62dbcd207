//! Core types shared by the estimator and the mapper.
//!
//! - [`Pose`]: robot position (cells) and heading (degrees)
//! - [`math`]: degree-based angle helpers

pub mod math;
mod pose;

pub use math::{bearing_deg, normalize_degrees};
pub use pose::Pose;
