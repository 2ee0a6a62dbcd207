//! SparkiNav - reactive explorer for the Sparki robot
//!
//! Drives a [`sparki_link::SparkiLink`] forward while fusing each
//! rangefinder reading into a [`sparki_map::ConfidenceGrid`], turning left
//! whenever something is too close.
//!
//! - [`config`]: TOML configuration for every crate
//! - [`robot`]: [`RobotLink`], the commands the loop needs
//! - [`explore`]: [`ExploreController`] state machine and turn maneuver

pub mod config;
pub mod error;
pub mod explore;
pub mod robot;

pub use config::{LoggingConfig, SparkiConfig};
pub use error::{NavError, Result};
pub use explore::{
    CycleOutcome, ExploreConfig, ExploreController, ExploreState, Reading, TurnConfig,
    TurnManeuver, TurnOutcome,
};
pub use robot::RobotLink;
