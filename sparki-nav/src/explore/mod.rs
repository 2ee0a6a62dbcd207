//! Reactive exploration.
//!
//! Two-state loop: drive forward while mapping each rangefinder reading,
//! and turn left in place when something is closer than the obstacle
//! threshold.

mod controller;
mod state;
mod turn;

pub use controller::{ExploreConfig, ExploreController};
pub use state::{CycleOutcome, ExploreState, Reading};
pub use turn::{TurnConfig, TurnManeuver, TurnOutcome};
