//! Exploration state and per-cycle results.

use sparki_link::NO_READING;
use sparki_map::SweepStats;

use super::turn::TurnOutcome;

/// Phase of the control loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExploreState {
    /// Sense, map, drive forward
    #[default]
    Explore,
    /// Obstacle seen; turn before exploring again
    Avoid,
}

/// Outcome of one rangefinder request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reading {
    /// Distance in centimeters
    Distance(u32),
    /// Request timed out or the response was unusable
    Missing,
}

impl Reading {
    pub fn distance(&self) -> Option<u32> {
        match self {
            Reading::Distance(cm) => Some(*cm),
            Reading::Missing => None,
        }
    }

    /// Legacy integer form: centimeters, or -1 when missing
    pub fn as_sentinel(&self) -> i32 {
        match self {
            Reading::Distance(cm) => i32::try_from(*cm).unwrap_or(NO_READING),
            Reading::Missing => NO_READING,
        }
    }

    /// True when the reading is closer than `threshold_cm`.
    ///
    /// A missing reading is never an obstacle.
    pub fn is_obstacle(&self, threshold_cm: u32) -> bool {
        matches!(self, Reading::Distance(cm) if *cm < threshold_cm)
    }
}

/// What one controller step did.
#[derive(Clone, Debug, PartialEq)]
pub enum CycleOutcome {
    /// An Explore cycle ran
    Explored {
        reading: Reading,
        /// Distance credited to the pose (cm)
        moved_cm: f64,
        /// Mapper work for this reading; `None` when the reading was missing
        sweep: Option<SweepStats>,
    },
    /// An Avoid turn ran
    Avoided(TurnOutcome),
}

impl CycleOutcome {
    pub fn reading(&self) -> Option<Reading> {
        match self {
            CycleOutcome::Explored { reading, .. } => Some(*reading),
            CycleOutcome::Avoided(_) => None,
        }
    }

    pub fn moved_cm(&self) -> f64 {
        match self {
            CycleOutcome::Explored { moved_cm, .. } => *moved_cm,
            CycleOutcome::Avoided(_) => 0.0,
        }
    }

    pub fn turn(&self) -> Option<&TurnOutcome> {
        match self {
            CycleOutcome::Avoided(turn) => Some(turn),
            CycleOutcome::Explored { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reading_is_not_an_obstacle() {
        assert!(!Reading::Missing.is_obstacle(25));
        assert_eq!(Reading::Missing.as_sentinel(), -1);
        assert_eq!(Reading::Missing.distance(), None);
    }

    #[test]
    fn test_obstacle_threshold_is_strict() {
        assert!(Reading::Distance(24).is_obstacle(25));
        assert!(!Reading::Distance(25).is_obstacle(25));
        assert_eq!(Reading::Distance(24).as_sentinel(), 24);
    }
}
