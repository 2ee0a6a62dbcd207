//! Robot abstraction for the control loop.

use sparki_link::{SparkiLink, Transport, WheelSteps};
use std::time::Duration;

/// Commands and readings the control loop needs from a robot.
///
/// [`SparkiLink`] implements this over a serial transport. Tests drive the
/// controller with a simulated robot instead.
pub trait RobotLink {
    /// Request one rangefinder reading in centimeters.
    fn request_ping(&mut self) -> sparki_link::Result<u32>;

    /// Request the cumulative wheel step counters.
    fn request_wheels(&mut self) -> sparki_link::Result<WheelSteps>;

    /// Start driving forward. Failures are logged by the implementation.
    fn move_forward(&mut self);

    /// Start rotating left in place.
    fn move_left(&mut self);

    /// Stop both motors.
    fn stop(&mut self);

    /// Block for `time`.
    fn delay(&mut self, time: Duration);
}

impl<T: Transport> RobotLink for SparkiLink<T> {
    fn request_ping(&mut self) -> sparki_link::Result<u32> {
        SparkiLink::request_ping(self)
    }

    fn request_wheels(&mut self) -> sparki_link::Result<WheelSteps> {
        SparkiLink::request_wheels(self)
    }

    fn move_forward(&mut self) {
        SparkiLink::move_forward(self)
    }

    fn move_left(&mut self) {
        SparkiLink::move_left(self)
    }

    fn stop(&mut self) {
        SparkiLink::stop(self)
    }

    fn delay(&mut self, time: Duration) {
        SparkiLink::delay(self, time)
    }
}
