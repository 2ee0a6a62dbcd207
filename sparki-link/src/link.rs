//! Request/response session with the Sparki firmware
//!
//! Every transport failure is caught here. Motion commands log and carry
//! on; requests come in two flavors:
//!
//! - `request_*` return a structured [`Result`] for callers that want to
//!   match on timeouts and parse failures
//! - [`SparkiLink::ping`] / [`SparkiLink::total_travel`] keep the firmware's
//!   sentinel contract (`-1`, zeroed counters) for callers that don't

use crate::config::LinkConfig;
use crate::error::{Error, Result};
use crate::protocol::{
    parse_ping, parse_wheels, CommandFrame, FrameStatus, FramedRead, Opcode, WheelSteps,
    FRAME_TERMINATOR, SERVO_CENTER,
};
use crate::transport::{SerialTransport, Transport};
use std::thread;
use std::time::Duration;

/// Ping value reported when no reading is available
pub const NO_READING: i32 = -1;

/// Link session to one robot
///
/// Owns the transport exclusively; one command is in flight at a time.
pub struct SparkiLink<T: Transport> {
    /// `None` after `disconnect()`
    transport: Option<T>,
    config: LinkConfig,
    /// Last angle successfully commanded to the servo
    servo_angle: i32,
}

impl SparkiLink<SerialTransport> {
    /// Open the serial port and center the servo
    ///
    /// Failure to open the port is the only fatal link error.
    pub fn open(config: &LinkConfig) -> Result<Self> {
        log::info!("Connecting to {}", config.port);
        let transport = SerialTransport::open(config)?;
        let mut link = Self::new(transport, config.clone());
        link.connect()?;
        log::info!("Connected");
        Ok(link)
    }
}

impl<T: Transport> SparkiLink<T> {
    /// Wrap an already-open transport
    pub fn new(transport: T, config: LinkConfig) -> Self {
        Self {
            transport: Some(transport),
            config,
            servo_angle: SERVO_CENTER,
        }
    }

    /// Bring the robot into a known state: mast pointing forward
    pub fn connect(&mut self) -> Result<()> {
        if self.transport.is_none() {
            return Err(Error::NotConnected);
        }
        self.servo(SERVO_CENTER)
    }

    /// Stop the motors and release the transport
    pub fn disconnect(&mut self) {
        if self.transport.is_none() {
            return;
        }
        log::info!("Disconnecting {}", self.config.port);
        self.stop();
        self.transport = None;
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Angle last sent to the servo (degrees, left positive)
    pub fn servo_angle(&self) -> i32 {
        self.servo_angle
    }

    // ---------------------------------------------------------------------
    // Motion (fire-and-forget)
    // ---------------------------------------------------------------------

    pub fn move_forward(&mut self) {
        self.send_motion(Opcode::MoveForward);
    }

    pub fn move_backward(&mut self) {
        self.send_motion(Opcode::MoveBackward);
    }

    pub fn move_left(&mut self) {
        self.send_motion(Opcode::MoveLeft);
    }

    pub fn move_right(&mut self) {
        self.send_motion(Opcode::MoveRight);
    }

    pub fn stop(&mut self) {
        self.send_motion(Opcode::MoveStop);
    }

    fn send_motion(&mut self, opcode: Opcode) {
        if let Err(e) = self.send(CommandFrame::new(opcode)) {
            log::warn!("{} failed: {}", opcode.name(), e);
        }
    }

    /// Point the rangefinder mast
    ///
    /// # Arguments
    /// * `angle` - Degrees in [-90, 90], positive to the left
    ///
    /// Out-of-range angles fail with `InvalidParameter` before any byte is
    /// written. Transport failures are logged, not returned.
    pub fn servo(&mut self, angle: i32) -> Result<()> {
        let frame = CommandFrame::servo(angle)?;
        match self.send(frame) {
            Ok(()) => self.servo_angle = angle,
            Err(e) => log::warn!("Servo({}) failed: {}", angle, e),
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Requests
    // ---------------------------------------------------------------------

    /// Request one rangefinder reading in centimeters
    pub fn request_ping(&mut self) -> Result<u32> {
        let text = self.request(Opcode::RequestPing)?;
        parse_ping(&text)
    }

    /// Request the cumulative wheel step counters
    pub fn request_wheels(&mut self) -> Result<WheelSteps> {
        let text = self.request(Opcode::RequestWheels)?;
        parse_wheels(&text)
    }

    /// Rangefinder distance in centimeters, or [`NO_READING`] on any failure
    pub fn ping(&mut self) -> i32 {
        match self.request_ping() {
            Ok(cm) => i32::try_from(cm).unwrap_or(NO_READING),
            Err(e) => {
                log::warn!("Ping failed: {}", e);
                NO_READING
            }
        }
    }

    /// Wheel step counters, zeroed on any failure
    pub fn total_travel(&mut self) -> WheelSteps {
        match self.request_wheels() {
            Ok(steps) => steps,
            Err(e) => {
                log::warn!("Wheel request failed: {}", e);
                WheelSteps::default()
            }
        }
    }

    /// Read and log the wheel step counters
    pub fn log_travel(&mut self) -> WheelSteps {
        let steps = self.total_travel();
        log::info!("Left: {} Right: {}", steps.left, steps.right);
        steps
    }

    /// Read one `*`-terminated response frame
    ///
    /// Each character gets its own timeout, so a slow response can take up
    /// to `len * read_timeout` to complete. A timeout or read error ends the
    /// frame early; the partial text is returned and the error is logged.
    pub fn read_framed_string(&mut self) -> FramedRead {
        let timeout = self.config.read_timeout();
        let mut text = String::new();

        let Some(transport) = self.transport.as_mut() else {
            log::warn!("Framed read on closed link");
            return FramedRead {
                text,
                status: FrameStatus::Failed(Error::NotConnected.to_string()),
            };
        };

        loop {
            match transport.read_byte(timeout) {
                Ok(FRAME_TERMINATOR) => {
                    return FramedRead {
                        text,
                        status: FrameStatus::Complete,
                    };
                }
                Ok(byte) => text.push(byte as char),
                Err(Error::Timeout) => {
                    log::warn!(
                        "Response timed out after {} chars ({:?} so far)",
                        text.len(),
                        text
                    );
                    return FramedRead {
                        text,
                        status: FrameStatus::TimedOut,
                    };
                }
                Err(e) => {
                    log::warn!("Response read failed: {}", e);
                    return FramedRead {
                        text,
                        status: FrameStatus::Failed(e.to_string()),
                    };
                }
            }
        }
    }

    /// Block the calling thread
    ///
    /// # Arguments
    /// * `time` - Delay duration; the firmware-side equivalent accepts 0-25.5s
    pub fn delay(&self, time: Duration) {
        thread::sleep(time);
    }

    /// Send a request opcode and read its framed response body
    fn request(&mut self, opcode: Opcode) -> Result<String> {
        if !opcode.expects_response() {
            return Err(Error::InvalidParameter(format!(
                "{} has no response",
                opcode.name()
            )));
        }
        self.send(CommandFrame::new(opcode))?;
        self.read_framed_string().into_result()
    }

    fn send(&mut self, frame: CommandFrame) -> Result<()> {
        let transport = self.transport.as_mut().ok_or(Error::NotConnected)?;
        let bytes = frame.to_bytes();
        log::trace!("TX {}: {:02X?}", frame.opcode.name(), bytes);
        transport.write_all(&bytes)
    }
}

impl<T: Transport> Drop for SparkiLink<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
