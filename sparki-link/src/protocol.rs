//! Sparki link protocol
//!
//! Outbound: one opcode byte, optionally followed by one parameter byte
//! (only `Servo` carries one). Inbound: ASCII text terminated by `*`.
//!
//! ```text
//! host -> robot   [OPCODE] [PARAM?]
//! robot -> host   "<ascii>*"
//! ```
//!
//! Motion opcodes are fire-and-forget; `RequestPing` and `RequestWheels`
//! are answered with one framed response each.

use crate::error::{Error, Result};

/// Response frame terminator
pub const FRAME_TERMINATOR: u8 = b'*';

/// Servo angle accepted by [`servo_byte`] (degrees, left positive)
pub const SERVO_MIN_ANGLE: i32 = -90;
/// Servo angle accepted by [`servo_byte`] (degrees, left positive)
pub const SERVO_MAX_ANGLE: i32 = 90;

/// Servo pointing straight ahead
pub const SERVO_CENTER: i32 = 0;
/// Servo pointing fully left
pub const SERVO_LEFT: i32 = 90;
/// Servo pointing fully right
pub const SERVO_RIGHT: i32 = -90;

/// Opcodes understood by the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Status acknowledgement; reserved, never sent by the host
    StatusOk = 0,
    MoveForward = 1,
    MoveBackward = 2,
    MoveLeft = 3,
    MoveRight = 4,
    /// Point the rangefinder mast; followed by one angle byte in 0..=180
    Servo = 5,
    /// Request one rangefinder reading (cm)
    RequestPing = 6,
    /// Request cumulative wheel step counts ("left right")
    RequestWheels = 7,
    MoveStop = 8,
}

impl Opcode {
    /// Wire byte
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the firmware answers this opcode with a framed response
    pub fn expects_response(self) -> bool {
        matches!(self, Opcode::RequestPing | Opcode::RequestWheels)
    }

    /// Opcode name for logging
    pub fn name(self) -> &'static str {
        match self {
            Opcode::StatusOk => "StatusOk",
            Opcode::MoveForward => "MoveForward",
            Opcode::MoveBackward => "MoveBackward",
            Opcode::MoveLeft => "MoveLeft",
            Opcode::MoveRight => "MoveRight",
            Opcode::Servo => "Servo",
            Opcode::RequestPing => "RequestPing",
            Opcode::RequestWheels => "RequestWheels",
            Opcode::MoveStop => "MoveStop",
        }
    }
}

/// Outbound command: opcode plus optional parameter byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    pub opcode: Opcode,
    pub param: Option<u8>,
}

impl CommandFrame {
    /// Frame without a parameter
    pub const fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            param: None,
        }
    }

    /// Servo frame for an angle in [-90, 90]
    ///
    /// Fails with `InvalidParameter` before anything is encoded.
    pub fn servo(angle: i32) -> Result<Self> {
        Ok(Self {
            opcode: Opcode::Servo,
            param: Some(servo_byte(angle)?),
        })
    }

    /// Serialize to wire bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match self.param {
            Some(param) => vec![self.opcode.as_u8(), param],
            None => vec![self.opcode.as_u8()],
        }
    }
}

/// Map a servo angle in [-90, 90] onto the firmware's 0..=180 byte (`90 - angle`)
pub fn servo_byte(angle: i32) -> Result<u8> {
    if !(SERVO_MIN_ANGLE..=SERVO_MAX_ANGLE).contains(&angle) {
        return Err(Error::InvalidParameter(format!(
            "Invalid servo angle: {}",
            angle
        )));
    }
    Ok((90 - angle) as u8)
}

/// Cumulative wheel step counters reported by the firmware
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WheelSteps {
    pub left: i32,
    pub right: i32,
}

impl WheelSteps {
    pub const fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }
}

/// Parse a ping response body as a distance in centimeters
///
/// Negative values are rejected: the firmware uses them for "no echo",
/// which the host treats the same as a failed reading.
pub fn parse_ping(text: &str) -> Result<u32> {
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| Error::InvalidResponse(format!("ping: {:?}", text)))?;
    u32::try_from(value)
        .map_err(|_| Error::InvalidResponse(format!("ping out of range: {}", value)))
}

/// Parse a wheel response body: two space-separated step counts
///
/// Tokens after the second are ignored.
pub fn parse_wheels(text: &str) -> Result<WheelSteps> {
    let mut fields = text.split_whitespace();
    let mut next = |side: &str| -> Result<i32> {
        let field = fields
            .next()
            .ok_or_else(|| Error::InvalidResponse(format!("wheels: missing {} count in {:?}", side, text)))?;
        field
            .parse()
            .map_err(|_| Error::InvalidResponse(format!("wheels: bad {} count {:?}", side, field)))
    };
    let left = next("left")?;
    let right = next("right")?;
    Ok(WheelSteps { left, right })
}

/// How a framed read ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStatus {
    /// Terminator seen
    Complete,
    /// A character did not arrive within its timeout
    TimedOut,
    /// The transport reported a read error
    Failed(String),
}

/// Result of reading one `*`-terminated frame
///
/// `text` never includes the terminator. On timeout or failure it holds
/// whatever arrived before the read stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedRead {
    pub text: String,
    pub status: FrameStatus,
}

impl FramedRead {
    /// Convert to a structured result, dropping partial text on failure
    pub fn into_result(self) -> Result<String> {
        match self.status {
            FrameStatus::Complete => Ok(self.text),
            FrameStatus::TimedOut => Err(Error::Timeout),
            FrameStatus::Failed(msg) => Err(Error::ReadFailed(msg)),
        }
    }
}
