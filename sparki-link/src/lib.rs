//! SparkiLink - serial command/response link to the Sparki robot
//!
//! The robot firmware executes single-byte opcodes and answers requests with
//! `*`-terminated ASCII text. This crate provides:
//!
//! - [`transport`]: byte transport seam ([`SerialTransport`] at 9600 8N1, and a
//!   scripted [`MockTransport`] for hardware-free testing)
//! - [`protocol`]: opcode table, command frames, response parsing
//! - [`link`]: [`SparkiLink`], the request/response session used by the
//!   control loop
//!
//! The link is half-duplex and strictly request/response: each command
//! completes (or times out) before the next one is written.

pub mod config;
pub mod error;
pub mod link;
pub mod protocol;
pub mod transport;

// Re-export commonly used types
pub use config::LinkConfig;
pub use error::{Error, Result};
pub use link::{SparkiLink, NO_READING};
pub use protocol::{CommandFrame, FrameStatus, FramedRead, Opcode, WheelSteps};
pub use transport::{MockTransport, SerialTransport, Transport};
