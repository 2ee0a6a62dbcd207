//! Link configuration
//!
//! Only the device path and the per-character read timeout are tunable.
//! Framing (8 data bits, 1 stop bit, no parity) is fixed by the firmware.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Baud rate the Sparki firmware listens at
pub const SPARKI_BAUD_RATE: u32 = 9600;

/// Serial link configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkConfig {
    /// Serial device path (e.g., "/dev/cu.ArcBotics-DevB" for the Bluetooth module)
    #[serde(default = "default_port")]
    pub port: String,

    /// Baud rate; must match the firmware (9600)
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Timeout for each character of a response frame (milliseconds)
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

impl LinkConfig {
    /// Config for a given device path with reference timeouts
    pub fn for_port(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }

    /// Per-character read timeout
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Reject values the firmware cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.baud_rate != SPARKI_BAUD_RATE {
            return Err(Error::InvalidParameter(format!(
                "baud_rate must be {} (got {})",
                SPARKI_BAUD_RATE, self.baud_rate
            )));
        }
        if self.read_timeout_ms == 0 {
            return Err(Error::InvalidParameter(
                "read_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

fn default_port() -> String {
    "/dev/cu.ArcBotics-DevB".to_string()
}
fn default_baud_rate() -> u32 {
    SPARKI_BAUD_RATE
}
fn default_read_timeout_ms() -> u64 {
    1000
}
