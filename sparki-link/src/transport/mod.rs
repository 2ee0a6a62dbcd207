//! Transport layer for I/O abstraction

use crate::error::Result;
use std::time::Duration;

mod mock;
mod serial;
pub use mock::{MockTransport, ReadEvent};
pub use serial::SerialTransport;

/// Byte transport to the robot
///
/// Reads are one byte at a time with a caller-supplied bound, because the
/// response framing relies entirely on the `*` terminator.
pub trait Transport: Send {
    /// Read a single byte, waiting at most `timeout`
    ///
    /// Returns `Error::Timeout` if nothing arrived in time.
    fn read_byte(&mut self, timeout: Duration) -> Result<u8>;

    /// Write data from buffer, returns number of bytes written
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Flush any pending writes (blocking until complete)
    fn flush(&mut self) -> Result<()>;

    /// Write the whole buffer and flush it
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let mut sent = 0;
        while sent < data.len() {
            let n = self.write(&data[sent..])?;
            if n == 0 {
                return Err(std::io::Error::from(std::io::ErrorKind::WriteZero).into());
            }
            sent += n;
        }
        self.flush()
    }
}
