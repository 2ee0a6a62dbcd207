//! Mock transport for testing

use super::Transport;
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// One scripted outcome of a `read_byte` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadEvent {
    /// A byte arrives
    Byte(u8),
    /// Nothing arrives within the timeout
    Timeout,
    /// The port reports a read error
    Fail,
}

/// Mock transport for unit testing
///
/// Clones share the same buffers, so a test can keep one handle for
/// inspection while the link owns the other. An exhausted read script
/// behaves like a silent robot (every read times out).
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

struct MockTransportInner {
    read_script: VecDeque<ReadEvent>,
    write_buffer: Vec<u8>,
    fail_writes: bool,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        MockTransport {
            inner: Arc::new(Mutex::new(MockTransportInner {
                read_script: VecDeque::new(),
                write_buffer: Vec::new(),
                fail_writes: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Inject data to be read
    pub fn inject_read(&self, data: &[u8]) {
        self.lock()
            .read_script
            .extend(data.iter().map(|&b| ReadEvent::Byte(b)));
    }

    /// Inject a complete `*`-terminated response frame
    pub fn inject_response(&self, text: &str) {
        self.inject_read(text.as_bytes());
        self.inject_read(b"*");
    }

    /// Inject a read timeout
    pub fn inject_timeout(&self) {
        self.lock().read_script.push_back(ReadEvent::Timeout);
    }

    /// Inject a read failure
    pub fn inject_read_failure(&self) {
        self.lock().read_script.push_back(ReadEvent::Fail);
    }

    /// Make every subsequent write fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Get all written data
    pub fn get_written(&self) -> Vec<u8> {
        self.lock().write_buffer.clone()
    }

    /// Clear written data
    pub fn clear_written(&self) {
        self.lock().write_buffer.clear();
    }

    /// Number of scripted read events not yet consumed
    pub fn pending_reads(&self) -> usize {
        self.lock().read_script.len()
    }
}

impl Transport for MockTransport {
    fn read_byte(&mut self, _timeout: Duration) -> Result<u8> {
        match self.lock().read_script.pop_front() {
            Some(ReadEvent::Byte(b)) => Ok(b),
            Some(ReadEvent::Fail) => Err(Error::ReadFailed("mock read failure".to_string())),
            Some(ReadEvent::Timeout) | None => Err(Error::Timeout),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, "mock write failure").into(),
            );
        }
        inner.write_buffer.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}
