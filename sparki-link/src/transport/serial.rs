//! Serial transport implementation

use super::Transport;
use crate::config::LinkConfig;
use crate::error::{Error, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{Read, Write};
use std::time::Duration;

/// Serial transport for the Sparki UART (USB or Bluetooth)
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    /// Timeout currently programmed into the port
    timeout: Duration,
}

impl SerialTransport {
    /// Open a serial port at 9600 baud, 8 data bits, 1 stop bit, no parity
    ///
    /// # Arguments
    /// * `config` - Device path and read timeout
    pub fn open(config: &LinkConfig) -> Result<Self> {
        config.validate()?;
        let timeout = config.read_timeout();

        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(timeout)
            .open()?;

        log::info!(
            "Opened serial port: {} at {} baud (8N1)",
            config.port,
            config.baud_rate
        );

        Ok(SerialTransport { port, timeout })
    }
}

impl Transport for SerialTransport {
    fn read_byte(&mut self, timeout: Duration) -> Result<u8> {
        if timeout != self.timeout {
            self.port.set_timeout(timeout)?;
            self.timeout = timeout;
        }

        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Ok(byte[0]),
            Ok(_) => Err(Error::Timeout),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(Error::Timeout),
            Err(e) => Err(Error::ReadFailed(e.to_string())),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        Ok(self.port.write(data)?)
    }

    fn flush(&mut self) -> Result<()> {
        self.port.flush()?;
        Ok(())
    }
}
