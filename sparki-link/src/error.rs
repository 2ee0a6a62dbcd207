//! Error types for SparkiLink

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// SparkiLink error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port could not be opened or configured
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Write or flush failed mid-operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Read failed mid-frame
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// No byte arrived within the per-character bound
    #[error("Communication timeout")]
    Timeout,

    /// Response body could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Argument rejected before any byte was sent
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Link was used after `disconnect()`
    #[error("Link not connected")]
    NotConnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("Invalid servo angle: 91".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: Invalid servo angle: 91");
        assert_eq!(Error::Timeout.to_string(), "Communication timeout");
    }
}
