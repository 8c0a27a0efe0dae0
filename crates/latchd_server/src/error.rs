//! Error types for the access-control server.

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the access-control server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The reader device sent nothing within the read timeout.
    #[error("connection read timed out")]
    ReadTimeout,

    /// The credential payload was not valid UTF-8.
    #[error("credential payload is not UTF-8: {0}")]
    InvalidPayload(#[from] std::str::Utf8Error),

    /// The GPIO sysfs interface is missing or rejected a pin operation.
    #[error("gpio unavailable: {0}")]
    GpioUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ServerError::GpioUnavailable("no /sys/class/gpio".into());
        assert!(err.to_string().contains("/sys/class/gpio"));
        assert_eq!(ServerError::ReadTimeout.to_string(), "connection read timed out");
    }
}
