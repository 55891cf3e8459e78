/// Structured error types for filedesk-core.
///
/// Every flow catches these at its boundary and turns them into a single
/// user-facing alert. The binary (filedesk-cli) wraps them with `anyhow`
/// for its own plumbing.

use std::io;

use reqwest::StatusCode;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for client flows
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (connection refused, DNS, timeout)
    #[error("request failed: {source}")]
    Transport { source: BoxError },

    /// The server answered with a non-success status
    #[error("server answered {status}")]
    Status { status: StatusCode },

    /// The response body was not the JSON shape the flow expects
    #[error("unexpected response body from {endpoint}: {source}")]
    Decode { endpoint: String, source: BoxError },

    /// Upload was triggered with an empty file picker
    #[error("no file selected")]
    NoFileSelected,

    /// The file was already uploaded during this session
    #[error("'{filename}' was already uploaded in this session")]
    DuplicateUpload { filename: String },

    /// Local I/O failed (reading the file to upload)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for filedesk-core operations
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Create a transport error from any underlying failure
    pub fn transport(source: impl Into<BoxError>) -> Self {
        Self::Transport {
            source: source.into(),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self::Status { status }
    }

    /// Create a decode error for the given endpoint
    pub fn decode(endpoint: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }

    pub fn duplicate_upload(filename: impl Into<String>) -> Self {
        Self::DuplicateUpload {
            filename: filename.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Map a reqwest failure that happened while sending
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status { status },
            None => Self::transport(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::status(StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "server answered 401 Unauthorized");

        let err = ClientError::duplicate_upload("a.txt");
        assert_eq!(
            err.to_string(),
            "'a.txt' was already uploaded in this session"
        );
    }

    #[test]
    fn test_transport_keeps_source() {
        let err = ClientError::transport(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert!(matches!(err, ClientError::Transport { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: ClientError = io_err.into();

        assert!(matches!(err, ClientError::Io { .. }));
    }
}
