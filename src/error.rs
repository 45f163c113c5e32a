/*!
 * Error types for the TuringDB client
 */

use std::fmt;
use std::io;

use crate::protocol::s3::S3Error;

pub type Result<T> = std::result::Result<T, TuringError>;

/// Remote error code reported when the pinned change no longer exists
pub const CHANGE_NOT_FOUND: &str = "CHANGE_NOT_FOUND";

/// Remote error code reported when loading a graph that is already loaded
pub const GRAPH_ALREADY_EXISTS: &str = "GRAPH_ALREADY_EXISTS";

#[derive(Debug)]
pub enum TuringError {
    /// Unsupported domain pairing or directory transfer
    Unimplemented(String),

    /// A two-hop transfer was requested with scratch space disabled
    ScratchDisabled,

    /// A required collaborator (query channel, object store) is missing
    NotConnected(String),

    /// Session pin conflict
    InvalidState(String),

    /// Server-reported failure, surfaced verbatim
    Remote {
        message: String,
        details: Option<String>,
    },

    /// Response payload does not have the expected shape
    MalformedResponse(String),

    /// HTTP transport failure (connection refused, non-2xx status, ...)
    Transport(String),

    /// Request did not complete within the active timeout
    Timeout(String),

    /// Object-store adapter failure, carried unchanged
    ObjectStore(S3Error),

    /// Local I/O error
    Io(io::Error),

    /// Configuration error
    Config(String),
}

impl TuringError {
    /// Build a remote error from the `error` / `error_details` fields
    pub fn remote(message: impl Into<String>, details: Option<String>) -> Self {
        TuringError::Remote {
            message: message.into(),
            details,
        }
    }

    /// Whether the server reported that the pinned change is gone.
    ///
    /// Recovery (resetting the pin with `checkout`) is up to the caller.
    pub fn is_change_not_found(&self) -> bool {
        matches!(self, TuringError::Remote { message, .. } if message == CHANGE_NOT_FOUND)
    }

    /// Check if this error can never succeed on a plain retry
    pub fn is_permanent(&self) -> bool {
        match self {
            TuringError::Unimplemented(_)
            | TuringError::ScratchDisabled
            | TuringError::NotConnected(_)
            | TuringError::InvalidState(_)
            | TuringError::MalformedResponse(_)
            | TuringError::Config(_) => true,

            TuringError::ObjectStore(e) => !e.is_retryable(),

            TuringError::Remote { .. }
            | TuringError::Transport(_)
            | TuringError::Timeout(_)
            | TuringError::Io(_) => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            TuringError::Unimplemented(_) => ErrorCategory::Unsupported,
            TuringError::ScratchDisabled | TuringError::Config(_) => ErrorCategory::Configuration,
            TuringError::NotConnected(_) | TuringError::InvalidState(_) => ErrorCategory::State,
            TuringError::Remote { .. } => ErrorCategory::Remote,
            TuringError::MalformedResponse(_) => ErrorCategory::Protocol,
            TuringError::Transport(_) | TuringError::Timeout(_) => ErrorCategory::Network,
            TuringError::ObjectStore(_) => ErrorCategory::Storage,
            TuringError::Io(_) => ErrorCategory::IoError,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unsupported transfer pairing
    Unsupported,
    /// Configuration preconditions
    Configuration,
    /// Client/session state
    State,
    /// Server-reported errors
    Remote,
    /// Payload shape violations
    Protocol,
    /// Transport and timeouts
    Network,
    /// Object-store adapter
    Storage,
    /// Local I/O
    IoError,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Unsupported => write!(f, "unsupported"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::State => write!(f, "state"),
            ErrorCategory::Remote => write!(f, "remote"),
            ErrorCategory::Protocol => write!(f, "protocol"),
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Storage => write!(f, "storage"),
            ErrorCategory::IoError => write!(f, "io"),
        }
    }
}

impl fmt::Display for TuringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuringError::Unimplemented(reason) => {
                write!(f, "Not implemented: {}", reason)
            }
            TuringError::ScratchDisabled => {
                write!(
                    f,
                    "Scratch space is disabled: transfer to S3 first, then to the destination"
                )
            }
            TuringError::NotConnected(what) => {
                write!(f, "Not connected: {}", what)
            }
            TuringError::InvalidState(reason) => {
                write!(f, "Invalid session state: {}", reason)
            }
            TuringError::Remote { message, details } => match details {
                Some(details) => write!(f, "{}: {}", message, details),
                None => write!(f, "{}", message),
            },
            TuringError::MalformedResponse(reason) => {
                write!(f, "Malformed response: {}", reason)
            }
            TuringError::Transport(msg) => {
                write!(f, "Transport error: {}", msg)
            }
            TuringError::Timeout(msg) => {
                write!(f, "Request timed out: {}", msg)
            }
            TuringError::ObjectStore(err) => {
                write!(f, "{}", err)
            }
            TuringError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            TuringError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
        }
    }
}

impl std::error::Error for TuringError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuringError::Io(err) => Some(err),
            TuringError::ObjectStore(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TuringError {
    fn from(err: io::Error) -> Self {
        TuringError::Io(err)
    }
}

impl From<S3Error> for TuringError {
    fn from(err: S3Error) -> Self {
        TuringError::ObjectStore(err)
    }
}

impl From<serde_json::Error> for TuringError {
    fn from(err: serde_json::Error) -> Self {
        TuringError::MalformedResponse(format!("JSON parse error: {}", err))
    }
}

impl From<reqwest::Error> for TuringError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TuringError::Timeout(err.to_string())
        } else if err.is_decode() {
            TuringError::MalformedResponse(err.to_string())
        } else {
            TuringError::Transport(err.to_string())
        }
    }
}
