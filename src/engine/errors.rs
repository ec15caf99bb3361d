use thiserror::Error;
use tracing::{debug, error, warn};

use crate::engine::types::DataType;

/// Errors surfaced by the session layer.
///
/// Everything up to `InvalidArgument` is detected locally, before any request
/// reaches the transport.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClientError {
    #[error("Type mismatch for {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: DataType,
        found: DataType,
    },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidRange { start: i64, end: i64 },

    #[error("Invalid downsample interval: {0} (must be > 0)")]
    InvalidInterval(i64),

    #[error("Invalid filter expression: {0}")]
    InvalidFilterSyntax(String),

    #[error("Empty selection: at least one path is required")]
    EmptySelection,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Request rejected by server ({code}): {message}")]
    Rejected { code: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// True for errors raised by local validation, which never touch the wire.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::TypeMismatch { .. }
                | ClientError::ShapeMismatch(_)
                | ClientError::InvalidRange { .. }
                | ClientError::InvalidInterval(_)
                | ClientError::InvalidFilterSyntax(_)
                | ClientError::EmptySelection
                | ClientError::InvalidArgument(_)
        )
    }

    pub fn log_error(&self) {
        match self {
            ClientError::MalformedResponse(e) => {
                error!("Malformed response: {}", e);
                debug!("Malformed response details: {:?}", self);
            }
            ClientError::TransportError(e) => {
                error!("Transport failure: {}", e);
            }
            ClientError::AuthError(e) => {
                error!("Authentication failed: {}", e);
            }
            ClientError::Rejected { code, message } => {
                warn!("Server rejected request ({}): {}", code, message);
            }
            ClientError::Config(e) => {
                error!("Configuration error: {}", e);
            }
            other => {
                warn!("Request rejected locally: {}", other);
                debug!("Validation error details: {:?}", other);
            }
        }
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(e: config::ConfigError) -> Self {
        ClientError::Config(e.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::TransportError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
