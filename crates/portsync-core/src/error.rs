//! Error types for portsync operations.
//!
//! Two families of failure exist: fatal errors that abort a run before
//! any remote call (bad configuration, unreadable source file) and
//! per-row errors that are recorded in the batch report and never
//! escalate.

use thiserror::Error;

/// Main error type for portsync operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration invalid or incomplete
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Input file missing or unopenable
    #[error("Source file unreadable: {0}")]
    SourceUnreadable(String),

    /// A data row is missing required fields
    #[error("Malformed source row: {0}")]
    SourceMalformed(String),

    /// Request timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Dashboard unreachable or temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// HTTP request failed for another reason
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// API key rejected by the Dashboard
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Device, port or network not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Dashboard rejected the request payload
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Failed to decode a Dashboard response
    #[error("Failed to parse Dashboard response: {0}")]
    ParseError(String),

    /// Bad base URL or path join
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for portsync operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the stable error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::SourceUnreadable(_) => "SOURCE_UNREADABLE",
            Self::SourceMalformed(_) => "SOURCE_MALFORMED",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns true if this error must abort the run.
    ///
    /// Everything else is recorded against the row that produced it
    /// and the batch continues.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::SourceUnreadable(_) | Self::InvalidEndpoint(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(io) => Self::SourceUnreadable(io.to_string()),
            _ => Self::SourceMalformed(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
