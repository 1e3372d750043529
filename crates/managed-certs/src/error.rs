//! Error handling for certificate operations
//!
//! Three layers of errors:
//!
//! - [`ApiError`] - a single request to the Compute API failed
//! - [`OperationError`] - an operation finished (`DONE`) but reported errors
//! - [`CoreError`] - everything a manager call can return
//!
//! # Example
//!
//! ```rust
//! use managed_certs::{ApiError, CoreError};
//!
//! fn describe(err: &CoreError) -> &'static str {
//!     if err.is_not_found() {
//!         "certificate does not exist"
//!     } else if err.is_quota_exceeded() {
//!         "out of quota"
//!     } else if err.is_cancelled() {
//!         "gave up waiting"
//!     } else {
//!         "something else"
//!     }
//! }
//!
//! let err: CoreError = ApiError::Http {
//!     status: 404,
//!     message: "The resource 'cert-a' was not found".to_string(),
//! }
//! .into();
//! assert_eq!(describe(&err), "certificate does not exist");
//! ```

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::operation::Operation;

/// Error code the Compute API uses when a project-level quota is exhausted.
pub const CODE_QUOTA_EXCEEDED: &str = "QUOTA_EXCEEDED";

/// A failed request to the Compute API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The service answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response (connect, TLS, timeout, ...)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not the expected JSON
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot carry resource paths
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Returns true if the resource does not exist (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Http { status: 404, .. })
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http { status: 401 | 403, .. })
    }

    /// Returns true if the request was rate limited (429)
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::Http { status: 429, .. })
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Http { status: 500..=599, .. })
    }

    /// Returns true if the request timed out before a response arrived
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Request(e) if e.is_timeout())
    }
}

/// An operation that reached `DONE` with error detail attached
///
/// Holds the whole terminal operation so callers can inspect every field.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationError {
    operation: Operation,
}

impl OperationError {
    pub fn new(operation: Operation) -> Self {
        Self { operation }
    }

    /// The terminal operation
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn into_operation(self) -> Operation {
        self.operation
    }

    /// Returns true if at least one error entry carries the `QUOTA_EXCEEDED` code
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        self.operation
            .error_entries()
            .iter()
            .any(|e| e.code == CODE_QUOTA_EXCEEDED)
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = &self.operation;
        let errors = op
            .error_entries()
            .iter()
            .map(|e| format!("({}: {})", e.code, e.message))
            .collect::<Vec<_>>()
            .join(", ");

        write!(
            f,
            "operation {} {}. Status: {} ({}), errors: {}",
            op.name,
            op.status,
            op.http_error_message.as_deref().unwrap_or_default(),
            op.http_error_status_code.unwrap_or_default(),
            errors
        )
    }
}

impl std::error::Error for OperationError {}

/// Errors returned by certificate manager calls
#[derive(Error, Debug)]
pub enum CoreError {
    /// The request itself was rejected or never completed; passed through unchanged
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The operation finished with errors
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// Fetching the operation status failed while waiting
    #[error("could not get operation {operation}: {source}")]
    OperationPoll {
        operation: String,
        #[source]
        source: ApiError,
    },

    /// The caller cancelled the wait
    #[error("context canceled")]
    Cancelled,

    /// The caller's deadline passed while waiting
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Profile or config file problem
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for manager operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Returns true if a direct request failed because the resource does not exist
    ///
    /// Only [`CoreError::Api`] qualifies; a 404 while polling an operation is a
    /// poll failure, not an absent certificate.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::Api(e) if e.is_not_found())
    }

    /// Returns true if an operation failed because a quota was exhausted
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, CoreError::Operation(e) if e.is_quota_exceeded())
    }

    /// Returns true if the wait ended because of the caller's context
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoreError::Cancelled | CoreError::DeadlineExceeded)
    }

    /// Returns true if the caller's deadline or a request timeout was hit
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            CoreError::DeadlineExceeded => true,
            CoreError::Api(e) => e.is_timeout(),
            CoreError::OperationPoll { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// The terminal operation, if this error carries one
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            CoreError::Operation(e) => Some(e.operation()),
            _ => None,
        }
    }
}
