//! Error types for backend requests and token persistence.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for collaborator calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure taxonomy for calls made against the Mesto backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connect, TLS, timeout).
    #[error("network request failed: {detail}")]
    Network {
        /// Transport-level error description.
        detail: String,
    },
    /// The backend answered with a non-2xx status.
    #[error("request failed with status {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, or the status reason.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode response: {detail}")]
    Decode {
        /// Decoder error description.
        detail: String,
    },
    /// Input was rejected before any request was sent.
    #[error("invalid value for '{field}': {reason}")]
    Validation {
        /// Name of the offending input.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
    /// The persisted token could not be read or written.
    #[error("token storage failed: {detail}")]
    Storage {
        /// Underlying storage error description.
        detail: String,
    },
}

impl ApiError {
    /// Build a validation error for the named field.
    #[must_use]
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// HTTP status carried by the error, when the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised by durable token stores.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Reading or writing the backing file failed.
    #[error("token store io failed for {path}")]
    Io {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The backing file exists but is not a valid token document.
    #[error("token store at {path} is malformed: {detail}")]
    Malformed {
        /// Path of the backing file.
        path: PathBuf,
        /// Parser error description.
        detail: String,
    },
}

impl From<TokenStoreError> for ApiError {
    fn from(err: TokenStoreError) -> Self {
        let detail = match &err {
            TokenStoreError::Io { path, source } => format!("{}: {source}", path.display()),
            TokenStoreError::Malformed { .. } => err.to_string(),
        };
        Self::Storage { detail }
    }
}
