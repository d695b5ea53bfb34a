//! Error types for configuration loading and validation.

use thiserror::Error;

/// Errors raised while building or validating configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API base URL could not be parsed or used.
    #[error("invalid API URL '{value}': {reason}")]
    InvalidUrl {
        /// Offending value.
        value: String,
        /// Human-readable reason.
        reason: String,
    },
    /// Image or avatar link does not look like an http(s) URL.
    #[error("invalid link '{value}': expected an http(s) URL")]
    InvalidLink {
        /// Offending value.
        value: String,
    },
    /// Link pattern failed to compile.
    #[error("link pattern failed to compile: {detail}")]
    LinkPattern {
        /// Compiler error detail.
        detail: String,
    },
    /// Request timeout was not a whole number of seconds in range.
    #[error("invalid timeout '{value}': {reason}")]
    InvalidTimeout {
        /// Offending value.
        value: String,
        /// Machine-readable reason.
        reason: &'static str,
    },
    /// Neither an explicit token path nor a config directory was available.
    #[error("no config directory: set MESTO_TOKEN_PATH, XDG_CONFIG_HOME or HOME")]
    NoConfigDir,
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
