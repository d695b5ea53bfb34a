//! Typed configuration models.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::defaults::{
    DEFAULT_HTTP_TIMEOUT, DEFAULT_LOG_LEVEL, DEFAULT_MONGODB_URL, DEV_SECRET_SIGNING_KEY,
};
use crate::error::ConfigResult;
use crate::validate::{parse_api_url, parse_timeout_secs};

/// Effective client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    /// Base URL of the Mesto API; always ends with `/`.
    pub api_url: Url,
    /// File holding the persisted auth token.
    pub token_path: PathBuf,
    /// Per-request timeout.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Requested log format (`json` or `pretty`); inferred when absent.
    pub log_format: Option<String>,
}

impl ClientConfig {
    /// Configuration with built-in defaults and the given token path.
    #[must_use]
    pub fn with_token_path(api_url: Url, token_path: PathBuf) -> Self {
        Self {
            api_url,
            token_path,
            timeout: DEFAULT_HTTP_TIMEOUT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: None,
        }
    }

    /// Apply command-line overrides on top of this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when an override fails validation.
    pub fn apply(mut self, overrides: ConfigOverrides) -> ConfigResult<Self> {
        if let Some(api_url) = overrides.api_url {
            self.api_url = parse_api_url(&api_url)?;
        }
        if let Some(token_path) = overrides.token_path {
            self.token_path = token_path;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout = parse_timeout_secs(&timeout.to_string())?;
        }
        if let Some(format) = overrides.log_format {
            self.log_format = Some(format);
        }
        Ok(self)
    }
}

/// Values supplied explicitly by the caller (for example CLI flags).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// API base URL.
    pub api_url: Option<String>,
    /// Token file location.
    pub token_path: Option<PathBuf>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Log format name.
    pub log_format: Option<String>,
}

/// Settings the Mesto backend reads from its environment.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConstants {
    /// Key used to sign and verify JWTs.
    pub secret_signing_key: String,
    /// MongoDB connection string.
    pub mongodb_url: String,
}

impl BackendConstants {
    /// Whether the signing key is still the development default.
    #[must_use]
    pub fn uses_dev_secret(&self) -> bool {
        self.secret_signing_key == DEV_SECRET_SIGNING_KEY
    }
}

impl Default for BackendConstants {
    fn default() -> Self {
        Self {
            secret_signing_key: DEV_SECRET_SIGNING_KEY.to_string(),
            mongodb_url: DEFAULT_MONGODB_URL.to_string(),
        }
    }
}

impl fmt::Debug for BackendConstants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConstants")
            .field("secret_signing_key", &"<redacted>")
            .field("mongodb_url", &self.mongodb_url)
            .finish()
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub(super) fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn base() -> anyhow::Result<ClientConfig> {
        Ok(ClientConfig::with_token_path(
            parse_api_url("https://api.example.com")?,
            PathBuf::from("/tmp/mesto/session.json"),
        ))
    }

    #[test]
    fn overrides_replace_only_given_fields() -> anyhow::Result<()> {
        let config = base()?.apply(ConfigOverrides {
            timeout_secs: Some(3),
            ..ConfigOverrides::default()
        })?;
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.api_url.as_str(), "https://api.example.com/");
        assert_eq!(config.log_level, "info");

        let config = config.apply(ConfigOverrides {
            api_url: Some("http://localhost:3000".into()),
            token_path: Some(PathBuf::from("session.json")),
            log_format: Some("json".into()),
            ..ConfigOverrides::default()
        })?;
        assert_eq!(config.api_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.token_path, PathBuf::from("session.json"));
        assert_eq!(config.log_format.as_deref(), Some("json"));
        Ok(())
    }

    #[test]
    fn invalid_override_is_rejected() -> anyhow::Result<()> {
        let err = base()?
            .apply(ConfigOverrides {
                timeout_secs: Some(0),
                ..ConfigOverrides::default()
            })
            .err();
        assert!(matches!(err, Some(ConfigError::InvalidTimeout { .. })));
        Ok(())
    }

    #[test]
    fn config_serializes_timeout_as_seconds() -> anyhow::Result<()> {
        let value = serde_json::to_value(base()?)?;
        assert_eq!(value["timeout"], 10);
        assert_eq!(value["api_url"], "https://api.example.com/");
        Ok(())
    }

    #[test]
    fn backend_debug_redacts_secret() {
        let constants = BackendConstants::default();
        assert!(constants.uses_dev_secret());
        let rendered = format!("{constants:?}");
        assert!(!rendered.contains(DEV_SECRET_SIGNING_KEY));
        assert!(rendered.contains("mestodb"));
    }
}
