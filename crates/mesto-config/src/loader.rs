//! Environment-driven configuration loading.
//!
//! # Design
//! - Loading goes through a lookup closure so tests never touch the process environment.
//! - Empty variables count as unset.

use std::path::PathBuf;

use tracing::warn;

use crate::defaults::{CONFIG_DIR_NAME, DEFAULT_API_URL, TOKEN_FILE_NAME};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{BackendConstants, ClientConfig};
use crate::validate::{parse_api_url, parse_timeout_secs};

/// API base URL.
pub const ENV_API_URL: &str = "MESTO_API_URL";
/// Token file location.
pub const ENV_TOKEN_PATH: &str = "MESTO_TOKEN_PATH";
/// Request timeout in seconds.
pub const ENV_HTTP_TIMEOUT: &str = "MESTO_HTTP_TIMEOUT_SECS";
/// Log format (`json` or `pretty`).
pub const ENV_LOG_FORMAT: &str = "MESTO_LOG_FORMAT";
/// Default log filter.
pub const ENV_LOG_LEVEL: &str = "MESTO_LOG_LEVEL";
/// Backend JWT signing key.
pub const ENV_SECRET_SIGNING_KEY: &str = "SECRET_SIGNING_KEY";
/// Backend database URL.
pub const ENV_MONGODB_URL: &str = "MONGODB_URL";

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Default token file: `$XDG_CONFIG_HOME/mesto/session.json`, falling back to
/// `$HOME/.config/mesto/session.json`.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] when neither variable is set.
pub fn default_token_path(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<PathBuf> {
    let root = non_empty(&lookup, "XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty(&lookup, "HOME").map(|home| PathBuf::from(home).join(".config")))
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(root.join(CONFIG_DIR_NAME).join(TOKEN_FILE_NAME))
}

impl ClientConfig {
    /// Build configuration from variables resolved by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set to an invalid value, or when no
    /// token path can be derived.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let api_url = non_empty(&lookup, ENV_API_URL);
        let api_url = parse_api_url(api_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        let token_path = match non_empty(&lookup, ENV_TOKEN_PATH) {
            Some(path) => PathBuf::from(path),
            None => default_token_path(&lookup)?,
        };

        let mut config = Self::with_token_path(api_url, token_path);
        if let Some(timeout) = non_empty(&lookup, ENV_HTTP_TIMEOUT) {
            config.timeout = parse_timeout_secs(&timeout)?;
        }
        if let Some(level) = non_empty(&lookup, ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_format = non_empty(&lookup, ENV_LOG_FORMAT);
        Ok(config)
    }

    /// Build configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_lookup`].
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl BackendConstants {
    /// Resolve backend settings, falling back to development defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let constants = Self {
            secret_signing_key: non_empty(&lookup, ENV_SECRET_SIGNING_KEY)
                .unwrap_or(defaults.secret_signing_key),
            mongodb_url: non_empty(&lookup, ENV_MONGODB_URL).unwrap_or(defaults.mongodb_url),
        };
        if constants.uses_dev_secret() {
            warn!("SECRET_SIGNING_KEY unset; using the development signing key");
        }
        constants
    }

    /// Resolve backend settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;
    use crate::defaults::{DEFAULT_HTTP_TIMEOUT, DEFAULT_MONGODB_URL};

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_home_is_set() -> anyhow::Result<()> {
        let config = ClientConfig::from_lookup(env(&[("HOME", "/home/jacques")]))?;
        assert_eq!(
            config.api_url.as_str(),
            "https://api.elrouss.mesto.nomoredomains.work/"
        );
        assert_eq!(
            config.token_path,
            PathBuf::from("/home/jacques/.config/mesto/session.json")
        );
        assert_eq!(config.timeout, DEFAULT_HTTP_TIMEOUT);
        assert!(config.log_format.is_none());
        Ok(())
    }

    #[test]
    fn xdg_config_home_wins_over_home() -> anyhow::Result<()> {
        let path = default_token_path(env(&[("HOME", "/home/a"), ("XDG_CONFIG_HOME", "/cfg")]))?;
        assert_eq!(path, PathBuf::from("/cfg/mesto/session.json"));
        Ok(())
    }

    #[test]
    fn environment_overrides_defaults() -> anyhow::Result<()> {
        let config = ClientConfig::from_lookup(env(&[
            (ENV_API_URL, "http://localhost:3000"),
            (ENV_TOKEN_PATH, "/run/mesto.json"),
            (ENV_HTTP_TIMEOUT, "25"),
            (ENV_LOG_FORMAT, "json"),
            (ENV_LOG_LEVEL, "debug"),
        ]))?;
        assert_eq!(config.api_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.token_path, PathBuf::from("/run/mesto.json"));
        assert_eq!(config.timeout, Duration::from_secs(25));
        assert_eq!(config.log_format.as_deref(), Some("json"));
        assert_eq!(config.log_level, "debug");
        Ok(())
    }

    #[test]
    fn missing_config_dir_is_reported() {
        assert_eq!(
            ClientConfig::from_lookup(env(&[])).err(),
            Some(ConfigError::NoConfigDir)
        );
        assert!(ClientConfig::from_lookup(env(&[(ENV_TOKEN_PATH, "t.json")])).is_ok());
    }

    #[test]
    fn invalid_values_fail_loading() {
        let err = ClientConfig::from_lookup(env(&[("HOME", "/h"), (ENV_HTTP_TIMEOUT, "soon")]));
        assert!(matches!(err, Err(ConfigError::InvalidTimeout { .. })));

        let err = ClientConfig::from_lookup(env(&[("HOME", "/h"), (ENV_API_URL, "mesto")]));
        assert!(matches!(err, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn backend_constants_fall_back_to_dev_defaults() {
        let constants = BackendConstants::from_lookup(env(&[(ENV_MONGODB_URL, "")]));
        assert!(constants.uses_dev_secret());
        assert_eq!(constants.mongodb_url, DEFAULT_MONGODB_URL);

        let constants = BackendConstants::from_lookup(env(&[
            (ENV_SECRET_SIGNING_KEY, "prod-secret"),
            (ENV_MONGODB_URL, "mongodb://db:27017/mesto"),
        ]));
        assert!(!constants.uses_dev_secret());
        assert_eq!(constants.mongodb_url, "mongodb://db:27017/mesto");
    }
}
