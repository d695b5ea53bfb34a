//! Validation helpers and parsing utilities for configuration values.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::defaults::MAX_HTTP_TIMEOUT_SECS;
use crate::error::{ConfigError, ConfigResult};

/// Pattern the backend accepts for card images and avatars.
pub const URL_PATTERN: &str = r"https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&//=]*)";

/// Compiled [`URL_PATTERN`], built on first use.
pub static URL_REGEX: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(URL_PATTERN));

fn url_regex() -> ConfigResult<&'static Regex> {
    URL_REGEX
        .as_ref()
        .map_err(|source| ConfigError::LinkPattern {
            detail: source.to_string(),
        })
}

/// Whether `link` matches the backend's link pattern.
#[must_use]
pub fn is_valid_link(link: &str) -> bool {
    url_regex().is_ok_and(|regex| regex.is_match(link))
}

/// Reject links the backend would refuse, before any request is made.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidLink`] when `link` does not match [`URL_PATTERN`].
pub fn validate_link(link: &str) -> ConfigResult<()> {
    if url_regex()?.is_match(link) {
        Ok(())
    } else {
        Err(ConfigError::InvalidLink {
            value: link.to_string(),
        })
    }
}

/// Parse the API base URL, normalising the path to end with `/` so relative
/// endpoint paths join underneath it.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] for unparsable input, non-http(s)
/// schemes, missing hosts, or URLs carrying a query or fragment.
pub fn parse_api_url(input: &str) -> ConfigResult<Url> {
    let invalid = |reason: &str| ConfigError::InvalidUrl {
        value: input.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(input.trim()).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("host is required"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse a request timeout given in whole seconds.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTimeout`] for non-numeric, zero or
/// out-of-range values.
pub fn parse_timeout_secs(input: &str) -> ConfigResult<Duration> {
    let secs: u64 = input
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout {
            value: input.to_string(),
            reason: "must be a whole number of seconds",
        })?;
    if secs == 0 || secs > MAX_HTTP_TIMEOUT_SECS {
        return Err(ConfigError::InvalidTimeout {
            value: input.to_string(),
            reason: "must be between 1 and 300 seconds",
        });
    }
    Ok(Duration::from_secs(secs))
}
