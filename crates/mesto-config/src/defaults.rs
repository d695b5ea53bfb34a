//! Built-in configuration values.
//!
//! # Design
//! - Client defaults point at the public deployment so the CLI works without setup.
//! - Backend defaults are development values; deployments override them through the environment.

use std::time::Duration;

/// Public Mesto API deployment.
pub const DEFAULT_API_URL: &str = "https://api.elrouss.mesto.nomoredomains.work";
/// Per-request timeout applied by the HTTP client.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound accepted for the request timeout, in seconds.
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 300;
/// Directory (under the config root) holding client state.
pub const CONFIG_DIR_NAME: &str = "mesto";
/// File name of the persisted session.
pub const TOKEN_FILE_NAME: &str = "session.json";
/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Development JWT signing key used when `SECRET_SIGNING_KEY` is unset.
pub const DEV_SECRET_SIGNING_KEY: &str =
    "U2FsdGVkX19nV2KreWqHk1BGD+ojOGgl39N93rtj1DVVSeYcdNPGnAQt4PtU2FvJrEiPtoQRACJ0B/yIORhjvQ==";
/// Local database used when `MONGODB_URL` is unset.
pub const DEFAULT_MONGODB_URL: &str = "mongodb://127.0.0.1:27017/mestodb";
