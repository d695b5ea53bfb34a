#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

//! Configuration for the Mesto client.
//!
//! Layout: `defaults.rs` (built-in values), `model.rs` (typed config and
//! backend constants), `validate.rs` (URL, link and timeout parsing),
//! `loader.rs` (environment lookup), `error.rs` (`ConfigError`).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    ENV_API_URL, ENV_HTTP_TIMEOUT, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_MONGODB_URL,
    ENV_SECRET_SIGNING_KEY, ENV_TOKEN_PATH, default_token_path,
};
pub use model::{BackendConstants, ClientConfig, ConfigOverrides};
pub use validate::{
    URL_PATTERN, URL_REGEX, is_valid_link, parse_api_url, parse_timeout_secs, validate_link,
};
