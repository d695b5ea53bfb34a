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

//! Logging primitives shared across the Mesto workspace.
//!
//! Layout: `init.rs` (subscriber installation and log format), `context.rs`
//! (per-command trace identifiers).

pub mod context;
pub mod init;

pub use context::{current_trace_id, with_trace_context};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
