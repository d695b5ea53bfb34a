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

//! Transport implementations of the Mesto collaborator traits.
//!
//! Layout:
//! - `http.rs`: `MestoClient`, the `reqwest` implementation of `AuthApi` and `GalleryApi`
//! - `response.rs`: status checking and error classification
//! - `token_store.rs`: `FileTokenStore`, a JSON file standing in for browser local storage

pub mod http;
pub mod response;
pub mod token_store;

pub use http::{HEADER_REQUEST_ID, MestoClient};
pub use response::{check_empty, check_response};
pub use token_store::FileTokenStore;
