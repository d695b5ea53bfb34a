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

//! Client-side state machine for the Mesto photo gallery.
//!
//! Layout:
//! - `models.rs`: profile, card and credential DTOs (backend wire format)
//! - `error.rs`: request and token-store error taxonomy
//! - `api.rs`: collaborator traits (auth client, data client, token store)
//! - `busy.rs`: shared in-flight flags with drop-guarded cleanup
//! - `popup.rs`: single-active popup orchestration
//! - `routes.rs`: navigation targets and protected-route resolution
//! - `shell.rs`: UI context shared by the controllers (popups, route, drawer)
//! - `session.rs`: token check, registration, login, logout
//! - `gallery.rs`: profile and card list kept in sync with the backend
//! - `app.rs`: `AppState`, the composed application state

pub mod api;
pub mod app;
pub mod busy;
pub mod error;
pub mod gallery;
pub mod models;
pub mod popup;
pub mod routes;
pub mod session;
pub mod shell;

pub use api::{AuthApi, GalleryApi, MemoryTokenStore, TOKEN_KEY, TokenStore};
pub use app::AppState;
pub use busy::{BusyFlag, BusyGuard};
pub use error::{ApiError, ApiResult, TokenStoreError};
pub use gallery::GalleryStore;
pub use models::{
    AvatarUpdate, Card, CardId, Credentials, Identity, LoginResponse, NewCard, ProfileUpdate,
    UserId, UserProfile,
};
pub use popup::{ClickTarget, PREVIEW_GRACE, PopupOrchestrator, PopupState};
pub use routes::Route;
pub use session::{
    REGISTRATION_REDIRECT_DELAY, REGISTRATION_RESET_DELAY, Session, SessionController,
    SessionStatus,
};
pub use shell::UiShell;

/// Result of a user-initiated action against the state machine.
///
/// Actions never propagate errors: failures are logged where they happen and
/// surface here so callers can render them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The backend confirmed the change and local state was updated.
    Success,
    /// Nothing needed to change, so no request was sent.
    Unchanged,
    /// The backend answered successfully but declined the request
    /// (for example an empty registration document or a missing token).
    Declined,
    /// Another mutating action was still in flight; the trigger was ignored.
    Busy,
    /// The request failed; local state is unchanged.
    Failed(ApiError),
}

impl Outcome {
    /// Whether the action left the state machine in its confirmed target state.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::Unchanged)
    }
}
