//! Collaborator seams: the auth client, the gallery data client and the
//! durable token store.
//!
//! # Design
//! - The state machine only talks to these traits; transports live in `mesto-client`.
//! - Data calls carry no token argument: implementations read the persisted
//!   token on every request, so a login or logout is picked up immediately.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{ApiResult, TokenStoreError};
use crate::models::{
    AvatarUpdate, Card, Credentials, Identity, NewCard, ProfileUpdate, UserProfile,
};

/// Well-known key the auth token is persisted under.
pub const TOKEN_KEY: &str = "jwt";

#[async_trait]
/// Registration, login and token introspection endpoints.
pub trait AuthApi: Send + Sync {
    /// Register a new account. `Ok(false)` means the backend answered without
    /// a user document.
    async fn register(&self, credentials: &Credentials) -> ApiResult<bool>;
    /// Exchange credentials for a bearer token. `Ok(None)` means the backend
    /// answered without a token.
    async fn login(&self, credentials: &Credentials) -> ApiResult<Option<String>>;
    /// Resolve the identity behind `token`.
    async fn identity(&self, token: &str) -> ApiResult<Identity>;
}

#[async_trait]
/// Profile and card endpoints, authorised with the persisted token.
pub trait GalleryApi: Send + Sync {
    /// `GET /users/me`.
    async fn get_profile(&self) -> ApiResult<UserProfile>;
    /// `PATCH /users/me`.
    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<UserProfile>;
    /// `PATCH /users/me/avatar`.
    async fn update_avatar(&self, update: &AvatarUpdate) -> ApiResult<UserProfile>;
    /// `GET /cards`.
    async fn list_cards(&self) -> ApiResult<Vec<Card>>;
    /// `POST /cards`.
    async fn create_card(&self, card: &NewCard) -> ApiResult<Card>;
    /// `DELETE /cards/{id}`.
    async fn delete_card(&self, card_id: &str) -> ApiResult<()>;
    /// `PUT /cards/{id}/likes`.
    async fn like_card(&self, card_id: &str) -> ApiResult<Card>;
    /// `DELETE /cards/{id}/likes`.
    async fn unlike_card(&self, card_id: &str) -> ApiResult<Card>;
}

/// Durable storage for the single auth token.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be read.
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the persisted token.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Process-local token store, used by embedders without durable storage and by tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Create a store pre-seeded with `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Current token without going through the trait.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.current())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
