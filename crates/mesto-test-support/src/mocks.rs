//! In-memory fake of the Mesto backend.
//!
//! Implements both collaborator traits, resolves the caller from the shared
//! token store the way the HTTP client does, and records every call so tests
//! can assert on methods and paths.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mesto_core::{
    ApiError, ApiResult, AppState, AuthApi, AvatarUpdate, Card, Credentials, GalleryApi, Identity,
    MemoryTokenStore, NewCard, ProfileUpdate, TokenStore, UserProfile,
};

use crate::fixtures;

/// One request observed by the fake backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    /// HTTP method the real client would use.
    pub method: &'static str,
    /// Request path.
    pub path: String,
}

#[derive(Clone)]
struct Account {
    profile: UserProfile,
    password: String,
    token: String,
}

#[derive(Default)]
struct BackendState {
    accounts: Vec<Account>,
    cards: Vec<Card>,
    failures: Vec<(&'static str, String, ApiError)>,
}

/// In-memory backend sharing its token store with the client under test.
pub struct FakeBackend {
    tokens: Arc<MemoryTokenStore>,
    state: Mutex<BackendState>,
    calls: Mutex<Vec<Call>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            tokens: Arc::new(MemoryTokenStore::default()),
            state: Mutex::new(BackendState::default()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    /// Empty backend.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Backend with one account (`u1`, the default credentials) and the given cards.
    #[must_use]
    pub fn seeded(cards: Vec<Card>) -> Arc<Self> {
        let backend = Self::default();
        backend.add_account(
            fixtures::profile("u1", fixtures::DEFAULT_EMAIL),
            fixtures::DEFAULT_PASSWORD,
        );
        backend.lock_state().cards = cards;
        Arc::new(backend)
    }

    /// Register an account directly, returning its token.
    pub fn add_account(&self, profile: UserProfile, password: &str) -> String {
        let token = format!("token-{}", profile.id);
        self.lock_state().accounts.push(Account {
            profile,
            password: password.to_string(),
            token: token.clone(),
        });
        token
    }

    /// Token store the client under test should use.
    #[must_use]
    pub fn tokens(&self) -> Arc<MemoryTokenStore> {
        Arc::clone(&self.tokens)
    }

    /// Persist the token of account `user_id`, as if a previous run had signed in.
    pub fn sign_in_as(&self, user_id: &str) {
        let token = self
            .lock_state()
            .accounts
            .iter()
            .find(|account| account.profile.id == user_id)
            .map(|account| account.token.clone());
        if let Some(token) = token {
            // The in-memory store cannot fail.
            let _ = self.tokens.save(&token);
        }
    }

    /// Build an `AppState` wired to this backend.
    #[must_use]
    pub fn app_state(self: &Arc<Self>) -> AppState {
        AppState::new(self.clone(), self.clone(), self.tokens())
    }

    /// Make every `method path` call fail with `error` until [`FakeBackend::heal`].
    pub fn fail(&self, method: &'static str, path: &str, error: ApiError) {
        self.lock_state()
            .failures
            .push((method, path.to_string(), error));
    }

    /// Remove every injected failure.
    pub fn heal(&self) {
        self.lock_state().failures.clear();
    }

    /// Cards as the backend currently stores them.
    #[must_use]
    pub fn stored_cards(&self) -> Vec<Card> {
        self.lock_state().cards.clone()
    }

    /// Every call observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of observed calls matching `method path`.
    #[must_use]
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    /// Forget observed calls.
    pub fn clear_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn lock_state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, method: &'static str, path: impl Into<String>) -> ApiResult<()> {
        let path = path.into();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Call {
                method,
                path: path.clone(),
            });
        let injected = self
            .lock_state()
            .failures
            .iter()
            .find(|(m, p, _)| *m == method && *p == path)
            .map(|(_, _, err)| err.clone());
        injected.map_or(Ok(()), Err)
    }

    fn caller(&self) -> ApiResult<UserProfile> {
        let token = self.tokens.current().ok_or_else(unauthorized)?;
        self.lock_state()
            .accounts
            .iter()
            .find(|account| account.token == token)
            .map(|account| account.profile.clone())
            .ok_or_else(unauthorized)
    }

    fn update_caller(&self, apply: impl FnOnce(&mut UserProfile)) -> ApiResult<UserProfile> {
        let caller = self.caller()?;
        let mut state = self.lock_state();
        let account = state
            .accounts
            .iter_mut()
            .find(|account| account.profile.id == caller.id)
            .ok_or_else(unauthorized)?;
        apply(&mut account.profile);
        Ok(account.profile.clone())
    }

    fn update_likes(&self, card_id: &str, like: bool) -> ApiResult<Card> {
        let caller = self.caller()?;
        let mut state = self.lock_state();
        let card = state
            .cards
            .iter_mut()
            .find(|card| card.id == card_id)
            .ok_or_else(|| not_found(card_id))?;
        if like {
            card.liked_by_user_ids.insert(caller.id);
        } else {
            card.liked_by_user_ids.remove(&caller.id);
        }
        Ok(card.clone())
    }
}

fn unauthorized() -> ApiError {
    ApiError::Http {
        status: 401,
        message: "authorization required".to_string(),
    }
}

fn not_found(card_id: &str) -> ApiError {
    ApiError::Http {
        status: 404,
        message: format!("card {card_id} not found"),
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn register(&self, credentials: &Credentials) -> ApiResult<bool> {
        self.record("POST", "/register")?;
        let mut state = self.lock_state();
        if state
            .accounts
            .iter()
            .any(|account| account.profile.email == credentials.email)
        {
            return Err(ApiError::Http {
                status: 409,
                message: "user with this email already exists".to_string(),
            });
        }
        let id = format!("u{}", state.accounts.len() + 1);
        let mut profile = fixtures::profile(&id, &credentials.email);
        profile.email.clone_from(&credentials.email);
        state.accounts.push(Account {
            token: format!("token-{id}"),
            profile,
            password: credentials.password.clone(),
        });
        Ok(true)
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<Option<String>> {
        self.record("POST", "/login")?;
        self.lock_state()
            .accounts
            .iter()
            .find(|account| {
                account.profile.email == credentials.email
                    && account.password == credentials.password
            })
            .map(|account| Some(account.token.clone()))
            .ok_or_else(|| ApiError::Http {
                status: 401,
                message: "wrong email or password".to_string(),
            })
    }

    async fn identity(&self, token: &str) -> ApiResult<Identity> {
        self.record("GET", "/users/me")?;
        self.lock_state()
            .accounts
            .iter()
            .find(|account| account.token == token)
            .map(|account| Identity {
                id: account.profile.id.clone(),
                email: account.profile.email.clone(),
            })
            .ok_or_else(unauthorized)
    }
}

#[async_trait]
impl GalleryApi for FakeBackend {
    async fn get_profile(&self) -> ApiResult<UserProfile> {
        self.record("GET", "/users/me")?;
        self.caller()
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        self.record("PATCH", "/users/me")?;
        self.update_caller(|profile| {
            profile.name.clone_from(&update.name);
            profile.about.clone_from(&update.about);
        })
    }

    async fn update_avatar(&self, update: &AvatarUpdate) -> ApiResult<UserProfile> {
        self.record("PATCH", "/users/me/avatar")?;
        self.update_caller(|profile| profile.avatar_url.clone_from(&update.avatar))
    }

    async fn list_cards(&self) -> ApiResult<Vec<Card>> {
        self.record("GET", "/cards")?;
        self.caller()?;
        Ok(self.lock_state().cards.clone())
    }

    async fn create_card(&self, card: &NewCard) -> ApiResult<Card> {
        self.record("POST", "/cards")?;
        let caller = self.caller()?;
        let mut state = self.lock_state();
        let next_id = state
            .cards
            .iter()
            .filter_map(|card| card.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let mut created = fixtures::card(&next_id.to_string(), &caller.id, &[]);
        created.name.clone_from(&card.name);
        created.image_url.clone_from(&card.link);
        state.cards.push(created.clone());
        Ok(created)
    }

    async fn delete_card(&self, card_id: &str) -> ApiResult<()> {
        self.record("DELETE", format!("/cards/{card_id}"))?;
        let caller = self.caller()?;
        let mut state = self.lock_state();
        let index = state
            .cards
            .iter()
            .position(|card| card.id == card_id)
            .ok_or_else(|| not_found(card_id))?;
        if !state.cards[index].is_owned_by(&caller.id) {
            return Err(ApiError::Http {
                status: 403,
                message: "cannot delete another user's card".to_string(),
            });
        }
        state.cards.remove(index);
        Ok(())
    }

    async fn like_card(&self, card_id: &str) -> ApiResult<Card> {
        self.record("PUT", format!("/cards/{card_id}/likes"))?;
        self.update_likes(card_id, true)
    }

    async fn unlike_card(&self, card_id: &str) -> ApiResult<Card> {
        self.record("DELETE", format!("/cards/{card_id}/likes"))?;
        self.update_likes(card_id, false)
    }
}
