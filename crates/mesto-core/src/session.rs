//! Session lifecycle: persisted-token check, registration, login and logout.
//!
//! # Design
//! - `Unauthenticated -> (token check ok | login ok) -> Authenticated -> (logout) -> Unauthenticated`.
//! - A failed token check leaves the persisted token in place; only logout clears it.
//! - Post-registration redirect runs off deadlines so callers decide when time advances.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::Outcome;
use crate::api::{AuthApi, TokenStore};
use crate::busy::BusyFlag;
use crate::models::{Credentials, Identity};
use crate::popup::PopupState;
use crate::routes::Route;
use crate::shell::UiShell;

/// Delay between a successful registration and the redirect to sign-in.
pub const REGISTRATION_REDIRECT_DELAY: Duration = Duration::from_millis(1200);
/// Delay after which the registration success marker resets.
pub const REGISTRATION_RESET_DELAY: Duration = Duration::from_millis(1500);

/// Who is signed in, if anyone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    /// Whether a user is authenticated.
    pub is_logged_in: bool,
    /// Bearer token backing the session.
    pub token: Option<String>,
    /// Authenticated identity.
    pub user: Identity,
}

/// Result of a token check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// The persisted token resolved to this identity.
    Authenticated(Identity),
    /// No usable token, or the backend rejected it.
    Unauthenticated,
}

/// Owns the session and the token lifecycle.
pub struct SessionController {
    auth: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    session: Session,
    app_loading: BusyFlag,
    registration_success: bool,
    redirect_at: Option<Instant>,
    reset_at: Option<Instant>,
}

impl SessionController {
    /// Create a controller with no session.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            auth,
            tokens,
            session: Session::default(),
            app_loading: BusyFlag::new(),
            registration_success: false,
            redirect_at: None,
            reset_at: None,
        }
    }

    /// Current session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a user is authenticated.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.session.is_logged_in
    }

    /// Flag gating the first render while the persisted token is checked.
    #[must_use]
    pub fn app_loading(&self) -> BusyFlag {
        self.app_loading.clone()
    }

    /// Whether the last registration succeeded and its notice is still showing.
    #[must_use]
    pub const fn registration_success(&self) -> bool {
        self.registration_success
    }

    /// Validate the persisted token, if any, and sign in with it.
    pub async fn check_persisted_token(&mut self, shell: &mut UiShell) -> SessionStatus {
        let token = match self.tokens.load() {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => return SessionStatus::Unauthenticated,
            Err(err) => {
                warn!(error = %err, "failed to read persisted token");
                return SessionStatus::Unauthenticated;
            }
        };

        let _loading = self.app_loading.begin();
        match self.auth.identity(&token).await {
            Ok(identity) => {
                info!(user_id = %identity.id, "restored session from persisted token");
                self.session = Session {
                    is_logged_in: true,
                    token: Some(token),
                    user: identity.clone(),
                };
                shell.navigate(Route::Home);
                SessionStatus::Authenticated(identity)
            }
            Err(err) => {
                warn!(error = %err, "failed to validate persisted token");
                SessionStatus::Unauthenticated
            }
        }
    }

    /// Register an account. The result tooltip opens whatever the outcome.
    pub async fn register(&mut self, shell: &mut UiShell, credentials: &Credentials) -> Outcome {
        let Some(_processing) = shell.begin_processing() else {
            return Outcome::Busy;
        };

        match self.auth.register(credentials).await {
            Ok(true) => {
                info!(email = %credentials.email, "registration succeeded");
                self.registration_success = true;
                let now = Instant::now();
                self.redirect_at = Some(now + REGISTRATION_REDIRECT_DELAY);
                self.reset_at = Some(now + REGISTRATION_RESET_DELAY);
                shell.popups.open(PopupState::InfoTooltip { success: true });
                Outcome::Success
            }
            Ok(false) => {
                warn!(email = %credentials.email, "registration returned no user document");
                shell.popups.open(PopupState::InfoTooltip { success: false });
                Outcome::Declined
            }
            Err(err) => {
                warn!(error = %err, "failed to register user");
                shell.popups.open(PopupState::InfoTooltip { success: false });
                Outcome::Failed(err)
            }
        }
    }

    /// Sign in with credentials, persisting the issued token.
    pub async fn authenticate(
        &mut self,
        shell: &mut UiShell,
        credentials: &Credentials,
    ) -> Outcome {
        let Some(_processing) = shell.begin_processing() else {
            return Outcome::Busy;
        };

        let token = match self.auth.login(credentials).await {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                warn!(email = %credentials.email, "login response carried no token");
                shell.popups.open(PopupState::InfoTooltip { success: false });
                return Outcome::Declined;
            }
            Err(err) => {
                warn!(error = %err, "failed to authorize user");
                shell.popups.open(PopupState::InfoTooltip { success: false });
                return Outcome::Failed(err);
            }
        };

        if let Err(err) = self.tokens.save(&token) {
            warn!(error = %err, "failed to persist auth token");
            shell.popups.open(PopupState::InfoTooltip { success: false });
            return Outcome::Failed(err.into());
        }

        info!(email = %credentials.email, "signed in");
        self.session = Session {
            is_logged_in: true,
            token: Some(token),
            user: Identity {
                id: String::new(),
                email: credentials.email.clone(),
            },
        };
        shell.navigate(Route::Home);
        Outcome::Success
    }

    /// Sign out: drop the persisted token and the in-memory session.
    pub fn logout(&mut self, shell: &mut UiShell) {
        shell.close_nav_drawer();
        if let Err(err) = self.tokens.clear() {
            warn!(error = %err, "failed to clear persisted token");
        }
        self.session = Session::default();
        shell.navigate(Route::SignIn);
        info!("signed out");
    }

    /// Fill in identity fields the login response did not carry.
    pub(crate) fn complete_identity(&mut self, id: &str, email: &str) {
        if !self.session.is_logged_in {
            return;
        }
        if self.session.user.id.is_empty() {
            self.session.user.id = id.to_string();
        }
        if self.session.user.email.is_empty() {
            self.session.user.email = email.to_string();
        }
    }

    /// Earliest pending registration deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.redirect_at, self.reset_at].into_iter().flatten().min()
    }

    /// Apply registration deadlines that have passed as of `now`.
    pub fn run_due_timers(&mut self, shell: &mut UiShell, now: Instant) {
        if self.redirect_at.is_some_and(|at| at <= now) {
            self.redirect_at = None;
            shell.navigate(Route::SignIn);
            shell.popups.close_all();
        }
        if self.reset_at.is_some_and(|at| at <= now) {
            self.reset_at = None;
            self.registration_success = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::MemoryTokenStore;
    use crate::error::{ApiError, ApiResult};

    #[derive(Default)]
    struct ScriptedAuth {
        login_token: Option<String>,
        identity: Option<Identity>,
        identity_calls: Mutex<u32>,
    }

    #[async_trait]
    impl AuthApi for ScriptedAuth {
        async fn register(&self, _credentials: &Credentials) -> ApiResult<bool> {
            Err(ApiError::Http {
                status: 409,
                message: "user already exists".into(),
            })
        }

        async fn login(&self, _credentials: &Credentials) -> ApiResult<Option<String>> {
            Ok(self.login_token.clone())
        }

        async fn identity(&self, _token: &str) -> ApiResult<Identity> {
            *self.identity_calls.lock().expect("lock") += 1;
            self.identity.clone().ok_or(ApiError::Http {
                status: 401,
                message: "unauthorized".into(),
            })
        }
    }

    fn controller(auth: ScriptedAuth, tokens: Arc<MemoryTokenStore>) -> SessionController {
        SessionController::new(Arc::new(auth), tokens)
    }

    #[tokio::test]
    async fn missing_token_skips_introspection() {
        let auth = Arc::new(ScriptedAuth::default());
        let mut controller =
            SessionController::new(auth.clone(), Arc::new(MemoryTokenStore::default()));
        let mut shell = UiShell::new();
        let status = controller.check_persisted_token(&mut shell).await;
        assert_eq!(status, SessionStatus::Unauthenticated);
        assert_eq!(*auth.identity_calls.lock().expect("lock"), 0);
    }

    #[tokio::test]
    async fn rejected_token_is_kept() {
        let tokens = Arc::new(MemoryTokenStore::with_token("stale"));
        let mut controller = controller(ScriptedAuth::default(), tokens.clone());
        let mut shell = UiShell::new();
        let status = controller.check_persisted_token(&mut shell).await;
        assert_eq!(status, SessionStatus::Unauthenticated);
        assert!(!controller.is_logged_in());
        assert!(!controller.app_loading().is_set());
        assert_eq!(tokens.current().as_deref(), Some("stale"));
    }

    #[tokio::test]
    async fn login_without_token_is_declined() {
        let tokens = Arc::new(MemoryTokenStore::default());
        let mut controller = controller(ScriptedAuth::default(), tokens.clone());
        let mut shell = UiShell::new();
        let outcome = controller
            .authenticate(&mut shell, &Credentials::new("a@b.com", "pw"))
            .await;
        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(
            shell.popups.active(),
            &PopupState::InfoTooltip { success: false }
        );
        assert!(tokens.current().is_none());
        assert!(!shell.is_processing());
    }

    #[tokio::test]
    async fn failed_registration_opens_failure_tooltip() {
        let mut controller =
            controller(ScriptedAuth::default(), Arc::new(MemoryTokenStore::default()));
        let mut shell = UiShell::new();
        let outcome = controller
            .register(&mut shell, &Credentials::new("a@b.com", "pw123456"))
            .await;
        assert!(matches!(outcome, Outcome::Failed(ApiError::Http { status: 409, .. })));
        assert!(!controller.registration_success());
        assert_eq!(
            shell.popups.active(),
            &PopupState::InfoTooltip { success: false }
        );
        assert!(controller.next_deadline().is_none());
        assert!(!shell.is_processing());
    }

    #[tokio::test]
    async fn logout_clears_token_and_drawer() -> anyhow::Result<()> {
        let tokens = Arc::new(MemoryTokenStore::default());
        let auth = ScriptedAuth {
            login_token: Some("fresh".into()),
            ..ScriptedAuth::default()
        };
        let mut controller = controller(auth, tokens.clone());
        let mut shell = UiShell::new();
        controller
            .authenticate(&mut shell, &Credentials::new("a@b.com", "pw"))
            .await;
        assert_eq!(tokens.load()?.as_deref(), Some("fresh"));
        assert_eq!(controller.session().user.email, "a@b.com");

        shell.toggle_nav_drawer();
        controller.logout(&mut shell);
        assert!(!shell.nav_drawer_open());
        assert_eq!(shell.route(), Route::SignIn);
        assert_eq!(controller.session(), &Session::default());
        assert!(tokens.load()?.is_none());
        Ok(())
    }
}
