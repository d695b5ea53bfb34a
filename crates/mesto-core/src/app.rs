//! Composed application state.
//!
//! # Design
//! - One struct owns the session, the gallery and the UI shell; every mutation
//!   goes through a named method here.
//! - Transitions into `Authenticated` trigger exactly one gallery load.
//! - Timers are deadlines; `run_due_timers` applies them and `settle` waits them out.

use std::sync::Arc;

use tokio::time::{Instant, sleep_until};

use crate::Outcome;
use crate::api::{AuthApi, GalleryApi, TokenStore};
use crate::error::ApiError;
use crate::gallery::GalleryStore;
use crate::models::{Card, Credentials, UserProfile};
use crate::popup::{ClickTarget, PopupState};
use crate::routes::Route;
use crate::session::{Session, SessionController, SessionStatus};
use crate::shell::UiShell;

/// Session, gallery and UI state of one client.
pub struct AppState {
    session: SessionController,
    gallery: GalleryStore,
    shell: UiShell,
}

impl AppState {
    /// Wire the state machine to its collaborators.
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthApi>,
        api: Arc<dyn GalleryApi>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            session: SessionController::new(auth, tokens),
            gallery: GalleryStore::new(api),
            shell: UiShell::new(),
        }
    }

    /// Session controller (read-only).
    #[must_use]
    pub const fn session_controller(&self) -> &SessionController {
        &self.session
    }

    /// Current session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        self.session.session()
    }

    /// Gallery store (read-only).
    #[must_use]
    pub const fn gallery(&self) -> &GalleryStore {
        &self.gallery
    }

    /// Current profile.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        self.gallery.profile()
    }

    /// Cards in server order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        self.gallery.cards()
    }

    /// UI shell (read-only).
    #[must_use]
    pub const fn shell(&self) -> &UiShell {
        &self.shell
    }

    /// Active popup.
    #[must_use]
    pub const fn popup(&self) -> &PopupState {
        self.shell.popups.active()
    }

    /// Route the client should render, after protected-route resolution.
    #[must_use]
    pub const fn visible_route(&self) -> Route {
        self.shell.route().resolve(self.session.is_logged_in())
    }

    /// Restore the session from the persisted token and load the gallery.
    pub async fn check_persisted_token(&mut self) -> SessionStatus {
        let status = self.session.check_persisted_token(&mut self.shell).await;
        if matches!(status, SessionStatus::Authenticated(_)) {
            self.enter_authenticated().await;
        }
        status
    }

    /// Register an account.
    pub async fn register(&mut self, credentials: &Credentials) -> Outcome {
        self.session.register(&mut self.shell, credentials).await
    }

    /// Sign in and load the gallery.
    pub async fn authenticate(&mut self, credentials: &Credentials) -> Outcome {
        let outcome = self.session.authenticate(&mut self.shell, credentials).await;
        if outcome == Outcome::Success {
            self.enter_authenticated().await;
        }
        outcome
    }

    /// Sign out and forget cached gallery data.
    pub fn logout(&mut self) {
        self.session.logout(&mut self.shell);
        self.gallery.reset();
    }

    async fn enter_authenticated(&mut self) {
        if self.gallery.load_initial().await == Outcome::Success {
            let profile = self.gallery.profile();
            self.session.complete_identity(&profile.id, &profile.email);
        }
    }

    /// Update profile name and about.
    pub async fn update_profile(&mut self, name: &str, about: &str) -> Outcome {
        self.gallery.update_profile(&mut self.shell, name, about).await
    }

    /// Update the avatar link.
    pub async fn update_avatar(&mut self, avatar_url: &str) -> Outcome {
        self.gallery.update_avatar(&mut self.shell, avatar_url).await
    }

    /// Create a card.
    pub async fn add_card(&mut self, name: &str, image_url: &str) -> Outcome {
        self.gallery.add_card(&mut self.shell, name, image_url).await
    }

    /// Delete a card.
    pub async fn delete_card(&mut self, card_id: &str) -> Outcome {
        self.gallery.delete_card(&mut self.shell, card_id).await
    }

    /// Delete the card awaiting confirmation in the open popup.
    pub async fn confirm_pending_delete(&mut self) -> Outcome {
        let PopupState::ConfirmDelete { card_id } = self.shell.popups.active().clone() else {
            return Outcome::Failed(ApiError::validation(
                "popup",
                "no card deletion awaits confirmation",
            ));
        };
        self.delete_card(&card_id).await
    }

    /// Toggle the current user's like on a card.
    pub async fn toggle_like(&mut self, card_id: &str) -> Outcome {
        let Some(card) = self.gallery.card(card_id).cloned() else {
            return Outcome::Failed(ApiError::validation(
                "card_id",
                format!("no card with id {card_id}"),
            ));
        };
        self.gallery.toggle_like(&mut self.shell, &card).await
    }

    /// Open a popup.
    pub fn open_popup(&mut self, popup: PopupState) {
        self.shell.popups.open(popup);
    }

    /// Open the delete confirmation for a card.
    pub fn request_delete(&mut self, card_id: &str) {
        self.open_popup(PopupState::ConfirmDelete {
            card_id: card_id.to_string(),
        });
    }

    /// Open the image preview for a card. Returns whether the card exists.
    pub fn preview_card(&mut self, card_id: &str) -> bool {
        let Some(card) = self.gallery.card(card_id).cloned() else {
            return false;
        };
        self.open_popup(PopupState::ViewImage(card));
        true
    }

    /// Close every popup.
    pub fn close_all_popups(&mut self) {
        self.shell.popups.close_all();
    }

    /// Close the popup if the click landed outside its content.
    pub fn dismiss_on_outside_click(&mut self, target: ClickTarget) -> bool {
        self.shell.popups.dismiss_on_outside_click(target)
    }

    /// Navigate to `route`.
    pub fn navigate(&mut self, route: Route) {
        self.shell.navigate(route);
    }

    /// Flip the mobile navigation drawer.
    pub fn toggle_nav_drawer(&mut self) {
        self.shell.toggle_nav_drawer();
    }

    /// Earliest pending deadline across session and popups.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.session.next_deadline(), self.shell.popups.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Apply every deadline that has passed.
    pub fn run_due_timers(&mut self) {
        let now = Instant::now();
        self.session.run_due_timers(&mut self.shell, now);
        self.shell.popups.run_due_timers(now);
    }

    /// Wait until every pending deadline has fired.
    pub async fn settle(&mut self) {
        while let Some(deadline) = self.next_deadline() {
            sleep_until(deadline).await;
            self.run_due_timers();
        }
    }
}
