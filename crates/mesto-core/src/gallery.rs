//! Profile and card list, kept in sync with the backend.
//!
//! # Design
//! - Confirm-then-apply: local state only changes from a successful response.
//! - Every mutating action claims the shared `processing` flag and closes the
//!   open popup on success; failures are logged and leave state untouched.
//! - Like state is read from the card the caller holds; the server's card
//!   replaces the local entry verbatim.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::Outcome;
use crate::api::GalleryApi;
use crate::busy::BusyFlag;
use crate::error::ApiError;
use crate::models::{AvatarUpdate, Card, NewCard, ProfileUpdate, UserProfile};
use crate::shell::UiShell;

/// Cached profile and card list for the signed-in user.
pub struct GalleryStore {
    api: Arc<dyn GalleryApi>,
    profile: UserProfile,
    cards: Vec<Card>,
    page_loading: BusyFlag,
}

impl GalleryStore {
    /// Create an empty store backed by `api`.
    #[must_use]
    pub fn new(api: Arc<dyn GalleryApi>) -> Self {
        Self {
            api,
            profile: UserProfile::default(),
            cards: Vec::new(),
            page_loading: BusyFlag::new(),
        }
    }

    /// Current profile.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Cards in server order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Card with the given id.
    #[must_use]
    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == card_id)
    }

    /// Flag toggled around [`GalleryStore::load_initial`].
    #[must_use]
    pub fn page_loading(&self) -> BusyFlag {
        self.page_loading.clone()
    }

    /// Drop cached data (used on logout).
    pub fn reset(&mut self) {
        self.profile = UserProfile::default();
        self.cards.clear();
    }

    /// Fetch profile and cards together; either failure aborts the load.
    pub async fn load_initial(&mut self) -> Outcome {
        let _loading = self.page_loading.begin();
        match tokio::try_join!(self.api.get_profile(), self.api.list_cards()) {
            Ok((profile, cards)) => {
                info!(user_id = %profile.id, cards = cards.len(), "gallery loaded");
                self.profile = profile;
                self.cards = cards;
                Outcome::Success
            }
            Err(err) => {
                warn!(error = %err, "failed to load profile and card gallery");
                Outcome::Failed(err)
            }
        }
    }

    /// Update name and about. Unchanged values close the popup without a request.
    pub async fn update_profile(&mut self, shell: &mut UiShell, name: &str, about: &str) -> Outcome {
        if name == self.profile.name && about == self.profile.about {
            shell.popups.close_all();
            return Outcome::Unchanged;
        }
        let Some(_processing) = shell.begin_processing() else {
            debug!("profile update ignored while another action is in flight");
            return Outcome::Busy;
        };

        let update = ProfileUpdate {
            name: name.to_string(),
            about: about.to_string(),
        };
        match self.api.update_profile(&update).await {
            Ok(profile) => {
                self.profile = profile;
                shell.popups.close_all();
                Outcome::Success
            }
            Err(err) => {
                warn!(error = %err, "failed to update user profile");
                Outcome::Failed(err)
            }
        }
    }

    /// Replace the avatar link.
    pub async fn update_avatar(&mut self, shell: &mut UiShell, avatar_url: &str) -> Outcome {
        let Some(_processing) = shell.begin_processing() else {
            debug!("avatar update ignored while another action is in flight");
            return Outcome::Busy;
        };

        let update = AvatarUpdate {
            avatar: avatar_url.to_string(),
        };
        match self.api.update_avatar(&update).await {
            Ok(profile) => {
                self.profile = profile;
                shell.popups.close_all();
                Outcome::Success
            }
            Err(err) => {
                warn!(error = %err, "failed to update user avatar");
                Outcome::Failed(err)
            }
        }
    }

    /// Create a card and append it to the list.
    pub async fn add_card(&mut self, shell: &mut UiShell, name: &str, image_url: &str) -> Outcome {
        let Some(_processing) = shell.begin_processing() else {
            debug!("card creation ignored while another action is in flight");
            return Outcome::Busy;
        };

        let card = NewCard {
            name: name.to_string(),
            link: image_url.to_string(),
        };
        match self.api.create_card(&card).await {
            Ok(card) => {
                info!(card_id = %card.id, "card added");
                self.cards.push(card);
                shell.popups.close_all();
                Outcome::Success
            }
            Err(err) => {
                warn!(error = %err, "failed to add card to gallery");
                Outcome::Failed(err)
            }
        }
    }

    /// Delete a card and drop it from the list.
    pub async fn delete_card(&mut self, shell: &mut UiShell, card_id: &str) -> Outcome {
        let Some(_processing) = shell.begin_processing() else {
            debug!("card deletion ignored while another action is in flight");
            return Outcome::Busy;
        };

        match self.api.delete_card(card_id).await {
            Ok(()) => {
                info!(card_id = %card_id, "card deleted");
                self.cards.retain(|card| card.id != card_id);
                shell.popups.close_all();
                Outcome::Success
            }
            Err(err) => {
                warn!(error = %err, card_id = %card_id, "failed to delete card");
                Outcome::Failed(err)
            }
        }
    }

    /// Like the card if the current user has not, unlike it otherwise.
    pub async fn toggle_like(&mut self, shell: &mut UiShell, card: &Card) -> Outcome {
        if self.profile.id.is_empty() {
            return Outcome::Failed(ApiError::validation(
                "profile",
                "likes require a loaded profile",
            ));
        }
        let Some(_processing) = shell.begin_processing() else {
            debug!("like toggle ignored while another action is in flight");
            return Outcome::Busy;
        };

        let liked = card.is_liked_by(&self.profile.id);
        let result = if liked {
            self.api.unlike_card(&card.id).await
        } else {
            self.api.like_card(&card.id).await
        };
        match result {
            Ok(updated) => {
                debug!(card_id = %card.id, liked = !liked, "like state changed");
                if let Some(slot) = self.cards.iter_mut().find(|c| c.id == card.id) {
                    *slot = updated;
                }
                shell.popups.close_all();
                Outcome::Success
            }
            Err(err) => {
                warn!(error = %err, card_id = %card.id, "failed to change card like state");
                Outcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ApiResult;
    use crate::popup::PopupState;

    fn profile() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            email: "a@b.com".into(),
            name: "Jacques".into(),
            about: "Explorer".into(),
            avatar_url: "https://example.com/me.png".into(),
        }
    }

    fn card(id: &str, likes: &[&str]) -> Card {
        Card {
            id: id.into(),
            name: format!("card {id}"),
            image_url: format!("https://example.com/{id}.jpg"),
            owner_id: "u1".into(),
            liked_by_user_ids: likes.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
            created_at: None,
        }
    }

    /// Answers profile reads and fails every write.
    #[derive(Default)]
    struct ReadOnlyApi {
        writes: Mutex<u32>,
    }

    impl ReadOnlyApi {
        fn reject(&self) -> ApiError {
            *self.writes.lock().expect("lock") += 1;
            ApiError::Network {
                detail: "connection reset".into(),
            }
        }
    }

    #[async_trait]
    impl GalleryApi for ReadOnlyApi {
        async fn get_profile(&self) -> ApiResult<UserProfile> {
            Ok(profile())
        }
        async fn update_profile(&self, _update: &ProfileUpdate) -> ApiResult<UserProfile> {
            Err(self.reject())
        }
        async fn update_avatar(&self, _update: &AvatarUpdate) -> ApiResult<UserProfile> {
            Err(self.reject())
        }
        async fn list_cards(&self) -> ApiResult<Vec<Card>> {
            Ok(vec![card("1", &[]), card("2", &["u1"])])
        }
        async fn create_card(&self, _card: &NewCard) -> ApiResult<Card> {
            Err(self.reject())
        }
        async fn delete_card(&self, _card_id: &str) -> ApiResult<()> {
            Err(self.reject())
        }
        async fn like_card(&self, _card_id: &str) -> ApiResult<Card> {
            Err(self.reject())
        }
        async fn unlike_card(&self, _card_id: &str) -> ApiResult<Card> {
            Err(self.reject())
        }
    }

    async fn loaded_store(api: Arc<ReadOnlyApi>) -> GalleryStore {
        let mut store = GalleryStore::new(api);
        assert_eq!(store.load_initial().await, Outcome::Success);
        store
    }

    #[tokio::test]
    async fn failed_writes_keep_last_confirmed_state() {
        let api = Arc::new(ReadOnlyApi::default());
        let mut store = loaded_store(api.clone()).await;
        let mut shell = UiShell::new();
        shell.popups.open(PopupState::AddPlace);

        let before_cards = store.cards().to_vec();
        let before_profile = store.profile().clone();

        let liked = store.cards()[1].clone();
        assert!(matches!(store.toggle_like(&mut shell, &liked).await, Outcome::Failed(_)));
        assert!(matches!(
            store.add_card(&mut shell, "Peaks", "https://x.com/p.jpg").await,
            Outcome::Failed(_)
        ));
        assert!(matches!(
            store.delete_card(&mut shell, "1").await,
            Outcome::Failed(_)
        ));
        assert!(matches!(
            store.update_profile(&mut shell, "New", "Name").await,
            Outcome::Failed(_)
        ));
        assert!(matches!(
            store.update_avatar(&mut shell, "https://x.com/a.png").await,
            Outcome::Failed(_)
        ));

        assert_eq!(*api.writes.lock().expect("lock"), 5);
        assert_eq!(store.cards(), before_cards.as_slice());
        assert_eq!(store.profile(), &before_profile);
        assert_eq!(shell.popups.active(), &PopupState::AddPlace);
        assert!(!shell.is_processing());
    }

    #[tokio::test]
    async fn busy_shell_ignores_mutations() {
        let api = Arc::new(ReadOnlyApi::default());
        let mut store = loaded_store(api.clone()).await;
        let mut shell = UiShell::new();
        let _held = shell.begin_processing();

        let outcome = store
            .add_card(&mut shell, "Peaks", "https://x.com/p.jpg")
            .await;
        assert_eq!(outcome, Outcome::Busy);
        assert_eq!(*api.writes.lock().expect("lock"), 0);
    }

    #[tokio::test]
    async fn reset_drops_cached_data() {
        let mut store = loaded_store(Arc::new(ReadOnlyApi::default())).await;
        assert!(!store.page_loading().is_set());
        assert!(store.card("2").is_some());
        store.reset();
        assert!(store.cards().is_empty());
        assert_eq!(store.profile(), &UserProfile::default());
    }
}
