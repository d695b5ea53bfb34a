//! Profile and card builders.

use std::collections::BTreeSet;

use mesto_core::{Card, Credentials, UserProfile};

/// E-mail used by the default test account.
pub const DEFAULT_EMAIL: &str = "a@b.com";
/// Password used by the default test account.
pub const DEFAULT_PASSWORD: &str = "pw123456";

/// Profile with the given id and e-mail and stock name/about/avatar.
#[must_use]
pub fn profile(id: &str, email: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        email: email.to_string(),
        name: "Jacques Cousteau".to_string(),
        about: "Sailor, researcher".to_string(),
        avatar_url: "https://pictures.example.com/avatar.jpg".to_string(),
    }
}

/// Card owned by `owner` and liked by `likes`.
#[must_use]
pub fn card(id: &str, owner: &str, likes: &[&str]) -> Card {
    Card {
        id: id.to_string(),
        name: format!("Place {id}"),
        image_url: format!("https://pictures.example.com/{id}.jpg"),
        owner_id: owner.to_string(),
        liked_by_user_ids: likes.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
        created_at: None,
    }
}

/// Credentials of the default test account.
#[must_use]
pub fn default_credentials() -> Credentials {
    Credentials::new(DEFAULT_EMAIL, DEFAULT_PASSWORD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_builder_collects_likes() {
        let card = card("5", "u1", &["u1", "u2", "u1"]);
        assert_eq!(card.like_count(), 2);
        assert!(card.is_owned_by("u1"));
    }
}
