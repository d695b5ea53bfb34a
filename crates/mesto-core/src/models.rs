//! Profile, card and credential DTOs shared by the client and the state machine.
//!
//! Field names follow the backend documents (`_id`, `link`, `avatar`,
//! `likes`); Rust-side names describe what the values are.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Backend identifier of a user.
pub type UserId = String;
/// Backend identifier of a card.
pub type CardId = String;

/// Identity returned by token introspection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User identifier.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Account e-mail.
    #[serde(default)]
    pub email: String,
}

impl Identity {
    /// Whether this identity carries no user.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.email.is_empty()
    }
}

/// Profile of the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Account e-mail.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Short self-description.
    #[serde(default)]
    pub about: String,
    /// Avatar image link.
    #[serde(rename = "avatar", default)]
    pub avatar_url: String,
}

/// A photo card in the gallery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Card identifier.
    #[serde(rename = "_id")]
    pub id: CardId,
    /// Caption.
    pub name: String,
    /// Image link.
    #[serde(rename = "link")]
    pub image_url: String,
    /// Author of the card.
    #[serde(rename = "owner", deserialize_with = "user_ref")]
    pub owner_id: UserId,
    /// Users who liked the card.
    #[serde(rename = "likes", default, deserialize_with = "user_refs")]
    pub liked_by_user_ids: BTreeSet<UserId>,
    /// Creation timestamp, when the backend reports one.
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Card {
    /// Whether `user_id` is among the users who liked this card.
    #[must_use]
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by_user_ids.contains(user_id)
    }

    /// Whether `user_id` authored this card.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    /// Number of likes.
    #[must_use]
    pub fn like_count(&self) -> usize {
        self.liked_by_user_ids.len()
    }
}

/// The backend sends user references either as bare ids or as populated
/// user documents.
#[derive(Deserialize)]
#[serde(untagged)]
enum UserRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl UserRef {
    fn into_id(self) -> UserId {
        match self {
            Self::Id(id) | Self::Populated { id } => id,
        }
    }
}

fn user_ref<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: Deserializer<'de>,
{
    UserRef::deserialize(deserializer).map(UserRef::into_id)
}

fn user_refs<'de, D>(deserializer: D) -> Result<BTreeSet<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Vec::<UserRef>::deserialize(deserializer)?;
    Ok(refs.into_iter().map(UserRef::into_id).collect())
}

/// E-mail/password pair for registration and login.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account e-mail.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Build a credential pair.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body returned by the login endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Issued bearer token.
    #[serde(default)]
    pub token: Option<String>,
}

/// Body of the profile update request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: String,
    /// New self-description.
    pub about: String,
}

/// Body of the avatar update request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AvatarUpdate {
    /// New avatar image link.
    pub avatar: String,
}

/// Body of the card creation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewCard {
    /// Caption.
    pub name: String,
    /// Image link.
    pub link: String,
}
