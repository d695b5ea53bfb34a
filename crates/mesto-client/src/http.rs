//! `reqwest` implementation of the auth and gallery clients.
//!
//! # Design
//! - Data calls read the bearer token from the token store on every request,
//!   so a login or logout takes effect without rebuilding the client.
//! - Each request carries an `x-request-id`, reusing the command trace id when one is set.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mesto_core::{
    ApiError, ApiResult, AuthApi, AvatarUpdate, Card, Credentials, GalleryApi, Identity,
    LoginResponse, NewCard, ProfileUpdate, TokenStore, UserProfile,
};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::response::{check_empty, check_response, network_error};

/// Header carrying the per-request correlation id.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// HTTP client for the Mesto backend.
#[derive(Clone)]
pub struct MestoClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl MestoClient {
    /// Build a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] when the HTTP client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration, tokens: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(network_error)?;
        Ok(Self::with_http(http, base_url, tokens))
    }

    /// Build a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http(http: Client, base_url: Url, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url,
            tokens,
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::validation("path", format!("cannot join '{path}': {err}")))
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        let request_id =
            mesto_telemetry::current_trace_id().unwrap_or_else(|| Uuid::new_v4().to_string());
        debug!(%method, %url, request_id = %request_id, "sending request");
        Ok(self
            .http
            .request(method, url)
            .header(HEADER_REQUEST_ID, request_id))
    }

    fn authorized(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let request = self.request(method, path)?;
        Ok(match self.tokens.load()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn send(request: RequestBuilder) -> ApiResult<reqwest::Response> {
        request.send().await.map_err(network_error)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[async_trait]
impl AuthApi for MestoClient {
    async fn register(&self, credentials: &Credentials) -> ApiResult<bool> {
        let request = self.request(Method::POST, "/register")?.json(credentials);
        let document: Value = check_response(Self::send(request).await?).await?;
        Ok(is_truthy(&document))
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<Option<String>> {
        let request = self.request(Method::POST, "/login")?.json(credentials);
        let body: LoginResponse = check_response(Self::send(request).await?).await?;
        Ok(body.token)
    }

    async fn identity(&self, token: &str) -> ApiResult<Identity> {
        let request = self.request(Method::GET, "/users/me")?.bearer_auth(token);
        check_response(Self::send(request).await?).await
    }
}

#[async_trait]
impl GalleryApi for MestoClient {
    async fn get_profile(&self) -> ApiResult<UserProfile> {
        let request = self.authorized(Method::GET, "/users/me")?;
        check_response(Self::send(request).await?).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        let request = self.authorized(Method::PATCH, "/users/me")?.json(update);
        check_response(Self::send(request).await?).await
    }

    async fn update_avatar(&self, update: &AvatarUpdate) -> ApiResult<UserProfile> {
        let request = self
            .authorized(Method::PATCH, "/users/me/avatar")?
            .json(update);
        check_response(Self::send(request).await?).await
    }

    async fn list_cards(&self) -> ApiResult<Vec<Card>> {
        let request = self.authorized(Method::GET, "/cards")?;
        check_response(Self::send(request).await?).await
    }

    async fn create_card(&self, card: &NewCard) -> ApiResult<Card> {
        let request = self.authorized(Method::POST, "/cards")?.json(card);
        check_response(Self::send(request).await?).await
    }

    async fn delete_card(&self, card_id: &str) -> ApiResult<()> {
        let request = self.authorized(Method::DELETE, &format!("/cards/{card_id}"))?;
        check_empty(Self::send(request).await?).await
    }

    async fn like_card(&self, card_id: &str) -> ApiResult<Card> {
        let request = self.authorized(Method::PUT, &format!("/cards/{card_id}/likes"))?;
        check_response(Self::send(request).await?).await
    }

    async fn unlike_card(&self, card_id: &str) -> ApiResult<Card> {
        let request = self.authorized(Method::DELETE, &format!("/cards/{card_id}/likes"))?;
        check_response(Self::send(request).await?).await
    }
}
