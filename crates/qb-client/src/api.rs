//! The game API: service traits and their HTTP implementation.
//!
//! Every operation is a single request/response call. Nothing is retried;
//! the caller decides what to do with a failure.

use std::future::Future;

use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use qb_core::{
    Character, CharacterId, Credentials, NewCharacter, Registration, Status, StatusUpdate, User,
    UserId,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token::AuthToken;

/// Account operations.
pub trait AuthApi {
    /// Exchange credentials for an access token.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = ClientResult<AuthToken>> + Send;

    /// Create an account.
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = ClientResult<User>> + Send;
}

/// Character and status operations.
pub trait CharacterApi {
    /// All characters owned by a user.
    fn list_characters(
        &self,
        user: UserId,
    ) -> impl Future<Output = ClientResult<Vec<Character>>> + Send;

    /// Create a character.
    fn create_character(
        &self,
        new: &NewCharacter,
    ) -> impl Future<Output = ClientResult<Character>> + Send;

    /// Fetch one character with its status and unspent points.
    fn fetch_character(
        &self,
        id: CharacterId,
    ) -> impl Future<Output = ClientResult<Character>> + Send;

    /// Replace the four allocatable attributes. Returns the canonical status.
    fn update_status(
        &self,
        id: CharacterId,
        update: StatusUpdate,
    ) -> impl Future<Output = ClientResult<Status>> + Send;
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// HTTP implementation of the game API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client for the configured server.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The server this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "api request");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "api response");

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status.as_u16(), &body))
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthToken> {
        credentials.validate()?;
        let builder = self.request(Method::POST, "/auth/login").json(credentials);
        let response: LoginResponse = self.send(builder).await?;
        AuthToken::parse(response.access_token)
    }

    async fn register(&self, registration: &Registration) -> ClientResult<User> {
        registration.validate()?;
        let builder = self.request(Method::POST, "/users").json(registration);
        self.send(builder).await
    }
}

impl CharacterApi for ApiClient {
    async fn list_characters(&self, user: UserId) -> ClientResult<Vec<Character>> {
        let builder = self.request(Method::GET, &format!("/characters/user/{user}"));
        self.send(builder).await
    }

    async fn create_character(&self, new: &NewCharacter) -> ClientResult<Character> {
        new.validate()?;
        let builder = self.request(Method::POST, "/characters").json(new);
        self.send(builder).await
    }

    async fn fetch_character(&self, id: CharacterId) -> ClientResult<Character> {
        let builder = self.request(Method::GET, &format!("/characters/{id}"));
        self.send(builder).await
    }

    async fn update_status(&self, id: CharacterId, update: StatusUpdate) -> ClientResult<Status> {
        let builder = self
            .request(Method::PATCH, &format!("/characters/{id}/status"))
            .json(&update);
        self.send(builder).await
    }
}
