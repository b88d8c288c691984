//! # Spotify Integration Module
//!
//! Thin wrappers over the Spotify Web API endpoints the playlist agent needs,
//! plus the OAuth 2.0 PKCE flow that produces the token they run with.
//!
//! ## Architecture
//!
//! ```text
//! Tools (crate::tools)
//!          ↓
//! MusicService trait  ← SpotifyClient (this module), fakes in tests
//!          ↓
//! Endpoint functions (tracks, playlist)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! The endpoint functions in [`tracks`] and [`playlist`] are stateless: they take
//! an HTTP client, the API base URL and a bearer token. [`SpotifyClient`] owns
//! those three pieces for the lifetime of the process and hands them down,
//! refreshing the token through [`TokenManager`] when it expires.
//!
//! ## API Coverage
//!
//! - `GET /me` - Current user's id
//! - `GET /me/top/tracks` - User's top tracks for a time window
//! - `POST /users/{user_id}/playlists` - Create a playlist
//! - `POST /playlists/{playlist_id}/tracks` - Insert tracks at a position
//! - `POST /api/token` - Token exchange and refresh
//!
//! ## Error Handling
//!
//! Every call returns [`ToolError`]; nothing is retried. A failed call surfaces
//! immediately with the HTTP status mapped to a [`crate::error::ToolErrorKind`].

pub mod auth;
pub mod playlist;
pub mod tracks;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
    config,
    error::{TokenError, ToolError, ToolErrorKind},
    management::TokenManager,
    types::{PlaylistRef, TimeRange},
};

/// The music-service operations the tools are built on.
#[async_trait]
pub trait MusicService: Send + Sync {
    async fn current_user_id(&self) -> Result<String, ToolError>;

    /// Ids of the current user's top tracks, most played first.
    async fn top_tracks(&self, limit: u32, time_range: TimeRange)
    -> Result<Vec<String>, ToolError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<PlaylistRef, ToolError>;

    /// Inserts `uris` into the playlist starting at `position`, in one request.
    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
        position: u32,
    ) -> Result<(), ToolError>;
}

/// Authenticated Spotify Web API client shared by all tool calls.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>, tokens: TokenManager) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            tokens: Mutex::new(tokens),
        }
    }

    /// Builds a client from the stored token and the configured API URL.
    pub async fn from_env(http: Client) -> Result<Self, TokenError> {
        let tokens = TokenManager::load().await?;
        Ok(Self::new(http, config::spotify_apiurl(), tokens))
    }

    async fn bearer(&self) -> Result<String, ToolError> {
        self.tokens
            .lock()
            .await
            .get_valid_token(&self.http)
            .await
            .map_err(|e| ToolError::new(ToolErrorKind::Auth, e.to_string()))
    }
}

#[async_trait]
impl MusicService for SpotifyClient {
    async fn current_user_id(&self) -> Result<String, ToolError> {
        let token = self.bearer().await?;
        tracks::get_current_user(&self.http, &self.api_url, &token)
            .await
            .map(|user| user.id)
    }

    async fn top_tracks(
        &self,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<String>, ToolError> {
        let token = self.bearer().await?;
        let tracks =
            tracks::get_top_tracks(&self.http, &self.api_url, &token, limit, time_range).await?;
        Ok(tracks.into_iter().map(|t| t.id).collect())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<PlaylistRef, ToolError> {
        let token = self.bearer().await?;
        let created = playlist::create(
            &self.http,
            &self.api_url,
            &token,
            user_id,
            name,
            description,
            public,
        )
        .await?;
        Ok(PlaylistRef {
            id: created.id,
            url: created.external_urls.spotify,
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
        position: u32,
    ) -> Result<(), ToolError> {
        let token = self.bearer().await?;
        playlist::add_tracks(&self.http, &self.api_url, &token, playlist_id, uris, position)
            .await
            .map(|_| ())
    }
}

/// Sends a request and decodes a successful JSON body.
///
/// Non-success statuses are turned into a [`ToolError`] carrying the body text.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ToolError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<body read error: {e}>"));
        return Err(ToolError::from_status(status, body));
    }

    Ok(response.json::<T>().await?)
}
