use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{config, error::TokenError, spotify, types::Token};

/// Seconds before the real expiry at which a token is treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token,
            path: Self::token_path(),
        }
    }

    pub async fn load() -> Result<Self, TokenError> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| TokenError::Missing(e.to_string()))?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token, path })
    }

    pub async fn persist(&self) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and persisting it first when expired.
    pub async fn get_valid_token(&mut self, client: &Client) -> Result<String, TokenError> {
        if self.is_expired() {
            tracing::debug!("access token expired, refreshing");
            let refreshed = spotify::auth::refresh_token(client, &self.token.refresh_token)
                .await
                .map_err(TokenError::Refresh)?;
            self.token = merge_refreshed(&self.token, refreshed);
            if let Err(e) = self.persist().await {
                tracing::warn!(error = %e, "cannot persist refreshed token");
            }
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}

/// Spotify may omit the refresh token on refresh; the previous one stays valid then.
fn merge_refreshed(old: &Token, mut new: Token) -> Token {
    if new.refresh_token.is_empty() {
        new.refresh_token = old.refresh_token.clone();
    }
    if new.scope.is_empty() {
        new.scope = old.scope.clone();
    }
    new
}
