//! Configuration management for the MusicAI playlist agent.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Endpoints of the remote services carry defaults so
//! only the credentials have to be provided by the user.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_CALLBACK_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_SPOTIFY_SCOPE: &str =
    "user-top-read user-read-recently-played playlist-modify-public playlist-modify-private";
pub const DEFAULT_RECOMMENDATION_API_URL: &str = "https://api.reccobeats.com/v1";
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "gemma2-9b-it";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8000";

/// Returns the application's directory inside the platform local data directory.
///
/// - Linux: `~/.local/share/musicai`
/// - macOS: `~/Library/Application Support/musicai`
/// - Windows: `%LOCALAPPDATA%/musicai`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("musicai");
    path
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory when it doesn't exist yet. A missing `.env` file is
/// not an error: the process environment is still consulted by every getter,
/// so a caller can configure everything through exported variables.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or an existing `.env`
/// file cannot be parsed.
pub async fn load_env() -> Result<(), ConfigError> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| ConfigError::Env(e.to_string()))?;

    let path = dir.join(".env");
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no .env file, using process environment");
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| ConfigError::Env(e.to_string()))
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Address the WebSocket server binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Address the temporary OAuth callback server binds to.
///
/// Must match the host and port of [`spotify_redirect_uri`].
pub fn callback_addr() -> String {
    var_or("SPOTIFY_CALLBACK_ADDRESS", DEFAULT_CALLBACK_ADDRESS)
}

/// Client ID of the Spotify application (`SPOTIFY_CLIENT_ID`).
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_ID")
}

/// Redirect URI registered in the Spotify application settings.
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_REDIRECT_URI", DEFAULT_SPOTIFY_REDIRECT_URI)
}

/// Space separated permission scopes requested during authorization.
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)
}

pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

/// Base URL of the recommendation service (`RECOMMENDATION_API_URL`).
pub fn recommendation_apiurl() -> String {
    var_or("RECOMMENDATION_API_URL", DEFAULT_RECOMMENDATION_API_URL)
}

/// API key for the hosted chat model (`GROQ_API_KEY`).
pub fn groq_api_key() -> Result<String, ConfigError> {
    required("GROQ_API_KEY")
}

/// Base URL of the OpenAI-compatible chat completions API.
pub fn groq_apiurl() -> String {
    var_or("GROQ_API_URL", DEFAULT_GROQ_API_URL)
}

pub fn groq_model() -> String {
    var_or("GROQ_MODEL", DEFAULT_GROQ_MODEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_ends_with_app_name() {
        assert!(data_dir().ends_with("musicai"));
    }

    #[test]
    fn default_scope_covers_playlist_modification() {
        let scopes: Vec<&str> = DEFAULT_SPOTIFY_SCOPE.split(' ').collect();
        assert_eq!(
            scopes,
            vec![
                "user-top-read",
                "user-read-recently-played",
                "playlist-modify-public",
                "playlist-modify-private",
            ]
        );
    }

    #[test]
    fn var_or_falls_back_on_unset_variable() {
        assert_eq!(
            var_or("MUSICAI_TEST_SURELY_UNSET_VARIABLE", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn required_reports_missing_variable_name() {
        let err = required("MUSICAI_TEST_SURELY_UNSET_REQUIRED").unwrap_err();
        assert!(err.to_string().contains("MUSICAI_TEST_SURELY_UNSET_REQUIRED"));
    }
}
