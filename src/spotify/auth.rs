use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config,
    management::TokenManager,
    server::start_callback_server,
    types::{PkceToken, Token},
    utils, warning,
};

const AUTH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    scope: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl From<TokenResponse> for Token {
    fn from(res: TokenResponse) -> Self {
        Token {
            access_token: res.access_token,
            refresh_token: res.refresh_token,
            scope: res.scope,
            expires_in: res.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Runs the complete OAuth 2.0 PKCE authorization flow with Spotify.
///
/// 1. Generates the PKCE code verifier and S256 challenge
/// 2. Starts the local callback server
/// 3. Opens the authorization URL in the user's browser
/// 4. Waits up to 60 seconds for the callback to deliver a token
/// 5. Persists the token for later runs
///
/// # Arguments
///
/// * `shared_state` - State shared with the callback handler; holds the verifier
///   going in and the exchanged token coming out
///
/// # Errors
///
/// Returns a message when the client id is not configured, the token is not
/// received in time, or it cannot be written to disk.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<Token, String> {
    let client_id = config::spotify_client_id().map_err(|e| e.to_string())?;

    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let auth_url = Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config::spotify_redirect_uri().as_str()),
            ("code_challenge", code_challenge.as_str()),
            ("code_challenge_method", "S256"),
            ("scope", config::spotify_scope().as_str()),
        ],
    )
    .map_err(|e| format!("Invalid authorization URL: {}", e))?;

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_callback_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state, AUTH_TIMEOUT).await;
    server.abort();

    let token = token.ok_or_else(|| "Authentication failed or timed out.".to_string())?;
    TokenManager::new(token.clone())
        .persist()
        .await
        .map_err(|e| format!("Failed to save token to cache: {}", e))?;

    Ok(token)
}

/// Polls the shared state once per second until the callback stored a token.
async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    max_wait: Duration,
) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|pkce| pkce.token.clone()) {
            return Some(token);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a new access token.
pub async fn refresh_token(client: &Client, refresh_token: &str) -> Result<Token, String> {
    let client_id = config::spotify_client_id().map_err(|e| e.to_string())?;
    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    read_token_response(res).await
}

/// Exchanges the authorization code from the callback for a token.
///
/// The verifier must be the one whose challenge was sent with the
/// authorization request.
pub async fn exchange_code_pkce(
    client: &Client,
    code: &str,
    verifier: &str,
) -> Result<Token, String> {
    let client_id = config::spotify_client_id().map_err(|e| e.to_string())?;
    let redirect_uri = config::spotify_redirect_uri();

    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    read_token_response(res).await
}

async fn read_token_response(res: reqwest::Response) -> Result<Token, String> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(format!("token endpoint returned {}: {}", status, body));
    }

    let body: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
    Ok(body.into())
}
