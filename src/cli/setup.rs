use std::sync::Arc;

use reqwest::Client;

use crate::{
    agent::{Agent, GroqModel},
    error, info,
    recommendations::ReccoBeatsClient,
    spotify::{MusicService, SpotifyClient},
    tools::Toolbox,
};

/// Builds the agent shared by both interface shells.
///
/// Resolves the Spotify user once up front so a missing or revoked token is
/// reported before the first prompt rather than in the middle of a turn.
pub(super) async fn build_agent() -> Agent {
    let http = Client::new();

    let spotify = match SpotifyClient::from_env(http.clone()).await {
        Ok(client) => client,
        Err(e) => error!("Failed to load token. Please run musicai auth\n Error: {}", e),
    };

    match spotify.current_user_id().await {
        Ok(user_id) => info!("Spotify User ID: {}", user_id),
        Err(e) => error!("Cannot reach Spotify: {}", e),
    }

    let model = match GroqModel::from_env(http.clone()) {
        Ok(model) => model,
        Err(e) => error!("{}", e),
    };

    let toolbox = Toolbox::new(
        Arc::new(spotify),
        Arc::new(ReccoBeatsClient::from_env(http)),
    );

    Agent::new(Arc::new(model), toolbox)
}
