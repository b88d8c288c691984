use reqwest::Client;

use crate::{
    error::ToolError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse,
    },
};

use super::send_json;

/// Creates a playlist owned by `user_id`.
///
/// Not idempotent: two calls with the same name create two playlists.
pub async fn create(
    client: &Client,
    api_url: &str,
    token: &str,
    user_id: &str,
    name: &str,
    description: &str,
    public: bool,
) -> Result<CreatePlaylistResponse, ToolError> {
    let api_url = format!(
        "{uri}/users/{user_id}/playlists",
        uri = api_url,
        user_id = user_id
    );

    let body = CreatePlaylistRequest {
        name: name.to_string(),
        description: description.to_string(),
        public,
    };

    let created: CreatePlaylistResponse =
        send_json(client.post(&api_url).bearer_auth(token).json(&body)).await?;
    tracing::debug!(playlist_id = %created.id, "playlist created");
    Ok(created)
}

/// Adds track URIs to a playlist at `position` in a single request.
///
/// Spotify accepts at most 100 URIs per request; larger batches are rejected
/// by the remote API and surface as its error.
pub async fn add_tracks(
    client: &Client,
    api_url: &str,
    token: &str,
    playlist_id: &str,
    uris: &[String],
    position: u32,
) -> Result<AddTrackToPlaylistResponse, ToolError> {
    let api_url = format!(
        "{uri}/playlists/{playlist_id}/tracks",
        uri = api_url,
        playlist_id = playlist_id
    );

    let body = AddTrackToPlaylistRequest {
        uris: uris.to_vec(),
        position,
    };

    send_json(client.post(&api_url).bearer_auth(token).json(&body)).await
}
