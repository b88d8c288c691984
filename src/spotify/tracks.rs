use reqwest::Client;

use crate::{
    error::ToolError,
    types::{CurrentUserResponse, TimeRange, TopTracksResponse, Track},
};

use super::send_json;

/// Retrieves the profile of the user the token belongs to.
///
/// # Example
///
/// ```
/// let user = get_current_user(&client, "https://api.spotify.com/v1", token).await?;
/// println!("Spotify User ID: {}", user.id);
/// ```
pub async fn get_current_user(
    client: &Client,
    api_url: &str,
    token: &str,
) -> Result<CurrentUserResponse, ToolError> {
    let api_url = format!("{uri}/me", uri = api_url);
    send_json(client.get(&api_url).bearer_auth(token)).await
}

/// Retrieves the current user's top tracks.
///
/// # Arguments
///
/// * `limit` - Number of tracks to return (1-50, validated by the caller)
/// * `time_range` - Window the ranking is computed over
///
/// # Returns
///
/// The tracks in the order Spotify ranks them.
pub async fn get_top_tracks(
    client: &Client,
    api_url: &str,
    token: &str,
    limit: u32,
    time_range: TimeRange,
) -> Result<Vec<Track>, ToolError> {
    let api_url = format!(
        "{uri}/me/top/tracks?limit={limit}&time_range={time_range}",
        uri = api_url,
        limit = limit,
        time_range = time_range.as_str()
    );

    let res: TopTracksResponse = send_json(client.get(&api_url).bearer_auth(token)).await?;
    tracing::debug!(count = res.items.len(), %time_range, "fetched top tracks");
    Ok(res.items)
}
