//! # Tools Module
//!
//! The four operations the agent can call: fetch the user's top tracks, create
//! a playlist, add tracks to it, and get recommendations.
//!
//! Each operation is a typed method on [`Toolbox`] returning
//! `Result<ToolOutput, ToolError>`. The agent reaches them through
//! [`Toolbox::invoke`], which decodes the model's JSON arguments, dispatches
//! by tool name and renders the outcome as the text the model reads. Failures
//! are rendered too, so the model learns about them as an ordinary tool result
//! and can explain them to the user.

mod args;

use std::{fmt, sync::Arc};

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::{
    agent::types::ToolDefinition,
    error::{ToolError, ToolErrorKind},
    recommendations::RecommendationService,
    spotify::MusicService,
    types::{PlaylistRef, TimeRange},
    utils,
};

use args::{AddTracksArgs, CreatePlaylistArgs, RecommendationArgs, TopTracksArgs};

pub const MIN_TOP_TRACKS: u32 = 1;
pub const MAX_TOP_TRACKS: u32 = 50;
/// Tracks are inserted at the head of the playlist.
pub const INSERT_POSITION: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    GetUserTopTracks,
    CreateSpotifyPlaylist,
    AddTracksToPlaylist,
    GetRecommendation,
}

impl Tool {
    pub const ALL: [Tool; 4] = [
        Tool::GetUserTopTracks,
        Tool::CreateSpotifyPlaylist,
        Tool::AddTracksToPlaylist,
        Tool::GetRecommendation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::GetUserTopTracks => "get_user_top_tracks",
            Tool::CreateSpotifyPlaylist => "create_spotify_playlist",
            Tool::AddTracksToPlaylist => "add_tracks_to_playlist",
            Tool::GetRecommendation => "get_recommendation",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::GetUserTopTracks => {
                "Retrieve the user's top tracks. Returns a list of Spotify track IDs. \
                 Example: get_user_top_tracks(limit=10, time_range='medium_term')"
            }
            Tool::CreateSpotifyPlaylist => {
                "Create a new public Spotify playlist. Returns the playlist URL and its ID. \
                 Example: create_spotify_playlist(name='My Coolest Playlist', description='My coolest tracks playlist')"
            }
            Tool::AddTracksToPlaylist => {
                "Add tracks to a Spotify playlist. Tracks are inserted at the top of the playlist. \
                 Example: add_tracks_to_playlist(playlist_id='4sUYetgbYvsBU4e7Im5GQC', track_uris=['1WMImncoIZZ7Bz0Y6cZGVp', '2lz3zjQ5QCVXiyOzIk02vW'])"
            }
            Tool::GetRecommendation => {
                "Get song recommendations based on seed track IDs (for example the user's top tracks). \
                 Returns a list of recommended Spotify track IDs. \
                 Example: get_recommendation(size=10, seeds=['1WMImncoIZZ7Bz0Y6cZGVp', '2lz3zjQ5QCVXiyOzIk02vW'])"
            }
        }
    }

    /// JSON schema of the tool's arguments.
    pub fn parameters(&self) -> Value {
        match self {
            Tool::GetUserTopTracks => json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "minimum": MIN_TOP_TRACKS,
                        "maximum": MAX_TOP_TRACKS,
                        "description": "Number of top tracks to retrieve."
                    },
                    "time_range": {
                        "type": "string",
                        "enum": ["short_term", "medium_term", "long_term"],
                        "description": "short_term: last 4 weeks, medium_term: last 6 months, long_term: several years."
                    }
                },
                "required": ["limit", "time_range"]
            }),
            Tool::CreateSpotifyPlaylist => json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "The name for the new playlist."},
                    "description": {"type": "string", "description": "The description for the new playlist."}
                },
                "required": ["name", "description"]
            }),
            Tool::AddTracksToPlaylist => json!({
                "type": "object",
                "properties": {
                    "playlist_id": {"type": "string", "description": "A valid Spotify playlist ID."},
                    "track_uris": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "A list of valid Spotify track IDs."
                    }
                },
                "required": ["playlist_id", "track_uris"]
            }),
            Tool::GetRecommendation => json!({
                "type": "object",
                "properties": {
                    "size": {
                        "type": "integer",
                        "minimum": crate::recommendations::MIN_SIZE,
                        "maximum": crate::recommendations::MAX_SIZE,
                        "description": "Total number of tracks to return."
                    },
                    "seeds": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Spotify track IDs to base the recommendations on. At most 5 are used."
                    }
                },
                "required": ["size", "seeds"]
            }),
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }

    /// Renders a failure of this tool as the text handed back to the model.
    pub fn render_error(&self, err: &ToolError) -> String {
        match (self, err.status()) {
            (Tool::GetRecommendation, Some(status)) => format!("Request failed: HTTP {status}"),
            (Tool::GetUserTopTracks, _) => format!("Error getting top tracks: {err}"),
            (Tool::CreateSpotifyPlaylist, _) => format!("Error creating new playlist: {err}"),
            (Tool::AddTracksToPlaylist, _) => format!("Error adding tracks: {err}"),
            (Tool::GetRecommendation, _) => format!("Error getting recommendations: {err}"),
        }
    }
}

/// Successful result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    TopTracks(Vec<String>),
    PlaylistCreated(PlaylistRef),
    TracksAdded(usize),
    Recommendations(Vec<String>),
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolOutput::TopTracks(ids) => write!(f, "Top tracks: {ids:?}"),
            ToolOutput::PlaylistCreated(playlist) => write!(
                f,
                "Playlist created successfully: {} (id: {})",
                playlist.url, playlist.id
            ),
            ToolOutput::TracksAdded(count) => {
                write!(f, "Successfully added {count} tracks to the playlist.")
            }
            ToolOutput::Recommendations(ids) => write!(f, "Your recommended track IDs: {ids:?}"),
        }
    }
}

/// The tools bound to the services they call.
#[derive(Clone)]
pub struct Toolbox {
    music: Arc<dyn MusicService>,
    recommender: Arc<dyn RecommendationService>,
}

impl Toolbox {
    pub fn new(music: Arc<dyn MusicService>, recommender: Arc<dyn RecommendationService>) -> Self {
        Self { music, recommender }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        Tool::ALL.iter().map(Tool::definition).collect()
    }

    pub async fn top_tracks(&self, limit: u32, time_range: &str) -> Result<ToolOutput, ToolError> {
        if !(MIN_TOP_TRACKS..=MAX_TOP_TRACKS).contains(&limit) {
            return Err(ToolError::invalid_argument(format!(
                "limit must be between {MIN_TOP_TRACKS} and {MAX_TOP_TRACKS}, got {limit}"
            )));
        }
        let time_range: TimeRange = time_range.parse().map_err(ToolError::invalid_argument)?;

        let ids = self.music.top_tracks(limit, time_range).await?;
        Ok(ToolOutput::TopTracks(ids))
    }

    pub async fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<ToolOutput, ToolError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ToolError::invalid_argument("playlist name must not be empty"));
        }

        let user_id = self.music.current_user_id().await?;
        let playlist = self
            .music
            .create_playlist(&user_id, name, description, true)
            .await?;
        Ok(ToolOutput::PlaylistCreated(playlist))
    }

    /// Adds tracks at the head of the playlist.
    ///
    /// An empty list succeeds without contacting the service.
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<ToolOutput, ToolError> {
        if track_ids.is_empty() {
            return Ok(ToolOutput::TracksAdded(0));
        }
        let playlist_id = utils::playlist_id(playlist_id);
        if playlist_id.is_empty() {
            return Err(ToolError::invalid_argument("playlist_id must not be empty"));
        }

        let uris: Vec<String> = track_ids.iter().map(|id| utils::track_uri(id)).collect();
        self.music
            .add_tracks(&playlist_id, &uris, INSERT_POSITION)
            .await?;
        Ok(ToolOutput::TracksAdded(uris.len()))
    }

    pub async fn recommendations(
        &self,
        size: u32,
        seeds: &[String],
    ) -> Result<ToolOutput, ToolError> {
        let ids = self.recommender.recommend(size, seeds).await?;
        Ok(ToolOutput::Recommendations(ids))
    }

    /// Decodes `arguments` for the named tool and runs it.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        let tool = Tool::from_name(name).ok_or_else(|| {
            ToolError::new(ToolErrorKind::UnknownTool, format!("no tool named '{name}'"))
        })?;

        match tool {
            Tool::GetUserTopTracks => {
                let args: TopTracksArgs = decode(arguments)?;
                self.top_tracks(args.limit, &args.time_range).await
            }
            Tool::CreateSpotifyPlaylist => {
                let args: CreatePlaylistArgs = decode(arguments)?;
                self.create_playlist(&args.name, &args.description).await
            }
            Tool::AddTracksToPlaylist => {
                let args: AddTracksArgs = decode(arguments)?;
                self.add_tracks(&args.playlist_id, &args.track_uris).await
            }
            Tool::GetRecommendation => {
                let args: RecommendationArgs = decode(arguments)?;
                self.recommendations(args.size, &args.seeds).await
            }
        }
    }

    /// Runs a tool call and renders the outcome, success or failure, as text.
    pub async fn invoke(&self, name: &str, arguments: Value) -> String {
        match self.call(name, arguments).await {
            Ok(output) => output.to_string(),
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "tool call failed");
                match Tool::from_name(name) {
                    Some(tool) => tool.render_error(&err),
                    None => format!("Error: {err}"),
                }
            }
        }
    }
}

fn decode<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_argument(e.to_string()))
}
