//! Track recommendations from the ReccoBeats API.
//!
//! The service takes up to five seed tracks and answers with a page of similar
//! tracks. It does not return ids directly, only Spotify URLs in each item's
//! `href`, so the ids are recovered with [`utils::extract_track_ids`].

use async_trait::async_trait;
use reqwest::{Client, header};

use crate::{
    config,
    error::ToolError,
    types::RecommendationResponse,
    utils,
};

pub const MIN_SIZE: u32 = 1;
pub const MAX_SIZE: u32 = 100;

#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Up to `size` recommended track ids for the given seed tracks.
    async fn recommend(&self, size: u32, seeds: &[String]) -> Result<Vec<String>, ToolError>;
}

pub struct ReccoBeatsClient {
    http: Client,
    api_url: String,
}

impl ReccoBeatsClient {
    pub fn new(http: Client, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
        }
    }

    pub fn from_env(http: Client) -> Self {
        Self::new(http, config::recommendation_apiurl())
    }
}

#[async_trait]
impl RecommendationService for ReccoBeatsClient {
    async fn recommend(&self, size: u32, seeds: &[String]) -> Result<Vec<String>, ToolError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(ToolError::invalid_argument(format!(
                "size must be between {MIN_SIZE} and {MAX_SIZE}, got {size}"
            )));
        }
        if seeds.is_empty() {
            return Err(ToolError::invalid_argument(
                "at least one seed track id is required",
            ));
        }

        let active = utils::select_seeds(seeds, &mut rand::rng());
        let api_url = format!("{uri}/track/recommendation", uri = self.api_url);
        tracing::debug!(size, seeds = ?active, "requesting recommendations");

        let response = self
            .http
            .get(&api_url)
            .header(header::ACCEPT, "application/json")
            .query(&[("size", size.to_string()), ("seeds", active.join(","))])
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::from_status(status, body));
        }

        let body: RecommendationResponse = response.json().await?;
        let ids = utils::extract_track_ids(body.content.iter().map(|t| t.href.as_str()));
        tracing::debug!(requested = size, received = ids.len(), "recommendations parsed");
        Ok(ids)
    }
}
