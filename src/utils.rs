use std::sync::LazyLock;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric, seq::IndexedRandom};
use regex::Regex;
use sha2::{Digest, Sha256};

/// Upper bound of seed tracks sent with one recommendation request.
pub const MAX_SEEDS: usize = 5;

const TRACK_URI_PREFIX: &str = "spotify:track:";

static TRACK_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"track/([a-zA-Z0-9]+)").expect("valid track id pattern"));

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Picks the seed tracks for a recommendation request.
///
/// With [`MAX_SEEDS`] or more candidates exactly that many distinct entries are
/// drawn at random. With fewer, every candidate is used in the given order.
/// The input is never reordered.
pub fn select_seeds<R: Rng + ?Sized>(seeds: &[String], rng: &mut R) -> Vec<String> {
    if seeds.len() >= MAX_SEEDS {
        seeds.choose_multiple(rng, MAX_SEEDS).cloned().collect()
    } else {
        seeds.to_vec()
    }
}

/// Extracts the track id following `track/` in each URL.
///
/// Order is preserved; URLs without a match are skipped.
pub fn extract_track_ids<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    urls.into_iter()
        .filter_map(|url| {
            TRACK_ID_PATTERN
                .captures(url.as_ref())
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

/// Turns a bare track id into a `spotify:track:` URI, keeping URIs as they are.
pub fn track_uri(id: &str) -> String {
    let id = id.trim();
    if id.starts_with(TRACK_URI_PREFIX) {
        id.to_string()
    } else {
        format!("{TRACK_URI_PREFIX}{id}")
    }
}

/// Reduces a playlist URL or `spotify:playlist:` URI to the bare id.
pub fn playlist_id(input: &str) -> String {
    let input = input.trim();
    if let Some(id) = input.strip_prefix("spotify:playlist:") {
        return id.to_string();
    }
    match input.split_once("/playlist/") {
        Some((_, rest)) => rest
            .split(['?', '/', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
        None => input.to_string(),
    }
}

/// Whether a line typed by the user ends the conversation.
pub fn is_exit_command(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "quit" | "exit")
}
