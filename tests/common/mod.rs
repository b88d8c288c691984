#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use musicai::{
    agent::{
        ChatModel,
        types::{Message, ToolCall, ToolDefinition},
    },
    error::{AgentError, ToolError},
    recommendations::RecommendationService,
    spotify::MusicService,
    types::{PlaylistRef, TimeRange},
};

/// In-memory stand-in for the Spotify account.
#[derive(Default)]
pub struct FakeSpotify {
    pub top: Vec<String>,
    pub playlists: Mutex<Vec<(String, String)>>,
    pub added: Mutex<Vec<(String, Vec<String>, u32)>>,
    pub fail_with: Option<ToolError>,
    pub calls: AtomicUsize,
}

impl FakeSpotify {
    pub fn with_top(top: &[&str]) -> Self {
        Self {
            top: top.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing(err: ToolError) -> Self {
        Self {
            fail_with: Some(err),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MusicService for FakeSpotify {
    async fn current_user_id(&self) -> Result<String, ToolError> {
        self.check()?;
        Ok("test-user".to_string())
    }

    async fn top_tracks(
        &self,
        limit: u32,
        _time_range: TimeRange,
    ) -> Result<Vec<String>, ToolError> {
        self.check()?;
        Ok(self.top.iter().take(limit as usize).cloned().collect())
    }

    async fn create_playlist(
        &self,
        _user_id: &str,
        name: &str,
        description: &str,
        _public: bool,
    ) -> Result<PlaylistRef, ToolError> {
        self.check()?;
        let mut playlists = self.playlists.lock().unwrap();
        playlists.push((name.to_string(), description.to_string()));
        let id = format!("pl{}", playlists.len());
        Ok(PlaylistRef {
            url: format!("https://open.spotify.com/playlist/{id}"),
            id,
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
        position: u32,
    ) -> Result<(), ToolError> {
        self.check()?;
        self.added
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.to_vec(), position));
        Ok(())
    }
}

/// Returns the first `size` seeds reversed, or a fixed error.
#[derive(Default)]
pub struct FakeRecommender {
    pub fail_with: Option<ToolError>,
}

#[async_trait]
impl RecommendationService for FakeRecommender {
    async fn recommend(&self, size: u32, seeds: &[String]) -> Result<Vec<String>, ToolError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(seeds.iter().rev().take(size as usize).map(|s| format!("rec-{s}")).collect())
    }
}

/// Chat model that replays a fixed script of assistant messages.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<Message, AgentError>>>,
    pub seen: Mutex<Vec<Vec<Message>>>,
    pub systems: Mutex<Vec<String>>,
    pub tool_names: Mutex<Vec<Vec<String>>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<Message, AgentError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
            systems: Mutex::new(Vec::new()),
            tool_names: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<Message, AgentError> {
        self.systems.lock().unwrap().push(system.to_string());
        self.tool_names
            .lock()
            .unwrap()
            .push(tools.iter().map(|t| t.name.clone()).collect());
        self.seen.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Message::assistant("(script exhausted)")))
    }
}

/// Chat model that always asks for the same tool call.
pub struct LoopingModel;

#[async_trait]
impl ChatModel for LoopingModel {
    async fn complete(
        &self,
        _system: &str,
        _messages: &[Message],
        _tools: &[ToolDefinition],
    ) -> Result<Message, AgentError> {
        Ok(Message::assistant_with_calls(
            None,
            vec![call("loop", "get_user_top_tracks", serde_json::json!({"limit": 1, "time_range": "short_term"}))],
        ))
    }
}

pub fn call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    }
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
