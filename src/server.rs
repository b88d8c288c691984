use std::{
    net::SocketAddr,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use axum::{Extension, Router, routing::get};
use tokio::sync::Mutex;

use crate::{Res, agent::Agent, api, config, types::PkceToken};

/// Shared state of the chat server.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<Agent>,
    sessions: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(agent: Arc<Agent>) -> Self {
        Self {
            agent,
            sessions: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Thread id for a new connection.
    pub fn next_session_id(&self) -> String {
        let n = self.sessions.fetch_add(1, Ordering::Relaxed) + 1;
        format!("session_{n}")
    }
}

pub fn chat_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/chat", get(api::chat))
        .with_state(state)
}

pub fn callback_router(state: Arc<Mutex<Option<PkceToken>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

async fn bind(addr: &str) -> Res<tokio::net::TcpListener> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| format!("Failed to parse server address '{}': {}", addr, e))?;
    Ok(tokio::net::TcpListener::bind(&addr).await?)
}

/// Serves the OAuth callback on the configured callback address until aborted.
pub async fn start_callback_server(state: Arc<Mutex<Option<PkceToken>>>) -> Res<()> {
    let listener = bind(&config::callback_addr()).await?;
    axum::serve(listener, callback_router(state)).await?;
    Ok(())
}

/// Serves the chat WebSocket endpoint on `SERVER_ADDRESS`.
pub async fn start_chat_server(agent: Arc<Agent>) -> Res<()> {
    let addr = config::server_addr();
    let listener = bind(&addr).await?;
    tracing::info!(%addr, "chat server listening");
    crate::info!("MusicAI WebSocket API listening on ws://{}/chat", addr);
    axum::serve(listener, chat_router(AppState::new(agent))).await?;
    Ok(())
}
