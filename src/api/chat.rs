use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use serde::Serialize;

use crate::{Res, server::AppState};

pub const WELCOME: &str = "Connected to MusicAI! What kind of playlist would you like to create?";
pub const GOODBYE: &str = "Goodbye! Enjoy your playlist!";

/// Outbound frame: `{"type": "...", "content": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum ChatFrame {
    Welcome(String),
    Response(String),
    Goodbye(String),
    Error(String),
}

/// Text of an inbound frame.
///
/// JSON objects contribute their `message` field (empty when absent); anything
/// that is not a JSON object is taken verbatim.
pub fn parse_user_message(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string(),
        _ => raw.to_string(),
    }
}

pub fn is_goodbye(message: &str) -> bool {
    matches!(
        message.trim().to_lowercase().as_str(),
        "quit" | "exit" | "disconnect"
    )
}

pub async fn chat(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let session_id = state.next_session_id();
    tracing::info!(%session_id, "websocket connection established");

    if let Err(e) = run_session(&mut socket, &state, &session_id).await {
        tracing::error!(%session_id, error = %e, "websocket session failed");
        let frame = ChatFrame::Error(format!("An error occurred: {e}"));
        let _ = send(&mut socket, &frame).await;
    }

    tracing::info!(%session_id, "websocket disconnected");
}

async fn run_session(socket: &mut WebSocket, state: &AppState, session_id: &str) -> Res<()> {
    send(socket, &ChatFrame::Welcome(WELCOME.to_string())).await?;

    while let Some(message) = socket.recv().await {
        let raw = match message? {
            Message::Text(text) => text.as_str().to_string(),
            Message::Close(_) => break,
            _ => continue,
        };
        tracing::info!(%session_id, message = %raw, "received message");

        let user_message = parse_user_message(&raw);
        if is_goodbye(&user_message) {
            send(socket, &ChatFrame::Goodbye(GOODBYE.to_string())).await?;
            break;
        }

        tracing::info!(%session_id, "invoking agent");
        let reply = state.agent.invoke(session_id, &user_message).await?;
        tracing::info!(%session_id, "sending response");
        send(socket, &ChatFrame::Response(reply)).await?;
    }

    Ok(())
}

async fn send(socket: &mut WebSocket, frame: &ChatFrame) -> Res<()> {
    let json = serde_json::to_string(frame)?;
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}
