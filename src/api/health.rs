use axum::response::Json;
use serde_json::{Value, json};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "MusicAI is running",
        "websocket_endpoint": "/chat"
    }))
}
