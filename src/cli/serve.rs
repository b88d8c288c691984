use std::sync::Arc;

use crate::{error, server};

use super::setup::build_agent;

pub async fn serve() {
    let agent = build_agent().await;
    if let Err(e) = server::start_chat_server(Arc::new(agent)).await {
        error!("Chat server failed: {}", e);
    }
}
