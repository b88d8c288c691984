use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::agent::types::Message;

/// In-memory conversation histories keyed by thread id.
///
/// Histories are append-only and live as long as the process. A thread is
/// created implicitly by its first append.
#[derive(Default)]
pub struct SessionStore {
    threads: Mutex<HashMap<String, Vec<Message>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a thread's history; empty for unknown threads.
    pub async fn history(&self, thread_id: &str) -> Vec<Message> {
        self.threads
            .lock()
            .await
            .get(thread_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn append(&self, thread_id: &str, messages: Vec<Message>) {
        self.threads
            .lock()
            .await
            .entry(thread_id.to_string())
            .or_default()
            .extend(messages);
    }

    pub async fn count_threads(&self) -> usize {
        self.threads.lock().await.len()
    }
}
