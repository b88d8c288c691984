//! # Agent Module
//!
//! A tool-calling conversation loop on top of a hosted chat model.
//!
//! The loop itself holds no music logic. It advertises the [`Toolbox`] schemas
//! and the system instruction to a [`ChatModel`], runs whatever tool calls the
//! model asks for, feeds the results back and stops at the first reply without
//! tool calls. Which tools to call, and when, is entirely the model's decision.
//!
//! ```text
//! user text ─▶ history + user ─▶ ChatModel ─┬─▶ reply (no tool calls) ─▶ done
//!                                  ▲        └─▶ tool calls
//!                                  └──── tool results ◀── Toolbox
//! ```
//!
//! Conversation memory lives in a [`SessionStore`] keyed by thread id. A turn's
//! messages are appended when the turn completes. A failed turn is dropped
//! unless tools already ran: then the user message, the tool calls and their
//! results are kept, so the next turn knows about a playlist that was already
//! created. The failed model reply itself is never stored.

pub mod groq;
pub mod prompt;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{error::AgentError, management::SessionStore, tools::Toolbox};

pub use groq::GroqModel;
use types::{Message, Role, ToolDefinition};

/// Upper bound of model calls in one turn.
pub const MAX_STEPS: usize = 25;

/// A hosted chat model that can request tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Produces the next assistant message for `messages`.
    ///
    /// The returned message has role `Assistant` and carries text, tool calls,
    /// or both.
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<Message, AgentError>;
}

pub struct Agent {
    model: Arc<dyn ChatModel>,
    toolbox: Toolbox,
    sessions: SessionStore,
    system_prompt: String,
    max_steps: usize,
}

impl Agent {
    pub fn new(model: Arc<dyn ChatModel>, toolbox: Toolbox) -> Self {
        Self {
            model,
            toolbox,
            sessions: SessionStore::new(),
            system_prompt: prompt::SYSTEM_PROMPT.to_string(),
            max_steps: MAX_STEPS,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Runs one conversational turn on `thread_id` and returns the final reply.
    pub async fn invoke(&self, thread_id: &str, input: &str) -> Result<String, AgentError> {
        let tools = self.toolbox.definitions();
        let mut context = self.sessions.history(thread_id).await;
        let history_len = context.len();
        context.push(Message::user(input));

        let outcome = self.run_steps(thread_id, &mut context, &tools).await;
        let turn = context.split_off(history_len);

        match outcome {
            Ok(answer) => {
                self.sessions.append(thread_id, turn).await;
                Ok(answer)
            }
            Err(err) => {
                // Tool side effects already happened; keep them visible to the next turn.
                if turn.iter().any(|m| m.role == Role::Tool) {
                    self.sessions.append(thread_id, turn).await;
                }
                Err(err)
            }
        }
    }

    /// Alternates model calls and tool calls until the model answers in text.
    ///
    /// On return `context` ends with the final reply, or with the last
    /// complete round of tool results when the turn failed.
    async fn run_steps(
        &self,
        thread_id: &str,
        context: &mut Vec<Message>,
        tools: &[ToolDefinition],
    ) -> Result<String, AgentError> {
        for step in 0..self.max_steps {
            let reply = self
                .model
                .complete(&self.system_prompt, context, tools)
                .await?;

            if reply.tool_calls.is_empty() {
                let answer = reply.text().to_string();
                context.push(reply);
                return Ok(answer);
            }

            let calls = reply.tool_calls.clone();
            context.push(reply);
            for call in calls {
                tracing::info!(thread_id, step, tool = %call.name, "tool call");
                let result = self.toolbox.invoke(&call.name, call.arguments).await;
                tracing::debug!(thread_id, tool = %call.name, %result, "tool result");
                context.push(Message::tool_result(call.id, result));
            }
        }

        tracing::warn!(thread_id, max_steps = self.max_steps, "step limit reached");
        Err(AgentError::StepLimit(self.max_steps))
    }
}
