use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;

use crate::{
    config,
    error::{AgentError, ConfigError},
};

use super::{
    ChatModel,
    types::{Message, Role, ToolCall, ToolDefinition},
};

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 1000;

/// Chat model hosted on Groq's OpenAI-compatible API.
pub struct GroqModel {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GroqModel {
    pub fn new(
        client: Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn from_env(client: Client) -> Result<Self, ConfigError> {
        Ok(Self::new(
            client,
            config::groq_apiurl(),
            config::groq_api_key()?,
            config::groq_model(),
        ))
    }
}

#[async_trait]
impl ChatModel for GroqModel {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<Message, AgentError> {
        let body = build_request(&self.model, system, messages, tools);
        let api_url = format!("{uri}/chat/completions", uri = self.api_url);

        let response = self
            .client
            .post(&api_url)
            .bearer_auth(&self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(Duration::from_secs(120))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Auth failure bodies can echo key fragments; keep them out of logs.
            let message = if status.as_u16() == 401 || status.as_u16() == 403 {
                format!("authentication failed (HTTP {})", status.as_u16())
            } else {
                response
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<body read error: {e}>"))
            };
            return Err(AgentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: ChatCompletionResponse = response.json().await?;
        into_message(api_response)
    }
}

// --- Request building: our types → OpenAI format ---

fn build_request(
    model: &str,
    system: &str,
    messages: &[Message],
    tools: &[ToolDefinition],
) -> serde_json::Value {
    let mut wire = Vec::with_capacity(messages.len() + 1);

    if !system.is_empty() {
        wire.push(serde_json::json!({
            "role": "system",
            "content": system,
        }));
    }

    for msg in messages {
        wire.push(match msg.role {
            Role::User => serde_json::json!({
                "role": "user",
                "content": msg.text(),
            }),
            Role::Tool => serde_json::json!({
                "role": "tool",
                "tool_call_id": msg.tool_call_id.as_deref().unwrap_or_default(),
                "content": msg.text(),
            }),
            Role::Assistant => {
                let mut json = serde_json::json!({
                    "role": "assistant",
                    "content": msg.content,
                });
                if !msg.tool_calls.is_empty() {
                    json["tool_calls"] = msg
                        .tool_calls
                        .iter()
                        .map(|call| {
                            serde_json::json!({
                                "id": call.id,
                                "type": "function",
                                "function": {
                                    "name": call.name,
                                    "arguments": call.arguments.to_string(),
                                }
                            })
                        })
                        .collect();
                }
                json
            }
        });
    }

    let mut body = serde_json::json!({
        "model": model,
        "messages": wire,
        "temperature": TEMPERATURE,
        "max_tokens": MAX_TOKENS,
    });

    if !tools.is_empty() {
        body["tools"] = tools
            .iter()
            .map(|tool| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }
                })
            })
            .collect();
    }

    body
}

// --- Response parsing: OpenAI format → our types ---

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn into_message(response: ChatCompletionResponse) -> Result<Message, AgentError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AgentError::Decode("empty choices array in response".into()))?;

    let content = choice.message.content.filter(|text| !text.is_empty());
    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            let arguments = if call.function.arguments.trim().is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_str(&call.function.arguments).unwrap_or_else(|e| {
                    tracing::warn!(
                        tool = %call.function.name,
                        error = %e,
                        "malformed tool arguments JSON, defaulting to empty object"
                    );
                    serde_json::json!({})
                })
            };
            ToolCall {
                id: call.id,
                name: call.function.name,
                arguments,
            }
        })
        .collect();

    Ok(Message::assistant_with_calls(content, tool_calls))
}
