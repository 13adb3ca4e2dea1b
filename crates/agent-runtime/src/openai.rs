//! OpenAI-compatible chat-completions decision-maker.
//!
//! Works against any endpoint speaking the chat-completions dialect
//! (OpenAI, Groq, OpenRouter, local gateways); the base URL is
//! configuration.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;
use webpilot_core_types::{ActionRecord, Observation, ToolCall};

use crate::catalogue::action_catalogue;
use crate::decision::DecisionMaker;
use crate::errors::AgentError;
use crate::prompt::build_messages;

pub struct OpenAiDecisionMaker {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiDecisionMaker {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl DecisionMaker for OpenAiDecisionMaker {
    async fn decide(
        &self,
        task: &str,
        observation: &Observation,
        history: &[ActionRecord],
    ) -> Result<Vec<ToolCall>, AgentError> {
        let body = json!({
            "model": self.model,
            "messages": build_messages(task, history, observation),
            "tools": action_catalogue(),
            "temperature": 0.1,
        });

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| AgentError::decision(err.to_string()))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|err| AgentError::malformed(err.to_string()))?;

        if !status.is_success() {
            let message = payload["error"]["message"]
                .as_str()
                .unwrap_or("unknown API error");
            return Err(AgentError::Decision(format!("{status}: {message}")));
        }

        parse_reply(&payload)
    }
}

/// Convert a chat-completions reply into intended actions.
///
/// The assistant's free-text `content` is its chain of thought; it is
/// attached as the justification to every call in the batch. A reply with
/// no tool calls is a valid empty decision.
pub(crate) fn parse_reply(payload: &Value) -> Result<Vec<ToolCall>, AgentError> {
    let message = &payload["choices"][0]["message"];
    if message.is_null() {
        return Err(AgentError::malformed("reply carries no choices"));
    }

    let reasoning = message["content"].as_str().unwrap_or("").to_string();

    let Some(tool_calls) = message["tool_calls"].as_array() else {
        if !reasoning.is_empty() {
            debug!(target: "agent-runtime", %reasoning, "decision-maker answered without tools");
        }
        return Ok(Vec::new());
    };

    let mut calls = Vec::with_capacity(tool_calls.len());
    for tool_call in tool_calls {
        let name = tool_call["function"]["name"]
            .as_str()
            .ok_or_else(|| AgentError::malformed("tool call without a function name"))?
            .to_string();

        // Arguments arrive as a JSON-encoded string per the protocol.
        let raw_args = tool_call["function"]["arguments"].as_str().unwrap_or("{}");
        let args: Map<String, Value> = serde_json::from_str(raw_args)
            .map_err(|err| AgentError::malformed(format!("arguments for '{name}': {err}")))?;

        calls.push(ToolCall {
            name,
            args,
            reasoning: reasoning.clone(),
        });
    }

    Ok(calls)
}
