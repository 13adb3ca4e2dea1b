//! Process configuration from the environment (with `.env` support).

use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API_KEY is required but not set in the environment or .env file")]
    MissingApiKey,

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Everything the binary needs to wire the agent together.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Decision-maker API key. Required.
    pub api_key: String,

    /// Model name for the chat-completions endpoint.
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint.
    pub base_url: String,

    /// Step ceiling per task.
    pub max_steps: u32,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Core loading logic over an arbitrary variable source, so it can be
    /// tested without mutating process state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = lookup("MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let base_url = lookup("BASE_URL").unwrap_or_else(|| "https://api.openai.com/v1".to_string());

        let max_steps = match lookup("WEBPILOT_MAX_STEPS") {
            None => 30,
            Some(raw) => raw.trim().parse::<u32>().ok().filter(|v| *v > 0).ok_or(
                ConfigError::InvalidValue {
                    name: "WEBPILOT_MAX_STEPS",
                    value: raw,
                },
            )?,
        };

        Ok(Self {
            api_key,
            model,
            base_url,
            max_steps,
        })
    }
}
