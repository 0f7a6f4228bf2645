//! Completion client configuration parsed from environment variables.

use super::types::CompletionError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Which OpenAI wire shape the client speaks. Exactly one is selected at
/// composition time; request handlers never inspect the client shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    ChatCompletions,
    Responses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    pub api_key: String,
    pub model: String,
    pub mode: ApiMode,
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl CompletionConfig {
    /// Build typed completion config from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY`
    ///
    /// Optional:
    /// - `LLM_MODEL`: default `gpt-4o-mini`
    /// - `LLM_API_MODE`: `chat_completions` (default) or `responses`
    /// - `LLM_BASE_URL`: default OpenAI API base URL
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::MissingApiKey`] when the key is absent and
    /// [`CompletionError::ConfigParse`] for an unknown mode.
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| CompletionError::MissingApiKey { var: "OPENAI_API_KEY".into() })?;
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let mode = parse_mode(std::env::var("LLM_API_MODE").ok().as_deref())?;
        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = Timeouts {
            request_secs: env_parse_u64("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key, model, mode, base_url, timeouts })
    }
}

pub(crate) fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_mode(raw: Option<&str>) -> Result<ApiMode, CompletionError> {
    match raw.unwrap_or("chat_completions") {
        "chat_completions" => Ok(ApiMode::ChatCompletions),
        "responses" => Ok(ApiMode::Responses),
        other => Err(CompletionError::ConfigParse(format!(
            "unsupported LLM_API_MODE '{other}' (expected 'chat_completions' or 'responses')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
