//! Text-completion types — provider-neutral messages and errors.
//!
//! DESIGN
//! ======
//! The pipeline never talks to a vendor SDK directly. Everything upstream
//! of the wire client works in terms of [`ChatMessage`] and the
//! [`TextCompletion`] trait, so tests substitute scripted mocks and the
//! concrete wire shape is chosen once, at composition time.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by text-completion client operations.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the provider failed (network, timeout).
    #[error("completion request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("completion response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("completion response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::routes::error::ErrorCode for CompletionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// MESSAGE TYPES
// =============================================================================

/// A single role-tagged message in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".into(), content: content.into() }
    }
}

// =============================================================================
// TEXT COMPLETION TRAIT
// =============================================================================

/// Provider-neutral async trait for text completion. Enables mocking in tests.
///
/// The return value is the generated assistant message as plain text —
/// callers in this crate never need tool calls or structured blocks.
#[async_trait::async_trait]
pub trait TextCompletion: Send + Sync {
    /// Send one completion request and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns a [`CompletionError`] if the request fails, the response is
    /// malformed, or the provider rejects it.
    async fn complete(
        &self,
        max_tokens: u32,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
