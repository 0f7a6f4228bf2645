//! Text-completion capability.
//!
//! DESIGN
//! ======
//! The remote provider exposes two incompatible request shapes for the
//! same capability. Rather than sniffing the client shape at call sites,
//! exactly one shape is selected here, once, from typed config — callers
//! depend only on the [`TextCompletion`] trait.

pub mod config;
pub mod openai;
pub mod types;

use config::CompletionConfig;
pub use types::{ChatMessage, CompletionError, TextCompletion};

/// Concrete completion client with the wire shape fixed at construction.
pub struct CompletionClient {
    inner: openai::OpenAiClient,
    model: String,
}

impl CompletionClient {
    /// Build a completion client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, the mode is unknown, or
    /// the HTTP client fails to build.
    pub fn from_env() -> Result<Self, CompletionError> {
        let config = CompletionConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build a completion client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: CompletionConfig) -> Result<Self, CompletionError> {
        let model = config.model.clone();
        let inner = openai::OpenAiClient::new(
            config.api_key,
            config.model,
            config.mode,
            config.base_url,
            config.timeouts,
        )?;
        Ok(Self { inner, model })
    }

    /// Return the configured model name (e.g. `"gpt-4o-mini"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl TextCompletion for CompletionClient {
    async fn complete(
        &self,
        max_tokens: u32,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        self.inner.complete(max_tokens, system, messages).await
    }
}
