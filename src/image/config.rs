//! Image client and blob relay configuration parsed from environment
//! variables.

use super::types::{ImageError, ImageSize};
use crate::llm::config::Timeouts;

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_IMAGE_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_IMAGE_CONNECT_TIMEOUT_SECS: u64 = 10;

const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
const DEFAULT_IMAGE_SIZE: ImageSize = ImageSize::Square1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub api_key: String,
    pub model: String,
    pub size: ImageSize,
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl ImageConfig {
    /// Build typed image-generation config from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY`
    ///
    /// Optional:
    /// - `IMAGE_MODEL`: default `dall-e-3`
    /// - `IMAGE_SIZE`: `1024x1024` (default) or `512x512`
    /// - `IMAGE_BASE_URL`: default OpenAI API base URL
    /// - `IMAGE_REQUEST_TIMEOUT_SECS`: default 120
    /// - `IMAGE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::MissingApiKey`] when the key is absent and
    /// [`ImageError::ConfigParse`] for an unknown size.
    pub fn from_env() -> Result<Self, ImageError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ImageError::MissingApiKey { var: "OPENAI_API_KEY".into() })?;
        let model = std::env::var("IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string());
        let size = match std::env::var("IMAGE_SIZE") {
            Ok(raw) => ImageSize::parse(&raw)
                .ok_or_else(|| ImageError::ConfigParse(format!("unsupported IMAGE_SIZE '{raw}'")))?,
            Err(_) => DEFAULT_IMAGE_SIZE,
        };
        let base_url = std::env::var("IMAGE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = Timeouts {
            request_secs: crate::llm::config::env_parse_u64(
                "IMAGE_REQUEST_TIMEOUT_SECS",
                DEFAULT_IMAGE_REQUEST_TIMEOUT_SECS,
            ),
            connect_secs: crate::llm::config::env_parse_u64(
                "IMAGE_CONNECT_TIMEOUT_SECS",
                DEFAULT_IMAGE_CONNECT_TIMEOUT_SECS,
            ),
        };

        Ok(Self { api_key, model, size, base_url, timeouts })
    }
}

/// Blob relay configuration. The relay is optional: `from_env` returns
/// `None` when the relay env vars are absent, and the pipeline then serves
/// ephemeral generation URLs directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub cloud_name: String,
    pub upload_preset: String,
}

impl RelayConfig {
    /// Read relay config from `RELAY_CLOUD_NAME` / `RELAY_UPLOAD_PRESET`.
    /// Both must be present for the relay to be enabled.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let cloud_name = std::env::var("RELAY_CLOUD_NAME").ok()?;
        let upload_preset = std::env::var("RELAY_UPLOAD_PRESET").ok()?;
        Some(Self { cloud_name, upload_preset })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
