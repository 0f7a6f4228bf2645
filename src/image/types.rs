//! Image-generation types — capability trait, sizes, and errors.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by image-generation client operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The HTTP request to the provider failed (network, timeout).
    #[error("image API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("image API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("image API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::routes::error::ErrorCode for ImageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::ApiRequest(_) => "E_IMAGE_API_REQUEST",
            Self::ApiResponse { .. } => "E_IMAGE_API_RESPONSE",
            Self::ApiParse(_) => "E_IMAGE_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// IMAGE SIZE
// =============================================================================

/// Supported square render sizes. The pipeline always requests one fixed
/// size from config; this is not caller-selectable per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "512x512")]
    Square512,
    #[serde(rename = "1024x1024")]
    Square1024,
}

impl ImageSize {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square512 => "512x512",
            Self::Square1024 => "1024x1024",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "512x512" => Some(Self::Square512),
            "1024x1024" => Some(Self::Square1024),
            _ => None,
        }
    }
}

// =============================================================================
// IMAGE GENERATION TRAIT
// =============================================================================

/// One generated image reference: an ephemeral service URL or the raw
/// bytes. Generation-service URLs expire, so durable display goes through
/// the blob relay either way.
#[derive(Debug, Clone)]
pub enum GeneratedImage {
    Url(String),
    Bytes(Vec<u8>),
}

/// Provider-neutral async trait for image generation. Enables mocking in
/// tests.
#[async_trait::async_trait]
pub trait ImageGeneration: Send + Sync {
    /// Render a single image for `prompt` at `size` and return its
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns an [`ImageError`] if the request fails or the response is
    /// malformed.
    async fn generate(&self, prompt: &str, size: ImageSize) -> Result<GeneratedImage, ImageError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
