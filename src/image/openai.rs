//! OpenAI images client.
//!
//! DESIGN
//! ======
//! One request shape: `POST /images/generations`, `n = 1`, fixed size.
//! The response URL is ephemeral; durability is the relay's job.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::config::ImageConfig;
use super::types::{GeneratedImage, ImageError, ImageGeneration, ImageSize};

pub struct OpenAiImageClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiImageClient {
    /// Build an images client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::HttpClientBuild`] if the HTTP client cannot
    /// be constructed.
    pub fn from_config(config: ImageConfig) -> Result<Self, ImageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ImageError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key: config.api_key, base_url: config.base_url, model: config.model })
    }
}

#[async_trait::async_trait]
impl ImageGeneration for OpenAiImageClient {
    async fn generate(&self, prompt: &str, size: ImageSize) -> Result<GeneratedImage, ImageError> {
        let body = ImageRequest { model: &self.model, prompt, n: 1, size: size.as_str() };
        let url = format!("{}/images/generations", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ImageError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(ImageError::ApiResponse { status, body: text });
        }
        parse_images_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_images_response(json_text: &str) -> Result<GeneratedImage, ImageError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| ImageError::ApiParse(e.to_string()))?;
    let Some(url) = root
        .get("data")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(|item| item.get("url"))
        .and_then(Value::as_str)
    else {
        return Err(ImageError::ApiParse("images: missing data[0].url".to_string()));
    };
    Ok(GeneratedImage::Url(url.to_string()))
}
