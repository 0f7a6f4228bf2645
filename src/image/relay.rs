//! Durable blob-storage relay.
//!
//! DESIGN
//! ======
//! Generation-service URLs expire. When a relay is configured, the raw
//! image bytes are re-uploaded and the relay's canonical URL is the one
//! handed out — the ephemeral URL never leaves the generator on the
//! relayed path. Implementation targets Cloudinary's unsigned upload API.

use serde_json::Value;
use std::time::Duration;

use super::config::RelayConfig;

const UPLOAD_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by relay uploads.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The upload request failed (network, timeout).
    #[error("relay upload request failed: {0}")]
    UploadRequest(String),

    /// The relay returned a non-success HTTP status.
    #[error("relay upload response error: status {status}")]
    UploadResponse { status: u16, body: String },

    /// The relay response body could not be deserialized.
    #[error("relay response parse failed: {0}")]
    UploadParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::routes::error::ErrorCode for RelayError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UploadRequest(_) => "E_RELAY_REQUEST",
            Self::UploadResponse { .. } => "E_RELAY_RESPONSE",
            Self::UploadParse(_) => "E_RELAY_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::UploadRequest(_) | Self::UploadResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// RELAY TRAIT
// =============================================================================

/// Durable blob store: binary payload in, canonical non-expiring URL out.
#[async_trait::async_trait]
pub trait BlobRelay: Send + Sync {
    /// Store `bytes` and return the canonical URL.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError`] if the upload fails or the response is
    /// malformed.
    async fn store(&self, bytes: Vec<u8>) -> Result<String, RelayError>;
}

// =============================================================================
// CLOUDINARY
// =============================================================================

/// Cloudinary unsigned-upload relay.
pub struct CloudinaryRelay {
    http: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl CloudinaryRelay {
    /// Build a relay client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::HttpClientBuild`] if the HTTP client cannot
    /// be constructed.
    pub fn from_config(config: RelayConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| RelayError::HttpClientBuild(e.to_string()))?;
        let upload_url = format!("https://api.cloudinary.com/v1_1/{}/image/upload", config.cloud_name);
        Ok(Self { http, upload_url, upload_preset: config.upload_preset })
    }
}

#[async_trait::async_trait]
impl BlobRelay for CloudinaryRelay {
    async fn store(&self, bytes: Vec<u8>) -> Result<String, RelayError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name("artifact.png");
        let form = reqwest::multipart::Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", part);

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RelayError::UploadRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| RelayError::UploadRequest(e.to_string()))?;
        if status != 200 {
            return Err(RelayError::UploadResponse { status, body: text });
        }
        parse_upload_response(&text)
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_upload_response(json_text: &str) -> Result<String, RelayError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| RelayError::UploadParse(e.to_string()))?;
    let Some(url) = root.get("secure_url").and_then(Value::as_str) else {
        return Err(RelayError::UploadParse("upload: missing secure_url".to_string()));
    };
    Ok(url.to_string())
}
