//! Artifact generation — prompt to a displayable image URL.
//!
//! DESIGN
//! ======
//! The only partial stage in the pipeline: there is no content-level
//! fallback for "no image", so failures propagate as typed errors instead
//! of silently defaulting. When a relay is configured it is mandatory on
//! the success path — the ephemeral generation URL is never the one
//! handed out. Zero automatic retries unless the composition root opts in
//! via `with_max_retries`.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::image::{BlobRelay, GeneratedImage, ImageError, ImageGeneration, ImageSize, RelayError};
use crate::routes::error::ErrorCode;
use crate::services::mood::Mood;

const DOWNLOAD_TIMEOUT_SECS: u64 = 60;
const DOWNLOAD_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by artifact generation.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("image generation failed: {0}")]
    Image(#[from] ImageError),

    #[error("artifact download failed: {0}")]
    Download(String),

    #[error("artifact download response error: status {status}")]
    DownloadStatus { status: u16 },

    #[error("relay upload failed: {0}")]
    Relay(#[from] RelayError),

    #[error("generation returned binary data but no relay is configured")]
    NoDurableStore,

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for ArtifactError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Image(_) => "E_IMAGE_GENERATION",
            Self::Download(_) | Self::DownloadStatus { .. } => "E_ARTIFACT_DOWNLOAD",
            Self::Relay(_) => "E_RELAY_UPLOAD",
            Self::NoDurableStore => "E_NO_DURABLE_STORE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Image(e) => e.retryable(),
            Self::Relay(e) => e.retryable(),
            Self::Download(_) => true,
            Self::DownloadStatus { status } => matches!(status, 429 | 500..=599),
            Self::NoDurableStore | Self::HttpClientBuild(_) => false,
        }
    }
}

// =============================================================================
// ARTIFACT RECORD
// =============================================================================

/// A rendered artifact. Created once per successful generation, never
/// mutated — a regeneration supersedes it with a fresh record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: Uuid,
    pub url: String,
    pub prompt: String,
    pub mood: Mood,
    /// Milliseconds since Unix epoch.
    pub created_at: i64,
}

impl Artifact {
    #[must_use]
    pub fn new(url: String, prompt: String, mood: Mood) -> Self {
        Self { id: Uuid::new_v4(), url, prompt, mood, created_at: now_ms() }
    }
}

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Maps a synthesized prompt to a displayable image URL, re-uploading
/// through the blob relay when one is configured.
pub struct ArtifactGenerator {
    images: Arc<dyn ImageGeneration>,
    relay: Option<Arc<dyn BlobRelay>>,
    http: reqwest::Client,
    size: ImageSize,
    max_retries: u32,
}

impl ArtifactGenerator {
    /// Build a generator. `relay` of `None` means ephemeral generation
    /// URLs are served directly.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::HttpClientBuild`] if the download client
    /// cannot be constructed.
    pub fn new(
        images: Arc<dyn ImageGeneration>,
        relay: Option<Arc<dyn BlobRelay>>,
        size: ImageSize,
    ) -> Result<Self, ArtifactError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DOWNLOAD_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ArtifactError::HttpClientBuild(e.to_string()))?;
        Ok(Self { images, relay, http, size, max_retries: 0 })
    }

    /// Opt in to automatic retries of retryable failures. Zero by
    /// default.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Render one image for `prompt` and return its displayable URL.
    ///
    /// # Errors
    ///
    /// Returns an [`ArtifactError`] when generation, download, or relay
    /// upload fails; the caller decides how to surface it.
    pub async fn generate(&self, prompt: &str) -> Result<String, ArtifactError> {
        let mut attempt: u32 = 0;
        loop {
            match self.generate_once(prompt).await {
                Ok(url) => return Ok(url),
                Err(e) if attempt < self.max_retries && e.retryable() => {
                    attempt += 1;
                    warn!(error = %e, attempt, "artifact: retrying retryable failure");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, ArtifactError> {
        let image = self.images.generate(prompt, self.size).await?;

        let Some(relay) = &self.relay else {
            return match image {
                GeneratedImage::Url(url) => Ok(url),
                GeneratedImage::Bytes(_) => Err(ArtifactError::NoDurableStore),
            };
        };

        let bytes = match image {
            GeneratedImage::Url(url) => self.download(&url).await?,
            GeneratedImage::Bytes(bytes) => bytes,
        };
        let canonical = relay.store(bytes).await?;
        info!(url = %canonical, "artifact: relayed to durable storage");
        Ok(canonical)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ArtifactError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ArtifactError::Download(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(ArtifactError::DownloadStatus { status });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ArtifactError::Download(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "artifact_test.rs"]
mod tests;
