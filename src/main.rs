mod image;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use image::config::{ImageConfig, RelayConfig};
use image::openai::OpenAiImageClient;
use image::relay::CloudinaryRelay;
use image::{BlobRelay, ImageGeneration};
use llm::{CompletionClient, TextCompletion};
use services::artifact::ArtifactGenerator;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Capability construction is non-fatal: missing config disables the
    // dependent endpoints.
    let completion: Option<Arc<dyn TextCompletion>> = match CompletionClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "completion client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "completion client not configured — chat and classification disabled");
            None
        }
    };

    let generator = match build_generator() {
        Ok(Some(generator)) => Some(Arc::new(generator)),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "artifact generator not configured — image generation disabled");
            None
        }
    };

    let state = state::AppState::new(completion, generator);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "moodfeed listening");
    axum::serve(listener, app).await.expect("server failed");
}

fn build_generator() -> Result<Option<ArtifactGenerator>, Box<dyn std::error::Error>> {
    let config = match ImageConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "image client not configured — image generation disabled");
            return Ok(None);
        }
    };
    let size = config.size;
    let images: Arc<dyn ImageGeneration> = Arc::new(OpenAiImageClient::from_config(config)?);

    let relay: Option<Arc<dyn BlobRelay>> = match RelayConfig::from_env() {
        Some(relay_config) => {
            tracing::info!(cloud = %relay_config.cloud_name, "blob relay enabled");
            Some(Arc::new(CloudinaryRelay::from_config(relay_config)?))
        }
        None => {
            tracing::info!("no blob relay configured — serving ephemeral generation URLs");
            None
        }
    };

    let max_retries = std::env::var("ARTIFACT_MAX_RETRIES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0);

    let generator = ArtifactGenerator::new(images, relay, size)?.with_max_retries(max_retries);
    Ok(Some(generator))
}
