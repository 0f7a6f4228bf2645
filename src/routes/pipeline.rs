//! Pipeline endpoints — stateless classify/generate plus the session feed.
//!
//! DESIGN
//! ======
//! `/api/mood` and `/api/generate-image` honor the wire shapes the UI
//! already speaks (`userMessages` in, `mood` out; `prompt` in, `imageUrl`
//! out). Invalid payloads are rejected before any remote call. `/api/feed`
//! runs the full pipeline against the session buffer.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::routes::error::ApiError;
use crate::services::conversation::Turn;
use crate::services::mood::{Mood, MoodClassifier};
use crate::services::pipeline::PipelineResult;
use crate::state::AppState;

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MoodResponse {
    pub mood: Mood,
    pub defaulted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/mood` — classify an explicit `userMessages` payload.
pub async fn detect_mood(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<MoodResponse>, ApiError> {
    let Some(items) = body.get("userMessages").and_then(Value::as_array) else {
        return Err(ApiError::invalid_input("userMessages must be an array"));
    };

    // Keep only well-formed user-role entries, in order.
    let turns: Vec<Turn> = items
        .iter()
        .filter(|item| item.get("role").and_then(Value::as_str) == Some("user"))
        .filter_map(|item| item.get("content").and_then(Value::as_str))
        .map(Turn::user)
        .collect();

    // Empty input classifies as neutral without touching the capability.
    if turns.is_empty() {
        return Ok(Json(MoodResponse { mood: Mood::NEUTRAL, defaulted: true }));
    }

    let Some(completion) = state.completion.clone() else {
        return Err(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "E_LLM_NOT_CONFIGURED", "LLM not configured"));
    };
    let classified = MoodClassifier::new(completion).classify(&turns).await;
    Ok(Json(MoodResponse { mood: classified.mood, defaulted: classified.defaulted }))
}

/// `POST /api/generate-image` — render one image for an explicit prompt.
pub async fn generate_image(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ImageResponse>, ApiError> {
    let prompt = body
        .get("prompt")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if prompt.is_empty() {
        return Err(ApiError::invalid_input("prompt must be a non-empty string"));
    }

    let Some(generator) = state.generator.clone() else {
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "E_IMAGES_NOT_CONFIGURED",
            "image generation not configured",
        ));
    };

    match generator.generate(prompt).await {
        Ok(url) => Ok(Json(ImageResponse { image_url: url })),
        Err(e) => Err(ApiError::from_error(StatusCode::BAD_GATEWAY, &e)),
    }
}

/// `POST /api/feed` — run the full pipeline on the session buffer.
pub async fn generate_feed(State(state): State<AppState>) -> Result<Json<PipelineResult>, ApiError> {
    let Some(orchestrator) = state.orchestrator() else {
        let code = if state.completion.is_none() { "E_LLM_NOT_CONFIGURED" } else { "E_IMAGES_NOT_CONFIGURED" };
        return Err(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, code, "pipeline not configured"));
    };

    // Claim a run slot and snapshot the buffer; the run itself holds no
    // lock, so chatting during a run cannot deadlock and cannot disturb
    // the captured snapshot.
    let (seq, buffer) = {
        let mut session = state.session.write().await;
        let seq = session
            .begin_run()
            .map_err(|e| ApiError::from_error(StatusCode::CONFLICT, &e))?;
        (seq, session.buffer().clone())
    };

    let result = orchestrator.run(&buffer).await;

    let mut session = state.session.write().await;
    if !session.present(seq, result.clone()) {
        info!(seq, "feed: run superseded by a newer run, result not retained");
    }
    Ok(Json(result))
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
