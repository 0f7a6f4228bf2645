//! Session lifecycle and chat endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::ChatMessage;
use crate::routes::error::ApiError;
use crate::services::conversation::Turn;
use crate::services::session::Stage;
use crate::state::AppState;

const CHAT_MAX_TOKENS: u32 = 512;

/// Recorded and returned in place of the assistant reply when the remote
/// fails — a flaky remote must not truncate the conversation the
/// classifier will later read.
const CHAT_APOLOGY: &str = "Sorry, there was a problem. Please try again.";

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub stage: Stage,
    pub messages: Vec<Turn>,
}

#[derive(Deserialize)]
pub struct ChatBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/session/start` — begin collecting; seeds the greetings.
pub async fn start_session(State(state): State<AppState>) -> Result<Json<SessionResponse>, ApiError> {
    let mut session = state.session.write().await;
    session
        .start()
        .map_err(|e| ApiError::from_error(StatusCode::CONFLICT, &e))?;
    Ok(Json(SessionResponse { stage: session.stage(), messages: session.buffer().turns().to_vec() }))
}

/// `POST /api/session/reset` — back to idle, buffer discarded.
pub async fn reset_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let mut session = state.session.write().await;
    session.reset();
    Json(SessionResponse { stage: session.stage(), messages: Vec::new() })
}

/// `POST /api/chat` — append the user turn, obtain the assistant reply,
/// record and return it.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(ApiError::invalid_input("message must be a non-empty string"));
    }
    let Some(completion) = state.completion.clone() else {
        return Err(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "E_LLM_NOT_CONFIGURED", "LLM not configured"));
    };

    // Record the user turn and snapshot the history under the lock; the
    // remote call happens outside it.
    let history: Vec<ChatMessage> = {
        let mut session = state.session.write().await;
        session
            .record_user(message)
            .map_err(|e| ApiError::from_error(StatusCode::CONFLICT, &e))?;
        session
            .buffer()
            .turns()
            .iter()
            .map(|t| ChatMessage { role: t.role.as_str().into(), content: t.content.clone() })
            .collect()
    };

    let reply = match completion.complete(CHAT_MAX_TOKENS, "", &history).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => CHAT_APOLOGY.to_string(),
        Err(e) => {
            warn!(error = %e, "chat: completion failed, sending apology");
            CHAT_APOLOGY.to_string()
        }
    };

    let mut session = state.session.write().await;
    if session.record_assistant(reply.clone()).is_err() {
        // session was reset or finished while the call was in flight; the
        // caller still gets the reply
        warn!("chat: session moved on, reply not recorded");
    }
    Ok(Json(ChatResponse { reply }))
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
