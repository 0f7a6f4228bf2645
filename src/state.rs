//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Capability handles are optional: missing configuration disables the
//! dependent endpoints instead of failing startup. The single chat
//! session lives behind an `RwLock` — the system models exactly one
//! conversation at a time.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::llm::TextCompletion;
use crate::services::artifact::ArtifactGenerator;
use crate::services::mood::MoodClassifier;
use crate::services::pipeline::PipelineOrchestrator;
use crate::services::prompt::PromptSynthesizer;
use crate::services::session::ChatSession;

/// Shared application state. Clone is required by Axum — all inner fields
/// are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    /// Optional completion capability. `None` if the LLM env vars are not
    /// configured; chat and classification endpoints return 503.
    pub completion: Option<Arc<dyn TextCompletion>>,
    /// Optional artifact generator. `None` if the image env vars are not
    /// configured; generation endpoints return 503.
    pub generator: Option<Arc<ArtifactGenerator>>,
    /// The one live conversation.
    pub session: Arc<RwLock<ChatSession>>,
}

impl AppState {
    #[must_use]
    pub fn new(completion: Option<Arc<dyn TextCompletion>>, generator: Option<Arc<ArtifactGenerator>>) -> Self {
        Self { completion, generator, session: Arc::new(RwLock::new(ChatSession::new())) }
    }

    /// Assemble a pipeline orchestrator. `None` unless both capabilities
    /// are configured.
    #[must_use]
    pub fn orchestrator(&self) -> Option<PipelineOrchestrator> {
        let completion = self.completion.clone()?;
        let generator = self.generator.clone()?;
        Some(PipelineOrchestrator::new(
            MoodClassifier::new(completion.clone()),
            PromptSynthesizer::new(completion),
            generator,
        ))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
