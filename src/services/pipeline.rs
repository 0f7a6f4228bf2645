//! Pipeline orchestration — one end-to-end run per request.
//!
//! DESIGN
//! ======
//! Strictly ordered stages, each stage's output the next stage's input:
//! classify → synthesize → generate. Stages 1–2 are total; stage 3 may
//! fail, and its failure is carried inside the result with the upstream
//! mood and prompt intact — degrade, don't abort. A re-run repeats the
//! whole sequence; nothing is cached.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::routes::error::ErrorCode;
use crate::services::artifact::{Artifact, ArtifactGenerator};
use crate::services::conversation::ConversationBuffer;
use crate::services::mood::{Mood, MoodClassifier};
use crate::services::prompt::PromptSynthesizer;

// =============================================================================
// RESULT RECORD
// =============================================================================

/// Terminal outcome of the artifact stage.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ArtifactOutcome {
    Generated {
        #[serde(flatten)]
        artifact: Artifact,
    },
    Failed {
        code: &'static str,
        message: String,
        retryable: bool,
    },
}

impl ArtifactOutcome {
    #[must_use]
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }
}

/// The externally visible record of one pipeline run. The `*_defaulted`
/// markers distinguish genuine remote answers from local degradation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub mood: Mood,
    pub mood_defaulted: bool,
    pub prompt: String,
    pub prompt_defaulted: bool,
    pub artifact: ArtifactOutcome,
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

/// Sequences the three stages and assembles the result record.
pub struct PipelineOrchestrator {
    classifier: MoodClassifier,
    synthesizer: PromptSynthesizer,
    generator: Arc<ArtifactGenerator>,
}

impl PipelineOrchestrator {
    #[must_use]
    pub fn new(
        classifier: MoodClassifier,
        synthesizer: PromptSynthesizer,
        generator: Arc<ArtifactGenerator>,
    ) -> Self {
        Self { classifier, synthesizer, generator }
    }

    /// Run the full pipeline against a snapshot of the buffer's user
    /// turns. Never panics and never returns an error — stage-3 failure
    /// is carried inside the result.
    pub async fn run(&self, buffer: &ConversationBuffer) -> PipelineResult {
        let turns = buffer.user_turns();

        let classified = self.classifier.classify(&turns).await;
        let synthesized = self.synthesizer.synthesize(classified.mood).await;

        let artifact = match self.generator.generate(&synthesized.text).await {
            Ok(url) => {
                let artifact = Artifact::new(url, synthesized.text.clone(), classified.mood);
                info!(mood = %classified.mood, artifact_id = %artifact.id, "pipeline: artifact generated");
                ArtifactOutcome::Generated { artifact }
            }
            Err(e) => {
                info!(mood = %classified.mood, error = %e, "pipeline: artifact stage failed");
                ArtifactOutcome::Failed { code: e.error_code(), message: e.to_string(), retryable: e.retryable() }
            }
        };

        PipelineResult {
            mood: classified.mood,
            mood_defaulted: classified.defaulted,
            prompt: synthesized.text,
            prompt_defaulted: synthesized.defaulted,
            artifact,
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
