//! Prompt synthesis — mood label to image-generation description.
//!
//! DESIGN
//! ======
//! Remote first, deterministic template second. The template is a pure
//! total function of the mood, so this stage can never fail and the
//! pipeline is guaranteed *some* prompt for every valid label.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::llm::{ChatMessage, TextCompletion};
use crate::services::mood::Mood;

const SYNTHESIZE_MAX_TOKENS: u32 = 100;

const SYNTHESIZE_SYSTEM: &str = "You are an assistant that crafts detailed prompts for an image \
                                 generator. When given a single-word mood (e.g. \"serene\", \
                                 \"euphoric\", \"nostalgic\"), you must produce one concise but \
                                 vivid prompt that visually conveys that mood.";

/// A synthesis outcome. `defaulted` is true when the deterministic
/// template was used instead of a remote answer.
#[derive(Debug, Clone, Serialize)]
pub struct Synthesized {
    pub text: String,
    pub defaulted: bool,
}

/// The deterministic fallback: a pure, total function of the mood.
#[must_use]
pub fn fallback_prompt(mood: Mood) -> String {
    format!("A beautiful illustration that conveys a {mood} mood.")
}

/// Maps a validated mood label to an image prompt. Total: remote failure
/// or an empty answer falls back to the template, never an error.
pub struct PromptSynthesizer {
    completion: Arc<dyn TextCompletion>,
}

impl PromptSynthesizer {
    #[must_use]
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self { completion }
    }

    pub async fn synthesize(&self, mood: Mood) -> Synthesized {
        let messages = [ChatMessage::user(format!("Mood: {mood}"))];
        match self
            .completion
            .complete(SYNTHESIZE_MAX_TOKENS, SYNTHESIZE_SYSTEM, &messages)
            .await
        {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    warn!(%mood, "prompt: empty remote answer, using template");
                    Synthesized { text: fallback_prompt(mood), defaulted: true }
                } else {
                    Synthesized { text: text.to_string(), defaulted: false }
                }
            }
            Err(e) => {
                warn!(%mood, error = %e, "prompt: synthesis failed, using template");
                Synthesized { text: fallback_prompt(mood), defaulted: true }
            }
        }
    }
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
