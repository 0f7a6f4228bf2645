//! Mood classification — user turns to one label from a closed vocabulary.
//!
//! DESIGN
//! ======
//! One vocabulary constant feeds both the instruction builder and the
//! validator. The reference system kept two diverging copies of the list;
//! a single source of truth closes that bug class. `Mood` is only
//! constructible through vocabulary lookup, so every value in the program
//! is a member of vocabulary ∪ {neutral} by construction.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::warn;

use crate::llm::{ChatMessage, TextCompletion};
use crate::services::conversation::{Role, Turn};

/// The closed mood vocabulary. Sorted and duplicate-free so the validator
/// can binary-search; a test pins both invariants.
pub const MOOD_VOCABULARY: &[&str] = &[
    "affectionate",
    "angry",
    "anxious",
    "apprehensive",
    "ashamed",
    "bored",
    "calm",
    "cheerful",
    "confused",
    "content",
    "curious",
    "determined",
    "disappointed",
    "embarrassed",
    "enthusiastic",
    "envious",
    "excited",
    "fearful",
    "frustrated",
    "grateful",
    "guilty",
    "happy",
    "hopeful",
    "insecure",
    "inspired",
    "irritable",
    "joyful",
    "lonely",
    "nostalgic",
    "optimistic",
    "overwhelmed",
    "peaceful",
    "pessimistic",
    "proud",
    "relaxed",
    "relieved",
    "remorseful",
    "resentful",
    "sad",
    "stressed",
    "surprised",
    "vindictive",
    "worried",
];

/// Sentinel label for "no clear mood". Not part of the vocabulary proper,
/// but always a valid classifier output.
pub const NEUTRAL_WORD: &str = "neutral";

const CLASSIFY_MAX_TOKENS: u32 = 16;

// =============================================================================
// MOOD LABEL
// =============================================================================

/// A validated mood label: a vocabulary member or the `neutral` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mood(&'static str);

impl Mood {
    pub const NEUTRAL: Self = Self(NEUTRAL_WORD);

    /// Look up an already-normalized word. Returns `None` for anything
    /// outside vocabulary ∪ {neutral}.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        if word == NEUTRAL_WORD {
            return Some(Self::NEUTRAL);
        }
        MOOD_VOCABULARY
            .binary_search(&word)
            .ok()
            .map(|idx| Self(MOOD_VOCABULARY[idx]))
    }

    /// Coerce an arbitrary raw string to a valid label, applying the full
    /// normalization sequence and falling back to neutral.
    #[must_use]
    pub fn resolve(raw: &str) -> Self {
        normalize_mood(raw).unwrap_or(Self::NEUTRAL)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.0
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        self.0 == NEUTRAL_WORD
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for Mood {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Normalize a raw classifier answer: trim → lowercase → strip everything
/// that is not a lowercase letter → vocabulary membership. Order matters;
/// `"STRESSED!!"` must survive as `stressed`.
#[must_use]
pub fn normalize_mood(raw: &str) -> Option<Mood> {
    let lowered = raw.trim().to_lowercase();
    let stripped: String = lowered.chars().filter(char::is_ascii_lowercase).collect();
    if stripped.is_empty() {
        return None;
    }
    Mood::from_word(&stripped)
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// A classification outcome. `defaulted` is true whenever the label did
/// not come from a validated remote answer (empty input, remote failure,
/// out-of-vocabulary output) — callers can tell genuine classification
/// from degradation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Classified {
    pub mood: Mood,
    pub defaulted: bool,
}

/// Maps a set of user turns to one vocabulary label. Total: every failure
/// path resolves to neutral, never an error.
pub struct MoodClassifier {
    completion: Arc<dyn TextCompletion>,
}

impl MoodClassifier {
    #[must_use]
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self { completion }
    }

    /// Classify the user-authored turns. Non-user turns are ignored, and
    /// an empty input short-circuits to neutral without a remote call.
    pub async fn classify(&self, turns: &[Turn]) -> Classified {
        let messages: Vec<ChatMessage> = turns
            .iter()
            .filter(|t| t.role == Role::User)
            .map(|t| ChatMessage::user(t.content.clone()))
            .collect();

        if messages.is_empty() {
            return Classified { mood: Mood::NEUTRAL, defaulted: true };
        }

        let system = classify_instruction();
        match self
            .completion
            .complete(CLASSIFY_MAX_TOKENS, &system, &messages)
            .await
        {
            Ok(raw) => match normalize_mood(&raw) {
                Some(mood) => Classified { mood, defaulted: false },
                None => {
                    warn!(raw = %raw.trim(), "mood: out-of-vocabulary answer, defaulting to neutral");
                    Classified { mood: Mood::NEUTRAL, defaulted: true }
                }
            },
            Err(e) => {
                warn!(error = %e, "mood: classification failed, defaulting to neutral");
                Classified { mood: Mood::NEUTRAL, defaulted: true }
            }
        }
    }
}

/// System instruction enumerating the vocabulary. Built from the same
/// constant the validator checks against.
fn classify_instruction() -> String {
    let words = MOOD_VOCABULARY
        .iter()
        .map(|m| format!("\"{m}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You are a mood detection assistant. The only valid outputs are exactly one of the \
         following words (no extras, no apologies, no sentences): {words}. If the user's \
         messages do not clearly map to one of those, respond with \"{NEUTRAL_WORD}\"."
    )
}

#[cfg(test)]
#[path = "mood_test.rs"]
mod tests;
