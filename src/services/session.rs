//! Chat session — the three-stage flow that gates the pipeline.
//!
//! DESIGN
//! ======
//! Idle → Collecting → Presenting. The session owns the conversation
//! buffer for its lifetime: created empty, seeded with the assistant
//! greetings on start, cleared on reset. A monotonically increasing run
//! sequence number implements last-action-wins — a run's result is only
//! accepted if no newer run began while it was in flight.

use serde::Serialize;

use crate::services::conversation::{ConversationBuffer, Turn};
use crate::services::pipeline::PipelineResult;

/// Assistant greetings seeded when a session starts. Assistant-authored,
/// so they never reach the classifier.
pub const GREETINGS: &[&str] = &[
    "I'll tailor your feed to match your mood: calming content to ease your mind when you're \
     feeling down, balanced content that resonates when you're feeling neutral, and uplifting \
     posts that celebrate your happiness",
    "So, tell me, how you're feeling?",
];

// =============================================================================
// STAGE
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Idle,
    Collecting,
    Presenting,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Collecting => "collecting",
            Self::Presenting => "presenting",
        };
        f.write_str(name)
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid stage: {action} requires {expected}, session is {actual}")]
    BadStage { action: &'static str, expected: &'static str, actual: Stage },
}

impl crate::routes::error::ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::BadStage { .. } => "E_BAD_STAGE",
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// One conversation flow. Not shareable across users — the system models
/// exactly one conversation at a time.
#[derive(Debug, Default)]
pub struct ChatSession {
    stage: Stage,
    buffer: ConversationBuffer,
    run_seq: u64,
    latest: Option<PipelineResult>,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn buffer(&self) -> &ConversationBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn latest(&self) -> Option<&PipelineResult> {
        self.latest.as_ref()
    }

    /// Idle → Collecting. Seeds the assistant greetings.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::BadStage`] unless the session is idle.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.stage() != Stage::Idle {
            return Err(SessionError::BadStage { action: "start", expected: "idle", actual: self.stage() });
        }
        for greeting in GREETINGS {
            self.buffer.append(Turn::assistant(*greeting));
        }
        self.stage = Stage::Collecting;
        Ok(())
    }

    /// Append a user turn. Collecting only.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::BadStage`] outside the collecting stage.
    pub fn record_user(&mut self, content: impl Into<String>) -> Result<(), SessionError> {
        if self.stage() != Stage::Collecting {
            return Err(SessionError::BadStage { action: "chat", expected: "collecting", actual: self.stage() });
        }
        self.buffer.append(Turn::user(content));
        Ok(())
    }

    /// Append an assistant turn. Collecting only.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::BadStage`] outside the collecting stage.
    pub fn record_assistant(&mut self, content: impl Into<String>) -> Result<(), SessionError> {
        if self.stage() != Stage::Collecting {
            return Err(SessionError::BadStage { action: "chat", expected: "collecting", actual: self.stage() });
        }
        self.buffer.append(Turn::assistant(content));
        Ok(())
    }

    /// Claim a run slot. Allowed while collecting (finish) or presenting
    /// (regenerate). Returns the sequence number that `present` must echo.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::BadStage`] while idle.
    pub fn begin_run(&mut self) -> Result<u64, SessionError> {
        if self.stage() == Stage::Idle {
            return Err(SessionError::BadStage {
                action: "generate",
                expected: "collecting or presenting",
                actual: self.stage(),
            });
        }
        self.run_seq += 1;
        Ok(self.run_seq)
    }

    /// Accept a finished run's result. Returns false — and discards the
    /// result — when a newer run superseded `seq` while it was in flight.
    pub fn present(&mut self, seq: u64, result: PipelineResult) -> bool {
        if seq != self.run_seq {
            return false;
        }
        self.latest = Some(result);
        self.stage = Stage::Presenting;
        true
    }

    /// Any stage → Idle. Clears the buffer and the latest result.
    pub fn reset(&mut self) {
        self.stage = Stage::Idle;
        self.buffer = ConversationBuffer::new();
        self.latest = None;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
