use super::*;
use crate::llm::{CompletionError, TextCompletion};
use crate::services::conversation::Role;
use crate::services::session::GREETINGS;
use crate::state::test_helpers;
use std::sync::{Arc, Mutex};

// =========================================================================
// MockCompletion
// =========================================================================

struct MockCompletion {
    answers: Mutex<Vec<Result<String, CompletionError>>>,
}

impl MockCompletion {
    fn returning(answers: Vec<Result<String, CompletionError>>) -> Arc<Self> {
        Arc::new(Self { answers: Mutex::new(answers) })
    }
}

#[async_trait::async_trait]
impl TextCompletion for MockCompletion {
    async fn complete(
        &self,
        _max_tokens: u32,
        _system: &str,
        _messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let mut answers = self.answers.lock().unwrap();
        if answers.is_empty() {
            Ok("ok".into())
        } else {
            answers.remove(0)
        }
    }
}

// =========================================================================
// session lifecycle
// =========================================================================

#[tokio::test]
async fn start_returns_greetings() {
    let state = test_helpers::test_app_state();
    let Json(response) = start_session(State(state)).await.unwrap();

    assert_eq!(response.stage, Stage::Collecting);
    assert_eq!(response.messages.len(), GREETINGS.len());
    assert!(response.messages.iter().all(|t| t.role == Role::Assistant));
}

#[tokio::test]
async fn start_twice_conflicts() {
    let state = test_helpers::test_app_state();
    start_session(State(state.clone())).await.unwrap();

    let err = start_session(State(state)).await.unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);
    assert_eq!(err.body.code, "E_BAD_STAGE");
}

#[tokio::test]
async fn reset_returns_to_idle() {
    let state = test_helpers::test_app_state();
    start_session(State(state.clone())).await.unwrap();

    let Json(response) = reset_session(State(state.clone())).await;
    assert_eq!(response.stage, Stage::Idle);
    assert!(response.messages.is_empty());
    assert!(state.session.read().await.buffer().is_empty());
}

// =========================================================================
// chat
// =========================================================================

#[tokio::test]
async fn chat_records_both_turns() {
    let completion = MockCompletion::returning(vec![Ok("That sounds tough.".into())]);
    let state = test_helpers::test_app_state_with(Some(completion), None);
    start_session(State(state.clone())).await.unwrap();

    let Json(response) = chat(State(state.clone()), Json(ChatBody { message: "rough day".into() }))
        .await
        .unwrap();
    assert_eq!(response.reply, "That sounds tough.");

    let session = state.session.read().await;
    let turns = session.buffer().turns();
    assert_eq!(turns.len(), GREETINGS.len() + 2);
    assert_eq!(turns[turns.len() - 2].content, "rough day");
    assert_eq!(turns[turns.len() - 1].content, "That sounds tough.");
}

#[tokio::test]
async fn chat_remote_failure_sends_apology_and_keeps_conversation() {
    let completion = MockCompletion::returning(vec![Err(CompletionError::ApiRequest("down".into()))]);
    let state = test_helpers::test_app_state_with(Some(completion), None);
    start_session(State(state.clone())).await.unwrap();

    let Json(response) = chat(State(state.clone()), Json(ChatBody { message: "hello?".into() }))
        .await
        .unwrap();
    assert_eq!(response.reply, CHAT_APOLOGY);

    // the user turn survived, so a later classification still sees it
    let session = state.session.read().await;
    assert_eq!(session.buffer().user_turns().len(), 1);
}

#[tokio::test]
async fn chat_before_start_conflicts() {
    let completion = MockCompletion::returning(vec![]);
    let state = test_helpers::test_app_state_with(Some(completion), None);

    let err = chat(State(state), Json(ChatBody { message: "too early".into() }))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn chat_blank_message_rejected() {
    let completion = MockCompletion::returning(vec![]);
    let state = test_helpers::test_app_state_with(Some(completion), None);
    start_session(State(state.clone())).await.unwrap();

    let err = chat(State(state), Json(ChatBody { message: "   ".into() }))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.body.code, "E_INVALID_INPUT");
}

#[tokio::test]
async fn chat_unconfigured_is_503() {
    let state = test_helpers::test_app_state();
    start_session(State(state.clone())).await.unwrap();

    let err = chat(State(state), Json(ChatBody { message: "hi".into() }))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(err.body.code, "E_LLM_NOT_CONFIGURED");
}
