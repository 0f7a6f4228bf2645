use super::*;
use crate::llm::CompletionError;
use std::sync::Mutex;

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
        self.answers.lock().unwrap().remove(0)
    }
}

#[tokio::test]
async fn remote_answer_is_used_verbatim_trimmed() {
    let mock = MockCompletion::returning(vec![Ok("  A misty lakeshore at dawn, soft pastel light.  ".into())]);
    let synthesizer = PromptSynthesizer::new(mock);

    let result = synthesizer.synthesize(Mood::resolve("calm")).await;
    assert_eq!(result.text, "A misty lakeshore at dawn, soft pastel light.");
    assert!(!result.defaulted);
}

#[tokio::test]
async fn remote_failure_falls_back_to_exact_template() {
    let mock = MockCompletion::returning(vec![Err(CompletionError::ApiRequest("timeout".into()))]);
    let synthesizer = PromptSynthesizer::new(mock);

    let result = synthesizer.synthesize(Mood::resolve("calm")).await;
    assert_eq!(result.text, "A beautiful illustration that conveys a calm mood.");
    assert!(result.defaulted);
}

#[tokio::test]
async fn empty_remote_answer_falls_back() {
    let mock = MockCompletion::returning(vec![Ok("   \n".into())]);
    let synthesizer = PromptSynthesizer::new(mock);

    let result = synthesizer.synthesize(Mood::resolve("hopeful")).await;
    assert_eq!(result.text, "A beautiful illustration that conveys a hopeful mood.");
    assert!(result.defaulted);
}

#[test]
fn fallback_is_total_over_the_vocabulary() {
    for word in crate::services::mood::MOOD_VOCABULARY {
        let mood = Mood::from_word(word).unwrap();
        let prompt = fallback_prompt(mood);
        assert_eq!(prompt, format!("A beautiful illustration that conveys a {word} mood."));
        assert!(!prompt.is_empty());
    }
    assert_eq!(
        fallback_prompt(Mood::NEUTRAL),
        "A beautiful illustration that conveys a neutral mood."
    );
}
