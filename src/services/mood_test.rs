use super::*;
use crate::llm::CompletionError;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

// =========================================================================
// MockCompletion
// =========================================================================

/// Scripted completion stub: pops answers in order, counts calls.
struct MockCompletion {
    answers: Mutex<Vec<Result<String, CompletionError>>>,
    calls: AtomicUsize,
}

impl MockCompletion {
    fn returning(answers: Vec<Result<String, CompletionError>>) -> Arc<Self> {
        Arc::new(Self { answers: Mutex::new(answers), calls: AtomicUsize::new(0) })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
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
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut answers = self.answers.lock().unwrap();
        if answers.is_empty() {
            Ok("neutral".into())
        } else {
            answers.remove(0)
        }
    }
}

// =========================================================================
// Vocabulary invariants
// =========================================================================

#[test]
fn vocabulary_is_sorted_and_unique() {
    for pair in MOOD_VOCABULARY.windows(2) {
        assert!(pair[0] < pair[1], "{} must sort strictly before {}", pair[0], pair[1]);
    }
}

#[test]
fn vocabulary_words_are_bare_lowercase() {
    for word in MOOD_VOCABULARY {
        assert!(!word.is_empty());
        assert!(word.chars().all(|c| c.is_ascii_lowercase()), "{word} must be lowercase letters only");
    }
}

#[test]
fn neutral_is_not_a_vocabulary_member() {
    assert!(MOOD_VOCABULARY.binary_search(&NEUTRAL_WORD).is_err());
    assert!(Mood::from_word(NEUTRAL_WORD).is_some());
}

#[test]
fn instruction_enumerates_the_shared_vocabulary() {
    let instruction = classify_instruction();
    for word in MOOD_VOCABULARY {
        assert!(instruction.contains(&format!("\"{word}\"")), "instruction must quote {word}");
    }
    assert!(instruction.contains("\"neutral\""));
}

// =========================================================================
// Normalization
// =========================================================================

#[test]
fn normalize_shouting_with_punctuation() {
    assert_eq!(normalize_mood("STRESSED!!"), Some(Mood::from_word("stressed").unwrap()));
}

#[test]
fn normalize_trims_and_lowercases() {
    assert_eq!(normalize_mood("  Calm \n"), Some(Mood::from_word("calm").unwrap()));
}

#[test]
fn normalize_rejects_out_of_vocabulary() {
    assert_eq!(normalize_mood("joyfulness"), None);
    assert_eq!(normalize_mood("I would say you seem happy"), None);
}

#[test]
fn normalize_rejects_stripped_empty() {
    assert_eq!(normalize_mood("!!!"), None);
    assert_eq!(normalize_mood("   "), None);
    assert_eq!(normalize_mood("123"), None);
}

#[test]
fn normalize_accepts_neutral_sentinel() {
    assert_eq!(normalize_mood("Neutral."), Some(Mood::NEUTRAL));
}

#[test]
fn resolve_always_yields_valid_label() {
    for raw in ["happy", "HAPPY?!", "gibberish", "", "🙂", "sad sad"] {
        let mood = Mood::resolve(raw);
        assert!(mood.is_neutral() || MOOD_VOCABULARY.contains(&mood.as_str()));
    }
}

// =========================================================================
// classify
// =========================================================================

#[tokio::test]
async fn empty_turns_short_circuit_without_remote_call() {
    let mock = MockCompletion::returning(vec![]);
    let classifier = MoodClassifier::new(mock.clone());

    let result = classifier.classify(&[]).await;
    assert!(result.mood.is_neutral());
    assert!(result.defaulted);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn assistant_only_turns_short_circuit_without_remote_call() {
    let mock = MockCompletion::returning(vec![]);
    let classifier = MoodClassifier::new(mock.clone());

    let turns = vec![Turn::assistant("hello"), Turn::assistant("how are you?")];
    let result = classifier.classify(&turns).await;
    assert!(result.mood.is_neutral());
    assert!(result.defaulted);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn classify_normalizes_shouted_answer() {
    let mock = MockCompletion::returning(vec![Ok("STRESSED!!".into())]);
    let classifier = MoodClassifier::new(mock.clone());

    let turns = vec![Turn::user("I'm really stressed about my exam tomorrow")];
    let result = classifier.classify(&turns).await;
    assert_eq!(result.mood.as_str(), "stressed");
    assert!(!result.defaulted);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn classify_out_of_vocabulary_defaults_to_neutral() {
    let mock = MockCompletion::returning(vec![Ok("joyfulness".into())]);
    let classifier = MoodClassifier::new(mock.clone());

    let turns = vec![Turn::user("best day ever")];
    let result = classifier.classify(&turns).await;
    assert!(result.mood.is_neutral());
    assert!(result.defaulted);
}

#[tokio::test]
async fn classify_remote_failure_defaults_to_neutral() {
    let mock = MockCompletion::returning(vec![Err(CompletionError::ApiRequest("timeout".into()))]);
    let classifier = MoodClassifier::new(mock.clone());

    let turns = vec![Turn::user("whatever")];
    let result = classifier.classify(&turns).await;
    assert!(result.mood.is_neutral());
    assert!(result.defaulted);
}

#[tokio::test]
async fn classify_genuine_neutral_is_not_defaulted() {
    let mock = MockCompletion::returning(vec![Ok("neutral".into())]);
    let classifier = MoodClassifier::new(mock.clone());

    let turns = vec![Turn::user("the weather exists")];
    let result = classifier.classify(&turns).await;
    assert!(result.mood.is_neutral());
    assert!(!result.defaulted);
}

#[tokio::test]
async fn classify_ignores_interleaved_assistant_turns() {
    let mock = MockCompletion::returning(vec![Ok("calm".into())]);
    let classifier = MoodClassifier::new(mock.clone());

    let turns = vec![
        Turn::assistant("how are you feeling?"),
        Turn::user("pretty peaceful today"),
        Turn::assistant("glad to hear it"),
    ];
    let result = classifier.classify(&turns).await;
    assert_eq!(result.mood.as_str(), "calm");
    assert_eq!(mock.call_count(), 1);
}
