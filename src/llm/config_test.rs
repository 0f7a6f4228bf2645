use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_llm_env() {
    unsafe {
        std::env::remove_var("OPENAI_API_KEY");
        std::env::remove_var("LLM_MODEL");
        std::env::remove_var("LLM_API_MODE");
        std::env::remove_var("LLM_BASE_URL");
        std::env::remove_var("LLM_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("LLM_CONNECT_TIMEOUT_SECS");
    }
}

#[test]
fn from_env_defaults() {
    unsafe {
        clear_llm_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
    }

    let cfg = CompletionConfig::from_env().unwrap();
    assert_eq!(cfg.api_key, "sk-test");
    assert_eq!(cfg.model, "gpt-4o-mini");
    assert_eq!(cfg.mode, ApiMode::ChatCompletions);
    assert_eq!(cfg.base_url, DEFAULT_OPENAI_BASE_URL);
    assert_eq!(
        cfg.timeouts,
        Timeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_parses_overrides() {
    unsafe {
        clear_llm_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("LLM_MODEL", "gpt-4o");
        std::env::set_var("LLM_API_MODE", "responses");
        std::env::set_var("LLM_BASE_URL", "https://example.test/v1/");
        std::env::set_var("LLM_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("LLM_CONNECT_TIMEOUT_SECS", "7");
    }

    let cfg = CompletionConfig::from_env().unwrap();
    assert_eq!(cfg.model, "gpt-4o");
    assert_eq!(cfg.mode, ApiMode::Responses);
    assert_eq!(cfg.base_url, "https://example.test/v1");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_missing_key_errors() {
    unsafe { clear_llm_env() };

    let err = CompletionConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("OPENAI_API_KEY"));
}

#[test]
fn from_env_unknown_mode_errors() {
    unsafe {
        clear_llm_env();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("LLM_API_MODE", "bad_mode");
    }

    let err = CompletionConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("unsupported LLM_API_MODE"));

    unsafe { clear_llm_env() };
}
