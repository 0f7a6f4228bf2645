//! OpenAI-compatible completion client.
//!
//! DESIGN
//! ======
//! One client, two wire shapes: `/v1/chat/completions` and `/v1/responses`.
//! The shape is fixed by [`ApiMode`] at construction — the pipeline above
//! this module sees only [`TextCompletion`] and plain strings.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::config::{ApiMode, Timeouts};
use super::types::{ChatMessage, CompletionError, TextCompletion};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    mode: ApiMode,
}

impl OpenAiClient {
    /// Build a client for the configured wire shape.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::HttpClientBuild`] if the HTTP client
    /// cannot be constructed.
    pub fn new(
        api_key: String,
        model: String,
        mode: ApiMode,
        base_url: String,
        timeouts: Timeouts,
    ) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| CompletionError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url, model, mode })
    }

    async fn chat_completions(
        &self,
        max_tokens: u32,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let msgs = build_chat_completions_messages(system, messages);
        let body = CcRequest { model: &self.model, max_tokens, messages: &msgs };
        let text = self.send_json("/chat/completions", &body).await?;
        parse_chat_completions_response(&text)
    }

    async fn responses(
        &self,
        max_tokens: u32,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let input: Vec<RespInputItem<'_>> = messages.iter().map(RespInputItem::from).collect();
        let body = RespRequest {
            model: &self.model,
            max_output_tokens: max_tokens,
            instructions: system,
            input: &input,
        };
        let text = self.send_json("/responses", &body).await?;
        parse_responses_response(&text)
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, CompletionError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| CompletionError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(CompletionError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl TextCompletion for OpenAiClient {
    async fn complete(
        &self,
        max_tokens: u32,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        match self.mode {
            ApiMode::ChatCompletions => self.chat_completions(max_tokens, system, messages).await,
            ApiMode::Responses => self.responses(max_tokens, system, messages).await,
        }
    }
}

// =============================================================================
// CHAT COMPLETIONS — wire types
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [CcMessage<'a>],
}

#[derive(Serialize)]
struct CcMessage<'a> {
    role: &'a str,
    content: &'a str,
}

fn build_chat_completions_messages<'a>(system: &'a str, messages: &'a [ChatMessage]) -> Vec<CcMessage<'a>> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if !system.trim().is_empty() {
        out.push(CcMessage { role: "system", content: system });
    }
    for message in messages {
        out.push(CcMessage { role: &message.role, content: &message.content });
    }
    out
}

// =============================================================================
// RESPONSES — wire types
// =============================================================================

#[derive(Serialize)]
struct RespRequest<'a> {
    model: &'a str,
    max_output_tokens: u32,
    instructions: &'a str,
    input: &'a [RespInputItem<'a>],
}

#[derive(Serialize)]
struct RespInputItem<'a> {
    #[serde(rename = "type")]
    item_type: &'static str,
    role: &'a str,
    content: Vec<RespTextContent<'a>>,
}

#[derive(Serialize)]
struct RespTextContent<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    text: &'a str,
}

impl<'a> From<&'a ChatMessage> for RespInputItem<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        Self {
            item_type: "message",
            role: &message.role,
            content: vec![RespTextContent { content_type: "input_text", text: &message.content }],
        }
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<String, CompletionError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| CompletionError::ApiParse(e.to_string()))?;
    let Some(choice) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(CompletionError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };
    let text = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    Ok(text.to_string())
}

pub(crate) fn parse_responses_response(json_text: &str) -> Result<String, CompletionError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| CompletionError::ApiParse(e.to_string()))?;

    let mut text = String::new();
    if let Some(items) = root.get("output").and_then(Value::as_array) {
        for item in items {
            if item.get("type").and_then(Value::as_str) != Some("message") {
                continue;
            }
            let Some(parts) = item.get("content").and_then(Value::as_array) else {
                continue;
            };
            for part in parts {
                let kind = part.get("type").and_then(Value::as_str);
                if matches!(kind, Some("output_text" | "text")) {
                    if let Some(t) = part
                        .get("text")
                        .or_else(|| part.get("output_text"))
                        .and_then(Value::as_str)
                    {
                        text.push_str(t);
                    }
                }
            }
        }
    } else if let Some(output_text) = root.get("output_text").and_then(Value::as_str) {
        text.push_str(output_text);
    } else {
        return Err(CompletionError::ApiParse("responses: missing output".to_string()));
    }

    Ok(text)
}
