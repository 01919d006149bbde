//! OpenAiApiClient - Direct REST client for the OpenAI Chat Completions API.
//!
//! Used by the tutor chat service and by the AI proxy endpoint, which
//! forwards request payloads through this client verbatim.

use crate::config::{Availability, ProviderSecrets};
use crate::error::ProviderError;
use crate::http::{map_http_error, map_request_error, parse_retry_after};
use crate::sse::SseDecoder;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use tokio::sync::mpsc;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const STREAM_DONE_MARKER: &str = "[DONE]";
const STREAM_CHANNEL_CAPACITY: usize = 64;

/// One chat message. Content is kept as raw JSON so multi-part payloads
/// pass through the proxy untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Value,
}

impl ChatMessage {
    /// Creates a plain-text message.
    pub fn text(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Value::String(content.into()),
        }
    }
}

/// A chat completion request as accepted by the proxy endpoint.
///
/// `tools`, `tool_choice` and `response_format` are raw JSON forwarded
/// verbatim to the upstream provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
    /// Whether the caller wants a streamed response. Not serialized;
    /// the client sets the upstream flag per call.
    #[serde(default, skip_serializing)]
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Builds a plain-text conversation request.
    pub fn from_texts(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: None,
            messages,
            tools: None,
            tool_choice: None,
            response_format: None,
            stream: false,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAiApiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiApiClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Loads configuration from environment variables
    /// (`OPENAI_API_KEY`, `OPENAI_MODEL_NAME`).
    ///
    /// Model name defaults to `gpt-4o` if not specified.
    pub fn try_from_env() -> Result<Self, ProviderError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| ProviderError::Offline("OPENAI_API_KEY not set".into()))?;
        let model = env::var("OPENAI_MODEL_NAME").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    /// Builds a client from pre-read secrets.
    pub fn from_secrets(secrets: &ProviderSecrets) -> Result<Self, ProviderError> {
        if secrets.openai() == Availability::Offline {
            return Err(ProviderError::Offline("OpenAI key not configured".into()));
        }
        let api_key = secrets.openai_api_key.clone().unwrap_or_default();
        let model = secrets
            .openai_model
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn request_body(&self, request: &ChatCompletionRequest, stream: bool) -> Value {
        let mut body = serde_json::to_value(request).unwrap_or_else(|_| Value::Null);
        if let Some(object) = body.as_object_mut() {
            if request.model.is_none() {
                object.insert("model".to_string(), Value::String(self.model.clone()));
            }
            if stream {
                object.insert("stream".to_string(), Value::Bool(true));
            }
        }
        body
    }

    async fn send(
        &self,
        request: &ChatCompletionRequest,
        stream: bool,
    ) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(BASE_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&self.request_body(request, stream))
            .send()
            .await
            .map_err(|err| map_request_error("OpenAI API request failed", err))?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }
        Ok(response)
    }

    /// Performs a non-streaming completion and returns the raw
    /// completion object.
    pub async fn chat(&self, request: &ChatCompletionRequest) -> Result<Value, ProviderError> {
        let response = self.send(request, false).await?;
        response
            .json::<Value>()
            .await
            .map_err(|err| ProviderError::Parse(format!("Failed to parse OpenAI response: {err}")))
    }

    /// Performs a non-streaming completion and returns the assistant's
    /// text content.
    pub async fn chat_text(&self, request: &ChatCompletionRequest) -> Result<String, ProviderError> {
        let completion = self.chat(request).await?;
        let parsed: ChatCompletionResponse = serde_json::from_value(completion)
            .map_err(|err| ProviderError::Parse(format!("Unexpected completion shape: {err}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Parse("OpenAI returned no content".into()))
    }

    /// Performs a streaming completion.
    ///
    /// Returns a channel of decoded chunk objects (the JSON payload of
    /// each upstream `data:` event, `[DONE]` excluded). A transport
    /// failure mid-stream is delivered as the final `Err` item.
    pub async fn stream_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<mpsc::Receiver<Result<Value, ProviderError>>, ProviderError> {
        let response = self.send(request, true).await?;
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let mut decoder = SseDecoder::new();
            let mut bytes = response.bytes_stream();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        let _ = tx
                            .send(Err(map_request_error("OpenAI stream interrupted", err)))
                            .await;
                        return;
                    }
                };
                for payload in decoder.push(&chunk) {
                    if payload == STREAM_DONE_MARKER {
                        return;
                    }
                    match serde_json::from_str::<Value>(&payload) {
                        Ok(value) => {
                            if tx.send(Ok(value)).await.is_err() {
                                // Receiver dropped; stop reading upstream.
                                return;
                            }
                        }
                        Err(err) => {
                            tracing::warn!("[OpenAI] Skipping malformed stream chunk: {err}");
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}

/// Extracts the incremental text of a streamed chunk, if any.
pub fn delta_text(chunk: &Value) -> Option<&str> {
    chunk
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_fills_model_and_stream() {
        let client = OpenAiApiClient::new("sk-test", "gpt-4o");
        let request =
            ChatCompletionRequest::from_texts(vec![ChatMessage::text("user", "hola")]);

        let body = client.request_body(&request, true);
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["stream"], true);
        assert!(body.get("tools").is_none());

        let body = client.request_body(&request, false);
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn test_request_body_keeps_caller_model() {
        let client = OpenAiApiClient::new("sk-test", "gpt-4o");
        let mut request =
            ChatCompletionRequest::from_texts(vec![ChatMessage::text("user", "hola")]);
        request.model = Some("gpt-4o-mini".to_string());
        let body = client.request_body(&request, false);
        assert_eq!(body["model"], "gpt-4o-mini");
    }

    #[test]
    fn test_delta_text() {
        let chunk: Value = serde_json::from_str(
            r#"{"choices":[{"delta":{"content":"ho"},"index":0}]}"#,
        )
        .unwrap();
        assert_eq!(delta_text(&chunk), Some("ho"));
        assert_eq!(delta_text(&serde_json::json!({"choices":[]})), None);
    }

    #[test]
    fn test_proxy_request_deserialization_defaults() {
        let request: ChatCompletionRequest = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"hola"}]}"#,
        )
        .unwrap();
        assert!(!request.stream);
        assert!(request.model.is_none());
    }
}
