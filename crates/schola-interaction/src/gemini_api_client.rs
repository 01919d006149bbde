//! GeminiApiClient - Direct REST client for the Gemini API.
//!
//! Backs the JSON-shaped content generators (diagnostics, career
//! guidance, flashcards).

use crate::config::{Availability, ProviderSecrets};
use crate::error::ProviderError;
use crate::http::{map_http_error, map_request_error, parse_retry_after};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client for the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiClient {
    client: Client,
    api_key: String,
    model: String,
    system_instruction: Option<String>,
}

impl GeminiApiClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            system_instruction: None,
        }
    }

    /// Loads configuration from environment variables
    /// (`GEMINI_API_KEY`, `GEMINI_MODEL_NAME`).
    ///
    /// Model name defaults to `gemini-2.5-flash` if not specified.
    pub fn try_from_env() -> Result<Self, ProviderError> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| ProviderError::Offline("GEMINI_API_KEY not set".into()))?;
        let model = env::var("GEMINI_MODEL_NAME").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    /// Builds a client from pre-read secrets.
    pub fn from_secrets(secrets: &ProviderSecrets) -> Result<Self, ProviderError> {
        if secrets.gemini() == Availability::Offline {
            return Err(ProviderError::Offline("Gemini key not configured".into()));
        }
        let api_key = secrets.gemini_api_key.clone().unwrap_or_default();
        let model = secrets
            .gemini_model
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Adds a system instruction sent alongside every request.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Generates text for a prompt.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let contents = vec![Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }];

        let system_instruction = self.system_instruction.as_ref().map(|text| Content {
            role: "system".to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        });

        let request = GenerateContentRequest {
            contents,
            system_instruction,
        };
        self.send_request(&request).await
    }

    /// Generates JSON-shaped content and parses it into `T`.
    ///
    /// Tolerates the model wrapping its answer in a Markdown code fence.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
    ) -> Result<T, ProviderError> {
        let text = self.generate(prompt).await?;
        let stripped = strip_code_fence(&text);
        serde_json::from_str(stripped).map_err(|err| {
            ProviderError::Parse(format!("Gemini returned malformed JSON: {err}"))
        })
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, ProviderError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| map_request_error("Gemini API request failed", err))?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::Parse(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

/// Strips a surrounding Markdown code fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence.
    match inner.split_once('\n') {
        Some((first_line, rest)) if !first_line.contains('{') && !first_line.contains('[') => {
            rest.trim()
        }
        _ => inner.trim(),
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .map(|candidate| {
            candidate
                .content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ProviderError::Parse(
            "Gemini returned no content in the response".into(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[1,2]\n```"), "[1,2]");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_extract_text_concatenates_parts() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: CandidateContent {
                    parts: vec![
                        CandidatePart {
                            text: Some("Hola ".to_string()),
                        },
                        CandidatePart {
                            text: Some("mundo".to_string()),
                        },
                    ],
                },
            }],
        };
        assert_eq!(extract_text_response(response).unwrap(), "Hola mundo");
    }

    #[test]
    fn test_extract_text_empty_is_parse_error() {
        let response = GenerateContentResponse { candidates: vec![] };
        assert!(matches!(
            extract_text_response(response),
            Err(ProviderError::Parse(_))
        ));
    }
}
