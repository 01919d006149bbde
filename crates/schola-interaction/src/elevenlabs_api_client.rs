//! ElevenLabsApiClient - Direct REST client for ElevenLabs speech synthesis.

use crate::config::{Availability, ProviderSecrets};
use crate::error::ProviderError;
use crate::http::{map_http_error, map_request_error, parse_retry_after};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::Client;
use serde::Serialize;
use std::env;

const BASE_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";
const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
const DEFAULT_TTS_MODEL: &str = "eleven_multilingual_v2";

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// Client for the ElevenLabs HTTP API.
#[derive(Clone)]
pub struct ElevenLabsApiClient {
    client: Client,
    api_key: String,
    voice_id: String,
}

impl ElevenLabsApiClient {
    /// Creates a new client with the provided API key and voice.
    pub fn new(api_key: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            voice_id: voice_id.into(),
        }
    }

    /// Loads configuration from the `ELEVENLABS_API_KEY` environment
    /// variable, with the default platform voice.
    pub fn try_from_env() -> Result<Self, ProviderError> {
        let api_key = env::var("ELEVENLABS_API_KEY")
            .map_err(|_| ProviderError::Offline("ELEVENLABS_API_KEY not set".into()))?;
        Ok(Self::new(api_key, DEFAULT_VOICE_ID))
    }

    /// Builds a client from pre-read secrets.
    pub fn from_secrets(secrets: &ProviderSecrets) -> Result<Self, ProviderError> {
        if secrets.elevenlabs() == Availability::Offline {
            return Err(ProviderError::Offline(
                "ElevenLabs key not configured".into(),
            ));
        }
        let api_key = secrets.elevenlabs_api_key.clone().unwrap_or_default();
        Ok(Self::new(api_key, DEFAULT_VOICE_ID))
    }

    /// Overrides the voice after construction.
    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    /// Synthesizes speech and returns the raw MP3 bytes.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        let url = format!("{BASE_URL}/{}", self.voice_id);
        let response = self
            .client
            .post(url)
            .header("xi-api-key", &self.api_key)
            .json(&SynthesisRequest {
                text,
                model_id: DEFAULT_TTS_MODEL,
            })
            .send()
            .await
            .map_err(|err| map_request_error("ElevenLabs API request failed", err))?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read ElevenLabs error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|err| {
                ProviderError::Parse(format!("Failed to read ElevenLabs audio body: {err}"))
            })
    }

    /// Synthesizes speech and returns a `data:` URL playable in a browser.
    pub async fn synthesize_data_url(&self, text: &str) -> Result<String, ProviderError> {
        let bytes = self.synthesize(text).await?;
        Ok(format!(
            "data:audio/mpeg;base64,{}",
            BASE64_STANDARD.encode(bytes)
        ))
    }
}
