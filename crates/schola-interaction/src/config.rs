//! Provider secrets, read from the process environment at startup.
//!
//! A missing key never aborts the process: the affected provider is
//! marked offline and its features degrade to an offline indicator.

use std::env;

/// Whether a provider can be called at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Ready,
    Offline,
}

/// API keys and model overrides for the three AI providers.
#[derive(Debug, Clone, Default)]
pub struct ProviderSecrets {
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub elevenlabs_api_key: Option<String>,
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}

impl ProviderSecrets {
    /// Reads the provider configuration from the environment.
    ///
    /// Recognized variables: `OPENAI_API_KEY`, `OPENAI_MODEL_NAME`,
    /// `GEMINI_API_KEY`, `GEMINI_MODEL_NAME`, `ELEVENLABS_API_KEY`.
    pub fn from_env() -> Self {
        let secrets = Self {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: non_empty("OPENAI_MODEL_NAME"),
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_model: non_empty("GEMINI_MODEL_NAME"),
            elevenlabs_api_key: non_empty("ELEVENLABS_API_KEY"),
        };
        for (name, availability) in [
            ("OpenAI", secrets.openai()),
            ("Gemini", secrets.gemini()),
            ("ElevenLabs", secrets.elevenlabs()),
        ] {
            if availability == Availability::Offline {
                tracing::warn!("[Secrets] {name} key missing; its features run offline");
            }
        }
        secrets
    }

    pub fn openai(&self) -> Availability {
        availability_of(&self.openai_api_key)
    }

    pub fn gemini(&self) -> Availability {
        availability_of(&self.gemini_api_key)
    }

    pub fn elevenlabs(&self) -> Availability {
        availability_of(&self.elevenlabs_api_key)
    }
}

fn availability_of(key: &Option<String>) -> Availability {
    if key.is_some() {
        Availability::Ready
    } else {
        Availability::Offline
    }
}
