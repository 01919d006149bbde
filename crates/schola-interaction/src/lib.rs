pub mod config;
pub mod elevenlabs_api_client;
pub mod error;
mod http;
pub mod gemini_api_client;
pub mod moderation;
pub mod openai_api_client;
pub mod sse;

pub use config::{Availability, ProviderSecrets};
pub use elevenlabs_api_client::ElevenLabsApiClient;
pub use error::ProviderError;
pub use gemini_api_client::GeminiApiClient;
pub use openai_api_client::{
    ChatCompletionRequest, ChatMessage, OpenAiApiClient, delta_text,
};
pub use sse::SseDecoder;
