//! Provider error type shared by every AI client.

use std::time::Duration;
use thiserror::Error;

/// Failure modes of an AI provider call.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider's API key is not configured; the feature is offline.
    #[error("Provider offline: {0}")]
    Offline(String),

    /// The request never produced an HTTP response.
    #[error("Provider request failed: {message}")]
    Request { message: String, is_retryable: bool },

    /// The provider answered with an error status.
    #[error("Provider returned HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The provider answered but the body was not the expected shape.
    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Whether retrying the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Offline(_) => false,
            Self::Request { is_retryable, .. } => *is_retryable,
            Self::Http { is_retryable, .. } => *is_retryable,
            Self::Parse(_) => false,
        }
    }
}
