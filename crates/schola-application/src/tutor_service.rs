//! Streaming tutor chat with off-topic session locking.
//!
//! Replies stream from the chat provider; every chunk is scanned for the
//! moderation sentinel. Each sentinel occurrence in a reply is a strike,
//! and at [`crate::session_gate::TUTOR_STRIKE_LIMIT`] strikes the session
//! locks: further submissions are rejected locally, before any network
//! call. Provider failures produce an empty, retryable reply rather than
//! an error in the render path.

use crate::prompts;
use crate::session_gate::SessionGate;
use schola_core::error::{Result, ScholaError};
use schola_core::session::SessionState;
use schola_interaction::moderation::{sentinel_count, strip_sentinel};
use schola_interaction::openai_api_client::{
    ChatCompletionRequest, ChatMessage, OpenAiApiClient, delta_text,
};
use serde::Serialize;
use std::sync::Arc;

/// Outcome of one tutor exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorReply {
    /// The reply text, sentinel stripped. Empty on failure.
    pub text: String,
    /// Whether this reply contained an off-topic violation.
    pub off_topic: bool,
    /// Whether the session is now locked.
    pub locked: bool,
    /// Whether the chat provider is offline (key not configured).
    pub offline: bool,
    /// Whether the student may retry the same message manually.
    pub retryable: bool,
}

impl TutorReply {
    fn offline() -> Self {
        Self {
            text: String::new(),
            off_topic: false,
            locked: false,
            offline: true,
            retryable: false,
        }
    }

    fn failed(retryable: bool) -> Self {
        Self {
            text: String::new(),
            off_topic: false,
            locked: false,
            offline: false,
            retryable,
        }
    }
}

/// The AI tutor chat service.
pub struct TutorService {
    gate: Arc<SessionGate>,
    client: Option<OpenAiApiClient>,
}

impl TutorService {
    /// Creates the service. `client` is `None` when the chat provider is
    /// offline; every exchange then degrades to an offline indicator.
    pub fn new(gate: Arc<SessionGate>, client: Option<OpenAiApiClient>) -> Self {
        Self { gate, client }
    }

    /// Sends a student message and streams the tutor's reply to
    /// completion.
    ///
    /// # Errors
    ///
    /// Returns [`ScholaError::Validation`] when no active session exists
    /// or when the session is locked; provider failures are NOT errors,
    /// they fail closed into an empty retryable [`TutorReply`].
    pub async fn chat(&self, message: &str) -> Result<TutorReply> {
        let (student_name, level) = match self.gate.state().await {
            SessionState::Active(session) if session.tutor_locked => {
                return Err(ScholaError::validation(
                    "tutor",
                    "the tutor chat is locked for this session",
                ));
            }
            SessionState::Active(session) => (session.account.name, session.account.level),
            _ => {
                return Err(ScholaError::validation("session", "no active session"));
            }
        };

        let Some(client) = &self.client else {
            return Ok(TutorReply::offline());
        };

        let request = ChatCompletionRequest::from_texts(vec![
            ChatMessage::text("system", prompts::tutor_system(&student_name, level)),
            ChatMessage::text("user", message),
        ]);

        let mut rx = match client.stream_chat(&request).await {
            Ok(rx) => rx,
            Err(e) => {
                tracing::warn!("[Tutor] Chat stream failed to start: {e}");
                return Ok(TutorReply::failed(e.is_retryable()));
            }
        };

        let mut text = String::new();
        let mut interrupted = false;
        while let Some(item) = rx.recv().await {
            match item {
                Ok(chunk) => {
                    if let Some(delta) = delta_text(&chunk) {
                        text.push_str(delta);
                    }
                }
                Err(e) => {
                    tracing::warn!("[Tutor] Chat stream interrupted: {e}");
                    interrupted = true;
                    break;
                }
            }
        }

        if text.is_empty() {
            return Ok(TutorReply::failed(true));
        }

        self.moderate(text, interrupted).await
    }

    async fn moderate(&self, text: String, interrupted: bool) -> Result<TutorReply> {
        let strikes = sentinel_count(&text);
        let mut locked = false;
        for _ in 0..strikes {
            let (_, now_locked) = self.gate.register_off_topic_strike().await;
            locked = now_locked;
        }

        Ok(TutorReply {
            text: strip_sentinel(&text).trim().to_string(),
            off_topic: strikes > 0,
            locked,
            offline: false,
            retryable: interrupted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{active_student_gate, empty_gate};

    #[tokio::test]
    async fn test_offline_provider_degrades_to_indicator() {
        let gate = active_student_gate().await;
        let service = TutorService::new(gate, None);

        let reply = service.chat("¿Qué es una fracción?").await.unwrap();
        assert!(reply.offline);
        assert!(reply.text.is_empty());
    }

    #[tokio::test]
    async fn test_locked_session_rejects_submission_locally() {
        let gate = active_student_gate().await;
        for _ in 0..3 {
            gate.register_off_topic_strike().await;
        }

        let service = TutorService::new(gate, None);
        let err = service.chat("otra cosa").await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_moderation_counts_every_sentinel_occurrence() {
        let gate = active_student_gate().await;
        let service = TutorService::new(gate, None);

        let reply = service
            .moderate(
                "[OFF_TOPIC] no [OFF_TOPIC] sigas [OFF_TOPIC] así".to_string(),
                false,
            )
            .await
            .unwrap();
        assert!(reply.off_topic);
        assert!(reply.locked);
        assert_eq!(reply.text, "no  sigas  así");
        assert!(service.gate.tutor_locked().await);
    }

    #[tokio::test]
    async fn test_no_session_is_a_validation_error() {
        let gate = empty_gate();
        let service = TutorService::new(gate, None);
        assert!(service.chat("hola").await.unwrap_err().is_validation());
    }
}
