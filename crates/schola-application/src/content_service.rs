//! Fail-closed AI content generation.
//!
//! Flashcards, career guidance and remedial plans are produced by the
//! Gemini client from JSON-shaped prompts. Every generator fails closed:
//! a provider failure or malformed JSON yields the empty value and a
//! warning, never an error in the render path. The user retries the
//! action manually.

use crate::prompts;
use schola_core::academic::{
    AcademicRepository, RemedialSession, RemedialStatus, RemedialSubject,
};
use schola_core::account::AcademicLevel;
use schola_core::content::{CareerSuggestion, Flashcard};
use schola_core::error::{Result, ScholaError};
use schola_interaction::GeminiApiClient;
use serde::Deserialize;
use std::sync::Arc;

/// Flashcards generated per request.
const FLASHCARD_COUNT: usize = 10;

#[derive(Deserialize)]
struct RemedialPlanDraft {
    sessions: Vec<String>,
}

/// AI content generation over the Gemini client.
pub struct ContentService {
    gemini: Option<GeminiApiClient>,
    academic: Arc<dyn AcademicRepository>,
}

impl ContentService {
    /// Creates the service. `gemini` is `None` when the provider is
    /// offline; every generator then returns its empty value.
    pub fn new(gemini: Option<GeminiApiClient>, academic: Arc<dyn AcademicRepository>) -> Self {
        Self { gemini, academic }
    }

    /// Generates study flashcards; empty on any failure.
    pub async fn generate_flashcards(&self, topic: &str, level: AcademicLevel) -> Vec<Flashcard> {
        let Some(gemini) = &self.gemini else {
            tracing::warn!("[Content] Flashcards requested while Gemini is offline");
            return Vec::new();
        };
        let prompt = prompts::flashcards(topic, level, FLASHCARD_COUNT);
        match gemini.generate_json::<Vec<Flashcard>>(&prompt).await {
            Ok(cards) => cards,
            Err(e) => {
                tracing::warn!("[Content] Flashcard generation failed, serving none: {e}");
                Vec::new()
            }
        }
    }

    /// Generates career suggestions; empty on any failure.
    pub async fn generate_career_guidance(
        &self,
        interests: &str,
        level: AcademicLevel,
    ) -> Vec<CareerSuggestion> {
        let Some(gemini) = &self.gemini else {
            tracing::warn!("[Content] Career guidance requested while Gemini is offline");
            return Vec::new();
        };
        let prompt = prompts::career_guidance(interests, level);
        match gemini.generate_json::<Vec<CareerSuggestion>>(&prompt).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::warn!("[Content] Career generation failed, serving none: {e}");
                Vec::new()
            }
        }
    }

    /// Builds a remedial plan after a failed diagnostic and persists it.
    ///
    /// Returns `Ok(None)` when generation fails (the student may retry);
    /// returns [`ScholaError::AdapterUnavailable`] only when the plan was
    /// generated but could not be stored.
    pub async fn generate_remedial_plan(
        &self,
        student_id: &str,
        subject: &str,
        missed_topics: &[String],
    ) -> Result<Option<RemedialSubject>> {
        let Some(gemini) = &self.gemini else {
            tracing::warn!("[Content] Remedial plan requested while Gemini is offline");
            return Ok(None);
        };

        let prompt = prompts::remedial_plan(subject, missed_topics);
        let draft = match gemini.generate_json::<RemedialPlanDraft>(&prompt).await {
            Ok(draft) if !draft.sessions.is_empty() => draft,
            Ok(_) => {
                tracing::warn!("[Content] Remedial generation returned an empty plan");
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!("[Content] Remedial generation failed: {e}");
                return Ok(None);
            }
        };

        let remedial = RemedialSubject {
            subject: subject.to_string(),
            sessions: draft
                .sessions
                .into_iter()
                .map(|title| RemedialSession {
                    title,
                    status: RemedialStatus::Pending,
                })
                .collect(),
        };

        self.academic
            .save_remedial(student_id, &remedial)
            .await
            .map_err(|e| ScholaError::adapter_unavailable("academic", e.to_string()))?;

        Ok(Some(remedial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeAcademic;

    fn offline_service() -> ContentService {
        ContentService::new(None, Arc::new(FakeAcademic::default()))
    }

    #[tokio::test]
    async fn test_offline_flashcards_are_empty() {
        let cards = offline_service()
            .generate_flashcards("fractions", AcademicLevel::Primary)
            .await;
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn test_offline_career_guidance_is_empty() {
        let suggestions = offline_service()
            .generate_career_guidance("robots", AcademicLevel::Bachillerato)
            .await;
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_offline_remedial_plan_is_none_and_stores_nothing() {
        let academic = Arc::new(FakeAcademic::default());
        let service = ContentService::new(None, academic.clone());

        let plan = service
            .generate_remedial_plan("u-1", "Mathematics", &["Fractions".to_string()])
            .await
            .unwrap();
        assert!(plan.is_none());
        assert!(academic.saved_remedial.lock().unwrap().is_empty());
    }
}
