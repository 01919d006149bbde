//! AI-generated content shapes.
//!
//! These are the JSON-shaped results the generation services parse out of
//! provider responses. Generators fail closed: a provider or parse
//! failure yields the empty value, never an error in the render path.

use serde::{Deserialize, Serialize};

/// A single study flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

/// One suggested career direction with its rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerSuggestion {
    pub title: String,
    pub description: String,
    pub fit_reason: String,
}
