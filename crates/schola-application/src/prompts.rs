//! Prompt templates for the AI generators.

use minijinja::{Environment, context};
use once_cell::sync::Lazy;
use schola_core::account::AcademicLevel;
use schola_interaction::moderation::OFF_TOPIC_SENTINEL;

const TUTOR_SYSTEM: &str = r#"You are a patient school tutor for {{ student_name }}, a {{ level }} student.
Answer in the student's language, at their level, step by step.
Stay strictly on academic topics. If the student tries to pull the
conversation away from schoolwork, refuse briefly and include the exact
token {{ sentinel }} in your reply."#;

const FLASHCARDS: &str = r#"Create {{ count }} study flashcards about "{{ topic }}" for a {{ level }} student.
Respond with only a JSON array of objects shaped as
{"front": "question", "back": "answer"}. No text outside the JSON."#;

const CAREER_GUIDANCE: &str = r#"A {{ level }} student describes their interests as: {{ interests }}.
Suggest suitable career directions. Respond with only a JSON array of
objects shaped as {"title": "...", "description": "...", "fit_reason": "..."}.
No text outside the JSON."#;

const REMEDIAL_PLAN: &str = r#"A student failed a diagnostic in {{ subject }}. The missed topics were:
{% for topic in missed_topics %}- {{ topic }}
{% endfor %}
Design a short remedial study plan. Respond with only a JSON object
shaped as {"sessions": ["session title", ...]} ordered from fundamentals
upward. No text outside the JSON."#;

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    for (name, source) in [
        ("tutor_system", TUTOR_SYSTEM),
        ("flashcards", FLASHCARDS),
        ("career_guidance", CAREER_GUIDANCE),
        ("remedial_plan", REMEDIAL_PLAN),
    ] {
        env.add_template(name, source)
            .expect("built-in template parses");
    }
    env
});

fn level_name(level: AcademicLevel) -> &'static str {
    match level {
        AcademicLevel::Primary => "primary school",
        AcademicLevel::Bachillerato => "bachillerato",
    }
}

fn render(name: &str, ctx: minijinja::Value) -> String {
    TEMPLATES
        .get_template(name)
        .and_then(|template| template.render(ctx))
        .unwrap_or_else(|e| {
            tracing::error!("[Prompts] Rendering '{name}' failed: {e}");
            String::new()
        })
}

/// System prompt for the tutor chat.
pub fn tutor_system(student_name: &str, level: AcademicLevel) -> String {
    render(
        "tutor_system",
        context! {
            student_name,
            level => level_name(level),
            sentinel => OFF_TOPIC_SENTINEL,
        },
    )
}

/// Prompt for flashcard generation.
pub fn flashcards(topic: &str, level: AcademicLevel, count: usize) -> String {
    render(
        "flashcards",
        context! { topic, level => level_name(level), count },
    )
}

/// Prompt for career guidance generation.
pub fn career_guidance(interests: &str, level: AcademicLevel) -> String {
    render(
        "career_guidance",
        context! { interests, level => level_name(level) },
    )
}

/// Prompt for remedial plan generation.
pub fn remedial_plan(subject: &str, missed_topics: &[String]) -> String {
    render("remedial_plan", context! { subject, missed_topics })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutor_system_mentions_sentinel() {
        let prompt = tutor_system("Ana", AcademicLevel::Primary);
        assert!(prompt.contains("Ana"));
        assert!(prompt.contains("primary school"));
        assert!(prompt.contains(OFF_TOPIC_SENTINEL));
    }

    #[test]
    fn test_remedial_plan_lists_topics() {
        let prompt = remedial_plan(
            "Mathematics",
            &["Fractions".to_string(), "Decimals".to_string()],
        );
        assert!(prompt.contains("- Fractions"));
        assert!(prompt.contains("- Decimals"));
    }

    #[test]
    fn test_flashcards_prompt_carries_count_and_topic() {
        let prompt = flashcards("photosynthesis", AcademicLevel::Bachillerato, 8);
        assert!(prompt.contains('8'));
        assert!(prompt.contains("photosynthesis"));
        assert!(prompt.contains("bachillerato"));
    }
}
