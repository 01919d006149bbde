//! Off-topic moderation sentinel.
//!
//! The tutor's system prompt instructs the model to emit this token when
//! a student drags the conversation off the academic topic. The token is
//! detected in streamed chunks, stripped before display, and counted as
//! a strike by the tutor service.

/// Token the tutor model emits on an off-topic violation.
pub const OFF_TOPIC_SENTINEL: &str = "[OFF_TOPIC]";

/// True when the text contains the off-topic sentinel.
pub fn contains_sentinel(text: &str) -> bool {
    text.contains(OFF_TOPIC_SENTINEL)
}

/// Number of sentinel occurrences; each one counts as a strike.
pub fn sentinel_count(text: &str) -> usize {
    text.matches(OFF_TOPIC_SENTINEL).count()
}

/// Removes every occurrence of the sentinel for display.
pub fn strip_sentinel(text: &str) -> String {
    text.replace(OFF_TOPIC_SENTINEL, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_sentinel_mid_text() {
        assert!(contains_sentinel("Volvamos al tema. [OFF_TOPIC]"));
        assert!(!contains_sentinel("Sigue con la lección"));
    }

    #[test]
    fn test_strip_removes_all_occurrences() {
        let cleaned = strip_sentinel("[OFF_TOPIC]a[OFF_TOPIC]b");
        assert_eq!(cleaned, "ab");
    }

    #[test]
    fn test_sentinel_count() {
        assert_eq!(sentinel_count("sin desvío"), 0);
        assert_eq!(sentinel_count("[OFF_TOPIC] x [OFF_TOPIC] y [OFF_TOPIC]"), 3);
    }
}
