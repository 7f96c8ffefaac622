//! Derivation of persisted progress keys.
//!
//! Key layout: `{docId}-{levelName}-{topicText}` with every whitespace run in
//! the level and topic replaced by a single dash. Two topics with the same
//! text in the same level of one document share a key.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn dashed(text: &str) -> Cow<'_, str> {
    whitespace_re().replace_all(text, "-")
}

pub fn completion_key(doc_id: &str, level: &str, topic: &str) -> String {
    format!("{doc_id}-{}-{}", dashed(level), dashed(topic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key() {
        assert_eq!(
            completion_key("frontend-developer", "Beginner", "HTML"),
            "frontend-developer-Beginner-HTML"
        );
    }

    #[test]
    fn whitespace_runs_collapse_to_one_dash() {
        assert_eq!(
            completion_key("devops", "Getting  Started", "CI /\tCD"),
            "devops-Getting-Started-CI-/-CD"
        );
    }

    #[test]
    fn identical_topics_in_a_level_collide() {
        assert_eq!(
            completion_key("a", "Beginner", "Git basics"),
            completion_key("a", "Beginner", "Git  basics")
        );
    }
}
