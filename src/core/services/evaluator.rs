use crate::core::models::{answer::Answer, question::Question};

/// Judges a single answer against its question.
///
/// Choice answers carry the zero-based position of the picked option as a string
/// (`"0"` is the first option). Open answers match the expected answer after
/// trimming and case folding. Malformed answers are never an error: they are
/// logged and judged incorrect.
pub fn evaluate(question: &Question, answer: &Answer) -> bool {
    if let Some(selected) = &answer.selected_option {
        return match selected.trim().parse::<i64>() {
            Ok(idx) if idx >= 0 => usize::try_from(idx).ok().and_then(|i| question.options.get(i)).map(|o| o.is_correct).unwrap_or(false),
            Ok(_) => false,
            Err(e) => {
                log::warn!("answer {} has a non-numeric selected option {:?}: {}", answer.id, selected, e);
                false
            }
        };
    }
    if let Some(body) = &answer.body {
        return match &question.expected_answer {
            Some(expected) => normalize(body) == normalize(expected),
            None => false,
        };
    }
    log::warn!("answer {} carries neither a selected option nor a body", answer.id);
    false
}

/// Like [`evaluate`], for an answer whose question may no longer exist.
pub fn evaluate_opt(question: Option<&Question>, answer: &Answer) -> bool {
    question.map(|q| evaluate(q, answer)).unwrap_or(false)
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
