//! Resolution errors.
//!
//! Resolution errors never abort a format call. Each one renders inline as a
//! braced placeholder in the output and is appended to the per-call error
//! list, which reaches the caller through the bundle's error listener.

use std::cmp::Ordering;

use thiserror::Error;

/// A non-fatal error encountered while resolving a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unknown variable `${name}`")]
    UnknownVariable { name: String },
    #[error("unknown message `{id}`{}", format_suggestions(.suggestions))]
    UnknownMessage {
        id: String,
        suggestions: Vec<String>,
    },
    #[error("unknown term `-{id}`")]
    UnknownTerm { id: String },
    #[error("`{id}` has no attribute `{attribute}`")]
    UnknownAttribute { id: String, attribute: String },
    #[error("unknown function `{name}`")]
    UnknownFunction { name: String },
    #[error("message `{id}` has no value")]
    NoValue { id: String },
    #[error("maximum reference depth of {max} exceeded")]
    TooDeep { max: usize },
    #[error("function `{name}` failed: {reason}")]
    Function { name: String, reason: String },
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let mut rendered = String::from(" (did you mean ");
    for (i, suggestion) in suggestions.iter().enumerate() {
        if i > 0 {
            rendered.push_str(", ");
        }
        rendered.push('`');
        rendered.push_str(suggestion);
        rendered.push('`');
    }
    rendered.push_str("?)");
    rendered
}

/// Rank `candidates` by string similarity to `target` and keep close ones.
pub(crate) fn suggestions<'c>(
    target: &str,
    candidates: impl Iterator<Item = &'c str>,
) -> Vec<String> {
    let mut scored: Vec<(f64, &str)> = candidates
        .map(|candidate| (strsim::normalized_levenshtein(target, candidate), candidate))
        .filter(|(score, _)| *score >= 0.6)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// Per-call accumulator of resolution errors.
///
/// Identical errors are recorded once; per-item selection over a long list
/// would otherwise repeat the same missing-variable error per element.
#[derive(Debug, Default)]
pub(crate) struct Errors(Vec<ResolveError>);

impl Errors {
    pub fn report(&mut self, error: ResolveError) {
        if !self.0.contains(&error) {
            self.0.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ResolveError] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{ResolveError, suggestions};

    #[test]
    fn unknown_message_lists_close_candidates() {
        let error = ResolveError::UnknownMessage {
            id: "helo".to_string(),
            suggestions: vec!["hello".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "unknown message `helo` (did you mean `hello`?)"
        );
    }

    #[test]
    fn suggestions_skip_distant_names() {
        let candidates = ["hello", "greeting", "hell"];
        let close = suggestions("helo", candidates.iter().copied());
        assert_eq!(close, vec!["hello".to_string(), "hell".to_string()]);
        assert!(suggestions("xyz", candidates.iter().copied()).is_empty());
    }
}
