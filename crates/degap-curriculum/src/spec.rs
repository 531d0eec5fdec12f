//! Required/allowed/forbidden partition for one generation request.

use degap_core::vocab::Vocabulary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What a generated candidate must, may and must not contain.
///
/// `forbidden` is what the generator is told to avoid. Validation does not
/// rely on it: anything outside `required ∪ allowed` is rejected whether or
/// not it appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSpec {
    pub required: BTreeSet<String>,
    pub allowed: BTreeSet<String>,
    pub forbidden: Vec<String>,
}

impl GenerationSpec {
    /// Build a spec whose forbidden list is every vocabulary keyword that is
    /// neither required nor allowed.
    pub fn new<R, A>(required: R, allowed: A, vocab: &Vocabulary) -> Self
    where
        R: IntoIterator<Item = String>,
        A: IntoIterator<Item = String>,
    {
        let required: BTreeSet<String> = required.into_iter().collect();
        let allowed: BTreeSet<String> = allowed
            .into_iter()
            .filter(|a| !required.contains(a))
            .collect();
        let forbidden = vocab
            .keywords()
            .iter()
            .filter(|k| !required.contains(*k) && !allowed.contains(*k))
            .cloned()
            .collect();
        Self {
            required,
            allowed,
            forbidden,
        }
    }

    /// Spec for introducing one new element on top of what is already learned.
    pub fn single(element: &str, learned: &BTreeSet<String>, vocab: &Vocabulary) -> Self {
        Self::new([element.to_string()], learned.iter().cloned(), vocab)
    }

    /// Replace the forbidden list with an explicit one. Entries that are also
    /// required are dropped.
    #[must_use]
    pub fn with_forbidden(mut self, forbidden: Vec<String>) -> Self {
        let (kept, dropped): (Vec<String>, Vec<String>) = forbidden
            .into_iter()
            .partition(|f| !self.required.contains(f));
        if !dropped.is_empty() {
            tracing::warn!("ignoring forbidden elements that are also required: {:?}", dropped);
        }
        self.forbidden = kept;
        self
    }

    /// Whether `path` may appear in a candidate.
    pub fn permits(&self, path: &str) -> bool {
        self.required.contains(path) || self.allowed.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_forbidden_is_vocabulary_complement() {
        let spec = GenerationSpec::single("for", &set(&["if"]), &Vocabulary::default());
        assert_eq!(spec.required, set(&["for"]));
        assert_eq!(spec.allowed, set(&["if"]));
        assert_eq!(spec.forbidden, vec!["elif", "else", "break", "continue"]);
    }

    #[test]
    fn test_nested_paths_do_not_shrink_forbidden() {
        let spec = GenerationSpec::single("for/if", &set(&["if", "for"]), &Vocabulary::default());
        assert_eq!(spec.forbidden, vec!["elif", "else", "break", "continue"]);
        assert!(spec.permits("for/if"));
        assert!(!spec.permits("if/for"));
    }

    #[test]
    fn test_explicit_forbidden_excludes_required() {
        let spec = GenerationSpec::new(
            vec!["for".to_string()],
            Vec::new(),
            &Vocabulary::default(),
        )
        .with_forbidden(vec!["for".to_string(), "break".to_string()]);
        assert_eq!(spec.forbidden, vec!["break"]);
    }

    #[test]
    fn test_required_removed_from_allowed() {
        let spec = GenerationSpec::new(
            vec!["if".to_string()],
            vec!["if".to_string(), "for".to_string()],
            &Vocabulary::default(),
        );
        assert_eq!(spec.allowed, set(&["for"]));
    }
}
