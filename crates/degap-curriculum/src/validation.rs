//! Candidate validation against a [`GenerationSpec`].

use crate::spec::GenerationSpec;
use degap_core::vocab::Vocabulary;
use degap_parser::{ParseError, extract_paths};
use serde::Serialize;
use std::collections::BTreeSet;

/// Diagnostic for one candidate. Always fully populated, pass or fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub ok: bool,
    /// Required elements absent from the candidate.
    pub missing: Vec<String>,
    /// Present elements that are neither required nor allowed.
    pub forbidden_used: Vec<String>,
    /// Every distinct path derived from the candidate.
    pub all_paths: Vec<String>,
}

impl ValidationResult {
    /// Corrective text for the next generation attempt, or `None` when the
    /// candidate passed.
    pub fn feedback_note(&self) -> Option<String> {
        let mut reasons = Vec::new();
        if !self.forbidden_used.is_empty() {
            reasons.push(format!(
                "The following elements must NOT be used: {}.",
                self.forbidden_used.join(", ")
            ));
        }
        if !self.missing.is_empty() {
            reasons.push(format!(
                "The following elements MUST be used: {}.",
                self.missing.join(", ")
            ));
        }
        if reasons.is_empty() {
            return None;
        }
        Some(format!(
            "Previous output was rejected: {} Follow the requirements strictly.",
            reasons.join(" ")
        ))
    }
}

/// Check an already-derived path set. Allowed elements never need to appear.
pub fn validate_paths(paths: &BTreeSet<String>, spec: &GenerationSpec) -> ValidationResult {
    let missing: Vec<String> = spec.required.difference(paths).cloned().collect();
    let forbidden_used: Vec<String> = paths.iter().filter(|p| !spec.permits(p)).cloned().collect();
    ValidationResult {
        ok: missing.is_empty() && forbidden_used.is_empty(),
        missing,
        forbidden_used,
        all_paths: paths.iter().cloned().collect(),
    }
}

/// Tokenize candidate text and check its paths against `spec`.
pub fn validate_candidate(
    text: &str,
    spec: &GenerationSpec,
    vocab: &Vocabulary,
) -> Result<ValidationResult, ParseError> {
    let paths = extract_paths(text, vocab)?;
    Ok(validate_paths(&paths, spec))
}
