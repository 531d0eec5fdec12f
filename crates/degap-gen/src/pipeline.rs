//! Degap pipeline: per-element retry loop and the run over all gaps.
//!
//! Each new element of a gap is generated on its own, most basic first. A
//! candidate is validated against its [`GenerationSpec`]; a rejected candidate
//! adds a corrective note to the feedback carried into the next attempt.

use crate::progress::RunProgress;
use crate::prompt::{GENERATION_SYSTEM, build_user_prompt, extract_code};
use crate::provider::{LlmProvider, LlmResponse, ProviderError};
use crate::report::{DegapReport, GeneratedElement, Outcome, TokenUsage};
use degap_core::config::ExhaustedPolicy;
use degap_core::storage::{FAILURE_SENTINEL, REPORT_FILE, ResultDir};
use degap_core::vocab::Vocabulary;
use degap_curriculum::{GapAnalysis, GenerationSpec, ValidationResult, prioritize, validate_candidate};
use std::collections::BTreeSet;

/// Settings for a degap run.
pub struct RunConfig<'a> {
    pub provider: &'a dyn LlmProvider,
    pub vocab: &'a Vocabulary,
    pub output: &'a ResultDir,
    /// Total attempts per element, including the first.
    pub max_attempts: usize,
    pub language: &'a str,
    pub on_exhausted: ExhaustedPolicy,
    pub show_progress: bool,
}

/// Result of generating one element.
#[derive(Debug, Clone)]
pub struct ElementOutcome {
    pub outcome: Outcome,
    pub attempts: usize,
    /// The accepted program; `None` when exhausted.
    pub code: Option<String>,
    /// Validation of the last attempt.
    pub validation: ValidationResult,
    /// Corrective notes, one per rejected attempt, oldest first.
    pub feedback: Vec<String>,
    pub usage: TokenUsage,
}

/// Steps of the per-element retry loop.
enum AttemptState {
    Generate,
    Validate(Result<LlmResponse, ProviderError>),
    Rejected(String),
    Accept(String),
    Exhausted,
}

/// Generate one program satisfying `spec`, retrying up to `max_attempts`
/// times in total. Never fails: transport and parse errors consume an attempt.
pub fn generate_element(
    provider: &dyn LlmProvider,
    spec: &GenerationSpec,
    vocab: &Vocabulary,
    max_attempts: usize,
    language: &str,
) -> ElementOutcome {
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0usize;
    let mut feedback: Vec<String> = Vec::new();
    let mut usage = TokenUsage::default();
    let mut last = ValidationResult::default();
    let mut state = AttemptState::Generate;

    loop {
        state = match state {
            AttemptState::Generate => {
                attempts += 1;
                let prompt = build_user_prompt(spec, language, &feedback);
                tracing::debug!("attempt {}/{} for {:?}", attempts, max_attempts, spec.required);
                AttemptState::Validate(provider.complete(GENERATION_SYSTEM, &prompt))
            }
            AttemptState::Validate(response) => {
                let code = match response {
                    Ok(r) => {
                        usage.record(r.input_tokens, r.output_tokens);
                        extract_code(&r.text)
                    }
                    Err(e) => {
                        tracing::warn!("generation attempt {} failed: {}", attempts, e);
                        String::new()
                    }
                };
                match validate_candidate(&code, spec, vocab) {
                    Ok(result) if result.ok => {
                        last = result;
                        AttemptState::Accept(code)
                    }
                    Ok(result) => {
                        let note = result.feedback_note().unwrap_or_default();
                        last = result;
                        AttemptState::Rejected(note)
                    }
                    Err(e) => {
                        last = ValidationResult {
                            ok: false,
                            missing: spec.required.iter().cloned().collect(),
                            forbidden_used: Vec::new(),
                            all_paths: Vec::new(),
                        };
                        AttemptState::Rejected(format!(
                            "Previous output could not be parsed ({}). Output one complete, valid program.",
                            e
                        ))
                    }
                }
            }
            AttemptState::Rejected(note) => {
                tracing::debug!("attempt {} rejected: {}", attempts, note);
                feedback.push(format!("Attempt {}: {}", attempts, note));
                if attempts >= max_attempts {
                    AttemptState::Exhausted
                } else {
                    AttemptState::Generate
                }
            }
            AttemptState::Accept(code) => {
                return ElementOutcome {
                    outcome: Outcome::Accepted,
                    attempts,
                    code: Some(code),
                    validation: last,
                    feedback,
                    usage,
                };
            }
            AttemptState::Exhausted => {
                return ElementOutcome {
                    outcome: Outcome::Exhausted,
                    attempts,
                    code: None,
                    validation: last,
                    feedback,
                    usage,
                };
            }
        };
    }
}

/// Generate and persist one example per new element of every gap in
/// `analysis`, then write the run report into the result directory.
///
/// Gaps are processed in corpus order and elements in priority order. Each
/// element may use whatever was learned before the gap plus the elements of
/// the same gap already handled.
pub fn run_degap(
    analysis: &GapAnalysis,
    config: &RunConfig<'_>,
) -> Result<DegapReport, PipelineError> {
    let total: usize = analysis.gaps().map(|r| r.gap_size()).sum();
    let progress = RunProgress::new(total, config.show_progress);
    let mut report = DegapReport::new(analysis, config.provider.model_name());

    for record in analysis.gaps() {
        let gap_id = record.display_id();
        let elements = prioritize(&record.new_elements, config.vocab);
        progress.begin_gap(&gap_id, &elements);

        let mut learned: BTreeSet<String> = record.learned_before.clone();
        for (idx, element) in elements.iter().enumerate() {
            let ordinal = idx + 1;
            let spec = GenerationSpec::single(element, &learned, config.vocab);
            progress.begin_element(&gap_id, ordinal, element);

            let result = generate_element(
                config.provider,
                &spec,
                config.vocab,
                config.max_attempts,
                config.language,
            );
            report.usage.add(result.usage);

            let content = match &result.code {
                Some(code) => format!("{}\n", code),
                None => FAILURE_SENTINEL.to_string(),
            };
            let artifact = config
                .output
                .write_artifact(&record.identifier, ordinal, &content)
                .map_err(|e| PipelineError::Persist(format!("{:#}", e)))?;

            match result.outcome {
                Outcome::Accepted => {
                    tracing::info!(
                        "accepted {} for {} after {} attempt(s)",
                        element,
                        gap_id,
                        result.attempts
                    );
                    learned.insert(element.clone());
                }
                Outcome::Exhausted => {
                    tracing::warn!(
                        "giving up on {} for {} after {} attempt(s); wrote failure marker to {}",
                        element,
                        gap_id,
                        result.attempts,
                        artifact.display()
                    );
                    if config.on_exhausted == ExhaustedPolicy::MarkLearned {
                        learned.insert(element.clone());
                    }
                }
            }

            let (missing, forbidden_used) = match result.outcome {
                Outcome::Accepted => (Vec::new(), Vec::new()),
                Outcome::Exhausted => (
                    result.validation.missing.clone(),
                    result.validation.forbidden_used.clone(),
                ),
            };
            report.generated.push(GeneratedElement {
                insert_before: gap_id.clone(),
                ordinal,
                element: element.clone(),
                allowed: spec.allowed.iter().cloned().collect(),
                outcome: result.outcome,
                attempts: result.attempts,
                artifact,
                missing,
                forbidden_used,
            });
            progress.element_done(report.usage);
        }
    }

    progress.finish();

    config
        .output
        .write_json(REPORT_FILE, &report)
        .map_err(|e| PipelineError::Persist(format!("{:#}", e)))?;

    Ok(report)
}

/// Errors from the degap pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to persist output: {0}")]
    Persist(String),
}
