//! Run summary for a degap run.

use chrono::{DateTime, Utc};
use degap_curriculum::GapAnalysis;
use serde::Serialize;
use std::path::PathBuf;

/// Terminal outcome of one generated element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A candidate passed validation and was persisted.
    Accepted,
    /// Every attempt failed; the failure sentinel was persisted instead.
    Exhausted,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Gap information for one corpus sample.
#[derive(Debug, Clone, Serialize)]
pub struct SampleSummary {
    pub index: usize,
    pub identifier: String,
    pub gap: usize,
    pub new_elements: Vec<String>,
}

/// One generated intermediate example.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedElement {
    /// Sample the example is meant to precede.
    pub insert_before: String,
    /// 1-based position within that gap's element sequence.
    pub ordinal: usize,
    pub element: String,
    /// Allowed set used when generating, sorted.
    pub allowed: Vec<String>,
    pub outcome: Outcome,
    pub attempts: usize,
    pub artifact: PathBuf,
    /// Diagnostics of the last attempt; empty when accepted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbidden_used: Vec<String>,
}

/// Running token usage across all generation requests.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Record token usage from a response.
    pub fn record(&mut self, input_tokens: Option<u64>, output_tokens: Option<u64>) {
        if let Some(t) = input_tokens {
            self.input_tokens += t;
        }
        if let Some(t) = output_tokens {
            self.output_tokens += t;
        }
    }

    pub fn add(&mut self, other: Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// Everything a run produced, in corpus order.
#[derive(Debug, Clone, Serialize)]
pub struct DegapReport {
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub samples: Vec<SampleSummary>,
    pub generated: Vec<GeneratedElement>,
    #[serde(flatten)]
    pub usage: TokenUsage,
}

impl DegapReport {
    /// Start a report with one summary per analysed sample.
    pub fn new(analysis: &GapAnalysis, model: &str) -> Self {
        let samples = analysis
            .records
            .iter()
            .map(|r| SampleSummary {
                index: r.index,
                identifier: r.display_id(),
                gap: r.gap_size(),
                new_elements: r.new_elements.iter().cloned().collect(),
            })
            .collect();
        Self {
            generated_at: Utc::now(),
            model: model.to_string(),
            samples,
            generated: Vec::new(),
            usage: TokenUsage::default(),
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.generated
            .iter()
            .filter(|g| g.outcome == Outcome::Accepted)
            .count()
    }

    pub fn exhausted_count(&self) -> usize {
        self.generated
            .iter()
            .filter(|g| g.outcome == Outcome::Exhausted)
            .count()
    }

    /// Generated elements that still need a hand-written example.
    pub fn needs_manual_authoring(&self) -> impl Iterator<Item = &GeneratedElement> {
        self.generated
            .iter()
            .filter(|g| g.outcome == Outcome::Exhausted)
    }
}

impl std::fmt::Display for DegapReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Gap detection:")?;
        for s in &self.samples {
            writeln!(
                f,
                "  {}: {} gap: {} new: [{}]",
                s.index,
                s.identifier,
                s.gap,
                s.new_elements.join(", ")
            )?;
        }

        writeln!(f, "Generated examples:")?;
        if self.generated.is_empty() {
            writeln!(f, "  none (no sample introduced more than one new element)")?;
        }
        for (i, g) in self.generated.iter().enumerate() {
            writeln!(
                f,
                "  {}: before {} | element: {} | allowed: [{}] | {} after {} attempt(s)",
                i + 1,
                g.insert_before,
                g.element,
                g.allowed.join(", "),
                g.outcome,
                g.attempts
            )?;
        }

        write!(
            f,
            "Accepted: {}  Exhausted: {}  Tokens: ~{} input, ~{} output",
            self.accepted_count(),
            self.exhausted_count(),
            self.usage.input_tokens,
            self.usage.output_tokens
        )
    }
}
