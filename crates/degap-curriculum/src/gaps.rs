//! Gap detection across an ordered corpus.

use degap_core::corpus::Sample;
use degap_core::vocab::Vocabulary;
use degap_parser::{ParseError, extract_paths};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A sample introducing at least this many new paths is a gap.
pub const GAP_THRESHOLD: usize = 2;

/// Every path seen so far while walking the corpus in order.
///
/// Only grows: paths are never removed once absorbed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LearnedSet {
    paths: BTreeSet<String>,
}

impl LearnedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `paths` in and return the ones that were not already learned.
    pub fn absorb(&mut self, paths: &BTreeSet<String>) -> BTreeSet<String> {
        let new: BTreeSet<String> = paths.difference(&self.paths).cloned().collect();
        self.paths.extend(new.iter().cloned());
        new
    }

    /// Mark a single path as learned. Returns `true` if it was new.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.paths
    }
}

impl From<BTreeSet<String>> for LearnedSet {
    fn from(paths: BTreeSet<String>) -> Self {
        Self { paths }
    }
}

/// One corpus entry after analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleRecord {
    /// 1-based position in teaching order.
    pub index: usize,
    pub identifier: PathBuf,
    /// Every distinct path in the sample.
    pub paths: BTreeSet<String>,
    /// Paths not present in any earlier sample.
    pub new_elements: BTreeSet<String>,
    /// Learned paths immediately before this sample was processed.
    pub learned_before: BTreeSet<String>,
}

impl SampleRecord {
    pub fn gap_size(&self) -> usize {
        self.new_elements.len()
    }

    pub fn is_gap(&self) -> bool {
        self.gap_size() >= GAP_THRESHOLD
    }

    pub fn display_id(&self) -> String {
        self.identifier.to_string_lossy().replace('\\', "/")
    }
}

/// Result of walking a whole corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GapAnalysis {
    pub records: Vec<SampleRecord>,
}

impl GapAnalysis {
    /// Records flagged as gaps, in corpus order.
    pub fn gaps(&self) -> impl Iterator<Item = &SampleRecord> {
        self.records.iter().filter(|r| r.is_gap())
    }

    pub fn gap_count(&self) -> usize {
        self.gaps().count()
    }
}

/// Gap detection failures.
#[derive(Debug, thiserror::Error)]
pub enum GapError {
    /// A corpus sample could not be tokenized. Skipping it would change what
    /// every later sample counts as new, so analysis stops here.
    #[error("failed to parse sample {identifier}: {source}")]
    Parse {
        identifier: String,
        #[source]
        source: ParseError,
    },
}

/// Walk `samples` in order and record the paths each one introduces.
///
/// Pure function of the ordered samples and the vocabulary.
pub fn detect_gaps(samples: &[Sample], vocab: &Vocabulary) -> Result<GapAnalysis, GapError> {
    let mut learned = LearnedSet::new();
    let mut records = Vec::with_capacity(samples.len());

    for (idx, sample) in samples.iter().enumerate() {
        let paths = extract_paths(&sample.source, vocab).map_err(|source| GapError::Parse {
            identifier: sample.display_id(),
            source,
        })?;
        let learned_before = learned.as_set().clone();
        let new_elements = learned.absorb(&paths);

        if new_elements.len() >= GAP_THRESHOLD {
            tracing::debug!(
                "gap of {} at {}: {:?}",
                new_elements.len(),
                sample.display_id(),
                new_elements
            );
        }

        records.push(SampleRecord {
            index: idx + 1,
            identifier: sample.identifier.clone(),
            paths,
            new_elements,
            learned_before,
        });
    }

    Ok(GapAnalysis { records })
}
