//! Ordered corpus discovery.
//!
//! Corpus order is teaching order: matches are sorted by their path relative
//! to the project root, so `01_intro.py` is taught before `02_loops.py`.

use anyhow::{Context, Result};
use globset::GlobBuilder;
use std::path::{Path, PathBuf};

/// One teaching sample: where it came from and its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Path relative to the project root.
    pub identifier: PathBuf,
    pub source: String,
}

impl Sample {
    pub fn new(identifier: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            source: source.into(),
        }
    }

    /// Identifier rendered with forward slashes, for reports and prompts.
    pub fn display_id(&self) -> String {
        self.identifier.to_string_lossy().replace('\\', "/")
    }
}

/// Collect every file under `project_root` whose relative path matches `pattern`.
///
/// `*` does not cross directory separators. Hidden and gitignored files are
/// skipped. A directory entry that cannot be walked, or a matching file that
/// cannot be read, is an error: dropping a sample would silently shift what
/// later samples count as new.
pub fn collect_samples(project_root: &Path, pattern: &str) -> Result<Vec<Sample>> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid corpus pattern '{}'", pattern))?
        .compile_matcher();

    let walker = ignore::WalkBuilder::new(project_root)
        .hidden(true)
        .git_ignore(true)
        .build();

    let mut matched: Vec<PathBuf> = Vec::new();
    for entry in walker {
        let entry =
            entry.with_context(|| format!("failed to walk corpus under {}", project_root.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let rel = path.strip_prefix(project_root).unwrap_or(path);
        if matcher.is_match(rel) {
            matched.push(rel.to_path_buf());
        }
    }
    matched.sort();

    let mut samples = Vec::with_capacity(matched.len());
    for rel in matched {
        let full = project_root.join(&rel);
        let source = std::fs::read_to_string(&full)
            .with_context(|| format!("failed to read sample {}", full.display()))?;
        samples.push(Sample::new(rel, source));
    }

    tracing::debug!("collected {} samples matching '{}'", samples.len(), pattern);
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_id_uses_forward_slashes() {
        let sample = Sample::new("sample/01.py", "");
        assert_eq!(sample.display_id(), "sample/01.py");
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(collect_samples(tmp.path(), "sample/[").is_err());
    }
}
