//! Read/write generated artifacts and the run report on disk.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Artifact content written when every generation attempt for an element failed.
pub const FAILURE_SENTINEL: &str = "# generation failed\n";

/// File name of the structured run report inside the result directory.
pub const REPORT_FILE: &str = "report.json";

/// Directory receiving one artifact per generated element.
#[derive(Debug, Clone)]
pub struct ResultDir {
    root: PathBuf,
    default_extension: String,
}

impl ResultDir {
    /// Create `dir` if needed and remove files left over from a previous run.
    /// Subdirectories are left alone.
    pub fn prepare(dir: &Path, language: &str) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create result directory {}", dir.display()))?;

        for entry in fs::read_dir(dir)
            .with_context(|| format!("failed to list result directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
            }
        }

        Ok(Self {
            root: dir.to_path_buf(),
            default_extension: extension_for_language(language).to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the artifact for the `ordinal`-th (1-based) element of the gap
    /// found at `gap_identifier`: `<stem>_prev<ordinal>.<ext>`.
    pub fn artifact_path(&self, gap_identifier: &Path, ordinal: usize) -> PathBuf {
        let stem = gap_identifier
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sample");
        let ext = gap_identifier
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(&self.default_extension);
        self.root.join(format!("{}_prev{}.{}", stem, ordinal, ext))
    }

    /// Write one artifact. Completes before returning; never appends.
    pub fn write_artifact(
        &self,
        gap_identifier: &Path,
        ordinal: usize,
        content: &str,
    ) -> Result<PathBuf> {
        let path = self.artifact_path(gap_identifier, ordinal);
        fs::write(&path, content)
            .with_context(|| format!("failed to write artifact {}", path.display()))?;
        Ok(path)
    }

    /// Serialize `value` as pretty JSON into `name` inside the result directory.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.root.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// File extension used when the gap identifier carries none.
pub fn extension_for_language(language: &str) -> &'static str {
    match language.to_lowercase().as_str() {
        "python" | "py" => "py",
        "ruby" | "rb" => "rb",
        "javascript" | "js" => "js",
        "typescript" | "ts" => "ts",
        "rust" | "rs" => "rs",
        _ => "txt",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path_uses_gap_stem_and_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ResultDir::prepare(tmp.path(), "python").unwrap();
        let path = dir.artifact_path(Path::new("sample/03_loops.py"), 2);
        assert_eq!(path, tmp.path().join("03_loops_prev2.py"));
    }

    #[test]
    fn test_artifact_path_falls_back_to_language_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ResultDir::prepare(tmp.path(), "python").unwrap();
        let path = dir.artifact_path(Path::new("lesson"), 1);
        assert_eq!(path, tmp.path().join("lesson_prev1.py"));
    }

    #[test]
    fn test_extension_for_unknown_language() {
        assert_eq!(extension_for_language("cobol"), "txt");
        assert_eq!(extension_for_language("Python"), "py");
    }
}
