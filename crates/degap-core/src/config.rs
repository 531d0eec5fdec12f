//! Configuration for gap detection and intermediate-example generation.
//!
//! Load order: `.degap/config.toml` → environment variables → defaults.

use crate::vocab::{DEFAULT_KEYWORDS, Vocabulary};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level degap configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DegapConfig {
    pub vocabulary: VocabularyConfig,
    pub corpus: CorpusConfig,
    pub generation: GenerationConfig,
    pub output: OutputConfig,
}

/// Control keywords and their introduction order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Keywords that contribute path segments. Anything else is ignored.
    pub keywords: Vec<String>,
    /// Ranking used when a gap is split into single-element steps.
    /// Kinds not listed here sort after every listed kind.
    pub priority: Vec<String>,
}

/// Where the ordered teaching samples live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Glob relative to the project root. Matches are sorted by path.
    pub pattern: String,
}

/// What happens to an element whose generation exhausted every attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustedPolicy {
    /// Treat the element as taught anyway; later steps may use it.
    #[default]
    MarkLearned,
    /// Keep the element out of the allowed set for the rest of the gap.
    LeaveUnlearned,
}

/// Generation backend and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Provider name: `ollama`, `openai` or `anthropic`.
    pub provider: String,
    pub model: String,
    /// Base URL for Ollama or an OpenAI-compatible server.
    pub base_url: String,
    /// Attempts per element before it is recorded as exhausted.
    pub max_attempts: usize,
    /// Language named in prompts and used for artifact extensions.
    pub language: String,
    /// HTTP timeout for a single generation request.
    pub timeout_secs: u64,
    pub on_exhausted: ExhaustedPolicy,
}

/// Output directory for generated artifacts and the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        let defaults: Vec<String> = DEFAULT_KEYWORDS.iter().map(|s| (*s).to_string()).collect();
        Self {
            keywords: defaults.clone(),
            priority: defaults,
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            pattern: "sample/*.py".to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "qwen3:32b".to_string(),
            base_url: "http://localhost:11434".to_string(),
            max_attempts: 8,
            language: "python".to_string(),
            timeout_secs: 300,
            on_exhausted: ExhaustedPolicy::MarkLearned,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "result".to_string(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl DegapConfig {
    /// Load config from `.degap/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".degap").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override("DEGAP_PROVIDER", &mut config.generation.provider);
        env_override("DEGAP_MODEL", &mut config.generation.model);
        env_override("DEGAP_BASE_URL", &mut config.generation.base_url);
        env_override("DEGAP_MAX_ATTEMPTS", &mut config.generation.max_attempts);
        env_override("DEGAP_CORPUS_PATTERN", &mut config.corpus.pattern);
        env_override("DEGAP_OUTPUT_DIR", &mut config.output.dir);

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the tokenizer or orchestrator cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.keywords.is_empty() {
            anyhow::bail!("vocabulary.keywords must not be empty");
        }
        for keyword in &self.vocabulary.keywords {
            if keyword.trim().is_empty() {
                anyhow::bail!("vocabulary.keywords contains a blank entry");
            }
            if keyword.contains('/') {
                anyhow::bail!("keyword '{}' must not contain '/'", keyword);
            }
        }
        if self.generation.max_attempts == 0 {
            anyhow::bail!("generation.max_attempts must be at least 1");
        }
        Ok(())
    }

    /// The vocabulary value handed to the tokenizer and prioritizer.
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(
            self.vocabulary.keywords.clone(),
            self.vocabulary.priority.clone(),
        )
    }
}
