//! Control-keyword vocabulary and priority ranking.

use serde::{Deserialize, Serialize};

/// Keywords recognised when none are configured.
pub const DEFAULT_KEYWORDS: &[&str] = &["if", "elif", "else", "for", "break", "continue"];

/// The set of control keywords that form structural paths, plus the ranking
/// used to introduce new elements one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    keywords: Vec<String>,
    priority: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        let defaults: Vec<String> = DEFAULT_KEYWORDS.iter().map(|s| (*s).to_string()).collect();
        Self {
            keywords: defaults.clone(),
            priority: defaults,
        }
    }
}

impl Vocabulary {
    /// Build a vocabulary. Duplicate keywords are dropped, first occurrence wins.
    pub fn new(keywords: Vec<String>, priority: Vec<String>) -> Self {
        Self {
            keywords: dedup_preserving_order(keywords),
            priority: dedup_preserving_order(priority),
        }
    }

    /// Recognised keywords in configured order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Priority list, highest priority first.
    pub fn priority(&self) -> &[String] {
        &self.priority
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keywords.iter().any(|k| k == name)
    }

    /// Rank of a keyword kind. Every unlisted kind shares `priority.len()`,
    /// which sorts after all listed kinds.
    pub fn rank(&self, kind: &str) -> usize {
        self.priority
            .iter()
            .position(|p| p == kind)
            .unwrap_or(self.priority.len())
    }
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
