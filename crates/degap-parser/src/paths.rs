//! Path derivation: one slash-joined path per control node.
//!
//! A path names a node's kind together with its full ancestor chain, so
//! `for/if` (an `if` nested in a `for`) and `if` (a top-level `if`) are
//! distinct structural elements.

use crate::tokenize::ParseError;
use crate::tree::{ControlTree, NodeId, parse_control_tree};
use degap_core::vocab::Vocabulary;
use std::collections::BTreeSet;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

impl ControlTree {
    /// All paths in depth-first source order, one per node. A parent's path
    /// precedes the paths of its descendants. Duplicates are kept.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len());
        let mut prefix: Vec<&str> = Vec::new();
        for &root in self.roots() {
            self.collect_paths(root, &mut prefix, &mut out);
        }
        out
    }

    fn collect_paths<'a>(&'a self, id: NodeId, prefix: &mut Vec<&'a str>, out: &mut Vec<String>) {
        let node = self.node(id);
        prefix.push(&node.kind);
        out.push(prefix.join("/"));
        for &child in &node.children {
            self.collect_paths(child, prefix, out);
        }
        prefix.pop();
    }

    /// Distinct paths, as consumed by gap detection and validation.
    pub fn path_set(&self) -> BTreeSet<String> {
        self.paths().into_iter().collect()
    }
}

/// Tokenize `source` and return its distinct structural paths.
pub fn extract_paths(source: &str, vocab: &Vocabulary) -> Result<BTreeSet<String>, ParseError> {
    Ok(parse_control_tree(source, vocab)?.path_set())
}

/// Split a path into its keyword segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR)
}
