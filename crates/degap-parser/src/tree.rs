//! Control-construct tree built from the token stream.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Each
//! indentation level is a scope whose insertion point is either a node (its
//! children receive new keywords) or the root list.

use crate::tokenize::{ParseError, Token, tokenize};
use degap_core::vocab::Vocabulary;
use serde::Serialize;

/// Index of a node in a [`ControlTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One occurrence of a control keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlNode {
    pub kind: String,
    /// 1-based source line of the keyword.
    pub line: usize,
    pub parent: Option<NodeId>,
    /// Children in source order.
    pub children: Vec<NodeId>,
}

/// Forest of control nodes for one source text. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControlTree {
    nodes: Vec<ControlNode>,
    roots: Vec<NodeId>,
}

impl ControlTree {
    /// Build the tree from a token stream, keeping only names in `vocab`.
    ///
    /// An `Indent` opens a scope under the node appended last on the previous
    /// logical line. A block opened by a construct outside the vocabulary
    /// (`def`, `while`, `with`, ...) appended nothing, so its scope stays
    /// under the enclosing insertion point. A `Dedent` never pops the root.
    pub fn from_tokens(tokens: &[Token<'_>], vocab: &Vocabulary) -> Self {
        let mut tree = Self::default();
        // Insertion point per open indentation level; `None` is the root list.
        let mut scopes: Vec<Option<NodeId>> = vec![None];
        let mut appended_this_line: Option<NodeId> = None;
        let mut appended_prev_line: Option<NodeId> = None;

        for token in tokens {
            match *token {
                Token::Name { text, line } if vocab.contains(text) => {
                    let parent = scopes.last().copied().flatten();
                    let id = tree.push(text, line, parent);
                    appended_this_line = Some(id);
                }
                Token::Name { .. } => {}
                Token::Newline => {
                    appended_prev_line = appended_this_line.take();
                }
                Token::Indent => {
                    let enclosing = scopes.last().copied().flatten();
                    scopes.push(appended_prev_line.take().or(enclosing));
                }
                Token::Dedent => {
                    if scopes.len() > 1 {
                        scopes.pop();
                    }
                    appended_prev_line = None;
                }
            }
        }

        tree
    }

    fn push(&mut self, kind: &str, line: usize, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ControlNode {
            kind: kind.to_string(),
            line,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Top-level nodes in source order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &ControlNode {
        &self.nodes[id.0]
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of control ancestors above `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id.0].parent;
        while let Some(p) = current {
            depth += 1;
            current = self.nodes[p.0].parent;
        }
        depth
    }
}

/// Tokenize `source` and build its control tree.
pub fn parse_control_tree(source: &str, vocab: &Vocabulary) -> Result<ControlTree, ParseError> {
    let tokens = tokenize(source)?;
    Ok(ControlTree::from_tokens(&tokens, vocab))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tree: &ControlTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|id| tree.node(*id).kind.clone()).collect()
    }

    #[test]
    fn test_nested_if_in_for() {
        let source = "for i in range(3):\n    if i:\n        print(i)\n";
        let tree = parse_control_tree(source, &Vocabulary::default()).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(kinds(&tree, tree.roots()), vec!["for"]);
        let for_node = tree.node(tree.roots()[0]);
        assert_eq!(kinds(&tree, &for_node.children), vec!["if"]);
        assert_eq!(tree.depth(for_node.children[0]), 1);
        assert_eq!(tree.node(for_node.children[0]).line, 2);
    }

    #[test]
    fn test_if_elif_else_are_siblings() {
        let source = "if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n";
        let tree = parse_control_tree(source, &Vocabulary::default()).unwrap();
        assert_eq!(kinds(&tree, tree.roots()), vec!["if", "elif", "else"]);
        assert!(
            tree.roots()
                .iter()
                .all(|id| tree.node(*id).children.is_empty())
        );
    }

    #[test]
    fn test_block_outside_vocabulary_is_transparent() {
        let source = "if a:\n    pass\ndef f():\n    for x in y:\n        break\n";
        let tree = parse_control_tree(source, &Vocabulary::default()).unwrap();
        // `for` belongs to the root, not to the earlier `if`.
        assert_eq!(kinds(&tree, tree.roots()), vec!["if", "for"]);
        let for_node = tree.node(tree.roots()[1]);
        assert_eq!(kinds(&tree, &for_node.children), vec!["break"]);
    }

    #[test]
    fn test_indent_without_prior_keyword_does_not_panic() {
        let source = "    if a:\n        pass\n";
        let tree = parse_control_tree(source, &Vocabulary::default()).unwrap();
        assert_eq!(kinds(&tree, tree.roots()), vec!["if"]);
    }

    #[test]
    fn test_unrecognized_keywords_ignored() {
        let source = "while x:\n    if y:\n        continue\n";
        let tree = parse_control_tree(source, &Vocabulary::default()).unwrap();
        assert_eq!(kinds(&tree, tree.roots()), vec!["if"]);

        let vocab = Vocabulary::new(
            vec!["while".into(), "if".into(), "continue".into()],
            vec![],
        );
        let tree = parse_control_tree(source, &vocab).unwrap();
        assert_eq!(kinds(&tree, tree.roots()), vec!["while"]);
    }

    #[test]
    fn test_empty_source_yields_empty_tree() {
        let tree = parse_control_tree("", &Vocabulary::default()).unwrap();
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn test_parse_error_propagates() {
        let err = parse_control_tree("if x:\n        a\n    b\n", &Vocabulary::default());
        assert!(err.is_err());
    }
}
