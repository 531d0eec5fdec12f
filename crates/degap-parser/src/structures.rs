//! Flat listing of control keywords with their indentation depth.

use crate::tokenize::{ParseError, Token, tokenize};
use degap_core::vocab::Vocabulary;
use serde::Serialize;

/// One control keyword occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlOccurrence {
    pub kind: String,
    /// Indentation depth of the line holding the keyword (0 = top level).
    /// Counts every block, including ones opened by `def` or `while`.
    pub depth: usize,
    pub line: usize,
}

/// List every vocabulary keyword in source order with its indentation depth.
pub fn control_structures(
    source: &str,
    vocab: &Vocabulary,
) -> Result<Vec<ControlOccurrence>, ParseError> {
    let mut depth = 0usize;
    let mut out = Vec::new();
    for token in tokenize(source)? {
        match token {
            Token::Indent => depth += 1,
            Token::Dedent => depth = depth.saturating_sub(1),
            Token::Name { text, line } if vocab.contains(text) => out.push(ControlOccurrence {
                kind: text.to_string(),
                depth,
                line,
            }),
            Token::Name { .. } | Token::Newline => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_counts_every_block() {
        let source = "def f():\n    for i in x:\n        if i:\n            pass\nif y:\n    pass\n";
        let found = control_structures(source, &Vocabulary::default()).unwrap();
        let summary: Vec<(&str, usize)> = found.iter().map(|o| (o.kind.as_str(), o.depth)).collect();
        assert_eq!(summary, vec![("for", 1), ("if", 2), ("if", 0)]);
        assert_eq!(found[1].line, 3);
    }
}
