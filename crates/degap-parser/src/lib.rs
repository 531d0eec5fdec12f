//! Control-structure extraction for degap.
//!
//! Turns source text into a nesting-aware tree of control keywords
//! ([`tree::ControlTree`]) and flattens it into slash-joined structural paths
//! such as `for/if/else`. Raw tokens come from a `logos` lexer; an
//! indentation pass over them follows brackets, continuations and block
//! structure, and nothing else.

mod lexer;
pub mod paths;
pub mod structures;
pub mod tokenize;
pub mod tree;

pub use paths::extract_paths;
pub use tokenize::{ParseError, Token, tokenize};
pub use tree::{ControlNode, ControlTree, NodeId, parse_control_tree};
