//! Indentation-aware lexer.
//!
//! Emits only what control-structure extraction needs: names, logical line
//! ends, and indentation changes. Strings, comments, numbers and operators are
//! consumed but never surface as tokens, so `"for"` inside a literal or a
//! comment cannot create a structural path.
//!
//! Raw tokens come from [`crate::lexer`]; this module layers the logical-line
//! and indentation rules over them.

use crate::lexer::RawToken;
use logos::Logos;

/// A structural token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// An identifier or keyword, with its 1-based line number.
    Name { text: &'a str, line: usize },
    /// End of a logical line (brackets and backslash continuations joined).
    Newline,
    /// The next logical line is indented deeper than the enclosing block.
    Indent,
    /// One enclosing block was closed.
    Dedent,
}

/// Source text that cannot be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: unindent does not match any outer indentation level")]
    InconsistentDedent { line: usize },
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },
    #[error("line {line}: unexpected end of input inside a multi-line statement")]
    UnexpectedEof { line: usize },
}

impl ParseError {
    /// Line the error was reported against.
    pub fn line(&self) -> usize {
        match self {
            Self::InconsistentDedent { line }
            | Self::UnterminatedString { line }
            | Self::UnexpectedEof { line } => *line,
        }
    }
}

/// Tokenize `source` into names, line ends and indentation events.
///
/// Every `Indent` is balanced by a `Dedent` by the end of the stream.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut pass = IndentationPass::default();
    let mut lexer = RawToken::lexer(source);
    while let Some(raw) = lexer.next() {
        pass.feed(raw, lexer.slice())?;
    }
    pass.finish()
}

/// Turns raw tokens into logical lines and indentation events.
///
/// Brackets and a trailing backslash join physical lines. Blank and
/// comment-only lines never reach `apply_indent`.
struct IndentationPass<'a> {
    tokens: Vec<Token<'a>>,
    indents: Vec<usize>,
    line: usize,
    /// No content seen yet on the current logical line.
    at_line_start: bool,
    column: usize,
    bracket_depth: usize,
    bracket_line: usize,
    continuation: bool,
}

impl Default for IndentationPass<'_> {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            indents: vec![0],
            line: 1,
            at_line_start: true,
            column: 0,
            bracket_depth: 0,
            bracket_line: 0,
            continuation: false,
        }
    }
}

impl<'a> IndentationPass<'a> {
    fn feed(&mut self, raw: Result<RawToken, ()>, slice: &'a str) -> Result<(), ParseError> {
        let line = self.line;
        self.line += slice.matches('\n').count();

        match raw {
            Ok(RawToken::Whitespace) => {
                if self.at_line_start {
                    self.column = measure_indent(slice);
                }
            }
            Ok(RawToken::Comment) => {}
            Ok(RawToken::Newline) => self.end_physical_line(),
            Ok(RawToken::UnterminatedString) => {
                return Err(ParseError::UnterminatedString { line });
            }
            Ok(RawToken::Backslash) => {
                self.begin_content(line)?;
                self.continuation = true;
            }
            other => {
                self.begin_content(line)?;
                self.continuation = false;
                match other {
                    Ok(RawToken::Name) => self.tokens.push(Token::Name { text: slice, line }),
                    Ok(RawToken::Open) => {
                        if self.bracket_depth == 0 {
                            self.bracket_line = line;
                        }
                        self.bracket_depth += 1;
                    }
                    Ok(RawToken::Close) => {
                        self.bracket_depth = self.bracket_depth.saturating_sub(1);
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// First content of a logical line settles its indentation.
    fn begin_content(&mut self, line: usize) -> Result<(), ParseError> {
        if self.at_line_start {
            self.at_line_start = false;
            self.apply_indent(self.column, line)?;
        }
        Ok(())
    }

    fn end_physical_line(&mut self) {
        if self.continuation {
            self.continuation = false;
            return;
        }
        if self.at_line_start {
            self.column = 0;
            return;
        }
        if self.bracket_depth == 0 {
            self.tokens.push(Token::Newline);
            self.at_line_start = true;
            self.column = 0;
        }
    }

    fn apply_indent(&mut self, column: usize, line_no: usize) -> Result<(), ParseError> {
        let current = self.indents.last().copied().unwrap_or(0);
        if column > current {
            self.indents.push(column);
            self.tokens.push(Token::Indent);
        } else if column < current {
            while self.indents.len() > 1 && self.indents.last().is_some_and(|&top| column < top) {
                self.indents.pop();
                self.tokens.push(Token::Dedent);
            }
            if self.indents.last().copied().unwrap_or(0) != column {
                return Err(ParseError::InconsistentDedent { line: line_no });
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Token<'a>>, ParseError> {
        if self.continuation {
            return Err(ParseError::UnexpectedEof { line: self.line });
        }
        if self.bracket_depth > 0 {
            return Err(ParseError::UnexpectedEof {
                line: self.bracket_line,
            });
        }
        if !self.at_line_start {
            self.tokens.push(Token::Newline);
        }
        for _ in 1..self.indents.len() {
            self.tokens.push(Token::Dedent);
        }
        Ok(self.tokens)
    }
}

/// Indentation column of a leading whitespace run.
/// Tabs advance to the next multiple of 8; form feed resets the column.
fn measure_indent(whitespace: &str) -> usize {
    let mut column = 0;
    for b in whitespace.bytes() {
        match b {
            b' ' => column += 1,
            b'\t' => column = (column / 8 + 1) * 8,
            b'\x0c' => column = 0,
            _ => {}
        }
    }
    column
}
