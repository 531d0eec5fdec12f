//! Raw source tokens, produced by the `logos` lexer.
//!
//! Only the kinds the indentation pass in [`crate::tokenize`] acts on have a
//! rule. Operators and other punctuation match nothing and come out of the
//! lexer as errors, which the pass treats as ordinary line content.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken {
    #[regex(r"[ \t\x0c\r]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"#[^\n]*")]
    Comment,

    #[token("\\")]
    Backslash,

    #[regex(r"[(\[{]")]
    Open,

    #[regex(r"[)\]}]")]
    Close,

    #[regex(r"[\p{XID_Start}_]\p{XID_Continue}*")]
    Name,

    /// Digits with an optional fraction, or a based literal. An exponent or
    /// imaginary suffix lexes as a following name, which is never a keyword,
    /// and a keyword written straight after the digits (`1if`) stays a name.
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?")]
    #[regex(r"0[xXoObB][0-9a-fA-F_]*")]
    Number,

    /// A complete string literal with any `r`/`b`/`u`/`f` prefix. Escaped
    /// newlines and triple-quoted literals may span lines.
    #[regex(r#"([rRbBuUfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?'([^'\\\n]|\\(\r\n|.|\n))*'"#)]
    #[regex(r#"([rRbBuUfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?"([^"\\\n]|\\(\r\n|.|\n))*""#)]
    #[regex(r#"([rRbBuUfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?'''([^'\\]|\\(.|\n)|'([^'\\]|\\(.|\n))|''([^'\\]|\\(.|\n)))*'''"#)]
    #[regex(r#"([rRbBuUfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?"""([^"\\]|\\(.|\n)|"([^"\\]|\\(.|\n))|""([^"\\]|\\(.|\n)))*""""#)]
    String,

    /// A string literal cut off by the end of its line, or for triple-quoted
    /// literals by the end of input.
    #[regex(r#"([rRbBuUfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?'([^'\\\n]|\\(\r\n|.|\n))*\\?"#)]
    #[regex(r#"([rRbBuUfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?"([^"\\\n]|\\(\r\n|.|\n))*\\?"#)]
    #[regex(r#"([rRbBuUfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?'''([^'\\]|\\(.|\n)|'([^'\\]|\\(.|\n))|''([^'\\]|\\(.|\n)))*('|'')?\\?"#)]
    #[regex(r#"([rRbBuUfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?"""([^"\\]|\\(.|\n)|"([^"\\]|\\(.|\n))|""([^"\\]|\\(.|\n)))*("|"")?\\?"#)]
    UnterminatedString,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Result<RawToken, ()>> {
        RawToken::lexer(source).collect()
    }

    #[test]
    fn test_number_then_keyword() {
        let mut lexer = RawToken::lexer("1if");
        assert_eq!(lexer.next(), Some(Ok(RawToken::Number)));
        assert_eq!(lexer.slice(), "1");
        assert_eq!(lexer.next(), Some(Ok(RawToken::Name)));
        assert_eq!(lexer.slice(), "if");
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_prefixed_strings() {
        for source in ["r'a\\b'", "b\"x\"", "f'{x}'", "Rb'''x'''", "u\"\"\"y\"\"\""] {
            assert_eq!(kinds(source), vec![Ok(RawToken::String)], "{source}");
        }
    }

    #[test]
    fn test_triple_quoted_spans_lines() {
        let mut lexer = RawToken::lexer("'''a\n'b'\n''c'''x");
        assert_eq!(lexer.next(), Some(Ok(RawToken::String)));
        assert_eq!(lexer.slice(), "'''a\n'b'\n''c'''");
        assert_eq!(lexer.next(), Some(Ok(RawToken::Name)));
    }

    #[test]
    fn test_unterminated_strings() {
        assert_eq!(kinds("'abc")[0], Ok(RawToken::UnterminatedString));
        assert_eq!(kinds("\"\"\"abc\nfor")[0], Ok(RawToken::UnterminatedString));
    }

    #[test]
    fn test_operators_are_errors() {
        assert_eq!(kinds("+"), vec![Err(())]);
    }

    #[test]
    fn test_crlf_is_one_newline() {
        assert_eq!(kinds("\r\n"), vec![Ok(RawToken::Newline)]);
    }
}
