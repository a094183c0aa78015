//! # Lexer - Tokenizing Note Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! which is what lets the stringifier rebuild source text from the tree:
//!
//! ```
//! use notemark_syntax::lexer::lex;
//!
//! let input = "# Hello, *world*!\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Why Two Token Enums?
//!
//! Logos derives on [`LexKind`], which only contains kinds the lexer can
//! actually produce. The parser works with [`TokenKind`], which adds
//! [`TokenKind::Eof`] for look-ahead past the end of a slice.
//!
//! ## Token Design
//!
//! Tokens are minimal and context-free. The lexer doesn't know whether `*`
//! opens a list, emphasis or a thematic break; that's the grammar's job.
//!
//! Every punctuation mark with syntactic meaning is emitted as its own
//! single-character token, so a rule can count `**` versus `*` exactly.
//! Spaces and tabs are also one token per character, so a rule can consume
//! "exactly one space" after a marker. Everything else is grouped into
//! `Text` runs for efficiency ("Hello" is one token, not five).

use std::ops::Range;

use logos::Logos;

/// Token kinds produced by the Logos lexer.
///
/// Maps one to one onto [`TokenKind`] via [`LexKind::to_token_kind`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexKind {
    /// A single space or tab
    #[regex(r"[ \t]")]
    Space,

    /// Line ending (LF or CRLF)
    ///
    /// Stray carriage returns right before the line feed belong to it, so
    /// text never ends in `\r` at a line boundary.
    #[regex(r"\r*\n")]
    Newline,

    #[token("*")]
    Star,

    #[token("_")]
    Underscore,

    #[token("`")]
    Backtick,

    #[token("#")]
    Hash,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("~")]
    Tilde,

    #[token("!")]
    Bang,

    #[token(">")]
    Gt,

    #[token("<")]
    Lt,

    #[token("-")]
    Dash,

    #[token("+")]
    Plus,

    #[token("|")]
    Pipe,

    #[token("\\")]
    Backslash,

    #[token("=")]
    Equal,

    #[token("^")]
    Caret,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token("%")]
    Percent,

    /// Plain text - anything not matched by other rules
    ///
    /// A lone `\r` matches nothing and comes back from Logos as an error.
    #[regex(r"[^ \t\r\n*_`#\[\]()~!><\-+|\\=^.,%]+")]
    Text,
}

impl LexKind {
    /// Convert to the parser-facing [`TokenKind`].
    pub fn to_token_kind(self) -> TokenKind {
        match self {
            LexKind::Space => TokenKind::Space,
            LexKind::Newline => TokenKind::Newline,
            LexKind::Star => TokenKind::Star,
            LexKind::Underscore => TokenKind::Underscore,
            LexKind::Backtick => TokenKind::Backtick,
            LexKind::Hash => TokenKind::Hash,
            LexKind::LBracket => TokenKind::LBracket,
            LexKind::RBracket => TokenKind::RBracket,
            LexKind::LParen => TokenKind::LParen,
            LexKind::RParen => TokenKind::RParen,
            LexKind::Tilde => TokenKind::Tilde,
            LexKind::Bang => TokenKind::Bang,
            LexKind::Gt => TokenKind::Gt,
            LexKind::Lt => TokenKind::Lt,
            LexKind::Dash => TokenKind::Dash,
            LexKind::Plus => TokenKind::Plus,
            LexKind::Pipe => TokenKind::Pipe,
            LexKind::Backslash => TokenKind::Backslash,
            LexKind::Equal => TokenKind::Equal,
            LexKind::Caret => TokenKind::Caret,
            LexKind::Dot => TokenKind::Dot,
            LexKind::Comma => TokenKind::Comma,
            LexKind::Percent => TokenKind::Percent,
            LexKind::Text => TokenKind::Text,
        }
    }
}

/// The kind of a lexed token, as seen by grammar rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// One space or tab character
    Space,
    /// Line ending
    Newline,
    /// `*`
    Star,
    /// `_`
    Underscore,
    /// `` ` ``
    Backtick,
    /// `#`
    Hash,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `~`
    Tilde,
    /// `!`
    Bang,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `-`
    Dash,
    /// `+`
    Plus,
    /// `|`
    Pipe,
    /// `\`
    Backslash,
    /// `=`
    Equal,
    /// `^`
    Caret,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `%`
    Percent,
    /// A run of plain text
    Text,
    /// Past the end of the token slice. Never produced by [`lex`].
    Eof,
}

impl TokenKind {
    /// Returns true for single-character punctuation kinds.
    pub fn is_punctuation(self) -> bool {
        !matches!(
            self,
            TokenKind::Space | TokenKind::Newline | TokenKind::Text | TokenKind::Eof
        )
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl Token<'_> {
    /// Returns true if this token is a space, tab or newline.
    ///
    /// Stray whitespace that lexes as `Text` (a lone `\r`, U+00A0) counts too.
    pub fn is_whitespace(&self) -> bool {
        match self.kind {
            TokenKind::Space | TokenKind::Newline => true,
            TokenKind::Text => self.text.chars().any(char::is_whitespace),
            _ => false,
        }
    }
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = LexKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = match result {
            Ok(lex_kind) => lex_kind.to_token_kind(),
            // Unrecognized input (a lone carriage return) is kept as TEXT
            Err(()) => TokenKind::Text,
        };
        tokens.push((Token { kind, text }, span));
    }

    tokens
}

/// Re-join a token slice into the exact source text it came from.
pub fn join(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|t| t.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(kind: TokenKind, text: &str) -> Token<'_> {
        Token { kind, text }
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_plain_text() {
        let tokens = lex("hello");
        assert_eq!(tokens, vec![token(TokenKind::Text, "hello")]);
    }

    #[test]
    fn lex_spaces_are_single_tokens() {
        let tokens = lex(" \t");
        assert_eq!(
            tokens,
            vec![token(TokenKind::Space, " "), token(TokenKind::Space, "\t")]
        );
    }

    #[test]
    fn lex_newline_lf() {
        let tokens = lex("\n");
        assert_eq!(tokens, vec![token(TokenKind::Newline, "\n")]);
    }

    #[test]
    fn lex_newline_crlf() {
        let tokens = lex("\r\n");
        assert_eq!(tokens, vec![token(TokenKind::Newline, "\r\n")]);
    }

    #[test]
    fn lex_percent_signs_are_single_tokens() {
        let tokens = lex("%%%50%");
        assert_eq!(
            tokens,
            vec![
                token(TokenKind::Percent, "%"),
                token(TokenKind::Percent, "%"),
                token(TokenKind::Percent, "%"),
                token(TokenKind::Text, "50"),
                token(TokenKind::Percent, "%"),
            ]
        );
    }

    #[test]
    fn lex_stray_carriage_returns_join_newline() {
        let tokens = lex("a\r\r\nb");
        assert_eq!(
            tokens,
            vec![
                token(TokenKind::Text, "a"),
                token(TokenKind::Newline, "\r\r\n"),
                token(TokenKind::Text, "b"),
            ]
        );
    }

    #[test]
    fn lex_lone_carriage_return_is_text() {
        let tokens = lex("a\rb");
        let reconstructed = join(&tokens);
        assert_eq!(reconstructed, "a\rb");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Text));
    }

    #[test]
    fn lex_heading_markers() {
        let tokens = lex("## ");
        assert_eq!(
            tokens,
            vec![
                token(TokenKind::Hash, "#"),
                token(TokenKind::Hash, "#"),
                token(TokenKind::Space, " "),
            ]
        );
    }

    #[test]
    fn lex_emphasis_counts_each_star() {
        let tokens = lex("*em* **strong**");
        assert_eq!(
            tokens,
            vec![
                token(TokenKind::Star, "*"),
                token(TokenKind::Text, "em"),
                token(TokenKind::Star, "*"),
                token(TokenKind::Space, " "),
                token(TokenKind::Star, "*"),
                token(TokenKind::Star, "*"),
                token(TokenKind::Text, "strong"),
                token(TokenKind::Star, "*"),
                token(TokenKind::Star, "*"),
            ]
        );
    }

    #[test]
    fn lex_link() {
        let tokens = lex("[text](https://a.b)");
        assert_eq!(
            tokens,
            vec![
                token(TokenKind::LBracket, "["),
                token(TokenKind::Text, "text"),
                token(TokenKind::RBracket, "]"),
                token(TokenKind::LParen, "("),
                token(TokenKind::Text, "https://a"),
                token(TokenKind::Dot, "."),
                token(TokenKind::Text, "b"),
                token(TokenKind::RParen, ")"),
            ]
        );
    }

    #[test]
    fn lex_code_fence() {
        let tokens = lex("```rust\n```");
        assert_eq!(
            tokens,
            vec![
                token(TokenKind::Backtick, "`"),
                token(TokenKind::Backtick, "`"),
                token(TokenKind::Backtick, "`"),
                token(TokenKind::Text, "rust"),
                token(TokenKind::Newline, "\n"),
                token(TokenKind::Backtick, "`"),
                token(TokenKind::Backtick, "`"),
                token(TokenKind::Backtick, "`"),
            ]
        );
    }

    #[test]
    fn lex_hierarchical_tag() {
        let tokens = lex("#a/b/c");
        assert_eq!(
            tokens,
            vec![token(TokenKind::Hash, "#"), token(TokenKind::Text, "a/b/c")]
        );
    }

    #[test]
    fn lex_ordered_marker() {
        let tokens = lex("12. item");
        assert_eq!(
            tokens,
            vec![
                token(TokenKind::Text, "12"),
                token(TokenKind::Dot, "."),
                token(TokenKind::Space, " "),
                token(TokenKind::Text, "item"),
            ]
        );
    }

    #[test]
    fn all_bytes_preserved() {
        let input = "# Hello\n> quote\n- item";
        let tokens = lex(input);
        assert_eq!(join(&tokens), input);
    }

    #[test]
    fn all_bytes_preserved_unicode() {
        let input = "héllo\u{a0}wörld ~~日本語~~ `<code>` \\* #тег";
        let tokens = lex(input);
        assert_eq!(join(&tokens), input);
    }

    #[test]
    fn spans_are_correct() {
        let input = "hello *world*\r\n";
        let tokens = lex_with_spans(input);
        for (token, span) in &tokens {
            assert_eq!(token.text, &input[span.clone()]);
        }
    }

    #[test]
    fn whitespace_detection() {
        assert!(token(TokenKind::Space, " ").is_whitespace());
        assert!(token(TokenKind::Text, "\u{a0}").is_whitespace());
        assert!(!token(TokenKind::Text, "word").is_whitespace());
        assert!(!token(TokenKind::Hash, "#").is_whitespace());
    }
}
