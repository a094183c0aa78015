//! # Grammar Rules
//!
//! Every construct the parser knows about is a unit struct implementing
//! [`Rule`](super::Rule). Rules look at a token slice that starts at the
//! cursor and use the small helpers in this module to inspect it:
//!
//! 1. Peek at token kinds (`nth()`, `run_length()`)
//! 2. Split off the current line (`line()`, `split_line()`)
//! 3. Re-enter the parser for nested content (`parser.nested_inlines()`)
//!
//! ## Module Structure
//!
//! - [`block`] - Block-level rules (headings, lists, tables, code blocks)
//! - [`inline`] - Inline rules (links, emphasis, code spans, tags)
//!
//! ## Writing Grammar Rules
//!
//! A typical rule looks like:
//!
//! ```ignore
//! impl Rule for ThematicBreakRule {
//!     fn name(&self) -> &'static str {
//!         "thematic_break"
//!     }
//!
//!     fn try_match(&self, _: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
//!         let line = line(tokens);                       // 1. Look at one line
//!         if line.len() != 3 || run_length(line, line[0].kind) != 3 {
//!             return None;                               // 2. Reject early
//!         }
//!         let node = Node::ThematicBreak { symbol: '-' };
//!         Some(Matched::new(node, 3))                    // 3. Claim tokens
//!     }
//! }
//! ```
//!
//! ## No Partial Matches
//!
//! Rules must be all-or-nothing. Validate the whole construct first, then
//! build the node. A rule that gives up returns `None` and the dispatcher
//! tries the next one, eventually falling back to literal text.

pub mod block;
pub mod inline;

use crate::lexer::{Token, TokenKind};

/// Kind of the token at `n`, or [`TokenKind::Eof`] past the end.
pub(crate) fn nth(tokens: &[Token<'_>], n: usize) -> TokenKind {
    tokens.get(n).map_or(TokenKind::Eof, |t| t.kind)
}

/// Number of leading tokens of `kind`.
pub(crate) fn run_length(tokens: &[Token<'_>], kind: TokenKind) -> usize {
    tokens.iter().take_while(|t| t.kind == kind).count()
}

/// True if the token at `n` is a single ASCII space.
pub(crate) fn is_single_space(tokens: &[Token<'_>], n: usize) -> bool {
    tokens
        .get(n)
        .is_some_and(|t| t.kind == TokenKind::Space && t.text == " ")
}

/// Tokens of the current line, without its terminating newline.
pub(crate) fn line<'t, 'a>(tokens: &'t [Token<'a>]) -> &'t [Token<'a>] {
    let end = tokens
        .iter()
        .position(|t| t.kind == TokenKind::Newline)
        .unwrap_or(tokens.len());
    &tokens[..end]
}

/// Split off the current line.
///
/// Returns the line (without its newline) and, if a newline follows, the
/// tokens after it.
pub(crate) fn split_line<'t, 'a>(
    tokens: &'t [Token<'a>],
) -> (&'t [Token<'a>], Option<&'t [Token<'a>]>) {
    let line = line(tokens);
    let rest = (line.len() < tokens.len()).then(|| &tokens[line.len() + 1..]);
    (line, rest)
}

/// Strip leading and trailing space tokens.
pub(crate) fn trim<'t, 'a>(tokens: &'t [Token<'a>]) -> &'t [Token<'a>] {
    let start = run_length(tokens, TokenKind::Space);
    let end = tokens.len()
        - tokens[start..]
            .iter()
            .rev()
            .take_while(|t| t.kind == TokenKind::Space)
            .count();
    &tokens[start..end]
}
