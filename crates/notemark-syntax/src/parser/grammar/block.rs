//! Block-level grammar rules.
//!
//! Block rules run at line starts only and never consume the newline that
//! ends their last line. The newline is picked up by [`LineBreakRule`], so
//! blank lines survive as consecutive `LineBreak` nodes.

mod list;
mod table;

pub use list::ListRule;
pub use table::TableRule;

use crate::ast::Node;
use crate::lexer::{Token, TokenKind, join};
use crate::parser::{Matched, Parser, Rule};

use super::{is_single_space, line, nth, run_length, split_line};

const FENCE_WIDTH: usize = 3;
const MAX_HEADING_LEVEL: usize = 6;

/// Fenced code block: ```` ```lang ````, body, ```` ``` ````.
///
/// The body is a raw zone and is stored verbatim.
#[derive(Debug, Clone, Copy)]
pub struct CodeBlockRule;

impl CodeBlockRule {
    /// Exactly three backticks followed by newline or end of input.
    fn is_closing_fence(tokens: &[Token<'_>]) -> bool {
        run_length(tokens, TokenKind::Backtick) == FENCE_WIDTH
            && matches!(nth(tokens, FENCE_WIDTH), TokenKind::Newline | TokenKind::Eof)
    }
}

impl Rule for CodeBlockRule {
    fn name(&self) -> &'static str {
        "code_block"
    }

    fn try_match(&self, _parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        if run_length(tokens, TokenKind::Backtick) != FENCE_WIDTH {
            return None;
        }

        let (first, _) = split_line(tokens);
        let language = &first[FENCE_WIDTH..];
        if language.iter().any(|t| t.kind == TokenKind::Backtick) {
            return None;
        }

        // Index of the newline closing the opening fence line
        let open_newline = first.len();
        if nth(tokens, open_newline) != TokenKind::Newline {
            return None;
        }

        // The closing fence needs its own newline in front, so the search
        // starts after the opening one
        let close_newline = (open_newline + 1..tokens.len()).find(|&i| {
            tokens[i].kind == TokenKind::Newline && Self::is_closing_fence(&tokens[i + 1..])
        })?;

        let node = Node::CodeBlock {
            language: join(language),
            content: join(&tokens[open_newline + 1..close_newline]),
        };
        Some(Matched::new(node, close_newline + 1 + FENCE_WIDTH))
    }
}

/// Collapsible section: `%%%title`, body, `%%%`.
///
/// Unlike a code block, the body is parsed again as blocks one level deeper.
/// The first line that is exactly `%%%` closes the section.
#[derive(Debug, Clone, Copy)]
pub struct DisclosureRule;

impl DisclosureRule {
    fn is_closing_line(tokens: &[Token<'_>]) -> bool {
        run_length(tokens, TokenKind::Percent) == FENCE_WIDTH
            && matches!(nth(tokens, FENCE_WIDTH), TokenKind::Newline | TokenKind::Eof)
    }
}

impl Rule for DisclosureRule {
    fn name(&self) -> &'static str {
        "disclosure"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        if run_length(tokens, TokenKind::Percent) != FENCE_WIDTH {
            return None;
        }

        let (first, _) = split_line(tokens);
        let title = &first[FENCE_WIDTH..];
        if title.is_empty() {
            return None;
        }

        let open_newline = first.len();
        if nth(tokens, open_newline) != TokenKind::Newline {
            return None;
        }
        let close_newline = (open_newline + 1..tokens.len()).find(|&i| {
            tokens[i].kind == TokenKind::Newline && Self::is_closing_line(&tokens[i + 1..])
        })?;

        let node = Node::Disclosure {
            title: join(title),
            children: parser.nested_blocks(&tokens[open_newline + 1..close_newline]),
        };
        Some(Matched::new(node, close_newline + 1 + FENCE_WIDTH))
    }
}

/// `---`, `***` or `___` alone on a line.
#[derive(Debug, Clone, Copy)]
pub struct ThematicBreakRule;

impl Rule for ThematicBreakRule {
    fn name(&self) -> &'static str {
        "thematic_break"
    }

    fn try_match(&self, _parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let line = line(tokens);
        let first = line.first()?;
        let symbol = match first.kind {
            TokenKind::Dash => '-',
            TokenKind::Star => '*',
            TokenKind::Underscore => '_',
            _ => return None,
        };
        if line.len() != 3 || run_length(line, first.kind) != 3 {
            return None;
        }
        Some(Matched::new(Node::ThematicBreak { symbol }, 3))
    }
}

/// ATX heading: one to six `#`, one space, non-empty content.
#[derive(Debug, Clone, Copy)]
pub struct HeadingRule;

impl Rule for HeadingRule {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let line = line(tokens);
        let level = run_length(line, TokenKind::Hash);
        if !(1..=MAX_HEADING_LEVEL).contains(&level) || !is_single_space(line, level) {
            return None;
        }

        let content = &line[level + 1..];
        if content.is_empty() {
            return None;
        }

        let node = Node::Heading {
            level: level as u8,
            children: parser.inlines(content),
        };
        Some(Matched::new(node, line.len()))
    }
}

/// Consecutive lines starting with `> `.
///
/// The quoted lines, minus their prefix and joined by their original
/// newlines, are parsed again as blocks one level deeper.
#[derive(Debug, Clone, Copy)]
pub struct BlockquoteRule;

impl BlockquoteRule {
    fn is_quote_line(line: &[Token<'_>]) -> bool {
        nth(line, 0) == TokenKind::Gt && is_single_space(line, 1)
    }
}

impl Rule for BlockquoteRule {
    fn name(&self) -> &'static str {
        "blockquote"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let mut inner = Vec::new();
        let mut consumed = 0;
        let mut rest = tokens;

        loop {
            let (line, next) = split_line(rest);
            if !Self::is_quote_line(line) {
                break;
            }
            if consumed > 0 {
                // The newline between this line and the previous one
                inner.push(tokens[consumed]);
                consumed += 1;
            }
            inner.extend_from_slice(&line[2..]);
            consumed += line.len();

            match next {
                Some(next) => rest = next,
                None => break,
            }
        }

        if consumed == 0 {
            return None;
        }

        let node = Node::Blockquote {
            children: parser.nested_blocks(&inner),
        };
        Some(Matched::new(node, consumed))
    }
}

/// A single newline token.
#[derive(Debug, Clone, Copy)]
pub struct LineBreakRule;

impl Rule for LineBreakRule {
    fn name(&self) -> &'static str {
        "line_break"
    }

    fn try_match(&self, _parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        (nth(tokens, 0) == TokenKind::Newline).then(|| Matched::new(Node::LineBreak, 1))
    }
}

/// The rest of a non-empty line, parsed as inline content.
#[derive(Debug, Clone, Copy)]
pub struct ParagraphRule;

impl Rule for ParagraphRule {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let line = line(tokens);
        if line.is_empty() {
            return None;
        }
        let node = Node::Paragraph {
            children: parser.inlines(line),
        };
        Some(Matched::new(node, line.len()))
    }
}
