//! Bullet, ordered and task lists.
//!
//! ```text
//! - [ ] item          indent 0, bullet, open task
//!   continuation      deeper indent: re-parsed as blocks inside the item
//!   - nested          ...which is how nested lists come about
//! - item              same indent and marker family: same list
//! ```

use crate::ast::{ListMarker, Node};
use crate::lexer::{Token, TokenKind};
use crate::parser::{Matched, Parser, Rule};

use super::super::{is_single_space, line, nth, run_length, split_line};

/// A list: one or more items of the same indent and marker family.
#[derive(Debug, Clone, Copy)]
pub struct ListRule;

/// The marker line of an item, before continuation lines are attached.
struct ItemHead {
    indent: usize,
    marker: ListMarker,
    task: Option<bool>,
    /// Index of the first content token within the line
    content_start: usize,
}

impl ItemHead {
    fn parse(line: &[Token<'_>]) -> Option<ItemHead> {
        let indent = run_length(line, TokenKind::Space);
        let (marker, marker_len) = match line.get(indent)?.kind {
            TokenKind::Dash => (ListMarker::Bullet('-'), 1),
            TokenKind::Star => (ListMarker::Bullet('*'), 1),
            TokenKind::Plus => (ListMarker::Bullet('+'), 1),
            TokenKind::Text
                if line[indent].text.bytes().all(|b| b.is_ascii_digit())
                    && nth(line, indent + 1) == TokenKind::Dot =>
            {
                (ListMarker::Ordered(line[indent].text.to_string()), 2)
            }
            _ => return None,
        };

        let space = indent + marker_len;
        if !is_single_space(line, space) {
            return None;
        }

        let mut content_start = space + 1;
        let task = task_box(&line[content_start..]);
        if task.is_some() {
            content_start += 4;
        }

        Some(ItemHead {
            indent,
            marker,
            task,
            content_start,
        })
    }
}

/// `[ ] `, `[x] ` or `[X] ` at the start of item content.
fn task_box(tokens: &[Token<'_>]) -> Option<bool> {
    if nth(tokens, 0) != TokenKind::LBracket
        || nth(tokens, 2) != TokenKind::RBracket
        || !is_single_space(tokens, 3)
    {
        return None;
    }
    match tokens[1] {
        Token {
            kind: TokenKind::Space,
            text: " ",
        } => Some(false),
        Token {
            kind: TokenKind::Text,
            text: "x" | "X",
        } => Some(true),
        _ => None,
    }
}

/// Leading indentation of a line, or `None` for blank lines.
fn line_indent(line: &[Token<'_>]) -> Option<usize> {
    let indent = run_length(line, TokenKind::Space);
    (indent < line.len()).then_some(indent)
}

impl ListRule {
    /// Match one item starting at `tokens`; returns the node and the
    /// number of tokens it covers (excluding the newline after it).
    fn item(parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<(Node, usize)> {
        let (first, mut rest) = split_line(tokens);
        let head = ItemHead::parse(first)?;

        let mut children = Vec::new();
        let content = &first[head.content_start..];
        if !content.is_empty() {
            children.push(Node::Paragraph {
                children: parser.inlines(content),
            });
        }

        // Continuation lines: everything indented deeper than the marker.
        // The span starts at the newline ending the marker line so the
        // nested pass sees it as a line break.
        let mut end = first.len();
        while let Some(next) = rest {
            let (line, after) = split_line(next);
            match line_indent(line) {
                Some(indent) if indent > head.indent => {
                    end += 1 + line.len();
                    rest = after;
                }
                _ => break,
            }
        }
        if end > first.len() {
            children.extend(parser.nested_blocks(&tokens[first.len()..end]));
        }

        let node = Node::ListItem {
            indent: head.indent,
            marker: head.marker,
            task: head.task,
            children,
        };
        Some((node, end))
    }
}

impl Rule for ListRule {
    fn name(&self) -> &'static str {
        "list"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let (first, consumed) = Self::item(parser, tokens)?;
        let (indent, marker) = match &first {
            Node::ListItem { indent, marker, .. } => (*indent, marker.clone()),
            _ => return None,
        };

        let mut items = vec![first];
        let mut consumed = consumed;

        // Siblings follow after exactly one newline. Check the marker line
        // before building the item: a non-sibling is left to the dispatcher.
        while nth(tokens, consumed) == TokenKind::Newline {
            let next = &tokens[consumed + 1..];
            let sibling = ItemHead::parse(line(next))
                .is_some_and(|head| head.indent == indent && head.marker.same_family(&marker));
            if !sibling {
                break;
            }
            let Some((item, len)) = Self::item(parser, next) else {
                break;
            };
            items.push(item);
            consumed += 1 + len;
        }

        Some(Matched::new(Node::List { items }, consumed))
    }
}
