//! Pipe tables.
//!
//! ```text
//! | Name  | Done |     header
//! | :---- | :--: |     delimiter
//! | one   | yes  |     one or more body rows
//! ```
//!
//! Every line must start and end with `|` and have the header's cell count.

use crate::ast::{Cell, Node};
use crate::lexer::{Token, TokenKind, join};
use crate::parser::{Matched, Parser, Rule};

use super::super::{split_line, trim};

#[derive(Debug, Clone, Copy)]
pub struct TableRule;

/// Split a `| a | b |` line into trimmed cell token slices.
fn cells<'t, 'a>(line: &'t [Token<'a>]) -> Option<Vec<&'t [Token<'a>]>> {
    let (first, last) = (line.first()?, line.last()?);
    if line.len() < 2 || first.kind != TokenKind::Pipe || last.kind != TokenKind::Pipe {
        return None;
    }
    let inner = &line[1..line.len() - 1];
    Some(
        inner
            .split(|t| t.kind == TokenKind::Pipe)
            .map(trim)
            .collect(),
    )
}

/// Delimiter cells look like `---`, `:--`, `--:` or `:-:`.
fn is_delimiter_cell(text: &str) -> bool {
    let text = text.strip_prefix(':').unwrap_or(text);
    let text = text.strip_suffix(':').unwrap_or(text);
    !text.is_empty() && text.bytes().all(|b| b == b'-')
}

fn parse_row(parser: &Parser<'_>, row: Vec<&[Token<'_>]>) -> Vec<Cell> {
    row.into_iter()
        .map(|cell| parser.nested_inlines(cell))
        .collect()
}

impl Rule for TableRule {
    fn name(&self) -> &'static str {
        "table"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let (header_line, rest) = split_line(tokens);
        let header = cells(header_line)?;

        let (delimiter_line, mut rest) = split_line(rest?);
        let delimiter: Vec<String> = cells(delimiter_line)?.into_iter().map(join).collect();
        if delimiter.len() != header.len() || !delimiter.iter().all(|d| is_delimiter_cell(d)) {
            return None;
        }

        let mut consumed = header_line.len() + 1 + delimiter_line.len();
        let mut rows = Vec::new();
        while let Some(next) = rest {
            let (line, after) = split_line(next);
            match cells(line) {
                Some(row) if row.len() == header.len() => {
                    rows.push(row);
                    consumed += 1 + line.len();
                    rest = after;
                }
                _ => break,
            }
        }
        if rows.is_empty() {
            return None;
        }

        let node = Node::Table {
            header: parse_row(parser, header),
            delimiter,
            rows: rows.into_iter().map(|row| parse_row(parser, row)).collect(),
        };
        Some(Matched::new(node, consumed))
    }
}
