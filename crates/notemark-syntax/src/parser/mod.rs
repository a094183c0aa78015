//! # Parser - Rule Dispatch Over a Token Stream
//!
//! This module turns the flat token stream into a [`Document`]. Parsing is
//! split into two strata:
//!
//! - the **block pass** walks the whole stream line by line and produces
//!   block nodes (paragraphs, headings, lists, ...)
//! - the **inline pass** runs over the tokens of one block and produces
//!   inline nodes (emphasis, code spans, links, tags, ...)
//!
//! ## Rules
//!
//! Every construct is recognized by one [`Rule`]. A rule looks at the tokens
//! starting at the cursor and either fully validates its construct, returning
//! the node and how many tokens it consumed, or returns `None`. Rules never
//! commit partial results.
//!
//! ```text
//! tokens[cursor..] → rule.try_match() → Some(Matched { node, consumed })
//!                                     → None (try the next rule)
//! ```
//!
//! The rules for each stratum live in a fixed priority table (see
//! [`registry`]). The first rule that matches wins. When nothing matches, the
//! inline pass emits the token as literal text and the block pass emits the
//! rest of the line as a paragraph of literal text, so parsing never fails.
//!
//! ## Nesting
//!
//! Rules whose construct contains markup (bold, links, blockquotes, list
//! items, ...) re-enter the parser over their own token sub-span through
//! [`Parser::nested_inlines`] and [`Parser::nested_blocks`]. Each re-entry
//! increments the depth. Once the configured ceiling is reached the sub-span
//! is emitted as literal text instead, which bounds recursion on adversarial
//! input such as thousands of nested quotes.
//!
//! ## Public API
//!
//! ```
//! use notemark_syntax::parse;
//!
//! let doc = parse("# Hello *world*\n");
//! assert_eq!(doc.children.len(), 2); // heading + line break
//! ```

pub mod registry;

mod grammar;

pub use grammar::{block, inline};

use crate::ast::{Document, Node};
use crate::lexer::{Token, TokenKind, join, lex};
use registry::Registry;

/// Default ceiling for nested constructs.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Highest accepted ceiling. Every level is a few stack frames deep, so a
/// larger value would let nested quotes overflow the stack.
pub const MAX_DEPTH_LIMIT: usize = 128;

/// A successful rule match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched {
    pub node: Node,
    /// Number of tokens claimed by `node`; always at least one
    pub consumed: usize,
}

impl Matched {
    pub fn new(node: Node, consumed: usize) -> Self {
        Self { node, consumed }
    }
}

/// A single grammar rule.
///
/// Implementations are stateless unit structs collected in the static
/// priority tables of [`registry`].
pub trait Rule: Send + Sync {
    /// Stable identifier, used in configuration and diagnostics.
    fn name(&self) -> &'static str;

    /// Try to match this rule's construct at the start of `tokens`.
    ///
    /// Must either return a node covering at least one token or `None`.
    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched>;
}

/// Which stratum a dispatch loop runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Block,
    Inline,
}

/// Runtime options for a [`Parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum nesting depth before content is emitted as literal text
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The parser: a rule registry plus the current nesting depth.
///
/// Cheap to copy; nested passes work on a copy with `depth + 1`.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'r> {
    registry: &'r Registry,
    depth: usize,
    max_depth: usize,
}

impl<'r> Parser<'r> {
    /// Create a parser at depth zero.
    ///
    /// `options.max_depth` is capped at [`MAX_DEPTH_LIMIT`].
    pub fn new(registry: &'r Registry, options: ParserOptions) -> Self {
        if options.max_depth > MAX_DEPTH_LIMIT {
            log::warn!("max_depth {} capped at {MAX_DEPTH_LIMIT}", options.max_depth);
        }
        Self {
            registry,
            depth: 0,
            max_depth: options.max_depth.min(MAX_DEPTH_LIMIT),
        }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Parse a whole note.
    pub fn parse(&self, source: &str) -> Document {
        let tokens = lex(source);
        Document {
            children: self.blocks(&tokens),
        }
    }

    /// Run the block pass over `tokens` at the current depth.
    pub fn blocks(&self, tokens: &[Token<'_>]) -> Vec<Node> {
        self.dispatch(Level::Block, tokens)
    }

    /// Run the inline pass over `tokens` at the current depth.
    pub fn inlines(&self, tokens: &[Token<'_>]) -> Vec<Node> {
        self.dispatch(Level::Inline, tokens)
    }

    /// Run the block pass one level deeper, or emit literal text once the
    /// depth ceiling is reached.
    pub fn nested_blocks(&self, tokens: &[Token<'_>]) -> Vec<Node> {
        match self.descend() {
            Some(nested) => nested.blocks(tokens),
            None if tokens.is_empty() => Vec::new(),
            None => vec![Node::Paragraph {
                children: vec![Node::text(join(tokens))],
            }],
        }
    }

    /// Run the inline pass one level deeper, or emit literal text once the
    /// depth ceiling is reached.
    pub fn nested_inlines(&self, tokens: &[Token<'_>]) -> Vec<Node> {
        match self.descend() {
            Some(nested) => nested.inlines(tokens),
            None if tokens.is_empty() => Vec::new(),
            None => vec![Node::text(join(tokens))],
        }
    }

    fn descend(&self) -> Option<Parser<'r>> {
        if self.depth >= self.max_depth {
            log::debug!(
                "nesting depth {} reached, emitting literal text",
                self.max_depth
            );
            return None;
        }
        Some(Parser {
            depth: self.depth + 1,
            ..*self
        })
    }

    fn dispatch(&self, level: Level, tokens: &[Token<'_>]) -> Vec<Node> {
        let rules = match level {
            Level::Block => self.registry.block_rules(),
            Level::Inline => self.registry.inline_rules(),
        };

        let mut nodes = Vec::new();
        let mut pos = 0;

        while pos < tokens.len() {
            let rest = &tokens[pos..];
            let matched = rules.iter().find_map(|rule| {
                let m = rule.try_match(self, rest)?;
                debug_assert!(
                    m.consumed > 0,
                    "rule `{}` matched without consuming tokens",
                    rule.name()
                );
                debug_assert!(
                    m.consumed <= rest.len(),
                    "rule `{}` consumed past the end of its input",
                    rule.name()
                );
                (m.consumed > 0 && m.consumed <= rest.len()).then_some(m)
            });

            match matched {
                Some(Matched { node, consumed }) => {
                    nodes.push(node);
                    pos += consumed;
                }
                None => {
                    let consumed = fallback(level, rest, &mut nodes);
                    pos += consumed;
                }
            }
        }

        nodes
    }
}

/// Emit literal content when no rule matches; returns tokens consumed.
fn fallback(level: Level, tokens: &[Token<'_>], nodes: &mut Vec<Node>) -> usize {
    match level {
        Level::Inline => {
            let text = tokens[0].text;
            match nodes.last_mut() {
                Some(Node::Text { content }) => content.push_str(text),
                _ => nodes.push(Node::text(text)),
            }
            1
        }
        Level::Block => {
            if tokens[0].kind == TokenKind::Newline {
                nodes.push(Node::LineBreak);
                return 1;
            }
            let line = grammar::line(tokens);
            nodes.push(Node::Paragraph {
                children: vec![Node::text(join(line))],
            });
            line.len()
        }
    }
}

/// Parse markdown source with the standard rule set and default options.
pub fn parse(source: &str) -> Document {
    let registry = Registry::standard();
    Parser::new(&registry, ParserOptions::default()).parse(source)
}
