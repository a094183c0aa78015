//! # notemark-syntax
//!
//! A parser for markdown-flavored notes, built on a [Logos] tokenizer and a
//! table of small, independent grammar rules.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Architecture Overview
//!
//! The parsing pipeline has three stages:
//!
//! ```text
//! Source Text → Lexer → Tokens → Block Pass → Inline Pass → Document
//!               (Logos)          (rules)      (rules, per block)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! The lexer uses [Logos] to tokenize input into a flat sequence of tokens.
//! Every character becomes part of some token - nothing is discarded.
//!
//! ```text
//! "# Hello\n" → [Hash, Space, Text("Hello"), Newline]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser walks the tokens and, at each position, asks the rules of the
//! [`Registry`] in priority order whether their construct starts there. The
//! block pass works line by line; every block then runs an inline pass over
//! its own tokens. Nested constructs (bold inside a link, a list inside a
//! quote) re-enter the parser, bounded by a depth ceiling.
//!
//! ### 3. Consumers
//!
//! The resulting [`Document`] is a plain owned tree of [`Node`]s:
//!
//! - [`stringify`] turns it back into note source
//! - [`render`] turns it into HTML
//! - [`tags`] collects `#tags`, skipping code
//!
//! ## Module Structure
//!
//! ```text
//! notemark-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── ast.rs           # Node enum, Document, debug tree formatting
//! ├── parser/
//! │   ├── mod.rs       # Rule trait, Parser, dispatch loop, parse()
//! │   ├── registry.rs  # Priority tables and rule selection
//! │   └── grammar/
//! │       ├── mod.rs   # Token helpers shared by rules
//! │       ├── block.rs # Headings, quotes, code blocks, disclosures
//! │       ├── block/   # Lists and tables
//! │       └── inline.rs# Emphasis, links, code spans, tags
//! ├── stringify.rs     # Tree → source
//! ├── render.rs        # Tree → HTML
//! └── tags.rs          # Tag extraction and counting
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use notemark_syntax::{Node, parse};
//!
//! let doc = parse("# Hello #world\n");
//!
//! // Restoring source reproduces the note
//! assert_eq!(doc.stringify(), "# Hello #world\n");
//!
//! // Navigate the tree structure
//! assert!(matches!(doc.children[0], Node::Heading { level: 1, .. }));
//!
//! // Tags are found structurally
//! let tags = notemark_syntax::tags::extract_tags(&doc);
//! assert!(tags.contains("world"));
//! ```
//!
//! ## Guarantees
//!
//! - **Total**: every input parses; anything unrecognized becomes text
//! - **Deterministic**: the same input always gives the same tree
//! - **Stable round trip**: `stringify(parse(stringify(parse(x))))` equals
//!   `stringify(parse(x))`

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod stringify;
pub mod tags;

pub use ast::{Document, ListMarker, Node, format_tree};
pub use parser::registry::{Registry, RegistryError};
pub use parser::{Parser, ParserOptions, Rule, parse};
pub use render::render_html;
pub use stringify::stringify;
