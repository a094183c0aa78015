//! AST node model for parsed notes.
//!
//! The node set is closed: every construct the grammar recognizes has one
//! variant here. Leaves (`Text`, `Code`, `Tag`, ...) own their literal
//! content; containers own an ordered `children` vector. Ownership is
//! strictly tree-shaped, so a [`Document`] can be cloned, compared and sent
//! across threads without any reference counting.

use serde::Serialize;

/// The inline content of one table cell.
pub type Cell = Vec<Node>;

/// A list item marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMarker {
    /// `-`, `*` or `+`
    Bullet(char),
    /// Digits followed by `.`; the digits are kept verbatim (`01.` stays `01`)
    Ordered(String),
}

impl ListMarker {
    /// Items with markers of the same family belong to the same list.
    pub fn same_family(&self, other: &ListMarker) -> bool {
        match (self, other) {
            (ListMarker::Bullet(a), ListMarker::Bullet(b)) => a == b,
            (ListMarker::Ordered(_), ListMarker::Ordered(_)) => true,
            _ => false,
        }
    }

    /// Source text of the marker, without the following space.
    pub fn as_source(&self) -> String {
        match self {
            ListMarker::Bullet(c) => c.to_string(),
            ListMarker::Ordered(number) => format!("{number}."),
        }
    }
}

/// A node in the note AST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    // === Block nodes ===
    /// A single line of inline content
    Paragraph { children: Vec<Node> },
    /// ATX heading, `level` is 1 to 6
    Heading { level: u8, children: Vec<Node> },
    /// Fenced code block. A raw zone: `content` is never re-parsed.
    CodeBlock { language: String, content: String },
    /// Consecutive list items of the same marker family and indent.
    /// `items` holds only [`Node::ListItem`] nodes.
    List { items: Vec<Node> },
    /// One list item. The first child is the paragraph on the marker line,
    /// followed by blocks parsed from deeper-indented continuation lines.
    ListItem {
        indent: usize,
        marker: ListMarker,
        /// `Some(checked)` for task items (`- [ ]` / `- [x]`)
        task: Option<bool>,
        children: Vec<Node>,
    },
    /// `> ` quoted lines, re-parsed as blocks
    Blockquote { children: Vec<Node> },
    /// `---`, `***` or `___`
    ThematicBreak { symbol: char },
    Table {
        header: Vec<Cell>,
        /// Trimmed delimiter cells such as `---` or `:-:`
        delimiter: Vec<String>,
        rows: Vec<Vec<Cell>>,
    },
    /// A newline between two blocks
    LineBreak,
    /// `%%%title` ... `%%%`: a collapsible section whose body is re-parsed
    /// as blocks
    Disclosure { title: String, children: Vec<Node> },

    // === Inline nodes ===
    Text { content: String },
    /// Inline code span. A raw zone: `content` is never re-parsed.
    Code { content: String },
    Bold { symbol: char, children: Vec<Node> },
    Italic { symbol: char, children: Vec<Node> },
    BoldItalic { symbol: char, children: Vec<Node> },
    Strikethrough { children: Vec<Node> },
    Highlight { children: Vec<Node> },
    Superscript { children: Vec<Node> },
    Subscript { children: Vec<Node> },
    /// `||hidden||`
    Spoiler { children: Vec<Node> },
    Link { url: String, children: Vec<Node> },
    Image { alt: String, url: String },
    /// `<https://...>` when `bracketed`, otherwise a bare URL
    AutoLink { url: String, bracketed: bool },
    /// `#name`; `name` excludes the hash
    Tag { name: String },
    /// A backslash-escaped punctuation mark; `symbol` excludes the backslash
    Escape { symbol: String },
}

impl Node {
    /// Shorthand for a [`Node::Text`] leaf.
    pub fn text(content: impl Into<String>) -> Node {
        Node::Text {
            content: content.into(),
        }
    }

    /// Returns true for block-level variants.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Node::Paragraph { .. }
                | Node::Heading { .. }
                | Node::CodeBlock { .. }
                | Node::List { .. }
                | Node::ListItem { .. }
                | Node::Blockquote { .. }
                | Node::ThematicBreak { .. }
                | Node::Table { .. }
                | Node::LineBreak
                | Node::Disclosure { .. }
        )
    }

    /// Returns true for inline-level variants.
    pub fn is_inline(&self) -> bool {
        !self.is_block()
    }

    /// Direct children of a container node.
    ///
    /// Leaves return an empty slice. Table cells are not children in this
    /// sense; use [`Node::visit`] to reach them.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Paragraph { children }
            | Node::Heading { children, .. }
            | Node::ListItem { children, .. }
            | Node::Blockquote { children }
            | Node::Bold { children, .. }
            | Node::Italic { children, .. }
            | Node::BoldItalic { children, .. }
            | Node::Strikethrough { children }
            | Node::Highlight { children }
            | Node::Superscript { children }
            | Node::Subscript { children }
            | Node::Spoiler { children }
            | Node::Disclosure { children, .. }
            | Node::Link { children, .. } => children,
            Node::List { items } => items,
            Node::CodeBlock { .. }
            | Node::ThematicBreak { .. }
            | Node::Table { .. }
            | Node::LineBreak
            | Node::Text { .. }
            | Node::Code { .. }
            | Node::Image { .. }
            | Node::AutoLink { .. }
            | Node::Tag { .. }
            | Node::Escape { .. } => &[],
        }
    }

    /// Pre-order walk over this node and all of its descendants,
    /// including table cells.
    pub fn visit<F: FnMut(&Node)>(&self, f: &mut F) {
        f(self);
        if let Node::Table { header, rows, .. } = self {
            for cell in header.iter().chain(rows.iter().flatten()) {
                for node in cell {
                    node.visit(f);
                }
            }
        }
        for child in self.children() {
            child.visit(f);
        }
    }
}

/// The root of a parsed note. Its children are block nodes only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    /// Pre-order walk over every node in the document.
    pub fn visit<F: FnMut(&Node)>(&self, mut f: F) {
        for node in &self.children {
            node.visit(&mut f);
        }
    }
}

/// Format nodes as an indented, one-node-per-line tree.
///
/// Used by the CLI's `parse` command and by snapshot tests.
pub fn format_tree(nodes: &[Node]) -> String {
    let mut result = String::new();
    for node in nodes {
        format_node(node, 0, &mut result);
    }
    result
}

fn format_node(node: &Node, indent: usize, result: &mut String) {
    let prefix = "  ".repeat(indent);
    let label = match node {
        Node::Paragraph { .. } => "Paragraph".to_string(),
        Node::Heading { level, .. } => format!("Heading {level}"),
        Node::CodeBlock { language, content } => format!("CodeBlock {language:?} {content:?}"),
        Node::List { .. } => "List".to_string(),
        Node::ListItem {
            indent,
            marker,
            task,
            ..
        } => {
            let task = match task {
                Some(true) => " [x]",
                Some(false) => " [ ]",
                None => "",
            };
            format!("ListItem {:?}{task} indent={indent}", marker.as_source())
        }
        Node::Blockquote { .. } => "Blockquote".to_string(),
        Node::ThematicBreak { symbol } => format!("ThematicBreak {symbol:?}"),
        Node::Table { delimiter, .. } => format!("Table {delimiter:?}"),
        Node::LineBreak => "LineBreak".to_string(),
        Node::Disclosure { title, .. } => format!("Disclosure {title:?}"),
        Node::Text { content } => format!("Text {content:?}"),
        Node::Code { content } => format!("Code {content:?}"),
        Node::Bold { symbol, .. } => format!("Bold {symbol:?}"),
        Node::Italic { symbol, .. } => format!("Italic {symbol:?}"),
        Node::BoldItalic { symbol, .. } => format!("BoldItalic {symbol:?}"),
        Node::Strikethrough { .. } => "Strikethrough".to_string(),
        Node::Highlight { .. } => "Highlight".to_string(),
        Node::Superscript { .. } => "Superscript".to_string(),
        Node::Subscript { .. } => "Subscript".to_string(),
        Node::Spoiler { .. } => "Spoiler".to_string(),
        Node::Link { url, .. } => format!("Link {url:?}"),
        Node::Image { alt, url } => format!("Image {alt:?} {url:?}"),
        Node::AutoLink { url, bracketed } => format!("AutoLink {url:?} bracketed={bracketed}"),
        Node::Tag { name } => format!("Tag {name:?}"),
        Node::Escape { symbol } => format!("Escape {symbol:?}"),
    };
    result.push_str(&format!("{prefix}{label}\n"));

    if let Node::Table { header, rows, .. } = node {
        let cell_prefix = "  ".repeat(indent + 1);
        for (name, row) in std::iter::once(("Header", header)).chain(rows.iter().map(|r| ("Row", r))) {
            result.push_str(&format!("{cell_prefix}{name}\n"));
            for cell in row {
                result.push_str(&format!("{cell_prefix}  Cell\n"));
                for child in cell {
                    format_node(child, indent + 3, result);
                }
            }
        }
    }
    for child in node.children() {
        format_node(child, indent + 1, result);
    }
}
