//! Turning a tree back into note source.
//!
//! Restoration is depth-first and reproduces the parsed source exactly,
//! except for a few normalizations that re-parse to the same tree:
//!
//! - line breaks are written as `\n`, also the ones framing a code block body
//! - list indentation is written as spaces, and `[X]` as `[x]`
//! - table rows are written as `| a | b |`
//!
//! So `stringify(parse(stringify(parse(x))))` always equals
//! `stringify(parse(x))`.

use crate::ast::{Cell, Document, Node};

/// Restore source text for a sequence of sibling nodes.
pub fn stringify(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(nodes, &mut out);
    out
}

impl Document {
    /// Restore source text for the whole document.
    pub fn stringify(&self) -> String {
        stringify(&self.children)
    }
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        write_node(node, out);
    }
}

fn write_wrapped(delimiter: &str, children: &[Node], out: &mut String) {
    out.push_str(delimiter);
    write_nodes(children, out);
    out.push_str(delimiter);
}

fn write_row(cells: &[String], out: &mut String) {
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |");
}

fn cell_texts(cells: &[Cell]) -> Vec<String> {
    cells.iter().map(|cell| stringify(cell)).collect()
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Paragraph { children } => write_nodes(children, out),
        Node::Heading { level, children } => {
            out.push_str(&"#".repeat(usize::from(*level)));
            out.push(' ');
            write_nodes(children, out);
        }
        Node::CodeBlock { language, content } => {
            out.push_str("```");
            out.push_str(language);
            out.push('\n');
            out.push_str(content);
            out.push_str("\n```");
        }
        Node::List { items } => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                write_node(item, out);
            }
        }
        Node::ListItem {
            indent,
            marker,
            task,
            children,
        } => {
            out.push_str(&" ".repeat(*indent));
            out.push_str(&marker.as_source());
            out.push(' ');
            match task {
                Some(true) => out.push_str("[x] "),
                Some(false) => out.push_str("[ ] "),
                None => {}
            }
            write_nodes(children, out);
        }
        Node::Blockquote { children } => {
            out.push_str("> ");
            out.push_str(&stringify(children).replace('\n', "\n> "));
        }
        Node::ThematicBreak { symbol } => {
            for _ in 0..3 {
                out.push(*symbol);
            }
        }
        Node::Table {
            header,
            delimiter,
            rows,
        } => {
            write_row(&cell_texts(header), out);
            out.push('\n');
            write_row(delimiter, out);
            for row in rows {
                out.push('\n');
                write_row(&cell_texts(row), out);
            }
        }
        Node::LineBreak => out.push('\n'),
        Node::Disclosure { title, children } => {
            out.push_str("%%%");
            out.push_str(title);
            out.push('\n');
            write_nodes(children, out);
            out.push_str("\n%%%");
        }

        Node::Text { content } => out.push_str(content),
        Node::Code { content } => {
            out.push('`');
            out.push_str(content);
            out.push('`');
        }
        Node::Bold { symbol, children } => {
            write_wrapped(&symbol.to_string().repeat(2), children, out)
        }
        Node::Italic { symbol, children } => write_wrapped(&symbol.to_string(), children, out),
        Node::BoldItalic { symbol, children } => {
            write_wrapped(&symbol.to_string().repeat(3), children, out)
        }
        Node::Strikethrough { children } => write_wrapped("~~", children, out),
        Node::Highlight { children } => write_wrapped("==", children, out),
        Node::Superscript { children } => write_wrapped("^", children, out),
        Node::Subscript { children } => write_wrapped("~", children, out),
        Node::Spoiler { children } => write_wrapped("||", children, out),
        Node::Link { url, children } => {
            out.push('[');
            write_nodes(children, out);
            out.push_str("](");
            out.push_str(url);
            out.push(')');
        }
        Node::Image { alt, url } => {
            out.push_str("![");
            out.push_str(alt);
            out.push_str("](");
            out.push_str(url);
            out.push(')');
        }
        Node::AutoLink { url, bracketed } => {
            if *bracketed {
                out.push('<');
                out.push_str(url);
                out.push('>');
            } else {
                out.push_str(url);
            }
        }
        Node::Tag { name } => {
            out.push('#');
            out.push_str(name);
        }
        Node::Escape { symbol } => {
            out.push('\\');
            out.push_str(symbol);
        }
    }
}
