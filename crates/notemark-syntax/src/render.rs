//! HTML rendering.
//!
//! A read-only walk over the tree. Text and attribute values go through
//! [`html_escape`], so markup inside notes is never passed through raw.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::ast::{Document, ListMarker, Node};

/// Render a document as an HTML fragment.
pub fn render_html(doc: &Document) -> String {
    let mut out = String::new();
    render_blocks(&doc.children, &mut out);
    out
}

fn render_blocks(nodes: &[Node], out: &mut String) {
    let mut after_break = true;
    for node in nodes {
        if let Node::LineBreak = node {
            // A newline ending a block separates; any further one is a blank line
            out.push_str(if after_break { "<br>\n" } else { "\n" });
            after_break = true;
        } else {
            render_node(node, out);
            after_break = false;
        }
    }
}

fn render_inlines(nodes: &[Node], out: &mut String) {
    for node in nodes {
        render_node(node, out);
    }
}

fn wrap(tag: &str, children: &[Node], out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    render_inlines(children, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// `text-align` for a table column, from its delimiter cell.
fn alignment(delimiter: &str) -> Option<&'static str> {
    match (delimiter.starts_with(':'), delimiter.ends_with(':')) {
        (true, true) => Some("center"),
        (false, true) => Some("right"),
        (true, false) => Some("left"),
        (false, false) => None,
    }
}

fn render_row(cell_tag: &str, cells: &[Vec<Node>], delimiter: &[String], out: &mut String) {
    out.push_str("<tr>");
    for (i, cell) in cells.iter().enumerate() {
        out.push('<');
        out.push_str(cell_tag);
        if let Some(align) = delimiter.get(i).and_then(|d| alignment(d)) {
            out.push_str(" style=\"text-align: ");
            out.push_str(align);
            out.push('"');
        }
        out.push('>');
        render_inlines(cell, out);
        out.push_str("</");
        out.push_str(cell_tag);
        out.push('>');
    }
    out.push_str("</tr>");
}

fn render_list_item(task: Option<bool>, children: &[Node], out: &mut String) {
    out.push_str("<li>");
    match task {
        Some(true) => out.push_str("<input type=\"checkbox\" disabled checked> "),
        Some(false) => out.push_str("<input type=\"checkbox\" disabled> "),
        None => {}
    }
    for child in children {
        match child {
            // Tight lists: item text is not wrapped in <p>
            Node::Paragraph { children } => render_inlines(children, out),
            Node::LineBreak => {}
            other => render_node(other, out),
        }
    }
    out.push_str("</li>");
}

fn render_node(node: &Node, out: &mut String) {
    match node {
        Node::Paragraph { children } => wrap("p", children, out),
        Node::Heading { level, children } => wrap(&format!("h{level}"), children, out),
        Node::CodeBlock { language, content } => {
            out.push_str("<pre><code");
            let language = language.trim();
            if !language.is_empty() {
                out.push_str(" class=\"language-");
                out.push_str(&encode_double_quoted_attribute(language));
                out.push('"');
            }
            out.push('>');
            out.push_str(&encode_text(content));
            out.push_str("</code></pre>");
        }
        Node::List { items } => {
            let tag = match items.first() {
                Some(Node::ListItem {
                    marker: ListMarker::Ordered(_),
                    ..
                }) => "ol",
                _ => "ul",
            };
            out.push_str(&format!("<{tag}>"));
            for item in items {
                render_node(item, out);
            }
            out.push_str(&format!("</{tag}>"));
        }
        Node::ListItem { task, children, .. } => render_list_item(*task, children, out),
        Node::Blockquote { children } => {
            out.push_str("<blockquote>");
            render_blocks(children, out);
            out.push_str("</blockquote>");
        }
        Node::ThematicBreak { .. } => out.push_str("<hr>"),
        Node::Table {
            header,
            delimiter,
            rows,
        } => {
            out.push_str("<table><thead>");
            render_row("th", header, delimiter, out);
            out.push_str("</thead><tbody>");
            for row in rows {
                render_row("td", row, delimiter, out);
            }
            out.push_str("</tbody></table>");
        }
        Node::LineBreak => out.push_str("<br>"),
        Node::Disclosure { title, children } => {
            out.push_str("<details><summary>");
            out.push_str(&encode_text(title));
            out.push_str("</summary>");
            render_blocks(children, out);
            out.push_str("</details>");
        }

        Node::Text { content } => out.push_str(&encode_text(content)),
        Node::Code { content } => {
            out.push_str("<code>");
            out.push_str(&encode_text(content));
            out.push_str("</code>");
        }
        Node::Bold { children, .. } => wrap("strong", children, out),
        Node::Italic { children, .. } => wrap("em", children, out),
        Node::BoldItalic { children, .. } => {
            out.push_str("<strong>");
            wrap("em", children, out);
            out.push_str("</strong>");
        }
        Node::Strikethrough { children } => wrap("del", children, out),
        Node::Highlight { children } => wrap("mark", children, out),
        Node::Superscript { children } => wrap("sup", children, out),
        Node::Subscript { children } => wrap("sub", children, out),
        Node::Spoiler { children } => {
            out.push_str("<span class=\"spoiler\">");
            render_inlines(children, out);
            out.push_str("</span>");
        }
        Node::Link { url, children } => {
            out.push_str("<a href=\"");
            out.push_str(&encode_double_quoted_attribute(url));
            out.push_str("\">");
            render_inlines(children, out);
            out.push_str("</a>");
        }
        Node::Image { alt, url } => {
            out.push_str("<img src=\"");
            out.push_str(&encode_double_quoted_attribute(url));
            out.push_str("\" alt=\"");
            out.push_str(&encode_double_quoted_attribute(alt));
            out.push_str("\">");
        }
        Node::AutoLink { url, .. } => {
            out.push_str("<a href=\"");
            out.push_str(&encode_double_quoted_attribute(url));
            out.push_str("\">");
            out.push_str(&encode_text(url));
            out.push_str("</a>");
        }
        Node::Tag { name } => {
            out.push_str("<span class=\"tag\">#");
            out.push_str(&encode_text(name));
            out.push_str("</span>");
        }
        Node::Escape { symbol } => out.push_str(&encode_text(symbol)),
    }
}
