//! # Inline-Level Grammar
//!
//! Inline elements are the formatting within a block: links, emphasis, code
//! spans, tags. Unlike blocks, inline rules are driven by **special
//! characters** rather than line-start patterns, and all of them are
//! single-line: a `Newline` inside a candidate span is a no-match.
//!
//! ## Dispatch Order
//!
//! | Token | Tried as |
//! |-------|----------|
//! | `\` | Escape |
//! | `` ` `` | Code span |
//! | `!` | Image |
//! | `[` | Link |
//! | `<`, `http…` | Autolink |
//! | `*` `_` | Bold-italic, bold, italic |
//! | `~` | Strikethrough, subscript |
//! | `=` | Highlight |
//! | `^` | Superscript |
//! | `#` | Tag |
//! | (other) | Plain text |
//!
//! The order is the priority table in [`registry`](crate::parser::registry),
//! so `***x***` is tried as bold-italic before bold, and `~~x~~` as
//! strikethrough before subscript.
//!
//! ## Delimited Spans
//!
//! Emphasis-like constructs share one matching strategy: the opener is an
//! exact run of the delimiter, the closer is the first later run of exactly
//! the same width, and the content between them must be non-empty and must
//! not start or end with whitespace. Runs of other widths are part of the
//! content, which is parsed again one level deeper.
//!
//! ## Error Tolerance
//!
//! Nothing here fails. An unclosed `*`, `[text]` without `(url)` or a lone
//! backtick simply doesn't match and ends up as plain text.

use crate::ast::Node;
use crate::lexer::{Token, TokenKind, join};
use crate::parser::{Matched, Parser, Rule};

use super::{nth, run_length};

const URL_SCHEMES: [&str; 2] = ["https://", "http://"];

/// `\` followed by a punctuation mark.
#[derive(Debug, Clone, Copy)]
pub struct EscapeRule;

impl Rule for EscapeRule {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn try_match(&self, _parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        if nth(tokens, 0) != TokenKind::Backslash || !nth(tokens, 1).is_punctuation() {
            return None;
        }
        let node = Node::Escape {
            symbol: tokens[1].text.to_string(),
        };
        Some(Matched::new(node, 2))
    }
}

/// Code span: `` `code` ``.
///
/// Content runs to the next backtick on the same line and is kept verbatim.
#[derive(Debug, Clone, Copy)]
pub struct CodeRule;

impl Rule for CodeRule {
    fn name(&self) -> &'static str {
        "code"
    }

    fn try_match(&self, _parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        if nth(tokens, 0) != TokenKind::Backtick {
            return None;
        }
        let close = tokens
            .iter()
            .skip(1)
            .position(|t| matches!(t.kind, TokenKind::Backtick | TokenKind::Newline))?
            + 1;
        if tokens[close].kind == TokenKind::Newline || close == 1 {
            return None;
        }
        let node = Node::Code {
            content: join(&tokens[1..close]),
        };
        Some(Matched::new(node, close + 1))
    }
}

/// `[label](url)` starting at `tokens[0] == [`.
///
/// Returns the label tokens, the url and the total token count.
fn bracket_target<'t, 'a>(tokens: &'t [Token<'a>]) -> Option<(&'t [Token<'a>], String, usize)> {
    if nth(tokens, 0) != TokenKind::LBracket {
        return None;
    }
    let label_end = tokens
        .iter()
        .position(|t| matches!(t.kind, TokenKind::RBracket | TokenKind::Newline))?;
    if tokens[label_end].kind != TokenKind::RBracket
        || nth(tokens, label_end + 1) != TokenKind::LParen
    {
        return None;
    }

    let url_start = label_end + 2;
    let url_len = tokens[url_start..]
        .iter()
        .position(|t| t.kind == TokenKind::RParen || t.is_whitespace())?;
    let url = &tokens[url_start..url_start + url_len];
    if url.is_empty() || tokens[url_start + url_len].kind != TokenKind::RParen {
        return None;
    }

    Some((&tokens[1..label_end], join(url), url_start + url_len + 1))
}

/// Image: `![alt](url)`. The alt text is literal.
#[derive(Debug, Clone, Copy)]
pub struct ImageRule;

impl Rule for ImageRule {
    fn name(&self) -> &'static str {
        "image"
    }

    fn try_match(&self, _parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        if nth(tokens, 0) != TokenKind::Bang {
            return None;
        }
        let (alt, url, len) = bracket_target(&tokens[1..])?;
        let node = Node::Image {
            alt: join(alt),
            url,
        };
        Some(Matched::new(node, len + 1))
    }
}

/// Link: `[text](url)`. The text is parsed as inline content.
#[derive(Debug, Clone, Copy)]
pub struct LinkRule;

impl Rule for LinkRule {
    fn name(&self) -> &'static str {
        "link"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let (label, url, len) = bracket_target(tokens)?;
        let node = Node::Link {
            url,
            children: parser.nested_inlines(label),
        };
        Some(Matched::new(node, len))
    }
}

/// True if `url` is an http(s) URL with something after the scheme.
fn is_web_url(url: &str) -> bool {
    URL_SCHEMES
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme))
}

/// Autolink: `<https://...>` or a bare `https://...` word.
#[derive(Debug, Clone, Copy)]
pub struct AutoLinkRule;

impl AutoLinkRule {
    fn bracketed(tokens: &[Token<'_>]) -> Option<Matched> {
        let close = tokens
            .iter()
            .skip(1)
            .position(|t| t.kind == TokenKind::Gt || t.is_whitespace())?
            + 1;
        if tokens[close].kind != TokenKind::Gt {
            return None;
        }
        let url = join(&tokens[1..close]);
        if !is_web_url(&url) {
            return None;
        }
        let node = Node::AutoLink {
            url,
            bracketed: true,
        };
        Some(Matched::new(node, close + 1))
    }

    fn bare(tokens: &[Token<'_>]) -> Option<Matched> {
        if !URL_SCHEMES.iter().any(|s| tokens[0].text.starts_with(s)) {
            return None;
        }
        let len = tokens
            .iter()
            .take_while(|t| {
                !t.is_whitespace()
                    && !matches!(t.kind, TokenKind::Lt | TokenKind::Gt | TokenKind::Backtick)
            })
            .count();
        let url = join(&tokens[..len]);
        if !is_web_url(&url) {
            return None;
        }
        let node = Node::AutoLink {
            url,
            bracketed: false,
        };
        Some(Matched::new(node, len))
    }
}

impl Rule for AutoLinkRule {
    fn name(&self) -> &'static str {
        "auto_link"
    }

    fn try_match(&self, _parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        match nth(tokens, 0) {
            TokenKind::Lt => Self::bracketed(tokens),
            TokenKind::Text => Self::bare(tokens),
            _ => None,
        }
    }
}

/// Match `delim content delim` where `delim` is exactly `width` tokens of
/// `kind`. Returns the nested content nodes and the tokens consumed.
fn delimited(
    parser: &Parser<'_>,
    tokens: &[Token<'_>],
    kind: TokenKind,
    width: usize,
) -> Option<(Vec<Node>, usize)> {
    if run_length(tokens, kind) != width {
        return None;
    }

    let mut close = None;
    let mut i = width;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::Newline => return None,
            k if k == kind => {
                let run = run_length(&tokens[i..], kind);
                if run == width {
                    close = Some(i);
                    break;
                }
                i += run;
            }
            _ => i += 1,
        }
    }
    let close = close?;

    let content = &tokens[width..close];
    let (first, last) = (content.first()?, content.last()?);
    if first.is_whitespace() || last.is_whitespace() {
        return None;
    }

    Some((parser.nested_inlines(content), close + width))
}

/// `*` or `_` as the emphasis symbol at the start of `tokens`.
fn emphasis_symbol(tokens: &[Token<'_>]) -> Option<(TokenKind, char)> {
    match nth(tokens, 0) {
        TokenKind::Star => Some((TokenKind::Star, '*')),
        TokenKind::Underscore => Some((TokenKind::Underscore, '_')),
        _ => None,
    }
}

/// `***text***` or `___text___`.
#[derive(Debug, Clone, Copy)]
pub struct BoldItalicRule;

impl Rule for BoldItalicRule {
    fn name(&self) -> &'static str {
        "bold_italic"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let (kind, symbol) = emphasis_symbol(tokens)?;
        let (children, consumed) = delimited(parser, tokens, kind, 3)?;
        Some(Matched::new(Node::BoldItalic { symbol, children }, consumed))
    }
}

/// `**text**` or `__text__`.
#[derive(Debug, Clone, Copy)]
pub struct BoldRule;

impl Rule for BoldRule {
    fn name(&self) -> &'static str {
        "bold"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let (kind, symbol) = emphasis_symbol(tokens)?;
        let (children, consumed) = delimited(parser, tokens, kind, 2)?;
        Some(Matched::new(Node::Bold { symbol, children }, consumed))
    }
}

/// `*text*` or `_text_`.
#[derive(Debug, Clone, Copy)]
pub struct ItalicRule;

impl Rule for ItalicRule {
    fn name(&self) -> &'static str {
        "italic"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let (kind, symbol) = emphasis_symbol(tokens)?;
        let (children, consumed) = delimited(parser, tokens, kind, 1)?;
        Some(Matched::new(Node::Italic { symbol, children }, consumed))
    }
}

/// `~~text~~`
#[derive(Debug, Clone, Copy)]
pub struct StrikethroughRule;

impl Rule for StrikethroughRule {
    fn name(&self) -> &'static str {
        "strikethrough"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let (children, consumed) = delimited(parser, tokens, TokenKind::Tilde, 2)?;
        Some(Matched::new(Node::Strikethrough { children }, consumed))
    }
}

/// `==text==`
#[derive(Debug, Clone, Copy)]
pub struct HighlightRule;

impl Rule for HighlightRule {
    fn name(&self) -> &'static str {
        "highlight"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let (children, consumed) = delimited(parser, tokens, TokenKind::Equal, 2)?;
        Some(Matched::new(Node::Highlight { children }, consumed))
    }
}

/// `||text||`, hidden until revealed.
#[derive(Debug, Clone, Copy)]
pub struct SpoilerRule;

impl Rule for SpoilerRule {
    fn name(&self) -> &'static str {
        "spoiler"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let (children, consumed) = delimited(parser, tokens, TokenKind::Pipe, 2)?;
        Some(Matched::new(Node::Spoiler { children }, consumed))
    }
}

/// `^text^`
#[derive(Debug, Clone, Copy)]
pub struct SuperscriptRule;

impl Rule for SuperscriptRule {
    fn name(&self) -> &'static str {
        "superscript"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let (children, consumed) = delimited(parser, tokens, TokenKind::Caret, 1)?;
        Some(Matched::new(Node::Superscript { children }, consumed))
    }
}

/// `~text~`
#[derive(Debug, Clone, Copy)]
pub struct SubscriptRule;

impl Rule for SubscriptRule {
    fn name(&self) -> &'static str {
        "subscript"
    }

    fn try_match(&self, parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        let (children, consumed) = delimited(parser, tokens, TokenKind::Tilde, 1)?;
        Some(Matched::new(Node::Subscript { children }, consumed))
    }
}

/// `#name`, where the name runs until whitespace, `#`, `.` or `,`.
///
/// Hierarchical names like `#work/project` are one tag.
#[derive(Debug, Clone, Copy)]
pub struct TagRule;

impl Rule for TagRule {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn try_match(&self, _parser: &Parser<'_>, tokens: &[Token<'_>]) -> Option<Matched> {
        if nth(tokens, 0) != TokenKind::Hash {
            return None;
        }
        let len = tokens[1..]
            .iter()
            .take_while(|t| {
                !t.is_whitespace()
                    && !matches!(t.kind, TokenKind::Hash | TokenKind::Dot | TokenKind::Comma)
            })
            .count();
        if len == 0 {
            return None;
        }
        let node = Node::Tag {
            name: join(&tokens[1..=len]),
        };
        Some(Matched::new(node, len + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::format_tree;
    use crate::lexer::lex;
    use crate::parser::registry::Registry;
    use crate::parser::{ParserOptions, parse};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn try_rule(rule: &dyn Rule, input: &str) -> Option<Matched> {
        let registry = Registry::standard();
        let parser = Parser::new(&registry, ParserOptions::default());
        rule.try_match(&parser, &lex(input))
    }

    /// Debug tree of the inline content of a one-paragraph note.
    fn inline_tree(input: &str) -> String {
        match parse(input).children.as_slice() {
            [Node::Paragraph { children }] => format_tree(children),
            other => panic!("expected one paragraph, got {other:?}"),
        }
    }

    fn contains_code(nodes: &[Node]) -> bool {
        let mut found = false;
        for node in nodes {
            node.visit(&mut |n: &Node| found |= matches!(n, Node::Code { .. }));
        }
        found
    }

    // === Code spans ===

    #[test]
    fn code_span_unclosed_is_no_match() {
        assert_eq!(try_rule(&CodeRule, "`Hello world!"), None);
        assert_eq!(
            parse("`Hello world!").children,
            vec![Node::Paragraph {
                children: vec![Node::text("`Hello world!")]
            }]
        );
    }

    #[test]
    fn code_span_closed() {
        let m = try_rule(&CodeRule, "`Hello world!`").unwrap();
        assert_eq!(
            m.node,
            Node::Code {
                content: "Hello world!".to_string()
            }
        );
        assert_eq!(m.consumed, lex("`Hello world!`").len());
    }

    #[test]
    fn code_span_rejects_newline() {
        assert_eq!(try_rule(&CodeRule, "`Hello \nworld!`"), None);
        assert!(!contains_code(&parse("`Hello \nworld!`").children));
    }

    #[rstest]
    #[case::empty("``")]
    #[case::not_a_backtick("a`b`")]
    fn code_span_rejects(#[case] input: &str) {
        assert_eq!(try_rule(&CodeRule, input), None);
    }

    #[test]
    fn code_span_content_is_raw() {
        let m = try_rule(&CodeRule, "`*a* #b \\*`").unwrap();
        assert_eq!(
            m.node,
            Node::Code {
                content: "*a* #b \\*".to_string()
            }
        );
    }

    // === Escapes ===

    #[rstest]
    #[case("\\*", "*")]
    #[case("\\#", "#")]
    #[case("\\`", "`")]
    #[case("\\\\", "\\")]
    fn escapes(#[case] input: &str, #[case] symbol: &str) {
        let m = try_rule(&EscapeRule, input).unwrap();
        assert_eq!(
            m.node,
            Node::Escape {
                symbol: symbol.to_string()
            }
        );
        assert_eq!(m.consumed, 2);
    }

    #[test]
    fn escape_needs_punctuation() {
        assert_eq!(try_rule(&EscapeRule, "\\a"), None);
        assert_eq!(try_rule(&EscapeRule, "\\ "), None);
    }

    #[test]
    fn escaped_hash_is_not_a_tag() {
        insta::assert_snapshot!(inline_tree("\\#notatag"), @r##"
        Escape "#"
        Text "notatag"
        "##);
    }

    // === Links and images ===

    #[test]
    fn link_text_is_inline_parsed() {
        insta::assert_snapshot!(inline_tree("see [the **docs**](https://x.io/a)"), @r#"
        Text "see "
        Link "https://x.io/a"
          Text "the "
          Bold '*'
            Text "docs"
        "#);
    }

    #[test]
    fn image_alt_is_literal() {
        let m = try_rule(&ImageRule, "![a *b*](img.png)").unwrap();
        assert_eq!(
            m.node,
            Node::Image {
                alt: "a *b*".to_string(),
                url: "img.png".to_string()
            }
        );
    }

    #[rstest]
    #[case::no_url("[text]")]
    #[case::empty_url("[text]()")]
    #[case::space_in_url("[text](a b)")]
    #[case::unclosed_url("[text](abc")]
    #[case::unclosed_label("[text(abc)")]
    #[case::gap("[text] (abc)")]
    fn link_rejects(#[case] input: &str) {
        assert_eq!(try_rule(&LinkRule, input), None);
    }

    #[test]
    fn image_wins_over_link() {
        insta::assert_snapshot!(inline_tree("![x](y)"), @r#"Image "x" "y""#);
    }

    // === Autolinks ===

    #[test]
    fn bracketed_autolink() {
        let m = try_rule(&AutoLinkRule, "<https://a.b/c>").unwrap();
        assert_eq!(
            m.node,
            Node::AutoLink {
                url: "https://a.b/c".to_string(),
                bracketed: true
            }
        );
    }

    #[test]
    fn bare_autolink_stops_at_space() {
        insta::assert_snapshot!(inline_tree("go to http://a.b/c?d=e now"), @r#"
        Text "go to "
        AutoLink "http://a.b/c?d=e" bracketed=false
        Text " now"
        "#);
    }

    #[rstest]
    #[case::scheme_only("<https://>")]
    #[case::not_web("<ftp://a.b>")]
    #[case::space_inside("<https://a b>")]
    #[case::bare_scheme_only("https://")]
    #[case::plain_word("httpsx")]
    fn autolink_rejects(#[case] input: &str) {
        assert_eq!(try_rule(&AutoLinkRule, input), None);
    }

    // === Delimited spans ===

    #[rstest]
    #[case("***a***", "BoldItalic '*'\n  Text \"a\"\n")]
    #[case("___a___", "BoldItalic '_'\n  Text \"a\"\n")]
    #[case("**a**", "Bold '*'\n  Text \"a\"\n")]
    #[case("__a__", "Bold '_'\n  Text \"a\"\n")]
    #[case("*a*", "Italic '*'\n  Text \"a\"\n")]
    #[case("_a_", "Italic '_'\n  Text \"a\"\n")]
    #[case("~~a~~", "Strikethrough\n  Text \"a\"\n")]
    #[case("==a==", "Highlight\n  Text \"a\"\n")]
    #[case("^a^", "Superscript\n  Text \"a\"\n")]
    #[case("~a~", "Subscript\n  Text \"a\"\n")]
    #[case("||a||", "Spoiler\n  Text \"a\"\n")]
    fn delimited_constructs(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(inline_tree(input), expected);
    }

    #[test]
    fn emphasis_nests() {
        insta::assert_snapshot!(inline_tree("**a *b* c**"), @r#"
        Bold '*'
          Text "a "
          Italic '*'
            Text "b"
          Text " c"
        "#);
    }

    #[test]
    fn closer_must_have_same_width() {
        insta::assert_snapshot!(inline_tree("**x*"), @r#"
        Text "*"
        Italic '*'
          Text "x"
        "#);
    }

    #[rstest]
    #[case::space_after_opener("* a*")]
    #[case::space_before_closer("*a *")]
    #[case::empty("**")]
    #[case::unclosed("*abc")]
    #[case::across_lines("*a\nb*")]
    fn italic_rejects(#[case] input: &str) {
        assert_eq!(try_rule(&ItalicRule, input), None);
    }

    #[test]
    fn strikethrough_before_subscript() {
        let m = try_rule(&SubscriptRule, "~~a~~");
        assert_eq!(m, None);
        assert!(try_rule(&StrikethroughRule, "~~a~~").is_some());
    }

    #[test]
    fn spoiler_content_is_inline_parsed() {
        insta::assert_snapshot!(inline_tree("the ||killer is **#butler**|| ok"), @r#"
        Text "the "
        Spoiler
          Text "killer is "
          Bold '*'
            Tag "butler"
        Text " ok"
        "#);
    }

    #[rstest]
    #[case::single_pipes("|a|")]
    #[case::space_after_opener("|| a||")]
    #[case::unclosed("||a")]
    #[case::triple_pipes("|||a|||")]
    fn spoiler_rejects(#[case] input: &str) {
        assert_eq!(try_rule(&SpoilerRule, input), None);
    }

    // === Tags ===

    #[rstest]
    #[case("#tag", "tag")]
    #[case("#work/project", "work/project")]
    #[case("#tag.", "tag")]
    #[case("#a,#b", "a")]
    #[case("#日本語", "日本語")]
    fn tag_names(#[case] input: &str, #[case] name: &str) {
        let m = try_rule(&TagRule, input).unwrap();
        assert_eq!(
            m.node,
            Node::Tag {
                name: name.to_string()
            }
        );
    }

    #[rstest]
    #[case::lone_hash("#")]
    #[case::space("# tag")]
    #[case::double_hash("##tag")]
    fn tag_rejects(#[case] input: &str) {
        assert_eq!(try_rule(&TagRule, input), None);
    }

    #[test]
    fn tags_inside_code_are_text() {
        insta::assert_snapshot!(inline_tree("`#notatag` #realtag"), @r##"
        Code "#notatag"
        Text " "
        Tag "realtag"
        "##);
    }
}
