//! Tag extraction.
//!
//! Tags are read from the tree, not from the raw text, so `#words` inside
//! code spans and code blocks are excluded without any scrubbing.
//!
//! Tag names are hierarchical: `#work/project/q3` also counts as `#work` and
//! `#work/project`.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::{Document, Node};

/// Tag names exactly as written, without hierarchy expansion.
pub fn tag_names(doc: &Document) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    doc.visit(|node| {
        if let Node::Tag { name } = node {
            names.insert(name.clone());
        }
    });
    names
}

/// Every tag in the document, expanded hierarchically.
pub fn extract_tags(doc: &Document) -> BTreeSet<String> {
    tag_names(doc)
        .iter()
        .flat_map(|name| expand_hierarchy(name))
        .collect()
}

/// `a/b/c` becomes `a`, `a/b`, `a/b/c`.
pub fn expand_hierarchy(name: &str) -> Vec<String> {
    name.match_indices('/')
        .map(|(i, _)| name[..i].to_string())
        .chain(std::iter::once(name.to_string()))
        .collect()
}

/// Number of documents mentioning each tag.
///
/// A document counts once per tag however often it repeats it, and a
/// nested tag also counts for each of its ancestors.
pub fn count_tags<'d>(docs: impl IntoIterator<Item = &'d Document>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for doc in docs {
        for tag in extract_tags(doc) {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    counts
}

/// Tags used in `docs` that are missing from `existing`, sorted.
pub fn suggest_tags<'d, S: AsRef<str>>(
    docs: impl IntoIterator<Item = &'d Document>,
    existing: &[S],
) -> Vec<String> {
    let known: BTreeSet<&str> = existing.iter().map(|s| s.as_ref()).collect();
    let mut found = BTreeSet::new();
    for doc in docs {
        found.extend(
            tag_names(doc)
                .into_iter()
                .filter(|name| !known.contains(name.as_str())),
        );
    }
    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn code_is_not_tagged() {
        let doc = parse("`#notatag` #realtag");
        assert_eq!(extract_tags(&doc), set(&["realtag"]));
    }

    #[test]
    fn code_block_is_not_tagged() {
        let doc = parse("```\n#hidden\n```\n#shown");
        assert_eq!(extract_tags(&doc), set(&["shown"]));
    }

    #[test]
    fn hierarchical_tag() {
        let doc = parse("#a/b/c");
        assert_eq!(extract_tags(&doc), set(&["a", "a/b", "a/b/c"]));
    }

    #[test]
    fn tags_are_found_everywhere() {
        let doc = parse(
            "# Title #h\n- item #l\n> quote #q\n| c |\n| - |\n| #t |\n**#b** [#k](u)",
        );
        assert_eq!(
            extract_tags(&doc),
            set(&["b", "h", "k", "l", "q", "t"])
        );
    }

    #[test]
    fn heading_is_not_a_tag() {
        let doc = parse("# Title\n## Sub");
        assert!(extract_tags(&doc).is_empty());
    }

    #[rstest]
    #[case("a", &["a"])]
    #[case("a/b", &["a", "a/b"])]
    #[case("a/b/c", &["a", "a/b", "a/b/c"])]
    #[case("a//b", &["a", "a/", "a//b"])]
    fn expansion(#[case] name: &str, #[case] expected: &[&str]) {
        assert_eq!(expand_hierarchy(name), expected);
    }

    #[test]
    fn counts_once_per_document() {
        let docs = [parse("#x #x #x/y"), parse("#x"), parse("nothing")];
        let counts = count_tags(&docs);
        assert_eq!(
            counts,
            BTreeMap::from([("x".to_string(), 2), ("x/y".to_string(), 1)])
        );
    }

    #[test]
    fn suggestions_skip_existing_tags() {
        let docs = [parse("#b #a/c"), parse("#c #a")];
        assert_eq!(
            suggest_tags(&docs, &["a"]),
            vec!["a/c".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
