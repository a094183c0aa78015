//! Rule priority tables.
//!
//! [`BLOCK_RULES`] and [`INLINE_RULES`] are the single source of truth for
//! which constructs exist and in what order they are tried. A [`Registry`]
//! is a copy of both tables, optionally with some rules switched off, that
//! the caller builds once and hands to [`Parser::new`](super::Parser::new).

use std::fmt;

use thiserror::Error;

use super::Rule;
use super::block::{
    BlockquoteRule, CodeBlockRule, DisclosureRule, HeadingRule, LineBreakRule, ListRule,
    ParagraphRule, TableRule, ThematicBreakRule,
};
use super::inline::{
    AutoLinkRule, BoldItalicRule, BoldRule, CodeRule, EscapeRule, HighlightRule, ImageRule,
    ItalicRule, LinkRule, SpoilerRule, StrikethroughRule, SubscriptRule, SuperscriptRule,
    TagRule,
};

/// Block rules in priority order.
pub static BLOCK_RULES: &[&dyn Rule] = &[
    &CodeBlockRule,
    &DisclosureRule,
    &TableRule,
    &ThematicBreakRule,
    &HeadingRule,
    &BlockquoteRule,
    &ListRule,
    &LineBreakRule,
    &ParagraphRule,
];

/// Inline rules in priority order. Unmatched tokens become text.
pub static INLINE_RULES: &[&dyn Rule] = &[
    &EscapeRule,
    &CodeRule,
    &ImageRule,
    &LinkRule,
    &AutoLinkRule,
    &BoldItalicRule,
    &BoldRule,
    &ItalicRule,
    &StrikethroughRule,
    &HighlightRule,
    &SpoilerRule,
    &SuperscriptRule,
    &SubscriptRule,
    &TagRule,
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown parser rule `{0}`")]
    UnknownRule(String),
}

/// The active block and inline rules, in priority order.
#[derive(Clone)]
pub struct Registry {
    block: Vec<&'static dyn Rule>,
    inline: Vec<&'static dyn Rule>,
}

impl Registry {
    /// Every rule, in the standard priority order.
    pub fn standard() -> Self {
        Self {
            block: BLOCK_RULES.to_vec(),
            inline: INLINE_RULES.to_vec(),
        }
    }

    /// The standard rules minus the named ones.
    ///
    /// Disabled constructs are parsed as whatever the remaining rules make of
    /// them, ultimately plain text.
    pub fn without<S: AsRef<str>>(disabled: &[S]) -> Result<Self, RegistryError> {
        for name in disabled {
            let name = name.as_ref();
            if !all_rules().any(|rule| rule.name() == name) {
                return Err(RegistryError::UnknownRule(name.to_string()));
            }
        }

        let enabled = |rule: &&'static dyn Rule| {
            !disabled.iter().any(|name| name.as_ref() == rule.name())
        };
        let registry = Self {
            block: BLOCK_RULES.iter().copied().filter(enabled).collect(),
            inline: INLINE_RULES.iter().copied().filter(enabled).collect(),
        };

        if !disabled.is_empty() {
            log::trace!(
                "registry built with {} block and {} inline rules",
                registry.block.len(),
                registry.inline.len()
            );
        }
        Ok(registry)
    }

    /// A registry with exactly the given rules, for exercising the
    /// dispatcher with rules outside the standard tables.
    #[cfg(test)]
    pub(crate) fn from_rules(
        block: Vec<&'static dyn Rule>,
        inline: Vec<&'static dyn Rule>,
    ) -> Self {
        Self { block, inline }
    }

    pub fn block_rules(&self) -> &[&'static dyn Rule] {
        &self.block
    }

    pub fn inline_rules(&self) -> &[&'static dyn Rule] {
        &self.inline
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |rules: &[&dyn Rule]| rules.iter().map(|r| r.name()).collect::<Vec<_>>();
        f.debug_struct("Registry")
            .field("block", &names(self.block.as_slice()))
            .field("inline", &names(self.inline.as_slice()))
            .finish()
    }
}

/// Names of every known rule, block rules first.
pub fn rule_names() -> impl Iterator<Item = &'static str> {
    all_rules().map(|rule| rule.name())
}

fn all_rules() -> impl Iterator<Item = &'static dyn Rule> {
    BLOCK_RULES.iter().chain(INLINE_RULES).copied()
}
