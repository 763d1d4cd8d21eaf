//! Pattern tables for text classification.
//!
//! Rule tables are plain `const` data (`PatternRule` slices) compiled once into
//! [`CompiledRules`]. All patterns match case-insensitively.
//!
//! `regex` has no look-around, so a pattern such as "heal, unless followed by
//! `ing ... reduc`" is expressed as a [`TextPattern`] with a `not_followed_by`
//! guard: a hit counts only when the guard does not match the text directly
//! after it.

use regex::{Regex, RegexBuilder};

/// A single case-insensitive pattern with an optional negative guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPattern {
    pub pattern: &'static str,
    pub not_followed_by: Option<&'static str>,
}

/// Pattern with no guard.
pub const fn pat(pattern: &'static str) -> TextPattern {
    TextPattern {
        pattern,
        not_followed_by: None,
    }
}

/// Pattern that is rejected when `guard` matches right after the hit.
pub const fn pat_unless(pattern: &'static str, guard: &'static str) -> TextPattern {
    TextPattern {
        pattern,
        not_followed_by: Some(guard),
    }
}

/// Compiled form of a [`TextPattern`].
#[derive(Debug, Clone)]
pub struct TextMatcher {
    regex: Regex,
    guard: Option<Regex>,
}

impl TextMatcher {
    pub fn compile(pattern: &TextPattern) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern.pattern)
            .case_insensitive(true)
            .build()?;
        let guard = pattern
            .not_followed_by
            .map(|g| {
                RegexBuilder::new(&format!("^(?:{g})"))
                    .case_insensitive(true)
                    .build()
            })
            .transpose()?;
        Ok(Self { regex, guard })
    }

    pub fn is_match(&self, text: &str) -> bool {
        match &self.guard {
            None => self.regex.is_match(text),
            Some(guard) => self
                .regex
                .find_iter(text)
                .any(|m| !guard.is_match(&text[m.end()..])),
        }
    }

    /// Capture groups of the first accepted hit.
    pub fn captures<'t>(&self, text: &'t str) -> Option<regex::Captures<'t>> {
        match &self.guard {
            None => self.regex.captures(text),
            Some(guard) => self
                .regex
                .captures_iter(text)
                .find(|c| c.get(0).is_some_and(|m| !guard.is_match(&text[m.end()..]))),
        }
    }
}

/// A label that applies when any of its patterns matches.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule<T: 'static> {
    pub label: T,
    pub patterns: &'static [TextPattern],
}

/// An ordered, compiled rule table.
#[derive(Debug, Clone)]
pub struct CompiledRules<T> {
    rules: Vec<(T, Vec<TextMatcher>)>,
}

impl<T: Copy> CompiledRules<T> {
    pub fn compile(table: &[PatternRule<T>]) -> Result<Self, regex::Error> {
        let rules = table
            .iter()
            .map(|rule| {
                let matchers = rule
                    .patterns
                    .iter()
                    .map(TextMatcher::compile)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((rule.label, matchers))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// Labels whose rule matches `text`, in table order.
    pub fn matching<'a>(&'a self, text: &'a str) -> impl Iterator<Item = T> + 'a {
        self.rules
            .iter()
            .filter(move |(_, matchers)| matchers.iter().any(|m| m.is_match(text)))
            .map(|(label, _)| *label)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
