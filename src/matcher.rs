//! Blocklist pattern compilation
//!
//! Turns plain-text blocklist terms into case-insensitive matchers that only
//! fire on whole tokens. A token boundary is a string edge or any character
//! that is not an ASCII letter or digit, so `_` and `-` separate tokens.
//!
//! Case folding never maps a non-ASCII character onto an ASCII one: `kit`
//! does not match `\u{212A}it` (Kelvin sign), and `s` does not match `ſ`.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::config::DEFAULT_BLOCKLIST;

/// Anything that is not an ASCII letter/digit
const BOUNDARY_BEFORE: &str = "(?:^|[^a-zA-Z0-9])";
const BOUNDARY_AFTER: &str = "(?:[^a-zA-Z0-9]|$)";

const REGEX_SIZE_LIMIT: usize = 32 * (1 << 20);

static DEFAULT_MATCHERS: Lazy<MatcherSet> = Lazy::new(|| MatcherSet::compile(DEFAULT_BLOCKLIST));

/// How a single term is matched
#[derive(Debug, Clone)]
enum Engine {
    Regex(Regex),

    /// ASCII-lowercased literal with a manual boundary scan, used when the
    /// regex engine refuses a pathological term.
    Literal(String),
}

/// A boundary-aware matcher for one blocklist term
#[derive(Debug, Clone)]
pub struct TermMatcher {
    term: String,
    engine: Engine,
}

impl TermMatcher {
    /// Compile a single term. Never fails.
    pub fn new(term: &str) -> Self {
        let pattern = format!("{}{}{}", BOUNDARY_BEFORE, folded_pattern(term), BOUNDARY_AFTER);

        let engine = match RegexBuilder::new(&pattern)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
        {
            Ok(re) => Engine::Regex(re),
            Err(e) => {
                tracing::warn!(term, error = %e, "regex rejected term, using literal scan");
                Engine::Literal(term.to_ascii_lowercase())
            }
        };

        Self {
            term: term.to_string(),
            engine,
        }
    }

    /// The original term text
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_match(&self, text: &str) -> bool {
        match &self.engine {
            Engine::Regex(re) => re.is_match(text),
            Engine::Literal(needle) => literal_boundary_match(&text.to_ascii_lowercase(), needle),
        }
    }
}

/// Escaped pattern for `term` with explicit case classes.
///
/// ASCII letters fold to their ASCII pair only. A non-ASCII character folds to
/// its single-character upper/lower forms, minus any that are ASCII.
fn folded_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() * 4);
    for c in term.chars() {
        if c.is_ascii_alphabetic() {
            pattern.push('[');
            pattern.push(c.to_ascii_lowercase());
            pattern.push(c.to_ascii_uppercase());
            pattern.push(']');
            continue;
        }

        let mut variants = vec![c];
        if !c.is_ascii() {
            for v in [single_char(c.to_lowercase()), single_char(c.to_uppercase())]
                .into_iter()
                .flatten()
            {
                if !v.is_ascii() && !variants.contains(&v) {
                    variants.push(v);
                }
            }
        }

        if variants.len() == 1 {
            let mut buf = [0u8; 4];
            pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        } else {
            // Only non-ASCII chars here, none of which need escaping in a class
            pattern.push('[');
            pattern.extend(variants);
            pattern.push(']');
        }
    }
    pattern
}

fn single_char(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

fn is_boundary(c: Option<char>) -> bool {
    c.map_or(true, |c| !c.is_ascii_alphanumeric())
}

fn literal_boundary_match(haystack: &str, needle: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let at = start + pos;
        let end = at + needle.len();

        if is_boundary(haystack[..at].chars().next_back()) && is_boundary(haystack[end..].chars().next())
        {
            return true;
        }

        // Step one char so overlapping candidates are still considered
        start = at + haystack[at..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Compiled, immutable set of blocklist matchers
///
/// Built once per blocklist configuration. Reconfiguring means compiling a
/// new set; there is no way to add or remove terms from an existing one.
#[derive(Debug, Clone, Default)]
pub struct MatcherSet {
    matchers: Vec<TermMatcher>,
}

impl MatcherSet {
    /// Compile a list of terms, preserving their order.
    ///
    /// Terms are taken literally, whitespace included. Only the empty string
    /// is skipped, since it would match at every boundary.
    pub fn compile<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let matchers = terms
            .into_iter()
            .filter(|t| !t.as_ref().is_empty())
            .map(|t| TermMatcher::new(t.as_ref()))
            .collect();

        Self { matchers }
    }

    /// Shared matcher set for the built-in blocklist
    pub fn defaults() -> &'static MatcherSet {
        &DEFAULT_MATCHERS
    }

    /// Check whether any term matches the text
    pub fn is_match(&self, text: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(text))
    }

    /// Terms that match the text, in blocklist order
    pub fn matching_terms<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.matchers
            .iter()
            .filter(|m| m.is_match(text))
            .map(TermMatcher::term)
            .collect()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(TermMatcher::term)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
