//! Suggestion function combinators.
//!
//! A suggestion function receives the input a rule just failed on and
//! proposes repaired prefixes as ready-made [`ParseResult`]s: `consumed` is
//! the replacement text and `rest` is whatever the match should continue
//! with. The engine treats the proposals exactly like matched results, so
//! repairs compose through concatenations and alternatives for free.
//!
//! The combinators here cover the common shapes: swap the offending first
//! character for fixed text, insert fixed text in front of it, chain several
//! generators, or use one only when another comes up empty. Grammar-specific
//! generators (case folding, context-dependent replacements) are written as
//! plain closures where they are needed.

use crate::{ParseResult, SuggestionFn};
use std::sync::Arc;

/// Chain several generators; proposals arrive in generator order.
pub fn merge(fns: Vec<SuggestionFn>) -> SuggestionFn {
    Arc::new(move |input: &str| fns.iter().flat_map(|f| f(input)).collect())
}

/// Use `primary`, falling back to `fallback` only when `primary` proposes
/// nothing. A `None` fallback makes the miss final.
pub fn unless(primary: SuggestionFn, fallback: Option<SuggestionFn>) -> SuggestionFn {
    Arc::new(move |input: &str| {
        let proposals = primary(input);
        if proposals.is_empty() {
            if let Some(fallback) = &fallback {
                return fallback(input);
            }
        }
        proposals
    })
}

/// Propose each of `strings` in place of the first input character.
///
/// Empty input yields nothing; there is no character to replace.
pub fn replace_first_char(strings: &[&str]) -> SuggestionFn {
    let strings: Vec<String> = strings.iter().map(|s| s.to_string()).collect();
    Arc::new(move |input: &str| {
        let mut chars = input.chars();
        if chars.next().is_none() {
            return Vec::new();
        }
        let rest = chars.as_str();
        strings
            .iter()
            .map(|s| ParseResult { consumed: s.clone(), rest: rest.to_string() })
            .collect()
    })
}

/// Propose each of `strings` both in front of the first input character and
/// in place of it. On empty input only the prepend form applies.
pub fn prepend_or_replace_first_char(strings: &[&str]) -> SuggestionFn {
    let strings: Vec<String> = strings.iter().map(|s| s.to_string()).collect();
    Arc::new(move |input: &str| {
        let mut chars = input.chars();
        let replaced_tail = chars.next().map(|_| chars.as_str());
        let mut out = Vec::with_capacity(2 * strings.len());
        for s in &strings {
            out.push(ParseResult { consumed: s.clone(), rest: input.to_string() });
            if let Some(tail) = replaced_tail {
                out.push(ParseResult { consumed: s.clone(), rest: tail.to_string() });
            }
        }
        out
    })
}

/// Propose `c` in place of the first input character.
pub fn const_char(c: char) -> SuggestionFn {
    let s = c.to_string();
    replace_first_char(&[s.as_str()])
}
