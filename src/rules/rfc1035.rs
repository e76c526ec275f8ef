//! RFC 1035 label and subdomain grammars.
//!
//! The shapes follow the RFC's BNF:
//!
//! ```text
//! <label>     ::= <letter> [ [ <ldh-str> ] <let-dig> ]
//! <subdomain> ::= <label> | <subdomain> "." <label>
//! ```
//!
//! with the size limits attached as rule bounds: 63 characters per label,
//! 253 for a full domain name. The code grows the subdomain recursion to
//! the right instead of the left, which accepts the same set. The *relaxed*
//! variants also allow a digit in first position, the shape RFC 1123
//! permits for host names; the *lower* variants fold uppercase away instead
//! of accepting it.
//!
//! Built-in repairs keep the grammars total over most input: an illegal
//! first character gets an `x` prepended or substituted, an illegal last
//! character becomes `x`, and in the subdomain grammars interior junk
//! collapses to `-`, with `@` offered as both `-at-` and `-`. The interior
//! repair skips `.`, keeping label boundaries where the input put them;
//! the first-position repair may still swallow a dot, which is how a lone
//! `.` can sanitize to `xx`. Ambiguous repairs surface as multiple ranked
//! results.

use super::classes;
use crate::{merge, prepend_or_replace_first_char, replace_first_char};
use crate::{Grammar, ParseResult, Rule, SuggestionFn};
use std::sync::Arc;

const LABEL_MAX_CHARS: usize = 63;
const SUBDOMAIN_MAX_CHARS: usize = 253;

type ClassFn = fn(&mut Grammar, Option<SuggestionFn>) -> Rule;

/// A single label: a letter, then letters, digits and hyphens, ending on a
/// letter or digit.
///
/// `suggest` repairs characters in the interior run; the first and last
/// positions carry the fixed `x` repairs regardless.
pub fn label(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    label_shape(g, suggest, classes::letter, classes::ldh_str, classes::let_dig)
}

/// Like [`label`], but a digit may come first.
pub fn label_relaxed(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    label_shape(g, suggest, classes::let_dig, classes::ldh_str, classes::let_dig)
}

/// [`label`] restricted to lowercase; uppercase input is folded down.
pub fn lower_label(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    label_shape(g, suggest, classes::lower_letter, classes::lower_ldh_str, classes::lower_let_dig)
}

/// [`label_relaxed`] restricted to lowercase.
pub fn lower_label_relaxed(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    label_shape(g, suggest, classes::lower_let_dig, classes::lower_ldh_str, classes::lower_let_dig)
}

/// A dot-separated sequence of [`label`]s.
///
/// Registered under a fixed name so the rule can refer to itself; building
/// it twice in one grammar just rebinds that name.
pub fn subdomain(g: &mut Grammar) -> Rule {
    subdomain_shape(g, "rfc1035-subdomain", label)
}

/// A dot-separated sequence of [`label_relaxed`]s.
pub fn subdomain_relaxed(g: &mut Grammar) -> Rule {
    subdomain_shape(g, "rfc1035-subdomain-relaxed", label_relaxed)
}

/// A dot-separated sequence of [`lower_label`]s.
pub fn lower_subdomain(g: &mut Grammar) -> Rule {
    subdomain_shape(g, "rfc1035-lower-subdomain", lower_label)
}

/// A dot-separated sequence of [`lower_label_relaxed`]s.
pub fn lower_subdomain_relaxed(g: &mut Grammar) -> Rule {
    subdomain_shape(g, "rfc1035-lower-subdomain-relaxed", lower_label_relaxed)
}

fn label_shape(
    g: &mut Grammar,
    suggest: Option<SuggestionFn>,
    first: ClassFn,
    interior: ClassFn,
    last: ClassFn,
) -> Rule {
    let head = first(g, Some(prepend_or_replace_first_char(&["x"])));
    let interior_run = interior(g, suggest);
    let opt_run = g.opt(interior_run);
    let tail = last(g, Some(replace_first_char(&["x"])));
    let tail_pair = g.concat(&[opt_run, tail]);
    let opt_tail = g.opt(tail_pair);
    let rule = g.concat(&[head, opt_tail]);
    g.with_max_length(rule, LABEL_MAX_CHARS)
}

fn subdomain_shape(g: &mut Grammar, name: &str, label_of: ClassFn) -> Rule {
    let single = label_of(g, Some(interior_suggester()));
    let head = label_of(g, Some(interior_suggester()));
    let dot = g.terminal(".");
    let tail = g.rule_ref(name);
    let chain = g.concat(&[head, dot, tail]);
    let body = g.alternative(&[single, chain]);
    let rule = g.named(name, body);
    g.with_max_length(rule, SUBDOMAIN_MAX_CHARS)
}

/// Interior repair for the subdomain grammars: `@` becomes `-at-` or `-`,
/// `.` is left alone, anything else becomes `-`.
fn interior_suggester() -> SuggestionFn {
    merge(vec![const_strings_if(&["-at-", "-"], '@'), const_char_unless('-', '.')])
}

/// Propose `suggested` in place of the first character, unless that
/// character is `exception`, which stays a hard miss.
fn const_char_unless(suggested: char, exception: char) -> SuggestionFn {
    Arc::new(move |input: &str| {
        let mut chars = input.chars();
        let Some(first) = chars.next() else { return Vec::new() };
        if first == exception {
            return Vec::new();
        }
        vec![ParseResult { consumed: suggested.to_string(), rest: chars.as_str().to_string() }]
    })
}

/// Propose each of `suggested` in place of the first character, but only
/// when that character is exactly `expected`.
fn const_strings_if(suggested: &[&str], expected: char) -> SuggestionFn {
    let suggested: Vec<String> = suggested.iter().map(|s| s.to_string()).collect();
    Arc::new(move |input: &str| {
        let mut chars = input.chars();
        let Some(first) = chars.next() else { return Vec::new() };
        if first != expected {
            return Vec::new();
        }
        let rest = chars.as_str();
        suggested
            .iter()
            .map(|s| ParseResult { consumed: s.clone(), rest: rest.to_string() })
            .collect()
    })
}
