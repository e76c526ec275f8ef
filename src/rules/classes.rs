//! Shared character-class rules.
//!
//! Each function appends its rule to the grammar it is given and returns the
//! handle, so classes compose the same way hand-written rules do. The
//! `suggest` parameter is the repair applied when the class itself fails to
//! match; passing `None` makes the class strict at that position.
//!
//! The `lower_*` variants never accept uppercase. They fold it instead: the
//! built-in case-folding proposal runs first and the caller's `suggest` is
//! only consulted for characters that are not letters at all.

use crate::{Grammar, ParseResult, Rule, SuggestionFn};
use std::sync::Arc;

fn attach(g: &mut Grammar, rule: Rule, suggest: Option<SuggestionFn>) -> Rule {
    match suggest {
        Some(suggest) => g.with_suggestion(rule, suggest),
        None => rule,
    }
}

/// Lowercase the first character when it is an ASCII letter. Anything else
/// proposes nothing, deferring to whatever fallback is in place.
fn lower_first_char() -> SuggestionFn {
    Arc::new(|input: &str| {
        let mut chars = input.chars();
        let Some(first) = chars.next() else { return Vec::new() };
        let lowered = match first {
            'a'..='z' => first,
            'A'..='Z' => first.to_ascii_lowercase(),
            _ => return Vec::new(),
        };
        vec![ParseResult { consumed: lowered.to_string(), rest: chars.as_str().to_string() }]
    })
}

/// `0-9`.
pub fn digit(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    let rule = g.char_range('0', '9');
    attach(g, rule, suggest)
}

/// `a-z` or `A-Z`.
pub fn letter(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    let lower = g.char_range('a', 'z');
    let upper = g.char_range('A', 'Z');
    let rule = g.alternative(&[lower, upper]);
    attach(g, rule, suggest)
}

/// `a-z`, with uppercase folded down before `suggest` is consulted.
pub fn lower_letter(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    let rule = g.char_range('a', 'z');
    g.with_suggestion(rule, crate::unless(lower_first_char(), suggest))
}

/// Letter or digit.
pub fn let_dig(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    let letter = letter(g, None);
    let digit = digit(g, None);
    let rule = g.alternative(&[letter, digit]);
    attach(g, rule, suggest)
}

/// Lowercase letter or digit.
pub fn lower_let_dig(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    let letter = lower_letter(g, None);
    let digit = digit(g, None);
    let rule = g.alternative(&[letter, digit]);
    attach(g, rule, suggest)
}

/// Letter, digit or hyphen.
pub fn let_dig_hyp(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    let let_dig = let_dig(g, None);
    let hyphen = g.terminal("-");
    let rule = g.alternative(&[let_dig, hyphen]);
    attach(g, rule, suggest)
}

/// Lowercase letter, digit or hyphen.
pub fn lower_let_dig_hyp(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    let let_dig = lower_let_dig(g, None);
    let hyphen = g.terminal("-");
    let rule = g.alternative(&[let_dig, hyphen]);
    attach(g, rule, suggest)
}

/// A non-empty run of letters, digits and hyphens. Every unit in the run
/// carries `suggest`, so repairs apply at any position.
pub fn ldh_str(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    run_of(g, suggest, let_dig_hyp)
}

/// A non-empty run of lowercase letters, digits and hyphens.
pub fn lower_ldh_str(g: &mut Grammar, suggest: Option<SuggestionFn>) -> Rule {
    run_of(g, suggest, lower_let_dig_hyp)
}

/// One-or-more repetition of `unit`, grown rightward through a freshly
/// named self-reference. Two unit instances are built so head and tail both
/// carry the suggestion.
fn run_of(
    g: &mut Grammar,
    suggest: Option<SuggestionFn>,
    unit: fn(&mut Grammar, Option<SuggestionFn>) -> Rule,
) -> Rule {
    let name = g.generate_unique_name();
    let head = unit(g, suggest.clone());
    let tail_head = unit(g, suggest);
    let tail_ref = g.rule_ref(&name);
    let tail = g.concat(&[tail_head, tail_ref]);
    let body = g.alternative(&[head, tail]);
    g.named(&name, body)
}
