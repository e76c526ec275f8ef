//! Per-variant match rules and the engine entry point.
//!
//! The matcher walks the rule graph top-down and returns *every* way the
//! current rule can consume a prefix of the input, as `(consumed, rest)`
//! pairs. Ambiguity is preserved by construction: a concatenation pairs each
//! first-part result with each second-part result on the leftover input, and
//! an alternative concatenates the results of all of its options.
//!
//! Suggestions hook in at exactly two points. A character range that fails to
//! match its first character asks its suggestion function for repaired
//! prefixes; an alternative whose options all came up empty (after length
//! filtering) does the same. Everything above just composes those repaired
//! results as if they had been matched.
//!
//! Length bounds are enforced mid-flight, not at the end: a bounded
//! concatenation clips what it consumed and keeps going, while a bounded
//! alternative discards results that grew past the bound. The driver relies
//! on the clipping behavior when it pre-truncates input, so the two must not
//! be unified.

use super::context::Context;
use super::metrics::{MatchOutcome, MatchStats};
use crate::{Grammar, ParseResult, Rule, RuleKind, SuggestionFn, UNLIMITED};
use once_cell::sync::Lazy;
use std::time::Instant;

/// Tracing is looked up once per process; matching is too hot to consult the
/// environment on every node.
static TRACE_RULES: Lazy<bool> =
    Lazy::new(|| std::env::var_os("EMEND_DEBUG_RULES").is_some());

/// Match `input` against `rule`, returning all results plus counters.
pub(crate) fn run(grammar: &Grammar, rule: Rule, input: &str) -> MatchOutcome {
    let started = Instant::now();
    let mut matcher = Matcher::new(grammar);
    if matcher.trace {
        eprintln!("[match] start rule={rule:?} input={input:?}");
    }
    let results = matcher.match_rule(rule, &Context::new(), input);
    let outcome = MatchOutcome { results, stats: matcher.stats, duration: started.elapsed() };
    if matcher.trace {
        eprintln!(
            "[match] done in {:?}: {} results, {} nodes visited, {} suggestions, {} cycle cuts",
            outcome.duration,
            outcome.results.len(),
            outcome.stats.nodes_visited,
            outcome.stats.suggestions_invoked,
            outcome.stats.cycles_cut,
        );
    }
    outcome
}

struct Matcher<'g> {
    grammar: &'g Grammar,
    stats: MatchStats,
    trace: bool,
}

impl<'g> Matcher<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        Self { grammar, stats: MatchStats::default(), trace: *TRACE_RULES }
    }

    fn match_rule(&mut self, rule: Rule, ctx: &Context, input: &str) -> Vec<ParseResult> {
        self.stats.nodes_visited += 1;
        let node = self.grammar.node(rule);
        let results = match &node.kind {
            RuleKind::Terminal { text } => match_terminal(text, input),
            RuleKind::CharRange { lo, hi, suggest } => {
                self.match_char_range(*lo, *hi, suggest.as_ref(), input)
            }
            RuleKind::Concat { first, second } => {
                self.match_concat(*first, *second, node.max_len, ctx, input)
            }
            RuleKind::Alternative { options, suggest } => {
                self.match_alternative(options, suggest.as_ref(), node.max_len, ctx, input)
            }
            RuleKind::NamedRef { name } => self.match_ref(name, ctx, input),
            RuleKind::Empty => {
                vec![ParseResult { consumed: String::new(), rest: input.to_string() }]
            }
        };
        self.stats.results_produced += results.len();
        results
    }

    /// A range matches its first character or, failing that, asks its
    /// suggestion function. Suggested results pass through unfiltered; the
    /// builder already pins the only legal bound to 1.
    fn match_char_range(
        &mut self,
        lo: char,
        hi: char,
        suggest: Option<&SuggestionFn>,
        input: &str,
    ) -> Vec<ParseResult> {
        let mut chars = input.chars();
        if let Some(first) = chars.next() {
            if lo <= first && first <= hi {
                return vec![ParseResult {
                    consumed: first.to_string(),
                    rest: chars.as_str().to_string(),
                }];
            }
        }
        match suggest {
            Some(suggest) => {
                self.stats.suggestions_invoked += 1;
                suggest(input)
            }
            None => Vec::new(),
        }
    }

    /// Pair every first-part result with every second-part result on the
    /// leftover input. A bound clips the consumed text but keeps the result;
    /// the leftover input is never clipped.
    fn match_concat(
        &mut self,
        first: Rule,
        second: Rule,
        max_len: usize,
        ctx: &Context,
        input: &str,
    ) -> Vec<ParseResult> {
        let mut out = Vec::new();
        for mut head in self.match_rule(first, ctx, input) {
            if max_len != UNLIMITED {
                truncate_chars(&mut head.consumed, max_len);
            }
            for tail in self.match_rule(second, ctx, &head.rest) {
                let mut combined =
                    String::with_capacity(head.consumed.len() + tail.consumed.len());
                combined.push_str(&head.consumed);
                combined.push_str(&tail.consumed);
                if max_len != UNLIMITED {
                    truncate_chars(&mut combined, max_len);
                }
                out.push(ParseResult { consumed: combined, rest: tail.rest });
            }
        }
        out
    }

    /// Concatenate the results of all options. The suggestion function only
    /// runs when the (length-filtered) union is empty, and its candidates go
    /// through the same filter.
    fn match_alternative(
        &mut self,
        options: &[Rule],
        suggest: Option<&SuggestionFn>,
        max_len: usize,
        ctx: &Context,
        input: &str,
    ) -> Vec<ParseResult> {
        let mut out = Vec::new();
        for &option in options {
            out.extend(self.match_rule(option, ctx, input));
        }
        drop_overlong(&mut out, max_len);
        if out.is_empty() {
            if let Some(suggest) = suggest {
                self.stats.suggestions_invoked += 1;
                out = suggest(input);
                drop_overlong(&mut out, max_len);
            }
        }
        out
    }

    /// Resolve the name against the registry and descend into the target,
    /// unless this exact `(target, input)` pair is already on the current
    /// path. An unregistered name is a plain non-match, not an error, so a
    /// grammar can be matched while it is still being assembled.
    fn match_ref(&mut self, name: &str, ctx: &Context, input: &str) -> Vec<ParseResult> {
        let Some(target) = self.grammar.lookup(name) else {
            if self.trace {
                eprintln!("[ref] nothing registered under {name:?}; yielding no results");
            }
            return Vec::new();
        };
        if ctx.has_visited(target, input) {
            self.stats.cycles_cut += 1;
            if self.trace {
                eprintln!("[ref] cycle cut at {name:?} with input {input:?}");
            }
            return Vec::new();
        }
        let descent = ctx.child(target, input);
        self.match_rule(target, &descent, input)
    }
}

fn match_terminal(text: &str, input: &str) -> Vec<ParseResult> {
    match input.strip_prefix(text) {
        Some(rest) => vec![ParseResult { consumed: text.to_string(), rest: rest.to_string() }],
        None => Vec::new(),
    }
}

/// Truncate `text` in place to at most `max` characters.
fn truncate_chars(text: &mut String, max: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
}

fn drop_overlong(results: &mut Vec<ParseResult>, max_len: usize) {
    if max_len != UNLIMITED {
        results.retain(|result| result.consumed.chars().count() <= max_len);
    }
}
