use crate::engine;
use crate::{Grammar, ParseResult, Rule, UNLIMITED};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Result from [`Grammar::parse_and_sanitize_verbose`].
#[derive(Debug, Clone)]
pub struct SanitizeReport {
    /// The original input text, before any clipping.
    pub text: String,
    /// Conforming rewrites, best first.
    pub results: Vec<String>,
    /// Total elapsed time spent matching + ranking.
    pub elapsed: Duration,
    /// Compact debugging details for the run.
    pub details: SanitizeDetails,
}

/// Additional details returned by [`Grammar::parse_and_sanitize_verbose`].
///
/// This is intentionally compact: it's meant for debugging and performance
/// inspection without dumping the entire candidate set.
#[derive(Debug, Clone)]
pub struct SanitizeDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Time spent inside the match engine.
    pub matching: Duration,
    /// Time spent deduplicating and ordering candidates.
    pub ranking: Duration,
    /// The input actually matched, after clipping to the rule's bound.
    pub matched_text: String,
    /// Whether clipping shortened the input.
    pub truncated: bool,
    /// Number of raw candidates the engine produced, complete or not.
    pub raw_candidates: usize,
    /// Candidates that consumed the entire (clipped) input.
    pub full_matches: usize,
    /// Full matches remaining after deduplication.
    pub unique_results: usize,
    /// Rule nodes entered during the match, counting revisits.
    pub nodes_visited: usize,
    /// Suggestion functions invoked on local misses.
    pub suggestions_invoked: usize,
    /// Reference descents cut by cycle detection.
    pub cycles_cut: usize,
    /// The first few raw candidates, for a quick look at what the engine saw.
    pub samples: Vec<CandidateSummary>,
}

/// A compact candidate summary used in verbose reports.
#[derive(Debug, Clone)]
pub struct CandidateSummary {
    /// What the candidate consumed, clipped to 80 characters for display.
    pub consumed: String,
    /// How many characters of input it left unconsumed.
    pub rest_chars: usize,
    /// Whether it consumed everything (only these can become results).
    pub complete: bool,
}

impl Grammar {
    /// Match `input` against `rule` and return every conforming rewrite,
    /// best first.
    ///
    /// If the rule carries a maximum length, the input is clipped to it up
    /// front, so overlong input degrades to sanitizing its head instead of
    /// failing outright. Only candidates that consumed the whole (clipped)
    /// input survive; they are deduplicated and ordered longest first, with
    /// ties broken lexicographically. Input that already conforms comes back
    /// as exactly `vec![input]`.
    ///
    /// # Example
    /// ```
    /// use emend::Grammar;
    ///
    /// let mut g = Grammar::new();
    /// let rule = emend::rules::rfc1035::lower_label(&mut g, None);
    /// assert_eq!(g.parse_and_sanitize("Hello", rule), vec!["hello"]);
    /// ```
    pub fn parse_and_sanitize(&self, input: &str, rule: Rule) -> Vec<String> {
        let clipped = clip_chars(input, self.max_length(rule));
        let outcome = engine::run(self, rule, clipped);
        rank(dedup_full(outcome.results))
    }

    /// Like [`Grammar::parse_and_sanitize`], but also returns timing,
    /// counters and a sample of the raw candidates.
    ///
    /// Useful for profiling and grammar debugging. The plain entry point
    /// does not allocate any of the extra details.
    pub fn parse_and_sanitize_verbose(&self, input: &str, rule: Rule) -> SanitizeReport {
        let started = Instant::now();
        let clipped = clip_chars(input, self.max_length(rule));
        let outcome = engine::run(self, rule, clipped);

        let raw_candidates = outcome.results.len();
        let full_matches = outcome.results.iter().filter(|r| r.rest.is_empty()).count();
        let samples: Vec<CandidateSummary> =
            outcome.results.iter().take(8).map(summarize_candidate).collect();

        let ranking_started = Instant::now();
        let unique = dedup_full(outcome.results);
        let unique_results = unique.len();
        let results = rank(unique);
        let ranking = ranking_started.elapsed();

        let total = started.elapsed();
        SanitizeReport {
            text: input.to_string(),
            results,
            elapsed: total,
            details: SanitizeDetails {
                total,
                matching: outcome.duration,
                ranking,
                matched_text: clipped.to_string(),
                truncated: clipped.len() != input.len(),
                raw_candidates,
                full_matches,
                unique_results,
                nodes_visited: outcome.stats.nodes_visited,
                suggestions_invoked: outcome.stats.suggestions_invoked,
                cycles_cut: outcome.stats.cycles_cut,
                samples,
            },
        }
    }
}

/// Clip `input` to at most `limit` characters.
fn clip_chars(input: &str, limit: usize) -> &str {
    if limit == UNLIMITED {
        return input;
    }
    match input.char_indices().nth(limit) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

fn dedup_full(results: Vec<ParseResult>) -> HashSet<String> {
    results.into_iter().filter(|r| r.rest.is_empty()).map(|r| r.consumed).collect()
}

/// Longest first; equal lengths sort lexicographically. Lengths are counted
/// in characters so multi-byte text ranks the same as ASCII.
fn rank(unique: HashSet<String>) -> Vec<String> {
    let mut out: Vec<String> = unique.into_iter().collect();
    out.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
    out
}

fn summarize_candidate(result: &ParseResult) -> CandidateSummary {
    CandidateSummary {
        consumed: result.consumed.chars().take(80).collect(),
        rest_chars: result.rest.chars().count(),
        complete: result.rest.is_empty(),
    }
}
