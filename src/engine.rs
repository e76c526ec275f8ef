//! Backtracking match engine.
//!
//! This module is the *internal entry point* for turning a rule and an input
//! string into the complete set of [`crate::ParseResult`]s. The public driver
//! in `api.rs` sits on top of it and only adds truncation, dedup and ranking.
//!
//! ## How the parts work together
//!
//! A match is a straightforward recursive descent:
//!
//! ```text
//! Grammar + Rule + input
//!          │
//!          v
//!      run (matcher.rs)
//!        - fresh Context, fresh MatchStats, start the clock
//!          │
//!          v
//!      Matcher::match_rule (matcher.rs)
//!        - dispatch on the rule variant
//!        - concat: every split of first × second
//!        - alternative: every option, suggestions on miss
//!        - named ref: registry lookup, guarded by Context (context.rs)
//!          │
//!          v
//!      MatchOutcome (metrics.rs)
//!        - all results, counters, wall-clock duration
//! ```
//!
//! The engine is **exhaustive**: instead of stopping at the first parse it
//! materializes every way the rule can consume a prefix of the input,
//! including repaired prefixes proposed by suggestion functions. Ranking and
//! deduplication are deliberately not its job; callers that only want
//! conforming rewrites filter for an empty `rest` afterwards.
//!
//! ## Responsibilities by module
//!
//! - `matcher.rs`: the per-variant match rules and the `run` entry point.
//! - `context.rs`: the visited set that cuts left-recursive reference cycles.
//! - `metrics.rs`: counters and timing captured alongside the results.
//!
//! ## Debugging
//!
//! Set `EMEND_DEBUG_RULES=1` to print match entry, cycle cuts and unresolved
//! reference traces to stderr.

#[path = "engine/context.rs"]
mod context;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;

pub(crate) use matcher::run;
