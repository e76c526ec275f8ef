//! Match run metrics.
//!
//! Counters and timing collected alongside every match. The matcher always
//! fills them in; they are cheap enough (four integers and a clock read) that
//! there is no separate opt-out path.
//!
//! The driver in `api.rs` folds these into its verbose report; the plain
//! entry point simply drops them.

use crate::ParseResult;
use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

/// Counters accumulated while matching one input against one rule.
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchStats {
    /// Number of rule nodes entered, counting revisits.
    pub nodes_visited: usize,
    /// Number of suggestion functions invoked on a local miss.
    pub suggestions_invoked: usize,
    /// Number of reference descents cut by cycle detection.
    pub cycles_cut: usize,
    /// Number of partial results produced across all nodes, before the
    /// driver drops incomplete ones.
    pub results_produced: usize,
}

/// Matcher output bundled with its counters and wall-clock duration.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Every way the rule consumed a prefix of the input.
    pub results: Vec<ParseResult>,
    /// Counters for the run.
    pub stats: MatchStats,
    /// Elapsed time for the run.
    pub duration: Duration,
}
