mod algebra;
mod api;
mod engine;
pub mod rules;
mod suggest;

pub use api::{CandidateSummary, SanitizeDetails, SanitizeReport};
pub use suggest::{const_char, merge, prepend_or_replace_first_char, replace_first_char, unless};

use std::collections::HashMap;
use std::sync::Arc;

// --- Core model --------------------------------------------------------------

/// Sentinel meaning "no maximum length constraint".
pub const UNLIMITED: usize = usize::MAX;

/// Handle to a rule stored in a [`Grammar`].
///
/// Handles are plain arena indices: `Copy`, cheap to embed, and only
/// meaningful for the grammar that created them. Composite rules hold handles
/// rather than copies, so mutating a shared child through the grammar during
/// construction is visible everywhere that child is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule(pub(crate) usize);

/// One interpretation of a prefix of the input: the text a rule accepted and
/// the unconsumed remainder at that point.
///
/// Grammars here may be ambiguous, so a single input can produce several
/// distinct `ParseResult`s, each describing a different reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseResult {
    /// The portion of input that was matched, possibly rewritten by a
    /// suggestion generator.
    pub consumed: String,
    /// The remaining unparsed suffix of the input.
    pub rest: String,
}

/// Repair generator invoked when a rule fails to match locally. It receives
/// the remaining input and proposes alternative [`ParseResult`]s.
///
/// Stored behind an `Arc` because one generator is commonly shared by several
/// rule nodes (see `rules::rfc1035`).
pub type SuggestionFn = Arc<dyn Fn(&str) -> Vec<ParseResult> + Send + Sync>;

/// Rule variants. `Empty` is the zero-element concatenation: it matches only
/// the empty prefix and is what `Grammar::concat(&[])` produces.
pub(crate) enum RuleKind {
    Terminal { text: String },
    CharRange { lo: char, hi: char, suggest: Option<SuggestionFn> },
    Concat { first: Rule, second: Rule },
    Alternative { options: Vec<Rule>, suggest: Option<SuggestionFn> },
    NamedRef { name: String },
    Empty,
}

impl std::fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::Terminal { text } => f.debug_struct("Terminal").field("text", text).finish(),
            RuleKind::CharRange { lo, hi, suggest } => f
                .debug_struct("CharRange")
                .field("lo", lo)
                .field("hi", hi)
                .field("suggest", &suggest.as_ref().map(|_| "<function>"))
                .finish(),
            RuleKind::Concat { first, second } => {
                f.debug_struct("Concat").field("first", first).field("second", second).finish()
            }
            RuleKind::Alternative { options, suggest } => f
                .debug_struct("Alternative")
                .field("options", options)
                .field("suggest", &suggest.as_ref().map(|_| "<function>"))
                .finish(),
            RuleKind::NamedRef { name } => f.debug_struct("NamedRef").field("name", name).finish(),
            RuleKind::Empty => f.write_str("Empty"),
        }
    }
}

/// An arena entry: the rule variant plus its optional length bound.
///
/// `max_len` counts characters, not bytes, and is [`UNLIMITED`] when no bound
/// has been set. How the bound applies differs per variant: concatenations
/// truncate overlong matches to it, alternatives drop them. `Empty` never
/// stores a bound (see `Grammar::with_max_length`).
#[derive(Debug)]
pub(crate) struct RuleNode {
    pub kind: RuleKind,
    pub max_len: usize,
}

/// Rule arena plus named-rule registry.
///
/// Rules are built through `&mut self` methods (`terminal`, `concat`, `seq`,
/// ...) during a one-time construction phase. Matching borrows the grammar
/// immutably, so a grammar is effectively frozen once the first parse begins;
/// the borrow checker enforces that split.
///
/// ## Invariants
///
/// - A [`Rule`] handle is an index into `nodes`. Handles from one grammar
///   must not be used with another.
/// - Registry values point at existing arena nodes. Re-registering a name
///   overwrites the previous binding; lookups are deferred to match time, so
///   forward references (a `rule_ref` to a name registered later) are legal.
#[derive(Debug, Default)]
pub struct Grammar {
    pub(crate) nodes: Vec<RuleNode>,
    pub(crate) registry: HashMap<String, Rule>,
}

impl Grammar {
    /// Create an empty grammar.
    pub fn new() -> Self {
        Grammar { nodes: Vec::new(), registry: HashMap::new() }
    }

    pub(crate) fn node(&self, rule: Rule) -> &RuleNode {
        &self.nodes[rule.0]
    }

    pub(crate) fn node_mut(&mut self, rule: Rule) -> &mut RuleNode {
        &mut self.nodes[rule.0]
    }

    /// Resolve a registered name to its rule handle, if any.
    pub(crate) fn lookup(&self, name: &str) -> Option<Rule> {
        self.registry.get(name).copied()
    }
}
