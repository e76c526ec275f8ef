//! Rule constructors and the grammar builder surface.
//!
//! Everything here runs during the one-time construction phase: each method
//! takes `&mut Grammar`, appends arena nodes or registry entries, and hands
//! back `Rule` handles for composition. None of it executes a match.
//!
//! Misuse of the builder is a programmer error and panics immediately rather
//! than surfacing later as a confusing parse result:
//!
//! - a terminal's length bound must equal its text length,
//! - a character range's bound must be 1,
//! - the empty concatenation accepts only a bound of 0 (and never stores it),
//! - bounds and suggestions cannot be delegated through an unregistered name.
//!
//! Runtime input problems are never a panic; they simply produce no results.

use crate::{Grammar, Rule, RuleKind, SuggestionFn, UNLIMITED};
use rand::Rng;

/// Prefix reserved for names minted by [`Grammar::generate_unique_name`].
const GENERATED_NAME_PREFIX: &str = "___generated_rule_";

impl Grammar {
    fn push(&mut self, kind: RuleKind) -> Rule {
        let handle = Rule(self.nodes.len());
        self.nodes.push(crate::RuleNode { kind, max_len: UNLIMITED });
        handle
    }

    // --- Leaf constructors ---------------------------------------------------

    /// A rule matching exactly `text` as a prefix of the input.
    pub fn terminal(&mut self, text: &str) -> Rule {
        self.push(RuleKind::Terminal { text: text.to_string() })
    }

    /// A rule matching a single character whose code point lies in `[lo, hi]`.
    ///
    /// A descending range is normalized to match only `lo`.
    pub fn char_range(&mut self, lo: char, hi: char) -> Rule {
        let hi = if hi < lo { lo } else { hi };
        self.push(RuleKind::CharRange { lo, hi, suggest: None })
    }

    // --- Composite constructors ----------------------------------------------

    /// A rule matching the given rules in order, each consuming a prefix of
    /// what the previous one left over.
    ///
    /// Zero rules produce the empty match (only `""` conforms); a single rule
    /// is returned unwrapped; more are folded right into binary pairs, so
    /// `concat(&[a, b, c])` is `a · (b · c)`.
    pub fn concat(&mut self, rules: &[Rule]) -> Rule {
        match rules {
            [] => self.push(RuleKind::Empty),
            [single] => *single,
            [rest @ .., last] => {
                let mut merged = *last;
                for &rule in rest.iter().rev() {
                    merged = self.push(RuleKind::Concat { first: rule, second: merged });
                }
                merged
            }
        }
    }

    /// A rule matching any of `options`.
    ///
    /// Every matching branch contributes results, which is what keeps
    /// ambiguous grammars ambiguous instead of first-match-wins. With no
    /// options nothing matches, not even the empty input.
    pub fn alternative(&mut self, options: &[Rule]) -> Rule {
        self.push(RuleKind::Alternative { options: options.to_vec(), suggest: None })
    }

    // --- Named rules and references ------------------------------------------

    /// Register `rule` in this grammar's registry under `name` and return it
    /// unchanged. Re-registering a name overwrites the previous binding.
    pub fn named(&mut self, name: &str, rule: Rule) -> Rule {
        self.registry.insert(name.to_string(), rule);
        rule
    }

    /// A lazy reference to whatever rule is registered under `name` when a
    /// match runs. Referencing a name before registering it is legal; a name
    /// that is still unregistered at match time yields no results.
    pub fn rule_ref(&mut self, name: &str) -> Rule {
        self.push(RuleKind::NamedRef { name: name.to_string() })
    }

    /// Mint a registry name that is not currently bound.
    ///
    /// Names combine a reserved prefix with a random offset plus probe
    /// counter; the random offset keeps independently built sub-grammars from
    /// colliding. Panics if 50,000 consecutive probes are taken, which would
    /// mean the registry is pathologically congested.
    pub fn generate_unique_name(&self) -> String {
        let offset = rand::thread_rng().gen_range(0..10_000_000_000u64);
        for probe in 0..50_000u64 {
            let name = format!("{GENERATED_NAME_PREFIX}{}", offset + probe);
            if !self.registry.contains_key(&name) {
                return name;
            }
        }
        panic!("could not mint a free rule name after 50000 probes")
    }

    // --- Repetition ----------------------------------------------------------

    /// A rule matching between `min` and `max` consecutive occurrences of
    /// `rule`. `max` values below `min` are normalized up to `min`; pass
    /// [`UNLIMITED`] for no upper bound.
    ///
    /// Derivation:
    ///
    /// ```text
    /// seq(n, n, r)         -> r · r · ... · r          (n copies; n=1 is r itself)
    /// seq(m, n, r), n < ∞  -> alt(seq(m,m,r), ..., seq(n,n,r))
    /// seq(m, ∞, r)         -> seq(m,m,r) · s   where   s := "" | r | r · s
    /// ```
    ///
    /// The unbounded form registers `s` under a freshly minted unique name;
    /// its self-reference terminates through cycle detection, because every
    /// legitimate recursive step consumes input.
    pub fn seq(&mut self, min: usize, max: usize, rule: Rule) -> Rule {
        let max = max.max(min);
        if min == max {
            if min == 1 {
                return rule;
            }
            return self.concat(&vec![rule; min]);
        }
        if max == UNLIMITED {
            let prefix = self.seq(min, min, rule);
            let name = self.generate_unique_name();
            let empty = self.concat(&[]);
            let tail_ref = self.rule_ref(&name);
            let growth = self.concat(&[rule, tail_ref]);
            let body = self.alternative(&[empty, rule, growth]);
            let suffix = self.named(&name, body);
            return self.concat(&[prefix, suffix]);
        }
        let mut options = Vec::with_capacity(max - min + 1);
        for count in min..=max {
            let copies = vec![rule; count];
            options.push(self.concat(&copies));
        }
        self.alternative(&options)
    }

    /// Zero or one occurrence of `rule`; shorthand for `seq(0, 1, rule)`.
    pub fn opt(&mut self, rule: Rule) -> Rule {
        self.seq(0, 1, rule)
    }

    // --- Per-rule configuration ----------------------------------------------

    /// Set the maximum consumed length (in characters) for `rule` and return
    /// the same handle for chaining.
    ///
    /// How the bound is enforced depends on the variant: concatenations
    /// truncate overlong matches to it, alternatives drop them, and leaf
    /// variants only accept the one value that already fits (the terminal's
    /// text length, 1 for a character range). References delegate to their
    /// registered target. Violations panic.
    pub fn with_max_length(&mut self, rule: Rule, max_len: usize) -> Rule {
        match &self.node(rule).kind {
            RuleKind::Terminal { text } => {
                let expected = text.chars().count();
                if max_len != expected {
                    panic!("max length {max_len} does not fit terminal {text:?} (expected {expected})");
                }
            }
            RuleKind::CharRange { .. } => {
                if max_len != 1 {
                    panic!("max length for a character range must be 1 (got {max_len})");
                }
            }
            RuleKind::Concat { .. } | RuleKind::Alternative { .. } => {}
            RuleKind::NamedRef { name } => {
                let name = name.clone();
                let target = self
                    .lookup(&name)
                    .unwrap_or_else(|| panic!("cannot set max length through unregistered rule {name:?}"));
                return self.with_max_length(target, max_len);
            }
            RuleKind::Empty => {
                if max_len != 0 {
                    panic!("an empty concatenation cannot carry a max length other than 0");
                }
                // Deliberately not stored: the empty match has no length to bound.
                return rule;
            }
        }
        self.node_mut(rule).max_len = max_len;
        rule
    }

    /// Attach a repair generator to `rule` and return the same handle.
    ///
    /// Only character ranges and alternatives consult suggestions (they are
    /// the nodes that can fail locally); terminals and concatenations panic,
    /// and references delegate to their registered target.
    pub fn with_suggestion(&mut self, rule: Rule, suggest: SuggestionFn) -> Rule {
        match &mut self.node_mut(rule).kind {
            RuleKind::CharRange { suggest: slot, .. } | RuleKind::Alternative { suggest: slot, .. } => {
                *slot = Some(suggest);
                rule
            }
            RuleKind::Terminal { .. } => panic!("suggestion functions are not supported on terminal rules"),
            RuleKind::Concat { .. } | RuleKind::Empty => {
                panic!("suggestion functions are not supported on concatenations; attach them to the parts")
            }
            RuleKind::NamedRef { name } => {
                let name = name.clone();
                let target = self
                    .lookup(&name)
                    .unwrap_or_else(|| panic!("cannot attach a suggestion through unregistered rule {name:?}"));
                self.with_suggestion(target, suggest)
            }
        }
    }

    /// The configured maximum length of `rule`, or [`UNLIMITED`].
    ///
    /// References report their target's bound (or [`UNLIMITED`] while the
    /// name is unregistered); the empty concatenation is always unbounded.
    pub fn max_length(&self, rule: Rule) -> usize {
        match &self.node(rule).kind {
            RuleKind::NamedRef { name } => match self.lookup(name) {
                Some(target) => self.max_length(target),
                None => UNLIMITED,
            },
            RuleKind::Empty => UNLIMITED,
            _ => self.node(rule).max_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_accepts_its_own_length_as_bound() {
        let mut g = Grammar::new();
        let t = g.terminal("abcd");
        g.with_max_length(t, 4);
        assert_eq!(g.max_length(t), 4);
    }

    #[test]
    #[should_panic(expected = "does not fit terminal")]
    fn terminal_rejects_a_short_bound() {
        let mut g = Grammar::new();
        let t = g.terminal("abcd");
        g.with_max_length(t, 3);
    }

    #[test]
    #[should_panic(expected = "does not fit terminal")]
    fn terminal_rejects_a_long_bound() {
        let mut g = Grammar::new();
        let t = g.terminal("abcd");
        g.with_max_length(t, 5);
    }

    #[test]
    #[should_panic(expected = "not supported on terminal")]
    fn terminal_rejects_suggestions() {
        let mut g = Grammar::new();
        let t = g.terminal("a");
        g.with_suggestion(t, crate::const_char('x'));
    }

    #[test]
    fn char_range_accepts_bound_of_one() {
        let mut g = Grammar::new();
        let r = g.char_range('a', 'z');
        g.with_max_length(r, 1);
        assert_eq!(g.max_length(r), 1);
    }

    #[test]
    #[should_panic(expected = "must be 1")]
    fn char_range_rejects_bound_of_zero() {
        let mut g = Grammar::new();
        let r = g.char_range('a', 'z');
        g.with_max_length(r, 0);
    }

    #[test]
    #[should_panic(expected = "must be 1")]
    fn char_range_rejects_bound_of_two() {
        let mut g = Grammar::new();
        let r = g.char_range('a', 'z');
        g.with_max_length(r, 2);
    }

    #[test]
    fn descending_char_range_collapses_to_its_start() {
        let mut g = Grammar::new();
        let r = g.char_range('z', 'a');
        assert_eq!(g.parse_and_sanitize("z", r), vec!["z"]);
        assert!(g.parse_and_sanitize("a", r).is_empty());
    }

    #[test]
    fn empty_concat_accepts_only_bound_zero_and_stays_unbounded() {
        let mut g = Grammar::new();
        let empty = g.concat(&[]);
        g.with_max_length(empty, 0);
        assert_eq!(g.max_length(empty), UNLIMITED);
    }

    #[test]
    #[should_panic(expected = "empty concatenation")]
    fn empty_concat_rejects_nonzero_bound() {
        let mut g = Grammar::new();
        let empty = g.concat(&[]);
        g.with_max_length(empty, 1);
    }

    #[test]
    #[should_panic(expected = "not supported on concatenations")]
    fn concat_rejects_suggestions() {
        let mut g = Grammar::new();
        let a = g.terminal("a");
        let b = g.terminal("b");
        let c = g.concat(&[a, b]);
        g.with_suggestion(c, crate::const_char('x'));
    }

    #[test]
    fn single_element_concat_is_the_element_itself() {
        let mut g = Grammar::new();
        let a = g.terminal("a");
        assert_eq!(g.concat(&[a]), a);
    }

    #[test]
    fn unconfigured_rules_report_unlimited() {
        let mut g = Grammar::new();
        let t = g.terminal("abc");
        let r = g.char_range('a', 'z');
        let c = g.concat(&[t, r]);
        let alt = g.alternative(&[t, r]);
        for rule in [t, r, c, alt] {
            assert_eq!(g.max_length(rule), UNLIMITED);
        }
    }

    #[test]
    fn reference_bound_delegates_to_the_registered_target() {
        let mut g = Grammar::new();
        let a = g.terminal("ab");
        g.named("pair", a);
        let reference = g.rule_ref("pair");
        g.with_max_length(reference, 2);
        assert_eq!(g.max_length(a), 2);
        assert_eq!(g.max_length(reference), 2);
    }

    #[test]
    fn reference_bound_is_unlimited_while_unregistered() {
        let mut g = Grammar::new();
        let reference = g.rule_ref("later");
        assert_eq!(g.max_length(reference), UNLIMITED);
    }

    #[test]
    #[should_panic(expected = "unregistered rule")]
    fn reference_bound_panics_for_an_unregistered_name() {
        let mut g = Grammar::new();
        let reference = g.rule_ref("missing");
        g.with_max_length(reference, 1);
    }

    #[test]
    fn reference_suggestion_delegates_to_the_registered_target() {
        let mut g = Grammar::new();
        let r = g.char_range('a', 'z');
        g.named("letterish", r);
        let reference = g.rule_ref("letterish");
        g.with_suggestion(reference, crate::const_char('q'));
        assert_eq!(g.parse_and_sanitize("!", r), vec!["q"]);
    }

    #[test]
    #[should_panic(expected = "unregistered rule")]
    fn reference_suggestion_panics_for_an_unregistered_name() {
        let mut g = Grammar::new();
        let reference = g.rule_ref("missing");
        g.with_suggestion(reference, crate::const_char('q'));
    }

    #[test]
    fn re_registering_a_name_overwrites_the_binding() {
        let mut g = Grammar::new();
        let a = g.terminal("a");
        let b = g.terminal("b");
        g.named("it", a);
        g.named("it", b);
        let reference = g.rule_ref("it");
        assert_eq!(g.parse_and_sanitize("b", reference), vec!["b"]);
        assert!(g.parse_and_sanitize("a", reference).is_empty());
    }

    #[test]
    fn forward_references_resolve_at_match_time() {
        let mut g = Grammar::new();
        let reference = g.rule_ref("later");
        assert!(g.parse_and_sanitize("a", reference).is_empty());
        let a = g.terminal("a");
        g.named("later", a);
        assert_eq!(g.parse_and_sanitize("a", reference), vec!["a"]);
    }

    #[test]
    fn generated_names_are_fresh_and_reserved() {
        let mut g = Grammar::new();
        let first = g.generate_unique_name();
        assert!(first.starts_with(GENERATED_NAME_PREFIX));
        assert!(g.lookup(&first).is_none());

        // Once taken, the next mint must land elsewhere.
        let t = g.terminal("x");
        g.named(&first, t);
        let second = g.generate_unique_name();
        assert_ne!(first, second);
    }

    #[test]
    fn seq_normalizes_max_below_min_up_to_min() {
        let mut g = Grammar::new();
        let a = g.terminal("a");
        let s = g.seq(3, 1, a);
        assert_eq!(g.parse_and_sanitize("aaa", s), vec!["aaa"]);
        assert!(g.parse_and_sanitize("a", s).is_empty());
        assert!(g.parse_and_sanitize("aaaa", s).is_empty());
    }

    #[test]
    fn seq_of_exactly_one_is_the_rule_itself() {
        let mut g = Grammar::new();
        let a = g.terminal("a");
        assert_eq!(g.seq(1, 1, a), a);
    }

    #[test]
    fn unbounded_seq_registers_its_suffix_rule() {
        let mut g = Grammar::new();
        let a = g.terminal("a");
        let before = g.registry.len();
        g.seq(0, UNLIMITED, a);
        assert_eq!(g.registry.len(), before + 1);
    }
}
