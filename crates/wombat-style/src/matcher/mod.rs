//! Grammar-directed value matching.
//!
//! Walks a parsed value grammar ([`Expression`]) against a positional cursor
//! over an ordered token stream, per the matching semantics of the CSS value
//! definition syntax
//! ([CSS Values and Units Level 4, § 2](https://www.w3.org/TR/css-values-4/#value-defs)).
//!
//! The walker is generic over [`TerminalPredicates`]: everything it needs to
//! know about a concrete token representation is answered through that trait,
//! keyed by token position. [`value`] supplies the implementation for decoded
//! stylesheet values.

/// Terminal decisions and the match entry point for decoded stylesheet values.
pub mod value;

use wombat_common::warning::{WarningKind, warn_once};

use crate::grammar::{Combinator, DataType, Expression, MultiplierKind, Term};

/// Largest combinator arity the unordered-matching scratch mask can track.
const MAX_MANY_ARITY: usize = u64::BITS as usize;

/// Terminal decisions consulted by [`GrammarMatcher`].
///
/// One predicate per grammar terminal, each answering whether the token at
/// `position` satisfies it. Positions past the end of the stream never
/// satisfy any predicate.
pub trait TerminalPredicates {
    /// Number of tokens in the stream.
    fn value_count(&self) -> usize;

    /// Whether the token at `position` is an unresolved variable reference.
    fn is_variable(&self, position: usize) -> bool;

    /// Whether the token at `position` satisfies the literal `keyword`.
    fn matches_keyword(&self, position: usize, keyword: &str) -> bool;

    /// `<number>` terminal.
    fn matches_number(&self, position: usize) -> bool;

    /// `<integer>` terminal.
    fn matches_integer(&self, position: usize) -> bool;

    /// `<length>` terminal.
    fn matches_length(&self, position: usize) -> bool;

    /// `<percentage>` terminal.
    fn matches_percentage(&self, position: usize) -> bool;

    /// `<color>` terminal.
    fn matches_color(&self, position: usize) -> bool;

    /// `<resource>` terminal.
    fn matches_resource(&self, position: usize) -> bool;

    /// `<url>` terminal.
    fn matches_url(&self, position: usize) -> bool;
}

/// Backtracking walker over one value grammar and one token stream.
///
/// Owns only transient cursor state: the position, the mark stack used for
/// transactional backtracking inside combinators, and the count of tokens
/// accepted as unresolved variable references. Create one per match attempt,
/// or reuse by calling [`GrammarMatcher::initialize`] between attempts.
/// Not safe for concurrent use without external synchronization.
#[derive(Debug)]
pub struct GrammarMatcher<'a, T> {
    tokens: &'a T,
    position: usize,
    mark_stack: Vec<usize>,
    matched_variable_count: usize,
}

impl<'a, T: TerminalPredicates> GrammarMatcher<'a, T> {
    /// Create a matcher over `tokens` with the cursor at the first token.
    pub fn new(tokens: &'a T) -> Self {
        Self {
            tokens,
            position: 0,
            mark_stack: Vec::new(),
            matched_variable_count: 0,
        }
    }

    /// Reset the cursor, the mark stack, and the variable counter.
    pub fn initialize(&mut self) {
        self.position = 0;
        self.mark_stack.clear();
        self.matched_variable_count = 0;
    }

    /// Current cursor position in the token stream.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Whether the cursor still points at a token.
    #[must_use]
    pub fn has_current(&self) -> bool {
        self.position < self.tokens.value_count()
    }

    /// Number of tokens accepted solely because they are variable references.
    #[must_use]
    pub const fn matched_variable_count(&self) -> usize {
        self.matched_variable_count
    }

    /// Advance the cursor past the current token.
    pub fn move_next(&mut self) {
        self.position += 1;
    }

    /// Match `expr` at the cursor, honouring its multiplier.
    ///
    /// Range repetition is greedy and does not backtrack into earlier
    /// repetitions: a grammar where an early greedy match consumes a token a
    /// later sibling needs can under-match.
    pub fn matches(&mut self, expr: &Expression) -> bool {
        match expr.multiplier.kind {
            MultiplierKind::None => self.match_expression(expr),
            MultiplierKind::Range => {
                let mut matched = 0;
                while matched < expr.multiplier.max
                    && self.has_current()
                    && self.match_expression(expr)
                {
                    matched += 1;
                }
                expr.multiplier.min <= matched
            }
            MultiplierKind::OneOrMoreComma | MultiplierKind::GroupAtLeastOne => {
                debug_assert!(
                    false,
                    "multiplier kind {} is never produced by the grammar parser",
                    expr.multiplier.kind
                );
                warn_once(
                    WarningKind::UnsupportedMultiplier,
                    &expr.multiplier.kind.to_string(),
                );
                false
            }
        }
    }

    /// Match `expr` exactly once, ignoring its multiplier.
    fn match_expression(&mut self, expr: &Expression) -> bool {
        let matched = match &expr.term {
            Term::Combinator(_) => self.match_combinator(expr),
            Term::Keyword(_) | Term::DataType(_) if self.current_is_variable() => {
                // An unresolved variable reference validates against any
                // terminal; the real check is deferred until substitution.
                self.matched_variable_count += 1;
                self.move_next();
                true
            }
            Term::Keyword(keyword) => {
                let matched =
                    self.has_current() && self.tokens.matches_keyword(self.position, keyword);
                if matched {
                    self.move_next();
                }
                matched
            }
            Term::DataType(data_type) => {
                let matched = self.match_data_type(*data_type);
                if matched {
                    self.move_next();
                }
                matched
            }
        };
        if matched {
            return true;
        }
        // A trailing grammar slot can be absorbed by an earlier variable
        // reference: its expansion length is unknown at match time, so it may
        // already cover this slot.
        !self.has_current() && self.matched_variable_count > 0
    }

    /// Match a combinator node transactionally: any cursor movement made by
    /// sub-expressions is undone when the node as a whole fails.
    fn match_combinator(&mut self, expr: &Expression) -> bool {
        let Term::Combinator(combinator) = &expr.term else {
            return false;
        };
        let subs = &expr.sub_expressions;
        self.save_mark();
        let matched = match combinator {
            Combinator::Or => subs.iter().any(|sub| self.matches(sub)),
            Combinator::OrOr => self.match_many(subs) >= 1,
            Combinator::AndAnd => self.match_many(subs) == subs.len(),
            Combinator::Juxtaposition => subs.iter().all(|sub| self.matches(sub)),
            Combinator::Group => {
                debug_assert!(subs.len() == 1, "group must wrap exactly one expression");
                subs.first().is_some_and(|sub| self.matches(sub))
            }
        };
        if matched {
            self.discard_mark();
        } else {
            self.restore_mark();
        }
        matched
    }

    /// Shared matcher for the order-independent combinators (`||`, `&&`).
    ///
    /// Scans the sub-expressions from index 0, skipping ones already
    /// consumed, and attempts the first candidate; each success either marks
    /// a specific index consumed or, when the success came from a variable
    /// reference, counts as implicit progress with no index pinned (the
    /// variable's expansion could stand for any remaining slot). Returns how
    /// many sub-expressions were covered, consumed and absorbed together.
    fn match_many(&mut self, subs: &[Expression]) -> usize {
        debug_assert!(
            subs.len() <= MAX_MANY_ARITY,
            "combinator arity exceeds the scratch mask capacity"
        );
        if subs.len() > MAX_MANY_ARITY {
            warn_once(
                WarningKind::OversizedCombinator,
                &format!("{} alternates", subs.len()),
            );
            return 0;
        }
        let mut consumed: u64 = 0;
        let mut consumed_count = 0;
        let mut absorbed_count = 0;
        loop {
            let mut progressed = false;
            for (index, sub) in subs.iter().enumerate() {
                if consumed & (1_u64 << index) != 0 {
                    continue;
                }
                let variables_before = self.matched_variable_count;
                if !self.matches(sub) {
                    continue;
                }
                if self.matched_variable_count > variables_before {
                    absorbed_count += 1;
                } else {
                    consumed |= 1_u64 << index;
                    consumed_count += 1;
                }
                progressed = true;
                break;
            }
            if !progressed || consumed_count + absorbed_count >= subs.len() {
                return consumed_count + absorbed_count;
            }
        }
    }

    /// Dispatch a data type terminal to its predicate.
    fn match_data_type(&mut self, data_type: DataType) -> bool {
        if !self.has_current() {
            return false;
        }
        let position = self.position;
        match data_type {
            DataType::Number => self.tokens.matches_number(position),
            DataType::Integer => self.tokens.matches_integer(position),
            DataType::Length => self.tokens.matches_length(position),
            DataType::Percentage => self.tokens.matches_percentage(position),
            DataType::Color => self.tokens.matches_color(position),
            DataType::Resource => self.tokens.matches_resource(position),
            DataType::Url => self.tokens.matches_url(position),
        }
    }

    fn current_is_variable(&self) -> bool {
        self.has_current() && self.tokens.is_variable(self.position)
    }

    fn save_mark(&mut self) {
        self.mark_stack.push(self.position);
    }

    fn restore_mark(&mut self) {
        debug_assert!(!self.mark_stack.is_empty(), "unbalanced mark stack");
        if let Some(mark) = self.mark_stack.pop() {
            self.position = mark;
        }
    }

    fn discard_mark(&mut self) {
        debug_assert!(!self.mark_stack.is_empty(), "unbalanced mark stack");
        let _ = self.mark_stack.pop();
    }
}
