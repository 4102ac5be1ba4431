//! Property value grammar trees.
//!
//! Grammars follow the CSS value definition syntax per
//! [CSS Values and Units Level 4, § 2](https://www.w3.org/TR/css-values-4/#value-defs):
//! keywords and data types combined by combinators, each node optionally
//! carrying a repetition multiplier.
//!
//! Trees are parsed once per property by the grammar parser and are immutable
//! afterwards; the constructors here exist so grammars can also be assembled
//! directly (the test suites do).

use serde::Serialize;
use strum_macros::Display;

/// [§ 2.1 Component value types](https://www.w3.org/TR/css-values-4/#component-types)
///
/// The data types a grammar terminal can require of a value token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum DataType {
    /// "`<number>`" — "real numbers, possibly with a fractional component"
    Number,
    /// "`<integer>`" — "one or more decimal digits, 0 through 9"
    Integer,
    /// "`<length>`" — "a distance measurement"
    Length,
    /// "`<percentage>`" — "a number immediately followed by a percent sign"
    Percentage,
    /// "`<color>`" per [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
    Color,
    /// A path into the host's resource bundle.
    Resource,
    /// "`<url>`" — a reference to a loadable asset.
    Url,
}

/// [§ 2.2 Component value combinators](https://www.w3.org/TR/css-values-4/#component-combinators)
///
/// How a combinator node combines its sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum Combinator {
    /// "A bar (|) separates two or more alternatives: exactly one of them
    /// must occur." Alternatives are tried in declared order.
    Or,
    /// "A double bar (||) separates two or more options: one or more of them
    /// must occur, in any order."
    OrOr,
    /// "A double ampersand (&&) separates two or more components, all of
    /// which must occur, in any order."
    AndAnd,
    /// "Juxtaposing components means that all of them must occur, in the
    /// given order."
    Juxtaposition,
    /// "Brackets enclose several components ... to group them." Carries
    /// exactly one sub-expression.
    Group,
}

/// [§ 2.3 Component value multipliers](https://www.w3.org/TR/css-values-4/#component-multipliers)
///
/// Which repetition rule a [`Multiplier`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum MultiplierKind {
    /// No repetition; the node must occur exactly once.
    None,
    /// "A curly brace block, {A,B}, indicates that the preceding type, word,
    /// or group occurs at least A and at most B times." Also covers `?`, `*`,
    /// and `+`, which the grammar parser lowers to ranges.
    Range,
    /// "#" — one or more, comma-separated. The grammar parser never produces
    /// this kind.
    OneOrMoreComma,
    /// "!" — the group must produce at least one value. The grammar parser
    /// never produces this kind.
    GroupAtLeastOne,
}

/// Repetition constraint attached to a grammar node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Multiplier {
    /// Which repetition rule applies.
    pub kind: MultiplierKind,
    /// Minimum number of occurrences.
    pub min: usize,
    /// Maximum number of occurrences.
    pub max: usize,
}

impl Multiplier {
    /// The single-occurrence multiplier carried by unannotated nodes.
    pub const NONE: Self = Self {
        kind: MultiplierKind::None,
        min: 1,
        max: 1,
    };

    /// A `{min,max}` range multiplier.
    #[must_use]
    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            kind: MultiplierKind::Range,
            min,
            max,
        }
    }
}

/// What one grammar node requires of the value stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Term {
    /// A literal keyword such as `auto` or `hidden`.
    Keyword(String),
    /// A data type terminal such as `<length>`.
    DataType(DataType),
    /// A combinator over the node's sub-expressions.
    Combinator(Combinator),
}

/// One node of a parsed value grammar.
///
/// Immutable once built; a grammar tree is shared by every match attempt
/// against the property it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    /// What this node requires.
    pub term: Term,
    /// Child expressions; empty for terminals.
    pub sub_expressions: Vec<Expression>,
    /// Repetition constraint for this node.
    pub multiplier: Multiplier,
}

impl Expression {
    /// A keyword terminal.
    #[must_use]
    pub fn keyword(word: &str) -> Self {
        Self {
            term: Term::Keyword(word.to_string()),
            sub_expressions: Vec::new(),
            multiplier: Multiplier::NONE,
        }
    }

    /// A data type terminal.
    #[must_use]
    pub const fn data_type(data_type: DataType) -> Self {
        Self {
            term: Term::DataType(data_type),
            sub_expressions: Vec::new(),
            multiplier: Multiplier::NONE,
        }
    }

    /// An ordered-alternation (`|`) node.
    #[must_use]
    pub fn or(sub_expressions: Vec<Self>) -> Self {
        Self::combinator(Combinator::Or, sub_expressions)
    }

    /// A one-or-more-in-any-order (`||`) node.
    #[must_use]
    pub fn or_or(sub_expressions: Vec<Self>) -> Self {
        Self::combinator(Combinator::OrOr, sub_expressions)
    }

    /// An all-in-any-order (`&&`) node.
    #[must_use]
    pub fn and_and(sub_expressions: Vec<Self>) -> Self {
        Self::combinator(Combinator::AndAnd, sub_expressions)
    }

    /// A strict-sequence (juxtaposition) node.
    #[must_use]
    pub fn sequence(sub_expressions: Vec<Self>) -> Self {
        Self::combinator(Combinator::Juxtaposition, sub_expressions)
    }

    /// A bracketed group around a single expression.
    #[must_use]
    pub fn group(sub_expression: Self) -> Self {
        Self::combinator(Combinator::Group, vec![sub_expression])
    }

    /// Attach a `{min,max}` range multiplier to this node.
    #[must_use]
    pub const fn with_multiplier(mut self, min: usize, max: usize) -> Self {
        self.multiplier = Multiplier::range(min, max);
        self
    }

    fn combinator(combinator: Combinator, sub_expressions: Vec<Self>) -> Self {
        Self {
            term: Term::Combinator(combinator),
            sub_expressions,
            multiplier: Multiplier::NONE,
        }
    }
}
