//! Value grammar matching and selector matching for the Wombat styling engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Value grammars** ([CSS Values and Units Level 4, § 2](https://www.w3.org/TR/css-values-4/#value-defs))
//!   - Keyword and data type terminals
//!   - The `|`, `||`, `&&`, juxtaposition, and group combinators
//!   - `{A,B}` range multipliers
//!
//! - **Grammar-directed matching**
//!   - A backtracking cursor walk over a token stream, generic over a
//!     terminal strategy ([`matcher::TerminalPredicates`])
//!   - Optimistic acceptance of unresolved variable references
//!
//! - **Declaration matching**
//!   - [`matcher::value::match_property_value`] over a [`sheet::StyleSheet`]'s
//!     decoded value pools, reporting a structured
//!     [`matcher::value::MatchResult`]
//!
//! - **Selector matching** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Compound selector tests with pseudo-state dependency masks
//!   - Right-to-left chain walking with descendant-combinator backtracking
//!   - Indexed candidate lookup keyed by each chain's rightmost compound
//!     ([`selector::find_matches`])
//!
//! # Not Implemented
//!
//! - Parsing value-definition syntax or selector text (grammar trees and
//!   selector chains are built by the host's parsers)
//! - Custom property resolution (variable references match optimistically and
//!   are re-checked after substitution)
//! - Cascade ordering (specificity is carried on each chain, not computed)

/// Property value grammar trees per [CSS Values and Units Level 4, § 2](https://www.w3.org/TR/css-values-4/#value-defs).
pub mod grammar;
/// Grammar-directed value matching over a pluggable terminal strategy.
pub mod matcher;
/// Selector matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Compiled stylesheet storage: value pools, chains, and candidate indexes.
pub mod sheet;
/// Decoded style value types.
pub mod values;
