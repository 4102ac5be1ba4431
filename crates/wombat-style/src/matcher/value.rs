//! Terminal decisions for decoded stylesheet values, and the property value
//! match entry point.
//!
//! [`PropertyValues`] binds one declaration's value list to its owning
//! [`StyleSheet`] and answers the [`TerminalPredicates`] queries;
//! [`match_property_value`] runs the grammar walk and reports a structured
//! [`MatchResult`].

use serde::Serialize;
use thiserror::Error;

use crate::grammar::Expression;
use crate::matcher::{GrammarMatcher, TerminalPredicates};
use crate::sheet::{DimensionUnit, StyleSheet, ValueHandle, ValueKind};
use crate::values::color::ColorValue;

/// Why a declaration's values failed to match their property grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum MatchError {
    /// The declaration carried no value tokens at all.
    #[error("empty value")]
    EmptyValue,
    /// A token did not fit the grammar at the cursor position.
    #[error("syntax error")]
    Syntax,
    /// The grammar was satisfied but tokens were left over.
    #[error("expected end of value")]
    ExpectedEndOfValue,
}

/// Outcome of matching one declaration's values against a property grammar.
///
/// Callers branch on `error` to decide whether to apply the value, warn, or
/// fall back to the property's initial value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// The failure, or `None` on a complete match.
    pub error: Option<MatchError>,
    /// Diagnostic rendering of the offending token; empty on success and on
    /// empty input.
    pub error_value: String,
}

impl MatchResult {
    /// A complete, error-free match.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            error: None,
            error_value: String::new(),
        }
    }

    /// Whether the values matched the grammar completely.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.error.is_none()
    }

    fn failure(error: MatchError, error_value: String) -> Self {
        Self {
            error: Some(error),
            error_value,
        }
    }
}

/// One declaration's decoded values, viewed through [`TerminalPredicates`].
#[derive(Debug, Clone, Copy)]
pub struct PropertyValues<'a> {
    sheet: &'a StyleSheet,
    values: &'a [ValueHandle],
}

impl<'a> PropertyValues<'a> {
    /// Bind a declaration's value list to its owning sheet.
    #[must_use]
    pub const fn new(sheet: &'a StyleSheet, values: &'a [ValueHandle]) -> Self {
        Self { sheet, values }
    }

    fn handle(&self, position: usize) -> Option<ValueHandle> {
        self.values.get(position).copied()
    }

    fn kind(&self, position: usize) -> Option<ValueKind> {
        self.handle(position).map(|handle| handle.kind)
    }
}

impl TerminalPredicates for PropertyValues<'_> {
    fn value_count(&self) -> usize {
        self.values.len()
    }

    fn is_variable(&self, position: usize) -> bool {
        self.kind(position) == Some(ValueKind::Variable)
    }

    fn matches_keyword(&self, position: usize, keyword: &str) -> bool {
        let Some(handle) = self.handle(position) else {
            return false;
        };
        match handle.kind {
            ValueKind::Keyword => self
                .sheet
                .string(handle)
                .is_some_and(|word| word.eq_ignore_ascii_case(keyword)),
            // Enum tokens decode to canonical lowercase strings.
            ValueKind::Enum => self
                .sheet
                .string(handle)
                .is_some_and(|word| word == keyword.to_ascii_lowercase()),
            _ => false,
        }
    }

    fn matches_number(&self, position: usize) -> bool {
        self.kind(position) == Some(ValueKind::Float)
    }

    fn matches_integer(&self, position: usize) -> bool {
        // <integer> is as permissive as <number>: integer-ness of the decoded
        // float is not checked.
        self.kind(position) == Some(ValueKind::Float)
    }

    fn matches_length(&self, position: usize) -> bool {
        let Some(handle) = self.handle(position) else {
            return false;
        };
        match handle.kind {
            ValueKind::Dimension => self
                .sheet
                .dimension(handle)
                .is_some_and(|dimension| dimension.unit == DimensionUnit::Px),
            // A unitless zero is a valid length.
            ValueKind::Float => self.sheet.float(handle).is_some_and(|value| value == 0.0),
            _ => false,
        }
    }

    fn matches_percentage(&self, position: usize) -> bool {
        let Some(handle) = self.handle(position) else {
            return false;
        };
        match handle.kind {
            ValueKind::Dimension => self
                .sheet
                .dimension(handle)
                .is_some_and(|dimension| dimension.unit == DimensionUnit::Percent),
            // A unitless zero is a valid percentage.
            ValueKind::Float => self.sheet.float(handle).is_some_and(|value| value == 0.0),
            _ => false,
        }
    }

    fn matches_color(&self, position: usize) -> bool {
        let Some(handle) = self.handle(position) else {
            return false;
        };
        match handle.kind {
            ValueKind::Color => true,
            ValueKind::Enum => self
                .sheet
                .string(handle)
                .is_some_and(|word| ColorValue::from_named(word).is_some()),
            _ => false,
        }
    }

    fn matches_resource(&self, position: usize) -> bool {
        self.kind(position) == Some(ValueKind::ResourcePath)
    }

    fn matches_url(&self, position: usize) -> bool {
        self.kind(position) == Some(ValueKind::AssetReference)
    }
}

/// Decide whether one declaration's `values` conform to `grammar`.
///
/// A leading literal `none` keyword completes without consulting the grammar;
/// nearly every property grammar accepts it as the empty alternative. The
/// failure paths carry the offending token's diagnostic text: the token at
/// the failed cursor position for [`MatchError::Syntax`], the first
/// unconsumed token for [`MatchError::ExpectedEndOfValue`].
#[must_use]
pub fn match_property_value(
    sheet: &StyleSheet,
    grammar: &Expression,
    values: &[ValueHandle],
) -> MatchResult {
    if values.is_empty() {
        return MatchResult::failure(MatchError::EmptyValue, String::new());
    }
    let tokens = PropertyValues::new(sheet, values);
    let mut matcher = GrammarMatcher::new(&tokens);
    matcher.initialize();

    let matched = if tokens.matches_keyword(0, "none") {
        matcher.move_next();
        true
    } else {
        matcher.matches(grammar)
    };

    if !matched {
        let text = offending_text(sheet, values, matcher.position());
        return MatchResult::failure(MatchError::Syntax, text);
    }
    if matcher.has_current() {
        let text = offending_text(sheet, values, matcher.position());
        return MatchResult::failure(MatchError::ExpectedEndOfValue, text);
    }
    MatchResult::success()
}

/// Diagnostic text for the token at `position`, clamped to the last token
/// when the cursor ran past the end.
fn offending_text(sheet: &StyleSheet, values: &[ValueHandle], position: usize) -> String {
    values
        .get(position)
        .or_else(|| values.last())
        .map(|handle| sheet.value_text(*handle))
        .unwrap_or_default()
}
