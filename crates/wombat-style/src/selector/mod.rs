//! Selector matching against the element tree.
//!
//! Implements compound selector tests with pseudo-state dependency tracking,
//! the right-to-left chain walk with descendant backtracking per
//! [Selectors Level 4, § 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators),
//! and indexed candidate lookup over the per-sheet key-selector buckets.

use serde::Serialize;
use wombat_tree::{ElementData, ElementId, ElementTree, PseudoStates};

use crate::sheet::StyleSheet;

/// Test applied by a [`SelectorPart::Predicate`] part.
pub type SelectorPredicate = fn(&ElementData) -> bool;

/// One condition inside a compound selector.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorPart {
    /// `.name` — class-list membership.
    Class(String),
    /// `#name` — element name equality.
    Id(String),
    /// `name` — element type name equality.
    Type(String),
    /// `*` — matches any element.
    Wildcard,
    /// `:name` — carried for diagnostics only; the state requirement itself
    /// lives in the compound's pseudo-state masks.
    PseudoClass(String),
    /// A host-supplied test invoked with the element's data.
    Predicate(SelectorPredicate),
}

/// How a compound selector relates to the previous (left) compound in its
/// chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relationship {
    /// Nothing to the left (the leftmost compound), or — between compounds —
    /// the previous compound must match the immediate parent.
    #[default]
    None,
    /// [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,
}

/// A combinator-free group of selector parts plus its pseudo-state
/// requirements, e.g. `button.primary:hover`.
///
/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
/// "A compound selector ... represents a set of simultaneous conditions on a
/// single element."
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelector {
    /// Structural conditions, all of which must hold.
    pub parts: Vec<SelectorPart>,
    /// States that must all be present on the element.
    pub pseudo_states: PseudoStates,
    /// States that must all be absent from the element.
    pub negated_pseudo_states: PseudoStates,
    /// How this compound relates to the previous one in its chain.
    pub previous_relationship: Relationship,
}

impl CompoundSelector {
    /// A compound with structural parts only: no state masks, no joint to a
    /// previous compound.
    #[must_use]
    pub fn new(parts: Vec<SelectorPart>) -> Self {
        Self {
            parts,
            pseudo_states: PseudoStates::NONE,
            negated_pseudo_states: PseudoStates::NONE,
            previous_relationship: Relationship::None,
        }
    }

    /// Require `present` states to be set and `absent` states to be clear.
    #[must_use]
    pub const fn with_states(mut self, present: PseudoStates, absent: PseudoStates) -> Self {
        self.pseudo_states = present;
        self.negated_pseudo_states = absent;
        self
    }

    /// Join this compound to the previous one with a descendant relationship.
    #[must_use]
    pub const fn descendant_of_previous(mut self) -> Self {
        self.previous_relationship = Relationship::Descendant;
        self
    }
}

/// An ordered chain of compound selectors; the rightmost compound is the key
/// selector an element must match directly.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorChain {
    /// Compound selectors in source order, leftmost first.
    pub parts: Vec<CompoundSelector>,
    /// Specificity, precomputed by the selector parser and only carried here.
    pub specificity: u32,
}

impl SelectorChain {
    /// A chain over `parts` with a precomputed specificity.
    #[must_use]
    pub const fn new(parts: Vec<CompoundSelector>, specificity: u32) -> Self {
        Self { parts, specificity }
    }

    /// The rightmost compound selector, used for indexed lookup.
    #[must_use]
    pub fn key_selector(&self) -> Option<&CompoundSelector> {
        self.parts.last()
    }
}

/// Outcome of testing one compound selector against one element, with the
/// pseudo-state bits the outcome depends on.
///
/// A set bit in `dependent_on_present` flips the outcome to failure when
/// cleared on the element; a set bit in `dependent_on_absent` flips it when
/// set. Callers use the masks to re-test only the selectors whose outcome can
/// actually change when an element's state flips. Both masks are zero when
/// the structural parts already failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchResultInfo {
    /// Whether the compound selector matched.
    pub success: bool,
    /// State bits that must stay present for the outcome to hold.
    pub dependent_on_present: PseudoStates,
    /// State bits that must stay absent for the outcome to hold.
    pub dependent_on_absent: PseudoStates,
}

/// One successful chain match, pointing back into the active sheet stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Index of the owning sheet within the active stack.
    pub sheet_index: usize,
    /// Declaration-order index of the chain within its sheet.
    pub chain_index: usize,
}

/// Everything needed to resolve the selectors that apply to one element.
#[derive(Debug, Clone, Copy)]
pub struct MatchingContext<'a> {
    /// The element tree being styled.
    pub tree: &'a ElementTree,
    /// The element to resolve.
    pub element: ElementId,
    /// The active stylesheet stack, lowest priority first.
    pub sheets: &'a [&'a StyleSheet],
}

/// Test one compound selector against one element.
///
/// Structural parts short-circuit on the first failure; the state masks are
/// only consulted once every structural part holds.
#[must_use]
pub fn matches_selector(element: &ElementData, compound: &CompoundSelector) -> MatchResultInfo {
    for part in &compound.parts {
        let part_matches = match part {
            SelectorPart::Class(name) => element.has_class(name),
            SelectorPart::Id(name) => element.name == *name,
            SelectorPart::Type(name) => element.type_name == *name,
            // Pseudo-class parts are checked through the state masks below.
            SelectorPart::Wildcard | SelectorPart::PseudoClass(_) => true,
            SelectorPart::Predicate(predicate) => predicate(element),
        };
        if !part_matches {
            return MatchResultInfo::default();
        }
    }

    let required_present = element.pseudo_states.contains_all(compound.pseudo_states);
    let required_absent = !element
        .pseudo_states
        .intersects(compound.negated_pseudo_states);
    MatchResultInfo {
        success: required_present && required_absent,
        dependent_on_present: compound.pseudo_states,
        dependent_on_absent: compound.negated_pseudo_states,
    }
}

/// Walk `chain` right-to-left from `element` toward its ancestors.
///
/// `on_result` is invoked for every element/compound pair tested, in test
/// order, so callers can accumulate pseudo-state dependencies along the way.
///
/// The walk carries a single checkpoint: whenever a compound matches below a
/// descendant joint, the position above it is remembered as a fallback search
/// point. When a later step fails without a descendant joint of its own, the
/// walk resumes from the checkpoint instead of failing outright; the
/// checkpoint is consumed by the resume and re-established by the next such
/// success, bounding re-exploration to one ancestor scan per joint.
pub fn match_right_to_left(
    tree: &ElementTree,
    element: ElementId,
    chain: &SelectorChain,
    mut on_result: impl FnMut(ElementId, &MatchResultInfo),
) -> bool {
    if chain.parts.is_empty() {
        return false;
    }
    let mut index = chain.parts.len() - 1;
    let mut current = Some(element);
    let mut checkpoint: Option<(Option<ElementId>, usize)> = None;

    loop {
        let Some(id) = current else {
            // Ran out of ancestors; fall back to the last flexible position.
            match checkpoint.take() {
                Some((resume, resume_index)) => {
                    current = resume;
                    index = resume_index;
                    continue;
                }
                None => return false,
            }
        };
        let Some(compound) = chain.parts.get(index) else {
            return false;
        };
        let Some(data) = tree.get(id) else {
            return false;
        };
        let info = matches_selector(data, compound);
        on_result(id, &info);

        if info.success {
            if index == 0 {
                return true;
            }
            // The joint to the already-matched compound on the right decides
            // whether this match position was flexible.
            if joined_by_descendant(chain, index + 1) {
                checkpoint = Some((tree.parent(id), index));
            }
            index -= 1;
            current = tree.parent(id);
            continue;
        }

        if joined_by_descendant(chain, index + 1) {
            // The descendant joint permits any ancestor, not just the parent.
            current = tree.parent(id);
            continue;
        }
        match checkpoint.take() {
            Some((resume, resume_index)) => {
                current = resume;
                index = resume_index;
            }
            None => return false,
        }
    }
}

/// Whether the compound at `index` is joined to its previous compound by a
/// descendant relationship. Out-of-range indices (the key selector's right
/// side) are not.
fn joined_by_descendant(chain: &SelectorChain, index: usize) -> bool {
    chain
        .parts
        .get(index)
        .is_some_and(|compound| compound.previous_relationship == Relationship::Descendant)
}

/// Match `chain` against `element` without observing per-step results.
#[must_use]
pub fn matches_chain(tree: &ElementTree, element: ElementId, chain: &SelectorChain) -> bool {
    match_right_to_left(tree, element, chain, |_, _| {})
}

/// Append a record for every chain in every active sheet that matches the
/// context's element.
///
/// Candidates come from the per-sheet key-selector indexes, so only chains
/// whose rightmost compound could plausibly match the element are walked;
/// the result set is identical to brute-forcing every chain in every sheet.
pub fn find_matches(context: &MatchingContext<'_>, output: &mut Vec<MatchRecord>) {
    let Some(data) = context.tree.get(context.element) else {
        return;
    };
    for (sheet_index, sheet) in context.sheets.iter().enumerate() {
        for chain_index in sheet.candidate_chains(data) {
            let Some(chain) = sheet.chain(chain_index) else {
                continue;
            };
            if matches_chain(context.tree, context.element, chain) {
                output.push(MatchRecord {
                    sheet_index,
                    chain_index,
                });
            }
        }
    }
}
