//! Element tree facade for the Wombat styling engine.
//!
//! # Design
//!
//! The tree uses arena allocation with [`ElementId`] indices for all
//! relationships, providing O(1) access and traversal without borrow checker
//! issues. Selector matching only ever reads the tree; the single mutation
//! entry point relevant to matching is [`ElementTree::set_pseudo_states`],
//! which flips the dynamic state bits that selectors depend on.

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A type-safe index into an [`ElementTree`] arena.
///
/// Provides O(1) access to any element in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub usize);

impl ElementId {
    /// The root element is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// Bit-level encoding of an element's dynamic states.
///
/// Selector matching reads these bits and reports which of them each match
/// outcome depends on, so callers can re-match only the affected selectors
/// when a state flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PseudoStates(pub u32);

impl PseudoStates {
    /// No states set.
    pub const NONE: Self = Self(0);
    /// The pointer is over the element.
    pub const HOVER: Self = Self(1);
    /// The element is being activated (pressed).
    pub const ACTIVE: Self = Self(1 << 1);
    /// The element has input focus.
    pub const FOCUS: Self = Self(1 << 2);
    /// The element is checked or toggled on.
    pub const CHECKED: Self = Self(1 << 3);
    /// The element does not accept interaction.
    pub const DISABLED: Self = Self(1 << 4);
    /// The element accepts interaction.
    pub const ENABLED: Self = Self(1 << 5);
    /// The element is the root of its tree.
    pub const ROOT: Self = Self(1 << 6);

    /// Whether every bit of `other` is also set in `self`.
    #[must_use]
    pub const fn contains_all(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any bit of `other` is set in `self`.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether no bits are set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for PseudoStates {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PseudoStates {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for PseudoStates {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Everything the selector engine reads from one element.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// The element's type name, e.g. `button` or `scroll-view`.
    pub type_name: String,
    /// The element's unique name; empty when unnamed. Matched by id selectors.
    pub name: String,
    /// Style classes attached to the element, in attachment order.
    pub classes: Vec<String>,
    /// The element's current dynamic states.
    pub pseudo_states: PseudoStates,
}

impl ElementData {
    /// Create element data with a type name, no name, no classes, no states.
    #[must_use]
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            ..Self::default()
        }
    }

    /// Whether `class` appears in the element's class list.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// One arena slot: the element's data plus its tree links.
#[derive(Debug, Clone)]
struct ElementNode {
    data: ElementData,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Arena-based element tree with O(1) access and traversal.
///
/// All elements live in a contiguous vector; parent and child relationships
/// are stored as [`ElementId`] indices. The first allocated element is the
/// root ([`ElementId::ROOT`]).
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    nodes: Vec<ElementNode>,
}

impl ElementTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocate a new element and return its id.
    /// The element is not yet attached to the tree.
    pub fn alloc(&mut self, data: ElementData) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(ElementNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`, updating both links.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
    }

    /// Number of elements in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get an element's data by id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.nodes.get(id.0).map(|node| &node.data)
    }

    /// Get a mutable reference to an element's data by id.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id.0).map(|node| &mut node.data)
    }

    /// Get the parent of an element.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Get all children of an element.
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes
            .get(id.0)
            .map_or(&[], |node| node.children.as_slice())
    }

    /// Replace an element's dynamic state bits.
    pub fn set_pseudo_states(&mut self, id: ElementId, states: PseudoStates) {
        if let Some(data) = self.get_mut(id) {
            data.pseudo_states = states;
        }
    }

    /// Iterate over all ancestors of an element, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: ElementId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: ElementId, ancestor: ElementId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }
}

/// Iterator over ancestors of an element.
pub struct AncestorIterator<'a> {
    tree: &'a ElementTree,
    current: Option<ElementId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
