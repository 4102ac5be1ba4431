//! Compiled stylesheet storage.
//!
//! A [`StyleSheet`] owns the decoded value pools that [`ValueHandle`] tokens
//! point into, the selector chains in declaration order, and the candidate
//! indexes keyed by each chain's rightmost compound selector. Everything is
//! populated by the stylesheet compiler through the `add_*` methods and is
//! read-only during matching.

use std::collections::HashMap;

use serde::Serialize;
use strum_macros::Display;
use wombat_common::warning::{WarningKind, warn_once};
use wombat_tree::ElementData;

use crate::selector::{SelectorChain, SelectorPart};
use crate::values::color::ColorValue;

/// Index key for chains whose rightmost compound pins no type, class, or id.
const WILDCARD_KEY: &str = "*";

/// Tag identifying which pool a [`ValueHandle`] points into and how the
/// token behaves during matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum ValueKind {
    /// A bare identifier such as `auto`.
    Keyword,
    /// A unitless numeric value.
    Float,
    /// A numeric value with a unit.
    Dimension,
    /// A decoded color.
    Color,
    /// A property-specific enumerated value, stored by its canonical
    /// lowercase string.
    Enum,
    /// A path into the host's resource bundle.
    ResourcePath,
    /// A reference to a loadable asset.
    AssetReference,
    /// A nine-slice image reference. Not accepted by the `<url>` or
    /// `<resource>` terminals.
    ScalableImage,
    /// An unresolved `var(--name)` reference.
    Variable,
}

/// One decoded value token: a kind tag plus an index into the owning sheet's
/// pool for that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueHandle {
    /// Which pool the handle points into.
    pub kind: ValueKind,
    /// Index within that pool.
    pub index: usize,
}

/// Unit carried by a [`Dimension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum DimensionUnit {
    /// Device-independent pixels.
    Px,
    /// Percent of the reference size.
    Percent,
}

/// A numeric value with a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimension {
    /// The numeric component.
    pub value: f64,
    /// The unit component.
    pub unit: DimensionUnit,
}

/// Which index bucket a chain's key selector falls into.
enum Bucket {
    Id(String),
    Class(String),
    Type(String),
    Wildcard,
}

/// A compiled stylesheet: value pools, selector chains in declaration order,
/// and the per-sheet candidate indexes.
///
/// Chains are bucketed once, at [`StyleSheet::add_chain`] time, by the most
/// selective part of their rightmost compound selector (id, then class, then
/// type, then the wildcard bucket). Candidate lookup unions the buckets an
/// element could fall into, so the index never drops a true match.
#[derive(Debug, Default)]
pub struct StyleSheet {
    strings: Vec<String>,
    floats: Vec<f64>,
    dimensions: Vec<Dimension>,
    colors: Vec<ColorValue>,
    chains: Vec<SelectorChain>,
    by_type_name: HashMap<String, Vec<usize>>,
    by_id: HashMap<String, Vec<usize>>,
    by_class: HashMap<String, Vec<usize>>,
}

impl StyleSheet {
    /// Create an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyword token, e.g. `auto`.
    pub fn add_keyword(&mut self, word: &str) -> ValueHandle {
        self.add_string(ValueKind::Keyword, word)
    }

    /// Add an enum-valued token by its canonical lowercase string.
    pub fn add_enum(&mut self, value: &str) -> ValueHandle {
        self.add_string(ValueKind::Enum, value)
    }

    /// Add a resource path token.
    pub fn add_resource_path(&mut self, path: &str) -> ValueHandle {
        self.add_string(ValueKind::ResourcePath, path)
    }

    /// Add an asset reference token.
    pub fn add_asset_reference(&mut self, path: &str) -> ValueHandle {
        self.add_string(ValueKind::AssetReference, path)
    }

    /// Add a nine-slice image token.
    pub fn add_scalable_image(&mut self, path: &str) -> ValueHandle {
        self.add_string(ValueKind::ScalableImage, path)
    }

    /// Add an unresolved variable reference by its custom property name,
    /// dashes included, e.g. `--accent`.
    pub fn add_variable(&mut self, name: &str) -> ValueHandle {
        self.add_string(ValueKind::Variable, name)
    }

    /// Add a unitless numeric token.
    pub fn add_float(&mut self, value: f64) -> ValueHandle {
        let index = self.floats.len();
        self.floats.push(value);
        ValueHandle { kind: ValueKind::Float, index }
    }

    /// Add a dimension token.
    pub fn add_dimension(&mut self, value: f64, unit: DimensionUnit) -> ValueHandle {
        let index = self.dimensions.len();
        self.dimensions.push(Dimension { value, unit });
        ValueHandle { kind: ValueKind::Dimension, index }
    }

    /// Add a decoded color token.
    pub fn add_color(&mut self, color: ColorValue) -> ValueHandle {
        let index = self.colors.len();
        self.colors.push(color);
        ValueHandle { kind: ValueKind::Color, index }
    }

    /// Decode a string-pooled handle (keyword, enum, resource path, asset
    /// reference, scalable image, or variable). `None` when the handle's kind
    /// has no string form or the handle is dangling.
    #[must_use]
    pub fn string(&self, handle: ValueHandle) -> Option<&str> {
        match handle.kind {
            ValueKind::Keyword
            | ValueKind::Enum
            | ValueKind::ResourcePath
            | ValueKind::AssetReference
            | ValueKind::ScalableImage
            | ValueKind::Variable => lookup(&self.strings, handle).map(String::as_str),
            ValueKind::Float | ValueKind::Dimension | ValueKind::Color => {
                mistyped(handle, "string")
            }
        }
    }

    /// Decode a float handle.
    #[must_use]
    pub fn float(&self, handle: ValueHandle) -> Option<f64> {
        match handle.kind {
            ValueKind::Float => lookup(&self.floats, handle).copied(),
            _ => mistyped(handle, "float"),
        }
    }

    /// Decode a dimension handle.
    #[must_use]
    pub fn dimension(&self, handle: ValueHandle) -> Option<Dimension> {
        match handle.kind {
            ValueKind::Dimension => lookup(&self.dimensions, handle).copied(),
            _ => mistyped(handle, "dimension"),
        }
    }

    /// Decode a color handle.
    #[must_use]
    pub fn color(&self, handle: ValueHandle) -> Option<ColorValue> {
        match handle.kind {
            ValueKind::Color => lookup(&self.colors, handle).copied(),
            _ => mistyped(handle, "color"),
        }
    }

    /// Diagnostic rendering of any token, used for match error reporting.
    ///
    /// Dangling handles render as an empty string after a one-time warning.
    #[must_use]
    pub fn value_text(&self, handle: ValueHandle) -> String {
        let text = match handle.kind {
            ValueKind::Keyword | ValueKind::Enum | ValueKind::ResourcePath => {
                self.string(handle).map(ToString::to_string)
            }
            ValueKind::AssetReference => self.string(handle).map(|path| format!("url({path})")),
            ValueKind::ScalableImage => {
                self.string(handle).map(|path| format!("scalable-image({path})"))
            }
            ValueKind::Variable => self.string(handle).map(|name| format!("var({name})")),
            ValueKind::Float => self.float(handle).map(|value| format!("{value}")),
            ValueKind::Dimension => self.dimension(handle).map(|dimension| {
                let suffix = match dimension.unit {
                    DimensionUnit::Px => "px",
                    DimensionUnit::Percent => "%",
                };
                format!("{}{suffix}", dimension.value)
            }),
            ValueKind::Color => self.color(handle).map(|color| color.to_hex_string()),
        };
        text.unwrap_or_default()
    }

    /// Register `chain` and index it by its key selector. Returns the chain's
    /// declaration-order index within this sheet.
    pub fn add_chain(&mut self, chain: SelectorChain) -> usize {
        let chain_index = self.chains.len();
        let bucket = bucket_for(&chain);
        self.chains.push(chain);
        match bucket {
            Bucket::Id(key) => self.by_id.entry(key).or_default().push(chain_index),
            Bucket::Class(key) => self.by_class.entry(key).or_default().push(chain_index),
            Bucket::Type(key) => self.by_type_name.entry(key).or_default().push(chain_index),
            Bucket::Wildcard => self
                .by_type_name
                .entry(WILDCARD_KEY.to_string())
                .or_default()
                .push(chain_index),
        }
        chain_index
    }

    /// All chains, in declaration order.
    #[must_use]
    pub fn chains(&self) -> &[SelectorChain] {
        &self.chains
    }

    /// One chain by declaration-order index.
    #[must_use]
    pub fn chain(&self, index: usize) -> Option<&SelectorChain> {
        self.chains.get(index)
    }

    /// Chain indices whose key selector could match an element with `data`'s
    /// type, name, and classes, in declaration order.
    ///
    /// Unions the type bucket, the wildcard bucket, the id bucket (for named
    /// elements), and one class bucket per element class.
    #[must_use]
    pub fn candidate_chains(&self, data: &ElementData) -> Vec<usize> {
        let mut candidates = Vec::new();
        if let Some(bucket) = self.by_type_name.get(&data.type_name) {
            candidates.extend_from_slice(bucket);
        }
        if let Some(bucket) = self.by_type_name.get(WILDCARD_KEY) {
            candidates.extend_from_slice(bucket);
        }
        if !data.name.is_empty()
            && let Some(bucket) = self.by_id.get(&data.name)
        {
            candidates.extend_from_slice(bucket);
        }
        for class in &data.classes {
            if let Some(bucket) = self.by_class.get(class) {
                candidates.extend_from_slice(bucket);
            }
        }
        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }

    fn add_string(&mut self, kind: ValueKind, value: &str) -> ValueHandle {
        let index = self.strings.len();
        self.strings.push(value.to_string());
        ValueHandle { kind, index }
    }
}

/// Resolve a handle against its pool; dangling handles warn once and decode
/// to `None`.
fn lookup<V>(pool: &[V], handle: ValueHandle) -> Option<&V> {
    let slot = pool.get(handle.index);
    debug_assert!(slot.is_some(), "dangling value handle {handle:?}");
    if slot.is_none() {
        warn_once(
            WarningKind::DanglingHandle,
            &format!("{} index {}", handle.kind, handle.index),
        );
    }
    slot
}

/// A handle decoded against the wrong pool; warns once and decodes to `None`.
fn mistyped<V>(handle: ValueHandle, expected: &str) -> Option<V> {
    debug_assert!(false, "{} handle decoded as {expected}", handle.kind);
    warn_once(
        WarningKind::MistypedHandle,
        &format!("{} decoded as {expected}", handle.kind),
    );
    None
}

/// Pick the index bucket for a chain from its rightmost compound selector.
fn bucket_for(chain: &SelectorChain) -> Bucket {
    let Some(key_selector) = chain.key_selector() else {
        return Bucket::Wildcard;
    };
    let mut class_key: Option<&str> = None;
    let mut type_key: Option<&str> = None;
    for part in &key_selector.parts {
        match part {
            SelectorPart::Id(name) => return Bucket::Id(name.clone()),
            SelectorPart::Class(name) => class_key = class_key.or(Some(name.as_str())),
            SelectorPart::Type(name) => type_key = type_key.or(Some(name.as_str())),
            SelectorPart::Wildcard
            | SelectorPart::PseudoClass(_)
            | SelectorPart::Predicate(_) => {}
        }
    }
    if let Some(key) = class_key {
        return Bucket::Class(key.to_string());
    }
    if let Some(key) = type_key {
        return Bucket::Type(key.to_string());
    }
    Bucket::Wildcard
}
