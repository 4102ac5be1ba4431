//! Deduplicated warnings for the style engine's recoverable defects.
//!
//! Malformed grammars and bad value handles are debug assertions in the
//! matcher and the stylesheet pools; release builds fail the affected match
//! instead and report the defect here, once per kind/detail pair, so a bad
//! declaration repeated across thousands of match attempts prints a single
//! line.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

/// The recoverable defect classes the engine can hit at match time.
///
/// Each variant corresponds to one release-mode fallback site; the variant
/// names what went wrong, the free-text detail passed to [`warn_once`] says
/// where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A grammar node carries a multiplier kind the matcher never evaluates;
    /// the expression fails to match.
    UnsupportedMultiplier,
    /// An unordered combinator has more alternates than the matcher's
    /// scratch mask tracks; the expression fails to match.
    OversizedCombinator,
    /// A value handle points past the end of its pool; it decodes to nothing.
    DanglingHandle,
    /// A value handle was decoded against the wrong pool; it decodes to
    /// nothing.
    MistypedHandle,
}

impl WarningKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedMultiplier => "unsupported grammar multiplier",
            Self::OversizedCombinator => "oversized combinator",
            Self::DanglingHandle => "dangling value handle",
            Self::MistypedHandle => "mistyped value handle",
        }
    }
}

/// Kind/detail pairs already reported.
fn warned() -> &'static Mutex<HashSet<(WarningKind, String)>> {
    static WARNED: OnceLock<Mutex<HashSet<(WarningKind, String)>>> = OnceLock::new();
    WARNED.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Report a recoverable engine defect (prints once per kind/detail pair).
///
/// # Example
/// ```ignore
/// warn_once(WarningKind::DanglingHandle, "Color index 12");
/// ```
///
/// # Panics
/// Panics if the warning set mutex is poisoned.
pub fn warn_once(kind: WarningKind, detail: &str) {
    let mut guard = warned().lock().unwrap();
    if guard.insert((kind, detail.to_string())) {
        // Yellow, matching the host runtime's warning stream.
        eprintln!("\x1b[33m[wombat-style] {}: {detail}\x1b[0m", kind.as_str());
    }
}

/// Forget all reported warnings (call when recompiling stylesheets, so a
/// still-broken sheet reports again).
///
/// # Panics
/// Panics if the warning set mutex is poisoned.
pub fn clear_warnings() {
    warned().lock().unwrap().clear();
}
