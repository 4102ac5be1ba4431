//! Decoded style value types.

/// Color values per [CSS Color Level 4](https://www.w3.org/TR/css-color-4/).
pub mod color;
