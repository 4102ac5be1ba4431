//! Color values.
//!
//! Declarations reach the matcher with their colors already decoded into
//! RGBA by the value decoder, so no `rgb()`/`hsl()` function parsing lives
//! here. This type exists for the two places matching still touches color
//! content: the `<color>` terminal's named-color rule (enum tokens decode to
//! color names) and hex rendering for diagnostics.

use serde::Serialize;

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorValue {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 255 is fully opaque.
    pub a: u8,
}

/// The color names enum-valued tokens decode to: the basic sixteen of
/// [CSS Color Level 4, § 6.1](https://www.w3.org/TR/css-color-4/#named-colors)
/// plus `transparent` and both gray spellings.
const NAMED_COLORS: &[(&str, ColorValue)] = &[
    ("aqua", ColorValue::rgb(0, 255, 255)),
    ("black", ColorValue::rgb(0, 0, 0)),
    ("blue", ColorValue::rgb(0, 0, 255)),
    ("cyan", ColorValue::rgb(0, 255, 255)),
    ("fuchsia", ColorValue::rgb(255, 0, 255)),
    ("gray", ColorValue::rgb(128, 128, 128)),
    ("green", ColorValue::rgb(0, 128, 0)),
    ("grey", ColorValue::rgb(128, 128, 128)),
    ("lime", ColorValue::rgb(0, 255, 0)),
    ("magenta", ColorValue::rgb(255, 0, 255)),
    ("maroon", ColorValue::rgb(128, 0, 0)),
    ("navy", ColorValue::rgb(0, 0, 128)),
    ("olive", ColorValue::rgb(128, 128, 0)),
    ("purple", ColorValue::rgb(128, 0, 128)),
    ("red", ColorValue::rgb(255, 0, 0)),
    ("silver", ColorValue::rgb(192, 192, 192)),
    ("teal", ColorValue::rgb(0, 128, 128)),
    ("transparent", ColorValue::rgba(0, 0, 0, 0)),
    ("white", ColorValue::rgb(255, 255, 255)),
    ("yellow", ColorValue::rgb(255, 255, 0)),
];

impl ColorValue {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// An opaque color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color from all four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB`, or `#RRGGBBAA` notation (the `#` is
    /// optional). Shorthand digits are doubled, `#f80` == `#ff8800`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let expanded: String = match digits.len() {
            3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return None,
        };
        let channel = |at: usize| -> Option<u8> {
            u8::from_str_radix(expanded.get(at..at + 2)?, 16).ok()
        };
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if expanded.len() == 8 { channel(6)? } else { 255 },
        })
    }

    /// Look up a color name, case-insensitively. `None` for names outside
    /// the engine's table; the `<color>` terminal rejects those enum tokens.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(named, _)| *named == name)
            .map(|(_, color)| *color)
    }

    /// Hex rendering for diagnostics: `#RRGGBB`, with the alpha pair
    /// appended only when not fully opaque.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}
