//! Serializable RGBA color with CSS-style hex parsing.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub const fn magenta() -> Self {
        Self::new(255, 0, 255, 255)
    }

    pub const fn cyan() -> Self {
        Self::new(0, 255, 255, 255)
    }

    /// Parse a CSS hex color (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    /// Unparseable input falls back to opaque black.
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Self::black();
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).unwrap_or(0) * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).unwrap_or(0) * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).unwrap_or(0) * 17;
                Self::new(r, g, b, 255)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                Self::new(r, g, b, 255)
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                let a = u8::from_str_radix(&hex[6..8], 16).unwrap_or(255);
                Self::new(r, g, b, a)
            }
            _ => Self::black(),
        }
    }

    /// Format as `#rrggbbaa` (or `#rrggbb` when fully opaque).
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Return the same color with its alpha scaled by `factor` (0.0..=1.0).
    pub fn with_alpha(&self, factor: f64) -> Self {
        let a = (self.a as f64 * factor.clamp(0.0, 1.0)).round() as u8;
        Self::new(self.r, self.g, self.b, a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_six_digits() {
        let c = Rgba::from_hex("#ff8000");
        assert_eq!(c, Rgba::new(255, 128, 0, 255));
    }

    #[test]
    fn test_from_hex_short_form() {
        assert_eq!(Rgba::from_hex("#f00"), Rgba::new(255, 0, 0, 255));
    }

    #[test]
    fn test_from_hex_with_alpha() {
        assert_eq!(Rgba::from_hex("#00000080"), Rgba::new(0, 0, 0, 128));
    }

    #[test]
    fn test_from_hex_garbage_is_black() {
        assert_eq!(Rgba::from_hex("not a color"), Rgba::black());
    }

    #[test]
    fn test_from_hex_non_ascii_is_black() {
        // Multi-byte characters can land on the 3/6/8 byte lengths; slicing
        // must not split a character.
        assert_eq!(Rgba::from_hex("€€"), Rgba::black());
        assert_eq!(Rgba::from_hex("#é0"), Rgba::black());
    }

    #[test]
    fn test_hex_roundtrip() {
        let c = Rgba::new(18, 52, 86, 255);
        assert_eq!(Rgba::from_hex(&c.to_hex()), c);
    }

    #[test]
    fn test_with_alpha() {
        let c = Rgba::black().with_alpha(0.4);
        assert_eq!(c.a, 102);
        assert_eq!(c.r, 0);
    }
}
