//! Colors and weighted categories.
//!
//! A [`Category`] is one weighted source contributing particles to the
//! formation: a display name, an 8-bit RGB color and a relative ratio.
//! Ratios do not need to sum to anything in particular; allocation
//! normalizes them.

use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `rgb`, `#rrggbb` or `rrggbb`.
    ///
    /// The three-digit form is expanded by doubling each digit, so `#f80`
    /// is the same color as `#ff8800`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            n => return Err(ColorError::InvalidLength(n)),
        };

        if let Some(bad) = expanded.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(bad));
        }

        let value = u32::from_str_radix(&expanded, 16)
            .map_err(|_| ColorError::InvalidLength(expanded.len()))?;

        Ok(Self::new(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }

    /// Parse a comma-separated channel triple such as `"59,130,246"`.
    pub fn parse_triple(triple: &str) -> Result<Self, ColorError> {
        let channels: Vec<u8> = triple
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| ColorError::InvalidTriple(triple.to_string()))?;

        match channels.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b)),
            _ => Err(ColorError::InvalidTriple(triple.to_string())),
        }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels as floats in 0.0-1.0.
    #[inline]
    pub fn to_f32(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Attach an alpha value, producing a drawable [`Rgba`].
    #[inline]
    pub fn with_alpha(&self, alpha: f32) -> Rgba {
        let [r, g, b] = self.to_f32();
        Rgba::new(r, g, b, alpha.clamp(0.0, 1.0))
    }
}

/// A linear color with alpha, channels in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        c.with_alpha(1.0)
    }
}

/// One weighted, colored group particles are drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Display name, used for diagnostics only.
    pub name: String,
    pub color: Rgb,
    /// Relative weight. Negative and non-finite values count as zero.
    pub ratio: f32,
}

impl Category {
    pub fn new(name: impl Into<String>, color: Rgb, ratio: f32) -> Self {
        Self {
            name: name.into(),
            color,
            ratio,
        }
    }

    /// Build a category from a hex color string.
    pub fn from_hex(name: impl Into<String>, hex: &str, ratio: f32) -> Result<Self, ColorError> {
        Ok(Self::new(name, Rgb::from_hex(hex)?, ratio))
    }

    /// The ratio as used for weighting: never negative, never NaN.
    #[inline]
    pub fn weight(&self) -> f32 {
        if self.ratio.is_finite() {
            self.ratio.max(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_long_form() {
        assert_eq!(Rgb::from_hex("#1D4ED8").unwrap(), Rgb::new(29, 78, 216));
        assert_eq!(Rgb::from_hex("dc2626").unwrap(), Rgb::new(220, 38, 38));
    }

    #[test]
    fn test_from_hex_short_form_doubles_digits() {
        assert_eq!(Rgb::from_hex("#f80").unwrap(), Rgb::new(255, 136, 0));
        assert_eq!(Rgb::from_hex("#f80").unwrap(), Rgb::from_hex("#ff8800").unwrap());
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(Rgb::from_hex("#12345"), Err(ColorError::InvalidLength(5)));
        assert_eq!(Rgb::from_hex("#12345g"), Err(ColorError::InvalidDigit('g')));
        assert_eq!(Rgb::from_hex(""), Err(ColorError::InvalidLength(0)));
    }

    #[test]
    fn test_hex_round_trip_is_lowercase() {
        let c = Rgb::from_hex("#F59E0B").unwrap();
        assert_eq!(c.to_hex(), "#f59e0b");
    }

    #[test]
    fn test_parse_triple() {
        assert_eq!(Rgb::parse_triple("59,130,246").unwrap(), Rgb::new(59, 130, 246));
        assert_eq!(Rgb::parse_triple(" 1, 2 ,3 ").unwrap(), Rgb::new(1, 2, 3));
        assert!(Rgb::parse_triple("1,2").is_err());
        assert!(Rgb::parse_triple("1,2,300").is_err());
    }

    #[test]
    fn test_weight_sanitizes_ratio() {
        assert_eq!(Category::new("a", Rgb::BLACK, -3.0).weight(), 0.0);
        assert_eq!(Category::new("b", Rgb::BLACK, f32::NAN).weight(), 0.0);
        assert_eq!(Category::new("c", Rgb::BLACK, 0.25).weight(), 0.25);
    }
}
