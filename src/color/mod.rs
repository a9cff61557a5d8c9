//! Swatch model and pure colour helpers (hex parsing, contrast, random generation)

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod naming;

/// Default luminance threshold below which swatch text is drawn white.
pub const DEFAULT_CONTRAST_THRESHOLD: f64 = 0.55;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid hex color: {0:?} (expected #RGB or #RRGGBB)")]
    InvalidHex(String),
}

/// One swatch of a palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub hex: String,
    #[serde(default)]
    pub locked: bool,
}

impl Color {
    /// Build an unlocked swatch from any accepted hex notation.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let hex = normalize_hex(input).ok_or_else(|| ColorError::InvalidHex(input.to_string()))?;
        Ok(Self { hex, locked: false })
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            hex: random_hex(rng),
            locked: false,
        }
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::from_hex(&self.hex).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees, saturation and lightness in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Rgb {
    pub fn from_hex(input: &str) -> Option<Self> {
        let canonical = normalize_hex(input)?;
        let mut bytes = [0u8; 3];
        hex::decode_to_slice(&canonical[1..], &mut bytes).ok()?;
        Some(Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode_upper([self.r, self.g, self.b]))
    }

    pub fn to_hsl(self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl { h: h * 60.0, s, l }
    }
}

/// Normalize `#RGB`, `RGB`, `#RRGGBB` or `RRGGBB` to canonical `#RRGGBB`.
///
/// Returns `None` for anything else. Shorthand is expanded by doubling each
/// nibble; the result is always uppercase.
pub fn normalize_hex(input: &str) -> Option<String> {
    let raw = input.trim();
    let digits = raw.strip_prefix('#').unwrap_or(raw);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return None,
    };

    Some(format!("#{}", expanded.to_ascii_uppercase()))
}

/// `#` followed by exactly six hex digits, nothing else.
pub fn is_strict_hex(input: &str) -> bool {
    input
        .strip_prefix('#')
        .is_some_and(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Three uniform random bytes, formatted as `#RRGGBB`.
pub fn random_hex<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 3];
    rng.fill(&mut bytes);
    format!("#{}", hex::encode_upper(bytes))
}

/// WCAG relative luminance of an sRGB colour.
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let channel = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(rgb.r) + 0.7152 * channel(rgb.g) + 0.0722 * channel(rgb.b)
}

/// Whether text drawn over `hex` should be white rather than black.
pub fn use_white_text(hex: &str, threshold: f64) -> bool {
    let rgb = Rgb::from_hex(hex).unwrap_or_default();
    relative_luminance(rgb) < threshold
}
