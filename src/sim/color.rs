//! 24-bit RGB colors
//!
//! Circles carry colors as packed RGB and only turn them into CSS strings at
//! the drawing boundary.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A packed `0xRRGGBB` color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color(0x00_00_00);
    pub const BLUE: Color = Color(0x00_00_FF);
    pub const LIGHT_GREEN: Color = Color(0x90_EE_90);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn from_u32(rgb: u32) -> Self {
        Self(rgb & 0xFF_FF_FF)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// Uniform random color in `[0, 0xFFFFFF)`
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(0..0xFF_FF_FF))
    }

    /// CSS hex form, always six digits (`#0a0b0c`)
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Failed to parse a `#rgb` or `#rrggbb` string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    input: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color {:?}, expected #rgb or #rrggbb", self.input)
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError {
            input: s.to_string(),
        };
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        match hex.len() {
            6 => u32::from_str_radix(hex, 16).map(Color).map_err(|_| err()),
            3 => {
                // #abc expands to #aabbcc
                let short = u32::from_str_radix(hex, 16).map_err(|_| err())?;
                let (r, g, b) = ((short >> 8) & 0xF, (short >> 4) & 0xF, short & 0xF);
                Ok(Color((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11))
            }
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
