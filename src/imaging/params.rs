//! Parameter types for image operations.
//!
//! These are small value types that describe *how* to encode or flatten an
//! image. They carry no pixels and are cheap to copy.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Background`]: Opaque RGB fill used when flattening transparency.

use image::Rgb;
use std::fmt;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
///
/// Only JPEG honors it; the other formats are encoded losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Opaque background color for transparency flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background(pub Rgb<u8>);

impl Background {
    pub const WHITE: Self = Self(Rgb([255, 255, 255]));
    pub const BLACK: Self = Self(Rgb([0, 0, 0]));

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Rgb([r, g, b]))
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        self.0
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Parses `#rrggbb`, `#rgb`, `white` or `black`.
impl FromStr for Background {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "white" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            _ => {}
        }

        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("invalid color '{s}': expected #rrggbb, #rgb, white or black"))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color '{s}': non-hex digit"));
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|e| e.to_string());
        match hex.len() {
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc expands to #aabbcc
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(format!("invalid color '{s}': expected 3 or 6 hex digits")),
        }
    }
}
