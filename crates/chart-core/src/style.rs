// File: crates/chart-core/src/style.rs
// Summary: Text styling values shared by surfaces and options (color, font, alignment).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// 8-bit RGBA color; written and parsed as CSS hex (`#rgb`, `#rrggbb`, `#rrggbbaa`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(bad)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17).map_err(|_| bad());
        match hex.len() {
            3 => Ok(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?).with_alpha(byte(6)?)),
            _ => Err(bad()),
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// CSS-like font shorthand: optional style words, a size in `px` or `pt`, then the family.
/// e.g. `"bold 10px Arial"`, `"9pt sans-serif"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FontSpec {
    pub style: String,
    pub size_px: f32,
    pub family: String,
}

impl FromStr for FontSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::InvalidFont(s.to_string());
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let (pos, size_px) = tokens
            .iter()
            .enumerate()
            .find_map(|(i, tok)| parse_font_size(tok).map(|px| (i, px)))
            .ok_or_else(bad)?;
        let family = tokens[pos + 1..].join(" ");
        if family.is_empty() || size_px <= 0.0 {
            return Err(bad());
        }
        Ok(Self { style: tokens[..pos].join(" "), size_px, family })
    }
}

fn parse_font_size(tok: &str) -> Option<f32> {
    if let Some(n) = tok.strip_suffix("px") {
        return n.parse().ok();
    }
    // 1pt = 4/3 px
    tok.strip_suffix("pt").and_then(|n| n.parse::<f32>().ok()).map(|pt| pt * 4.0 / 3.0)
}

impl TryFrom<String> for FontSpec {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FontSpec> for String {
    fn from(f: FontSpec) -> Self {
        f.to_string()
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.style.is_empty() {
            write!(f, "{} ", self.style)?;
        }
        write!(f, "{}px {}", self.size_px, self.family)
    }
}

/// Horizontal text alignment relative to the draw position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    Left,
    Right,
}

/// Drop shadow applied behind text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextShadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub color: Option<Rgba>,
}
