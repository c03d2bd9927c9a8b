// SPDX-License-Identifier: MIT OR Apache-2.0

//! 24-bit colors as they appear in configuration: `#rrggbb` hex strings.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// An RGB color.
///
/// Parsed from `#rrggbb`, `rrggbb` or the short `#rgb` form, and always displayed
/// as lowercase `#rrggbb`.
///
/// ```
/// use tintlog::Color;
/// let purple: Color = "#cc80ff".parse().unwrap();
/// assert_eq!(purple, Color::new(0xcc, 0x80, 0xff));
/// assert_eq!(purple.to_string(), "#cc80ff");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub(crate) const WHITE: Color = Color::new(0xff, 0xff, 0xff);
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || Error::InvalidColor(s.to_string());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Color::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Color::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Debug for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Color({})", self)
    }
}

/// Shorthand for the color literals of the built-in palette.
pub(crate) const fn hex(value: u32) -> Color {
    Color::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!("#ff8a1c".parse::<Color>().unwrap(), hex(0xff8a1c));
        assert_eq!("FF8A1C".parse::<Color>().unwrap(), hex(0xff8a1c));
        assert_eq!("#fa0".parse::<Color>().unwrap(), hex(0xffaa00));
    }

    #[test]
    fn rejects_garbage() {
        assert!("#ff8a1".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&hex(0x55ff55)).unwrap();
        assert_eq!(json, "\"#55ff55\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hex(0x55ff55));
    }
}
