//! Color representation for pixel surfaces.
//!
//! Colors are resolved at the call boundary: a name such as `"red"` or a hex string such as
//! `"#ff8000"` is turned into a [`Color`] by [`str::parse`], and everything below that boundary
//! only ever sees concrete RGB triples or [`Color::Transparent`].

use crate::error::Error;
use std::str::FromStr;

/// A resolved pixel color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// No color. Writing a transparent pixel removes whatever was there before.
    #[default]
    Transparent,
    /// An RGB color.
    Rgb([u8; 3]),
}

impl Color {
    pub const BLACK: Color = Color::Rgb([0, 0, 0]);
    pub const WHITE: Color = Color::Rgb([255, 255, 255]);
    pub const RED: Color = Color::Rgb([255, 0, 0]);
    pub const LIME: Color = Color::Rgb([0, 255, 0]);
    pub const BLUE: Color = Color::Rgb([0, 0, 255]);

    /// Unwraps the color, returning the RGB value if it is an RGB color, otherwise the passed color.
    pub fn unwrap_or(self, other: [u8; 3]) -> [u8; 3] {
        match self {
            Color::Transparent => other,
            Color::Rgb(c) => c,
        }
    }

    /// Returns whether the color is solid.
    pub fn is_solid(self) -> bool {
        matches!(self, Color::Rgb(_))
    }

    /// Returns the RGB triple, or `None` for transparent.
    pub fn rgb(self) -> Option<[u8; 3]> {
        match self {
            Color::Transparent => None,
            Color::Rgb(c) => Some(c),
        }
    }

    /// Looks up one of the built-in color names (case-insensitive).
    pub fn named(name: &str) -> Option<Color> {
        let name = name.trim().to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, rgb)| Color::Rgb(*rgb))
    }
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Color::Rgb(rgb)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::Rgb([r, g, b])
    }
}

impl From<Option<[u8; 3]>> for Color {
    fn from(rgb: Option<[u8; 3]>) -> Self {
        rgb.map_or(Color::Transparent, Color::Rgb)
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parses a color name, `"none"`/`"transparent"`, or a `#rrggbb` hex string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("none") || trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Color::Transparent);
        }
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| Error::UnknownColor(s.to_string()));
        }
        Color::named(trimmed).ok_or_else(|| Error::UnknownColor(s.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("darkgray", [64, 64, 64]),
    ("lightgray", [211, 211, 211]),
    ("navy", [0, 0, 128]),
    ("teal", [0, 128, 128]),
    ("olive", [128, 128, 0]),
    ("maroon", [128, 0, 0]),
    ("gold", [255, 215, 0]),
    ("skyblue", [135, 206, 235]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_and_hex() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::RED);
        assert_eq!(" Navy ".parse::<Color>().unwrap(), Color::Rgb([0, 0, 128]));
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::Rgb([255, 128, 0]));
        assert_eq!("none".parse::<Color>().unwrap(), Color::Transparent);
    }

    #[test]
    fn test_unknown_color_is_an_error() {
        assert!(matches!(
            "blurple".parse::<Color>(),
            Err(Error::UnknownColor(name)) if name == "blurple"
        ));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Color::from([1, 2, 3]).rgb(), Some([1, 2, 3]));
        assert_eq!(Color::from(None), Color::Transparent);
        assert_eq!(Color::Transparent.unwrap_or([9, 9, 9]), [9, 9, 9]);
        assert!(!Color::Transparent.is_solid());
    }
}
