//! Core color types for the rasterizer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const GRAY: Color = Color { r: 128, g: 128, b: 128, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 128, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0, a: 255 };
    pub const PURPLE: Color = Color { r: 128, g: 0, b: 128, a: 255 };
    pub const ORANGE: Color = Color { r: 255, g: 165, b: 0, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to [u8; 4] for the canvas buffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::with_alpha(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// What a checkerboard square is filled with.
///
/// `Transparent` always resolves to all-zero RGBA, whatever color a UI might
/// associate with it. A `Solid` color is written exactly as given, alpha included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Paint {
    Solid(Color),
    Transparent,
}

impl Paint {
    /// Named color vocabulary, in picker order
    pub const NAMED: [(&'static str, Paint); 10] = [
        ("Transparent", Paint::Transparent),
        ("White", Paint::Solid(Color::WHITE)),
        ("Black", Paint::Solid(Color::BLACK)),
        ("Gray", Paint::Solid(Color::GRAY)),
        ("Red", Paint::Solid(Color::RED)),
        ("Green", Paint::Solid(Color::GREEN)),
        ("Blue", Paint::Solid(Color::BLUE)),
        ("Yellow", Paint::Solid(Color::YELLOW)),
        ("Purple", Paint::Solid(Color::PURPLE)),
        ("Orange", Paint::Solid(Color::ORANGE)),
    ];

    /// Resolve to the RGBA value written into the canvas
    pub fn resolve(self) -> Color {
        match self {
            Paint::Solid(color) => color,
            Paint::Transparent => Color::TRANSPARENT,
        }
    }

    pub fn is_transparent(self) -> bool {
        matches!(self, Paint::Transparent)
    }

    /// Name from the vocabulary, if this paint is one of the named colors
    pub fn name(self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, paint)| *paint == self)
            .map(|(name, _)| *name)
    }

    /// Position in `NAMED`, used by the viewer to cycle through colors
    pub fn named_index(self) -> Option<usize> {
        Self::NAMED.iter().position(|(_, paint)| *paint == self)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

/// Error returned when a color string is not a known name or hex value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("Empty color string")]
    Empty,

    #[error("Unknown color '{0}' (expected a color name, #rgb, #rrggbb or #rrggbbaa)")]
    Unknown(String),
}

impl FromStr for Paint {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ColorParseError::Empty);
        }

        // Aliases outside the picker vocabulary
        if trimmed.eq_ignore_ascii_case("none") {
            return Ok(Paint::Transparent);
        }
        if trimmed.eq_ignore_ascii_case("grey") {
            return Ok(Paint::Solid(Color::GRAY));
        }

        if let Some((_, paint)) = Self::NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        {
            return Ok(*paint);
        }

        parse_hex(trimmed)
            .map(Paint::Solid)
            .ok_or_else(|| ColorParseError::Unknown(trimmed.to_string()))
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional for the long forms)
fn parse_hex(s: &str) -> Option<Color> {
    let (digits, had_hash) = match s.strip_prefix('#') {
        Some(rest) => (rest, true),
        None => (s, false),
    };
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let pair = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|v| v * 17);

    match digits.len() {
        3 if had_hash => Some(Color::new(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(Color::new(pair(0)?, pair(2)?, pair(4)?)),
        8 => Some(Color::with_alpha(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
        _ => None,
    }
}

impl TryFrom<String> for Paint {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Paint> for String {
    fn from(paint: Paint) -> Self {
        paint.to_string()
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            return f.write_str(name);
        }
        let c = self.resolve();
        if c.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_case_insensitive() {
        assert_eq!("black".parse::<Paint>().unwrap(), Paint::Solid(Color::BLACK));
        assert_eq!("WHITE".parse::<Paint>().unwrap(), Paint::Solid(Color::WHITE));
        assert_eq!("  Orange ".parse::<Paint>().unwrap(), Paint::Solid(Color::ORANGE));
        assert_eq!("grey".parse::<Paint>().unwrap(), Paint::Solid(Color::GRAY));
    }

    #[test]
    fn test_parse_transparent() {
        assert_eq!("Transparent".parse::<Paint>().unwrap(), Paint::Transparent);
        assert_eq!("none".parse::<Paint>().unwrap(), Paint::Transparent);
        assert_eq!(Paint::Transparent.resolve(), Color::TRANSPARENT);
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!("#ff8000".parse::<Paint>().unwrap(), Paint::Solid(Color::new(255, 128, 0)));
        assert_eq!("ff8000".parse::<Paint>().unwrap(), Paint::Solid(Color::new(255, 128, 0)));
        assert_eq!("#f80".parse::<Paint>().unwrap(), Paint::Solid(Color::new(255, 136, 0)));
        assert_eq!(
            "#10203040".parse::<Paint>().unwrap(),
            Paint::Solid(Color::with_alpha(0x10, 0x20, 0x30, 0x40))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Paint>(), Err(ColorParseError::Empty));
        assert!(matches!("magenta-ish".parse::<Paint>(), Err(ColorParseError::Unknown(_))));
        assert!(matches!("#12345".parse::<Paint>(), Err(ColorParseError::Unknown(_))));
        assert!(matches!("#gg0000".parse::<Paint>(), Err(ColorParseError::Unknown(_))));
        // short form needs the hash so it can't be confused with a name
        assert!(matches!("abc".parse::<Paint>(), Err(ColorParseError::Unknown(_))));
    }

    #[test]
    fn test_display_uses_names_then_hex() {
        assert_eq!(Paint::Solid(Color::PURPLE).to_string(), "Purple");
        assert_eq!(Paint::Transparent.to_string(), "Transparent");
        assert_eq!(Paint::Solid(Color::new(1, 2, 3)).to_string(), "#010203");
        assert_eq!(Paint::Solid(Color::with_alpha(1, 2, 3, 4)).to_string(), "#01020304");
    }

    #[test]
    fn test_serde_as_string() {
        let paint = Paint::Solid(Color::new(0x12, 0x34, 0x56));
        let text = ron::to_string(&paint).unwrap();
        assert_eq!(text, "\"#123456\"");
        let back: Paint = ron::from_str(&text).unwrap();
        assert_eq!(back, paint);

        assert!(ron::from_str::<Paint>("\"not-a-color\"").is_err());
    }

    #[test]
    fn test_named_index() {
        assert_eq!(Paint::Transparent.named_index(), Some(0));
        assert_eq!(Paint::Solid(Color::ORANGE).named_index(), Some(9));
        assert_eq!(Paint::Solid(Color::new(1, 2, 3)).named_index(), None);
    }
}
