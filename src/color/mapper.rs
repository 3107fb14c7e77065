//! 24-bit color to 256-color palette mapping
//!
//! The xterm palette is laid out as 16 system colors, a 6x6x6 color cube
//! starting at index 16, and a 24-step grayscale ramp at 232..=255.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// SGR sequence that clears every attribute
pub const RESET: &str = "\x1b[0m";

const CUBE_BASE: u8 = 16;
const CUBE_WHITE: u8 = 231;
const GRAY_BASE: u8 = 232;
const GRAY_STEPS: u8 = 24;
// Below this a gray is closer to cube black than to the first ramp entry
const GRAY_LOW: u8 = 8;
// Above this a gray is closer to cube white than to the last ramp entry
const GRAY_HIGH: u8 = 248;

/// Malformed color value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorFormatError {
    #[error("invalid color {value:?}: expected 6 hex digits, found {len}")]
    WrongLength { value: String, len: usize },
    #[error("invalid color {value:?}: not a hex number")]
    InvalidHex { value: String },
}

/// A 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[allow(dead_code)]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(value: &str) -> Result<Self, ColorFormatError> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() != 6 {
            return Err(ColorFormatError::WrongLength {
                value: value.to_string(),
                len: digits.len(),
            });
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorFormatError::InvalidHex {
                value: value.to_string(),
            });
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorFormatError::InvalidHex {
                value: value.to_string(),
            })
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

impl FromStr for Rgb {
    type Err = ColorFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Map a 24-bit color onto the 256-color palette.
///
/// Grays use the grayscale ramp, with the extremes snapping to cube black
/// (16) and cube white (231). Everything else is quantized per channel
/// into the 6x6x6 cube.
pub fn to_terminal_color(rgb: Rgb) -> u8 {
    if rgb.is_gray() {
        let level = rgb.r;
        if level < GRAY_LOW {
            return CUBE_BASE;
        }
        if level > GRAY_HIGH {
            return CUBE_WHITE;
        }
        return GRAY_BASE + ((level - GRAY_LOW) / 10).min(GRAY_STEPS - 1);
    }

    let step = |channel: u8| (u16::from(channel) * 5 / 255) as u8;
    CUBE_BASE + 36 * step(rgb.r) + 6 * step(rgb.g) + step(rgb.b)
}

/// SGR sequence selecting a palette color for the foreground or background
pub fn escape(index: u8, background: bool) -> String {
    let target = if background { 48 } else { 38 };
    format!("\x1b[{};5;{}m", target, index)
}

/// SGR sequence for a configured hex color.
///
/// An empty value means "no color" and yields an empty sequence. A
/// malformed value degrades to [`RESET`] so rendering never fails on bad
/// configuration.
pub fn hex_escape(value: &str, background: bool) -> String {
    if value.is_empty() {
        return String::new();
    }
    match Rgb::from_hex(value) {
        Ok(rgb) => escape(to_terminal_color(rgb), background),
        Err(err) => {
            tracing::warn!("{}; using reset", err);
            RESET.to_string()
        }
    }
}
