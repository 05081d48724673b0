#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//===========================================================================//

/// A straight-alpha RGBA color.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Fully transparent white, the default icon background.
    pub const TRANSPARENT_WHITE: Rgba = Rgba([255, 255, 255, 0]);

    /// Dark gray (`#333333`), the default glyph color.
    pub const DARK_GRAY: Rgba = Rgba([0x33, 0x33, 0x33, 255]);

    /// Creates an opaque color.
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Rgba {
        Rgba([red, green, blue, u8::MAX])
    }

    /// Returns the alpha component.
    pub fn alpha(&self) -> u8 {
        self.0[3]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

//===========================================================================//

/// An error from parsing a hex color string.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseColorError {
    /// The string has a digit count other than 3, 4, 6, or 8.
    #[error("color {0:?} must have 3, 4, 6, or 8 hex digits")]
    Length(String),
    /// The string contains a character that isn't a hex digit.
    #[error("color {0:?} contains a non-hex character")]
    Digit(String),
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Parses `rgb`, `rgba`, `rrggbb`, or `rrggbbaa`, with or without a
    /// leading `#`.  Colors without an alpha component are opaque.
    fn from_str(input: &str) -> Result<Rgba, ParseColorError> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        let mut nibbles = Vec::with_capacity(8);
        for ch in digits.chars() {
            match ch.to_digit(16) {
                Some(value) => nibbles.push(value as u8),
                None => return Err(ParseColorError::Digit(input.to_string())),
            }
        }
        let mut rgba = [0, 0, 0, u8::MAX];
        match nibbles.len() {
            3 | 4 => {
                for (channel, &nibble) in rgba.iter_mut().zip(nibbles.iter())
                {
                    *channel = nibble * 0x11;
                }
            }
            6 | 8 => {
                for (channel, pair) in rgba.iter_mut().zip(nibbles.chunks(2)) {
                    *channel = (pair[0] << 4) | pair[1];
                }
            }
            _ => return Err(ParseColorError::Length(input.to_string())),
        }
        Ok(Rgba(rgba))
    }
}

//===========================================================================//


//===========================================================================//
