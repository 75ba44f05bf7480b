//! RGBA color used to tint `currentColor` glyphs

use crate::error::SvgError;

/// Straight-alpha RGBA color with components in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Result<Self, SvgError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || SvgError::Parse(format!("invalid color {hex:?}"));

        let channel = |i: usize, width: usize| -> Result<f32, SvgError> {
            let part = digits.get(i * width..(i + 1) * width).ok_or_else(invalid)?;
            let value = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
            // #rgb doubles each digit: f -> ff
            let value = if width == 1 { value * 17 } else { value };
            Ok(value as f32 / 255.0)
        };

        match digits.len() {
            3 => Ok(Self::rgba(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?, 1.0)),
            6 => Ok(Self::rgba(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?, 1.0)),
            8 => Ok(Self::rgba(
                channel(0, 2)?,
                channel(1, 2)?,
                channel(2, 2)?,
                channel(3, 2)?,
            )),
            _ => Err(invalid()),
        }
    }
}
