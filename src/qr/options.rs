//! Rendering options for generated symbols

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default output width in pixels.
pub const DEFAULT_WIDTH: u32 = 300;
/// Default quiet-zone margin in modules.
pub const DEFAULT_MARGIN: u32 = 2;

/// An RGBA color written as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    /// Opaque black
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    /// Opaque white
    pub const WHITE: Color = Color([255, 255, 255, 255]);
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(Error::Config(format!(
                "Invalid color '{value}', expected #RRGGBB or #RRGGBBAA"
            )));
        }

        let mut rgba = [0, 0, 0, 255];
        for (i, slot) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
            *slot = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|e| Error::Config(format!("Invalid color '{value}': {e}")))?;
        }
        Ok(Color(rgba))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02X}{g:02X}{b:02X}")
        } else {
            write!(f, "#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

/// QR error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Correction {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl From<Correction> for qrcode::EcLevel {
    fn from(level: Correction) -> Self {
        match level {
            Correction::L => qrcode::EcLevel::L,
            Correction::M => qrcode::EcLevel::M,
            Correction::Q => qrcode::EcLevel::Q,
            Correction::H => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for Correction {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(format!(
                "Unsupported error correction level '{value}', expected L, M, Q or H"
            )),
        }
    }
}

/// Fixed options handed to the encoder on every call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderOptions {
    /// Output width (and height) in pixels
    pub width: u32,
    /// Quiet-zone margin in modules
    pub margin: u32,
    /// Module color
    pub dark: Color,
    /// Background color
    pub light: Color,
    /// Error correction level
    pub correction: Correction,
    /// Decode every rendered symbol and check it reproduces the payload
    pub verify: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            margin: DEFAULT_MARGIN,
            dark: Color::BLACK,
            light: Color::WHITE,
            correction: Correction::M,
            verify: false,
        }
    }
}
