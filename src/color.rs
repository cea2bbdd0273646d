//! Stroke Colour Parsing
//!
//! This module converts CSS colour strings into 8-bit RGBA.
//!
//! Colour workflow:
//! - Host pages configure ink as any CSS colour (`"#000000"`, `"navy"`,
//!   `"rgb(0, 0, 128)"`)
//! - The browser surface hands that string straight to the 2D context
//! - The raster surface needs concrete RGBA8 values for tiny-skia

use crate::error::{PadError, PadResult};

/// An 8-bit sRGB colour with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the default ink colour
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Create a colour from its components
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Parse a CSS colour
///
/// Accepts hex forms, named colours and the functional notations
/// (`rgb()`, `hsl()`, ...). Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`PadError::InvalidColor`] if the string is not a CSS colour.
pub fn parse_css_color(input: &str) -> PadResult<Rgba8> {
    let parsed = csscolorparser::parse(input.trim())
        .map_err(|e| PadError::InvalidColor(format!("{input}: {e}")))?;
    let [r, g, b, a] = parsed.to_rgba8();
    Ok(Rgba8::new(r, g, b, a))
}
