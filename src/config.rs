//! Pad Configuration
//!
//! This module defines the styling options a host page passes when attaching
//! a pad, and the resolved stroke style the surfaces draw with.

use serde::{Deserialize, Serialize};

use crate::color::{parse_css_color, Rgba8};
use crate::error::{PadError, PadResult};

/// Default ink colour
pub const DEFAULT_STROKE_COLOR: &str = "#000000";
/// Default line width in surface pixels
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
/// Fixed surface height in surface pixels
pub const DEFAULT_SURFACE_HEIGHT: u32 = 150;

/// Options recognised when constructing a pad
///
/// Field names are camelCase on the wire. The older `penColor` / `penWidth`
/// spellings are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PadConfig {
    /// CSS colour of the ink, handed to the browser as-is
    #[serde(alias = "penColor")]
    pub stroke_color: String,
    /// Line width in surface pixels
    #[serde(alias = "penWidth")]
    pub stroke_width: f64,
    /// Surface height; the width always follows the container
    pub height: u32,
}

impl PadConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    ///
    /// # Errors
    ///
    /// Returns [`PadError::InvalidConfig`] if the JSON is malformed or the
    /// values are out of range.
    pub fn from_json(json: &str) -> PadResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate that the options are in acceptable ranges
    ///
    /// An empty colour or a zero width is not an error; both fall back to
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PadError::InvalidConfig`] for negative or infinite widths
    /// and a zero height, and [`PadError::InvalidColor`] for a string that is
    /// not a CSS colour.
    pub fn validate(&self) -> PadResult<()> {
        self.stroke_style().map(|_| ())
    }

    /// Colour actually used for ink
    pub fn effective_color(&self) -> &str {
        match self.stroke_color.trim() {
            "" => DEFAULT_STROKE_COLOR,
            color => color,
        }
    }

    /// Width actually used for ink; zero and NaN mean the default
    pub fn effective_width(&self) -> f64 {
        if self.stroke_width == 0.0 || self.stroke_width.is_nan() {
            DEFAULT_STROKE_WIDTH
        } else {
            self.stroke_width
        }
    }

    /// Resolve the options into the style handed to a surface
    ///
    /// # Errors
    ///
    /// Same as [`PadConfig::validate`].
    pub fn stroke_style(&self) -> PadResult<StrokeStyle> {
        let width = self.effective_width();
        if !(width.is_finite() && width > 0.0) {
            return Err(PadError::InvalidConfig(format!(
                "stroke width must be positive, got {width}"
            )));
        }
        if self.height == 0 {
            return Err(PadError::InvalidConfig("surface height must be positive".to_string()));
        }
        let css_color = self.effective_color();
        Ok(StrokeStyle {
            css_color: css_color.to_string(),
            color: parse_css_color(css_color)?,
            width,
        })
    }
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
        }
    }
}

/// Resolved ink style
///
/// Caps and joins are always round so consecutive segments read as one line.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    /// Colour as given by the host, for surfaces that take CSS strings
    pub css_color: String,
    /// Parsed colour, for surfaces that rasterise themselves
    pub color: Rgba8,
    /// Line width in surface pixels
    pub width: f64,
}
