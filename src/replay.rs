//! Event Replay
//!
//! A replay script is a JSON description of a pad's environment plus an
//! ordered list of input steps. Running it drives a pad backed by a
//! [`RasterSurface`], which lets a captured interaction be rendered offline.
//!
//! ```json
//! {
//!   "container_width": 400,
//!   "origin": { "x": 0, "y": 0 },
//!   "config": { "strokeColor": "#1e3a8a", "strokeWidth": 3 },
//!   "steps": [
//!     { "type": "down", "x": 10, "y": 10 },
//!     { "type": "move", "x": 20, "y": 10 },
//!     { "type": "up" }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::PadConfig;
use crate::error::{PadError, PadResult};
use crate::input::{Point, PointerEventType, TouchEvent};
use crate::pad::SignaturePad;
use crate::raster::RasterSurface;
use crate::surface::StaticLayout;

/// One input step, in client coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayStep {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    TouchEnd {
        #[serde(default)]
        touches: Vec<Point>,
    },
    /// Container changed width; the pad re-measures
    Resize { container_width: f64 },
    /// Surface moved on screen, e.g. the page scrolled
    Scroll { x: f64, y: f64 },
    Clear,
}

/// A replayable interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Initial container width in pixels
    pub container_width: f64,
    /// Initial client-space position of the surface
    #[serde(default)]
    pub origin: Point,
    #[serde(default)]
    pub config: PadConfig,
    pub steps: Vec<ReplayStep>,
}

/// Pad type produced by a replay
pub type ReplayPad = SignaturePad<RasterSurface, StaticLayout>;

impl ReplayScript {
    /// Parse a script from JSON
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Replay`] if the JSON does not describe a script.
    pub fn from_json(json: &str) -> PadResult<Self> {
        serde_json::from_str(json).map_err(|e| PadError::Replay(e.to_string()))
    }

    /// Read and parse a script file
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Replay`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> PadResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PadError::Replay(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Build a pad and apply every step in order
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the surface cannot be
    /// (re)allocated.
    pub fn run(&self) -> PadResult<ReplayPad> {
        let surface = RasterSurface::new(1, 1)?;
        let layout = StaticLayout::new(self.origin, self.container_width);
        let mut pad = SignaturePad::new(surface, layout, self.config.clone())?;

        for step in &self.steps {
            apply_step(&mut pad, step)?;
        }

        log::info!(
            "Replayed {} steps: {} points, empty: {}",
            self.steps.len(),
            pad.points().len(),
            pad.is_empty()
        );
        Ok(pad)
    }
}

fn apply_step(pad: &mut ReplayPad, step: &ReplayStep) -> PadResult<()> {
    match step {
        ReplayStep::Down { x, y } => pad.on_pointer_down(Point::new(*x, *y)),
        ReplayStep::Move { x, y } => pad.on_pointer_move(Point::new(*x, *y)),
        ReplayStep::Up => pad.on_pointer_up(),
        ReplayStep::TouchStart { touches } => {
            pad.on_touch_start(&TouchEvent::new(PointerEventType::Down, touches.clone()));
        }
        ReplayStep::TouchMove { touches } => {
            pad.on_touch_move(&TouchEvent::new(PointerEventType::Move, touches.clone()));
        }
        ReplayStep::TouchEnd { touches } => {
            pad.on_touch_end(&TouchEvent::new(PointerEventType::Up, touches.clone()));
        }
        ReplayStep::Resize { container_width } => {
            pad.layout_mut().container_width = *container_width;
            pad.resize()?;
        }
        ReplayStep::Scroll { x, y } => pad.layout_mut().origin = Point::new(*x, *y),
        ReplayStep::Clear => pad.clear(),
    }
    Ok(())
}
