//! Signature Pad Library
//!
//! This crate provides a signature capture pad that can run:
//! - In a browser against a `<canvas>` element (via WASM)
//! - Natively, rendering into a CPU pixmap (replay tool, tests)
//!
//! The library separates the stroke capture state machine from the platform:
//! [`SignaturePad`] only sees a [`DrawingSurface`] and a [`SurfaceLayout`].
//! A host form can ask [`SignaturePad::is_empty`] before submitting, usually
//! through [`SubmitGuard`], and [`SignaturePad::to_data_url`] yields the PNG.

mod color;
mod config;
mod error;
mod input;
mod pad;
mod raster;
pub mod replay;
mod surface;
mod validation;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use color::{parse_css_color, Rgba8};
pub use config::{PadConfig, StrokeStyle, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, DEFAULT_SURFACE_HEIGHT};
pub use error::{PadError, PadResult};
pub use input::{get_point, Point, PointerEvent, PointerEventType, SurfaceRect, TouchEvent};
pub use pad::SignaturePad;
pub use raster::RasterSurface;
pub use surface::{DrawingSurface, StaticLayout, SurfaceLayout, PNG_DATA_URL_PREFIX};
pub use validation::{SubmitGuard, DEFAULT_MISSING_SIGNATURE_MESSAGE};

// Re-export for WASM builds
#[cfg(target_arch = "wasm32")]
pub use wasm_bindgen;

/// Initialize panic hook for better error messages in WASM
#[cfg(target_arch = "wasm32")]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize logging for WASM (logs go to browser console)
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        // A logger is already installed; keep it.
        log::warn!("Console logger not installed: {err}");
    }
}

/// WASM entry point - called when the module is loaded
///
/// Only installs the panic hook and logger. Pads are attached explicitly by
/// the host page through [`web::SignaturePadHandle`].
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    init_panic_hook();
    init_logging();

    log::info!("Signature pad WASM module started");
}
