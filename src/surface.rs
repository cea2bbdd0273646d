//! Surface and Layout Seams
//!
//! The pad never talks to a canvas element or the DOM directly. Rendering
//! goes through [`DrawingSurface`] and geometry lookups go through
//! [`SurfaceLayout`], so the same state machine drives the browser's 2D
//! context, the tiny-skia raster, and test doubles.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::config::{StrokeStyle, DEFAULT_SURFACE_HEIGHT};
use crate::error::PadResult;
use crate::input::{Point, SurfaceRect};

/// Prefix of a PNG data URI
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A 2D raster the pad paints ink into
pub trait DrawingSurface {
    /// Reallocate the surface at a new size. Erases every pixel, drops the
    /// current path, and resets styling.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PadError::Surface`] if the backing store cannot be
    /// allocated.
    fn resize(&mut self, width: u32, height: u32) -> PadResult<()>;

    /// Current size in pixels (width, height)
    fn size(&self) -> (u32, u32);

    /// Set ink colour and width; caps and joins are round
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the style.
    fn apply_style(&mut self, style: &StrokeStyle) -> PadResult<()>;

    /// Start a new path with the pen at `point`
    fn begin_path(&mut self, point: Point);

    /// Extend the current path to `point` and stroke the whole open path
    ///
    /// With no current pen position this only moves the pen.
    fn line_to(&mut self, point: Point);

    /// Erase every pixel. The current path is left alone.
    fn clear(&mut self);

    /// Encode the current pixels as PNG
    ///
    /// # Errors
    ///
    /// Returns [`crate::PadError::Encode`] if encoding fails.
    fn encode_png(&self) -> PadResult<Vec<u8>>;

    /// Encode the current pixels as a `data:image/png;base64,` URI
    ///
    /// # Errors
    ///
    /// Same as [`DrawingSurface::encode_png`].
    fn to_data_url(&self) -> PadResult<String> {
        let png = self.encode_png()?;
        Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(png)))
    }
}

/// Where the surface currently sits on screen, and how wide its container is
pub trait SurfaceLayout {
    /// On-screen rectangle of the surface in client coordinates
    fn surface_rect(&self) -> SurfaceRect;

    /// Layout width of the surface's parent container
    fn container_width(&self) -> f64;
}

/// A layout held in memory, for native rendering and tests
///
/// Scrolling is modelled by moving `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StaticLayout {
    /// Client-space position of the surface's top-left corner
    pub origin: Point,
    /// Container width in pixels
    pub container_width: f64,
}

impl StaticLayout {
    #[must_use]
    pub fn new(origin: Point, container_width: f64) -> Self {
        Self { origin, container_width }
    }
}

impl SurfaceLayout for StaticLayout {
    fn surface_rect(&self) -> SurfaceRect {
        SurfaceRect::new(
            self.origin.x,
            self.origin.y,
            self.container_width,
            f64::from(DEFAULT_SURFACE_HEIGHT),
        )
    }

    fn container_width(&self) -> f64 {
        self.container_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPng(Vec<u8>);

    impl DrawingSurface for FixedPng {
        fn resize(&mut self, _width: u32, _height: u32) -> PadResult<()> {
            Ok(())
        }
        fn size(&self) -> (u32, u32) {
            (0, 0)
        }
        fn apply_style(&mut self, _style: &StrokeStyle) -> PadResult<()> {
            Ok(())
        }
        fn begin_path(&mut self, _point: Point) {}
        fn line_to(&mut self, _point: Point) {}
        fn clear(&mut self) {}
        fn encode_png(&self) -> PadResult<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_default_data_url_is_base64_png() {
        let surface = FixedPng(b"hello".to_vec());
        assert_eq!(surface.to_data_url().unwrap(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_static_layout_rect_follows_origin() {
        let mut layout = StaticLayout::new(Point::new(5.0, 7.0), 320.0);
        assert_eq!(layout.surface_rect().left, 5.0);
        assert_eq!(layout.surface_rect().top, 7.0);
        layout.origin.y -= 50.0;
        assert_eq!(layout.surface_rect().top, -43.0);
        assert_eq!(layout.container_width(), 320.0);
    }
}
