//! CPU Raster Surface
//!
//! A [`DrawingSurface`] backed by a tiny-skia pixmap. Used by the native
//! replay tool and by tests; it behaves like a freshly created 2D canvas:
//! transparent pixels, black 1px ink until styled, and an open path that is
//! restroked in full on every `line_to` and lost whenever the surface is
//! reallocated.

use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::config::StrokeStyle;
use crate::error::{PadError, PadResult};
use crate::input::Point;
use crate::surface::DrawingSurface;

/// Pixmap-backed drawing surface
pub struct RasterSurface {
    pixmap: Pixmap,
    paint: Paint<'static>,
    stroke: Stroke,
    /// Vertices of the open path, from `begin_path` on
    path: Vec<Point>,
}

impl RasterSurface {
    /// Create a transparent surface of the given size
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Surface`] if the pixmap cannot be allocated.
    pub fn new(width: u32, height: u32) -> PadResult<Self> {
        Ok(Self {
            pixmap: alloc_pixmap(width, height)?,
            paint: default_paint(),
            stroke: Stroke::default(),
            path: Vec::new(),
        })
    }

    /// Borrow the underlying pixmap
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Alpha of the pixel at (x, y), or `None` outside the surface
    pub fn pixel_alpha(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.pixel(x, y).map(|p| p.alpha())
    }

    /// Whether every pixel is fully transparent
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Current end of the open path
    pub fn pen(&self) -> Option<Point> {
        self.path.last().copied()
    }

    /// Vertices of the open path
    pub fn path(&self) -> &[Point] {
        &self.path
    }
}

/// Allocate a transparent pixmap, clamping empty dimensions to one pixel
fn alloc_pixmap(width: u32, height: u32) -> PadResult<Pixmap> {
    if width == 0 || height == 0 {
        log::warn!("Surface size {}x{} is empty, clamping to at least 1x1", width, height);
    }
    let (width, height) = (width.max(1), height.max(1));
    Pixmap::new(width, height)
        .ok_or_else(|| PadError::Surface(format!("failed to allocate {width}x{height} pixmap")))
}

fn default_paint() -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::BLACK);
    paint.anti_alias = true;
    paint
}

impl DrawingSurface for RasterSurface {
    fn resize(&mut self, width: u32, height: u32) -> PadResult<()> {
        self.pixmap = alloc_pixmap(width, height)?;
        self.paint = default_paint();
        self.stroke = Stroke::default();
        self.path.clear();
        log::debug!("Raster surface reallocated: {}x{}", self.pixmap.width(), self.pixmap.height());
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn apply_style(&mut self, style: &StrokeStyle) -> PadResult<()> {
        let c = style.color;
        self.paint.set_color_rgba8(c.r, c.g, c.b, c.a);
        self.stroke = Stroke {
            width: style.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        Ok(())
    }

    fn begin_path(&mut self, point: Point) {
        self.path.clear();
        self.path.push(point);
    }

    fn line_to(&mut self, point: Point) {
        let had_pen = !self.path.is_empty();
        self.path.push(point);
        if !had_pen {
            // No open path: behaves like a move.
            return;
        }

        // Like a 2D context's stroke(): the whole open path is painted again.
        let mut pb = PathBuilder::new();
        let mut vertices = self.path.iter();
        if let Some(first) = vertices.next() {
            pb.move_to(first.x as f32, first.y as f32);
        }
        for p in vertices {
            pb.line_to(p.x as f32, p.y as f32);
        }
        if let Some(path) = pb.finish() {
            self.pixmap
                .stroke_path(&path, &self.paint, &self.stroke, Transform::identity(), None);
        }
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn encode_png(&self) -> PadResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| PadError::Encode(e.to_string()))
    }
}
