//! Signature Pad State and Logic
//!
//! This module contains the stroke capture state machine. It's designed to be
//! independent of the browser: rendering goes through a [`DrawingSurface`]
//! and on-screen geometry through a [`SurfaceLayout`], both injected at
//! construction.
//!
//! A stroke runs `Idle --down--> Drawing --move*--> Drawing --up--> Idle`.
//! Every captured point lands in one flat list; stroke boundaries are not
//! recorded.

use crate::config::{PadConfig, StrokeStyle};
use crate::error::PadResult;
use crate::input::{self, Point, PointerEvent, PointerEventType, TouchEvent};
use crate::surface::{DrawingSurface, SurfaceLayout};

/// Signature capture state bound to one surface
pub struct SignaturePad<S, L> {
    surface: S,
    layout: L,
    config: PadConfig,
    style: StrokeStyle,
    /// Captured points in surface-local coordinates, in capture order
    points: Vec<Point>,
    /// Whether a down has been seen without its matching up
    is_drawing: bool,
}

impl<S: DrawingSurface, L: SurfaceLayout> SignaturePad<S, L> {
    /// Attach a pad to a surface
    ///
    /// Sizes the surface from the container layout and applies the ink style.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the surface cannot
    /// be allocated.
    pub fn new(surface: S, layout: L, config: PadConfig) -> PadResult<Self> {
        let style = config.stroke_style()?;
        let mut pad = Self {
            surface,
            layout,
            config,
            style,
            points: Vec::new(),
            is_drawing: false,
        };
        pad.resize()?;

        let (width, height) = pad.surface.size();
        log::info!(
            "Signature pad attached: {}x{}, ink {} at {}px",
            width,
            height,
            pad.style.css_color,
            pad.style.width
        );
        Ok(pad)
    }

    /// Re-measure the container and reallocate the surface
    ///
    /// Erases every rendered pixel. Captured points and the drawing flag are
    /// left as they are, so a stroke in progress keeps going but its earlier
    /// ink is gone and the next move only repositions the pen.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be reallocated.
    pub fn resize(&mut self) -> PadResult<()> {
        // Saturating cast: truncates like a canvas `width` attribute, and
        // negative or NaN widths collapse to zero.
        let width = self.layout.container_width() as u32;
        self.surface.resize(width, self.config.height)?;
        // Reallocation resets the surface's style.
        self.surface.apply_style(&self.style)?;

        log::info!(
            "Surface resized to {}x{} ({} points kept, drawing: {})",
            width,
            self.config.height,
            self.points.len(),
            self.is_drawing
        );
        Ok(())
    }

    /// Convert a client-space position into surface-local coordinates
    ///
    /// The surface rectangle is looked up on every call.
    pub fn get_point(&self, client: Point) -> Point {
        input::get_point(client, self.layout.surface_rect())
    }

    /// Begin a stroke at `client`
    pub fn on_pointer_down(&mut self, client: Point) {
        self.is_drawing = true;
        let point = self.get_point(client);
        self.points.push(point);
        self.surface.begin_path(point);
        log::debug!("Stroke started at ({}, {}), {} points", point.x, point.y, self.points.len());
    }

    /// Continue the current stroke to `client`; ignored when not drawing
    pub fn on_pointer_move(&mut self, client: Point) {
        if !self.is_drawing {
            return;
        }
        let point = self.get_point(client);
        self.points.push(point);
        self.surface.line_to(point);
    }

    /// End the current stroke; ignored when not drawing
    pub fn on_pointer_up(&mut self) {
        if !self.is_drawing {
            return;
        }
        self.is_drawing = false;
        log::debug!("Stroke ended, {} points", self.points.len());
    }

    /// Route a pointer event to its handler
    pub fn dispatch_pointer(&mut self, event: &PointerEvent) {
        match event.event_type {
            PointerEventType::Down => self.on_pointer_down(event.client),
            PointerEventType::Move => self.on_pointer_move(event.client),
            PointerEventType::Up => self.on_pointer_up(),
        }
    }

    /// Touch analogue of [`Self::on_pointer_down`]; only a single touch draws
    ///
    /// Hosts suppress the browser's default action for every touch event.
    pub fn on_touch_start(&mut self, event: &TouchEvent) {
        match event.single_touch() {
            Some(touch) => self.on_pointer_down(touch),
            None => log::debug!("Ignoring touch start with {} touches", event.touches.len()),
        }
    }

    /// Touch analogue of [`Self::on_pointer_move`]; only a single touch draws
    pub fn on_touch_move(&mut self, event: &TouchEvent) {
        if let Some(touch) = event.single_touch() {
            self.on_pointer_move(touch);
        }
    }

    /// Touch analogue of [`Self::on_pointer_up`]
    ///
    /// Ends the stroke whatever the remaining touch count: an end event lists
    /// the touches still down, not the one that lifted.
    pub fn on_touch_end(&mut self, _event: &TouchEvent) {
        self.on_pointer_up();
    }

    /// Route a touch event to its handler
    pub fn dispatch_touch(&mut self, event: &TouchEvent) {
        match event.event_type {
            PointerEventType::Down => self.on_touch_start(event),
            PointerEventType::Move => self.on_touch_move(event),
            PointerEventType::Up => self.on_touch_end(event),
        }
    }

    /// Erase all ink and forget every captured point
    pub fn clear(&mut self) {
        self.surface.clear();
        self.points.clear();
        log::debug!("Signature pad cleared");
    }

    /// Whether nothing has been drawn since construction or the last clear
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Encode the current pixels as PNG, drawn or not
    ///
    /// # Errors
    ///
    /// Returns [`crate::PadError::Encode`] if encoding fails.
    pub fn export_png(&self) -> PadResult<Vec<u8>> {
        self.surface.encode_png()
    }

    /// Encode the current pixels as a PNG data URI, drawn or not
    ///
    /// # Errors
    ///
    /// Returns [`crate::PadError::Encode`] if encoding fails.
    pub fn to_data_url(&self) -> PadResult<String> {
        self.surface.to_data_url()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    /// Surface size in pixels (width, height)
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface.size()
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Mutable layout access, e.g. to model page scroll in tests
    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PadError;
    use crate::raster::RasterSurface;
    use crate::surface::StaticLayout;
    use tiny_skia::Pixmap;

    type TestPad = SignaturePad<RasterSurface, StaticLayout>;

    fn pad_at(origin: Point, width: f64) -> TestPad {
        let surface = RasterSurface::new(1, 1).unwrap();
        SignaturePad::new(surface, StaticLayout::new(origin, width), PadConfig::default()).unwrap()
    }

    fn pad() -> TestPad {
        pad_at(Point::new(0.0, 0.0), 300.0)
    }

    fn touches(points: &[(f64, f64)]) -> Vec<Point> {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn assert_export_blank(pad: &TestPad) {
        let png = pad.export_png().unwrap();
        let decoded = Pixmap::decode_png(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), pad.surface_size());
        assert!(decoded.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_new_pad_is_empty() {
        let pad = pad();
        assert!(pad.is_empty());
        assert!(!pad.is_drawing());
        assert!(pad.surface().is_blank());
    }

    #[test]
    fn test_size_follows_container() {
        let pad = pad_at(Point::default(), 412.9);
        assert_eq!(pad.surface_size(), (412, 150));
    }

    #[test]
    fn test_custom_height() {
        let config = PadConfig { height: 200, ..PadConfig::default() };
        let layout = StaticLayout::new(Point::default(), 100.0);
        let pad = SignaturePad::new(RasterSurface::new(1, 1).unwrap(), layout, config).unwrap();
        assert_eq!(pad.surface_size(), (100, 200));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PadConfig { stroke_color: "blurple".to_string(), ..PadConfig::default() };
        let layout = StaticLayout::new(Point::default(), 100.0);
        let result = SignaturePad::new(RasterSurface::new(1, 1).unwrap(), layout, config);
        assert!(matches!(result, Err(PadError::InvalidColor(_))));
    }

    #[test]
    fn test_named_colour_ink() {
        let config = PadConfig { stroke_color: "red".to_string(), ..PadConfig::default() };
        let layout = StaticLayout::new(Point::default(), 100.0);
        let mut pad = SignaturePad::new(RasterSurface::new(1, 1).unwrap(), layout, config).unwrap();
        assert_eq!(pad.style().css_color, "red");

        pad.on_pointer_down(Point::new(10.0, 10.0));
        pad.on_pointer_move(Point::new(90.0, 10.0));
        let pixel = pad.surface().pixmap().pixel(50, 10).unwrap().demultiply();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (255, 0, 0));
    }

    #[test]
    fn test_simple_stroke_scenario() {
        let mut pad = pad();
        pad.on_pointer_down(Point::new(10.0, 10.0));
        pad.on_pointer_move(Point::new(20.0, 10.0));
        pad.on_pointer_move(Point::new(20.0, 20.0));
        pad.on_pointer_up();

        assert_eq!(pad.points(), touches(&[(10.0, 10.0), (20.0, 10.0), (20.0, 20.0)]).as_slice());
        assert!(!pad.is_empty());
        assert!(!pad.is_drawing());
        // Ink along both segments
        assert!(pad.surface().pixel_alpha(15, 10).unwrap() > 0);
        assert!(pad.surface().pixel_alpha(20, 15).unwrap() > 0);
        assert_eq!(pad.surface().pixel_alpha(100, 100), Some(0));
    }

    #[test]
    fn test_point_count_matches_down_and_moves() {
        for moves in [0_usize, 1, 5, 40] {
            let mut pad = pad();
            pad.on_pointer_down(Point::new(5.0, 5.0));
            for i in 0..moves {
                pad.on_pointer_move(Point::new(5.0 + i as f64, 6.0));
            }
            pad.on_pointer_up();
            assert!(!pad.is_empty());
            assert_eq!(pad.points().len(), moves + 1);
        }
    }

    #[test]
    fn test_move_before_down_is_ignored() {
        let mut pad = pad();
        pad.on_pointer_move(Point::new(10.0, 10.0));
        pad.on_pointer_move(Point::new(50.0, 50.0));
        assert!(pad.is_empty());
        assert!(pad.surface().is_blank());
    }

    #[test]
    fn test_moves_after_up_are_ignored() {
        let mut pad = pad();
        pad.on_pointer_down(Point::new(10.0, 10.0));
        pad.on_pointer_move(Point::new(20.0, 10.0));
        pad.on_pointer_up();
        pad.on_pointer_move(Point::new(90.0, 90.0));
        assert_eq!(pad.points().len(), 2);
        assert_eq!(pad.surface().pixel_alpha(90, 90), Some(0));
    }

    #[test]
    fn test_up_when_idle_is_noop() {
        let mut pad = pad();
        pad.on_pointer_up();
        assert!(!pad.is_drawing());
        assert!(pad.is_empty());
    }

    #[test]
    fn test_strokes_accumulate_into_one_list() {
        let mut pad = pad();
        pad.dispatch_pointer(&PointerEvent::down(10.0, 10.0));
        pad.dispatch_pointer(&PointerEvent::moved(20.0, 10.0));
        pad.dispatch_pointer(&PointerEvent::up(20.0, 10.0));
        pad.dispatch_pointer(&PointerEvent::down(50.0, 50.0));
        pad.dispatch_pointer(&PointerEvent::moved(60.0, 60.0));
        pad.dispatch_pointer(&PointerEvent::up(60.0, 60.0));

        assert_eq!(pad.points().len(), 4);
        assert_eq!(pad.points()[2], Point::new(50.0, 50.0));
        // No ink bridging the gap between strokes
        assert_eq!(pad.surface().pixel_alpha(35, 30), Some(0));
    }

    #[test]
    fn test_points_are_surface_local() {
        let mut pad = pad_at(Point::new(40.0, 100.0), 300.0);
        pad.on_pointer_down(Point::new(50.0, 110.0));
        assert_eq!(pad.points(), &[Point::new(10.0, 10.0)]);
    }

    #[test]
    fn test_get_point_recomputed_after_scroll() {
        let mut pad = pad_at(Point::new(0.0, 200.0), 300.0);
        let client = Point::new(30.0, 230.0);
        assert_eq!(pad.get_point(client), Point::new(30.0, 30.0));

        pad.on_pointer_down(client);
        pad.layout_mut().origin.y = 180.0;
        pad.on_pointer_move(client);

        assert_eq!(pad.points(), &[Point::new(30.0, 30.0), Point::new(30.0, 50.0)]);
    }

    #[test]
    fn test_clear_after_drawing() {
        let mut pad = pad();
        pad.on_pointer_down(Point::new(10.0, 10.0));
        pad.on_pointer_move(Point::new(200.0, 100.0));
        pad.on_pointer_up();
        assert!(!pad.surface().is_blank());

        pad.clear();
        assert!(pad.points().is_empty());
        assert!(pad.is_empty());
        assert_export_blank(&pad);
    }

    #[test]
    fn test_clear_mid_stroke_keeps_stroke_open() {
        let mut pad = pad();
        pad.on_pointer_down(Point::new(10.0, 10.0));
        pad.on_pointer_move(Point::new(100.0, 10.0));
        pad.clear();
        assert!(pad.is_drawing());
        assert!(pad.surface().is_blank());

        // The open path is restroked, so the segment from before the clear
        // reappears even though its points are gone.
        pad.on_pointer_move(Point::new(100.0, 100.0));
        assert_eq!(pad.points(), &[Point::new(100.0, 100.0)]);
        assert!(pad.surface().pixel_alpha(50, 10).unwrap() > 0);
        assert!(pad.surface().pixel_alpha(100, 50).unwrap() > 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut pad = pad();
        pad.clear();
        pad.clear();
        assert!(pad.is_empty());
        assert_export_blank(&pad);
    }

    #[test]
    fn test_export_of_empty_pad_is_blank_image() {
        let pad = pad();
        assert_export_blank(&pad);
        assert!(pad.to_data_url().unwrap().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_export_contains_ink() {
        let mut pad = pad();
        pad.on_pointer_down(Point::new(10.0, 10.0));
        pad.on_pointer_move(Point::new(100.0, 10.0));
        let decoded = Pixmap::decode_png(&pad.export_png().unwrap()).unwrap();
        assert!(decoded.pixel(50, 10).unwrap().alpha() > 0);
    }

    #[test]
    fn test_single_touch_draws() {
        let mut pad = pad();
        let start = TouchEvent::new(PointerEventType::Down, touches(&[(10.0, 10.0)]));
        let moved = TouchEvent::new(PointerEventType::Move, touches(&[(20.0, 10.0)]));
        let end = TouchEvent::new(PointerEventType::Up, Vec::new());

        pad.dispatch_touch(&start);
        pad.dispatch_touch(&moved);
        assert!(pad.is_drawing());
        pad.dispatch_touch(&end);

        assert_eq!(pad.points().len(), 2);
        assert!(!pad.is_drawing());
    }

    #[test]
    fn test_two_touch_move_is_ignored() {
        let mut pad = pad();
        pad.on_touch_start(&TouchEvent::new(PointerEventType::Down, touches(&[(10.0, 10.0)])));
        let two = TouchEvent::new(PointerEventType::Move, touches(&[(20.0, 10.0), (80.0, 80.0)]));

        pad.on_touch_move(&two);
        assert_eq!(pad.points().len(), 1);
        assert!(pad.is_drawing());
    }

    #[test]
    fn test_two_touch_start_does_not_start_stroke() {
        let mut pad = pad();
        let two = TouchEvent::new(PointerEventType::Down, touches(&[(10.0, 10.0), (20.0, 20.0)]));
        pad.on_touch_start(&two);
        assert!(!pad.is_drawing());
        assert!(pad.is_empty());
    }

    #[test]
    fn test_mouse_and_touch_are_independent() {
        let mut pad = pad();
        pad.on_touch_start(&TouchEvent::new(PointerEventType::Down, touches(&[(10.0, 10.0)])));
        pad.on_pointer_up();
        assert!(!pad.is_drawing());
        // A trailing touch end on an idle pad is harmless.
        pad.on_touch_end(&TouchEvent::new(PointerEventType::Up, Vec::new()));
        assert_eq!(pad.points().len(), 1);
    }

    #[test]
    fn test_resize_erases_pixels_but_keeps_points() {
        let mut pad = pad();
        pad.on_pointer_down(Point::new(10.0, 10.0));
        pad.on_pointer_move(Point::new(100.0, 10.0));
        pad.on_pointer_up();

        pad.layout_mut().container_width = 250.0;
        pad.resize().unwrap();

        assert_eq!(pad.surface_size(), (250, 150));
        assert_eq!(pad.points().len(), 2);
        assert!(!pad.is_empty());
        assert!(pad.surface().is_blank());
    }

    #[test]
    fn test_resize_mid_stroke_keeps_drawing() {
        let mut pad = pad();
        pad.on_pointer_down(Point::new(10.0, 10.0));
        pad.on_pointer_move(Point::new(40.0, 10.0));
        pad.resize().unwrap();
        assert!(pad.is_drawing());

        // First move after the resize only repositions the pen.
        pad.on_pointer_move(Point::new(60.0, 40.0));
        assert!(pad.surface().is_blank());
        assert_eq!(pad.points().len(), 3);

        pad.on_pointer_move(Point::new(60.0, 80.0));
        assert!(pad.surface().pixel_alpha(60, 60).unwrap() > 0);
        assert_eq!(pad.points().len(), 4);
    }

    #[test]
    fn test_resize_reapplies_style() {
        let config = PadConfig { stroke_width: 8.0, ..PadConfig::default() };
        let layout = StaticLayout::new(Point::default(), 200.0);
        let mut pad = SignaturePad::new(RasterSurface::new(1, 1).unwrap(), layout, config).unwrap();
        pad.resize().unwrap();

        pad.on_pointer_down(Point::new(20.0, 50.0));
        pad.on_pointer_move(Point::new(120.0, 50.0));
        // 3px off the centre line is only inked with the wide pen.
        assert!(pad.surface().pixel_alpha(70, 53).unwrap() > 0);
    }
}
