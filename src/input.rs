//! Input Event Types
//!
//! This module defines the pointer and touch events the pad consumes, and the
//! coordinate transform from page (client) space into surface-local space.
//! Events carry client coordinates; the surface's on-screen rectangle is
//! looked up again for every event since scrolling or layout can move it.

use serde::{Deserialize, Serialize};

/// A 2D point, either in client space or surface-local space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen rectangle of the drawing surface, in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// Convert a client-space position into surface-local coordinates
///
/// Pure: `client - (rect.left, rect.top)`.
#[must_use]
pub fn get_point(client: Point, rect: SurfaceRect) -> Point {
    Point {
        x: client.x - rect.left,
        y: client.y - rect.top,
    }
}

/// Type of pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventType {
    /// Pointer button pressed (start of stroke)
    Down,
    /// Pointer moved (continues a stroke if one is active)
    Move,
    /// Pointer button released (end of stroke)
    Up,
}

/// A mouse-style pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in client space
    pub client: Point,
    /// Type of event (down, move, up)
    pub event_type: PointerEventType,
}

impl PointerEvent {
    #[must_use]
    pub fn down(x: f64, y: f64) -> Self {
        Self { client: Point::new(x, y), event_type: PointerEventType::Down }
    }

    #[must_use]
    pub fn moved(x: f64, y: f64) -> Self {
        Self { client: Point::new(x, y), event_type: PointerEventType::Move }
    }

    #[must_use]
    pub fn up(x: f64, y: f64) -> Self {
        Self { client: Point::new(x, y), event_type: PointerEventType::Up }
    }
}

/// A touch event
///
/// `touches` lists every touch currently on the surface, in client space,
/// the way the browser's `TouchEvent.touches` does. For an end event that is
/// the set of touches still down, usually empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub event_type: PointerEventType,
    pub touches: Vec<Point>,
}

impl TouchEvent {
    #[must_use]
    pub fn new(event_type: PointerEventType, touches: Vec<Point>) -> Self {
        Self { event_type, touches }
    }

    /// The only active touch, if exactly one is active
    #[must_use]
    pub fn single_touch(&self) -> Option<Point> {
        match self.touches.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_point_subtracts_offset() {
        let rect = SurfaceRect::new(40.0, 100.0, 300.0, 150.0);
        assert_eq!(get_point(Point::new(50.0, 110.0), rect), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_get_point_tracks_scroll() {
        let client = Point::new(200.0, 300.0);
        // Page scrolled by 120px: the surface moved up on screen.
        for top in [250.0, 130.0, -20.0] {
            let rect = SurfaceRect::new(15.5, top, 300.0, 150.0);
            let p = get_point(client, rect);
            assert_eq!(p.x, client.x - 15.5);
            assert_eq!(p.y, client.y - top);
        }
    }

    #[test]
    fn test_get_point_can_leave_surface() {
        let rect = SurfaceRect::new(10.0, 10.0, 100.0, 150.0);
        assert_eq!(get_point(Point::new(0.0, 5.0), rect), Point::new(-10.0, -5.0));
    }

    #[test]
    fn test_single_touch() {
        let one = TouchEvent::new(PointerEventType::Move, vec![Point::new(1.0, 2.0)]);
        assert_eq!(one.single_touch(), Some(Point::new(1.0, 2.0)));

        let none = TouchEvent::new(PointerEventType::Up, Vec::new());
        assert_eq!(none.single_touch(), None);

        let two = TouchEvent::new(
            PointerEventType::Move,
            vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
        );
        assert_eq!(two.single_touch(), None);
    }

    #[test]
    fn test_pointer_event_constructors() {
        assert_eq!(PointerEvent::down(1.0, 2.0).event_type, PointerEventType::Down);
        assert_eq!(PointerEvent::moved(1.0, 2.0).event_type, PointerEventType::Move);
        assert_eq!(PointerEvent::up(1.0, 2.0).client, Point::new(1.0, 2.0));
    }
}
