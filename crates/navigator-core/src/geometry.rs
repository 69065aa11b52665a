//! Geometry primitives shared by the router and the transition engine
//!
//! Coordinates are in host points with the origin at the top-left corner of
//! the surface, matching the convention of every host toolkit we target.

use serde::{Deserialize, Serialize};

/// A point or a 2D vector (translation, velocity)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal component
    pub x: f64,
    /// Vertical component
    pub y: f64,
}

impl Point {
    /// The origin
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in points
    pub width: f64,
    /// Height in points
    pub height: f64,
}

impl Size {
    /// Create a new size
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub origin: Point,
    /// Extent
    pub size: Size,
}

impl Rect {
    /// The empty rectangle at the origin
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size {
            width: 0.0,
            height: 0.0,
        },
    };

    /// Create a rectangle from its components
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Create a rectangle of the given size at the origin
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    /// Width of the rectangle
    pub fn width(&self) -> f64 {
        self.size.width
    }

    /// Height of the rectangle
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Pin a rectangle of this height to the bottom edge of `bounds`,
    /// stretched to the full width
    pub fn anchored_bottom(&self, bounds: Size) -> Rect {
        Rect::new(
            0.0,
            bounds.height - self.height(),
            bounds.width,
            self.height(),
        )
    }

    /// Centre a rectangle of this size inside `bounds`
    pub fn anchored_center(&self, bounds: Size) -> Rect {
        Rect::new(
            (bounds.width - self.width()) / 2.0,
            (bounds.height - self.height()) / 2.0,
            self.width(),
            self.height(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_bottom_spans_full_width() {
        let sheet = Rect::new(0.0, 0.0, 0.0, 200.0);
        let anchored = sheet.anchored_bottom(Size::new(320.0, 640.0));
        assert_eq!(anchored, Rect::new(0.0, 440.0, 320.0, 200.0));
    }

    #[test]
    fn test_anchored_center() {
        let card = Rect::new(0.0, 0.0, 300.0, 200.0);
        let anchored = card.anchored_center(Size::new(320.0, 600.0));
        assert_eq!(anchored, Rect::new(10.0, 200.0, 300.0, 200.0));
    }

    #[test]
    fn test_size_is_empty() {
        assert!(Size::default().is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }
}
