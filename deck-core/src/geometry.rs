//! Logical canvas space and axis-aligned rectangles.

use serde::{Deserialize, Serialize};

/// Width of the logical canvas every element is authored in.
pub const CANVAS_WIDTH: f32 = 960.0;

/// Height of the logical canvas every element is authored in.
pub const CANVAS_HEIGHT: f32 = 540.0;

/// An axis-aligned rectangle in logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub min_x: f32,
    /// Top edge.
    pub min_y: f32,
    /// Right edge.
    pub max_x: f32,
    /// Bottom edge.
    pub max_y: f32,
}

impl Rect {
    /// Build a rectangle from two opposite corners given in any order.
    #[must_use]
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Build a rectangle from an origin and a size.
    #[must_use]
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_corners(x, y, x + width, y + height)
    }

    /// Rectangle covering the full logical canvas.
    #[must_use]
    pub fn canvas() -> Self {
        Self::from_origin_size(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Strict AABB overlap test. Touching edges do not count.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        other.min_x < self.max_x
            && other.max_x > self.min_x
            && other.min_y < self.max_y
            && other.max_y > self.min_y
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
