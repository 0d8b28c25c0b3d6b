//! Geometry helpers shared by the annotation model, hit-testing and the toolbar.
//!
//! This module provides:
//! - [`Rect`], the integer axis-aligned rectangle used for bounds, damage and
//!   window frames
//! - Ellipse centre/radius conversion for rendering

// ============================================================================
// Rectangles
// ============================================================================

/// Axis-aligned rectangle in integer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        let width = max_x - min_x;
        let height = max_y - min_y;
        Self::new(min_x, min_y, width, height)
    }

    /// Builds the rectangle spanned by two drag corners, in any direction.
    ///
    /// Degenerate drags still produce a 1x1 (or 1-wide) rectangle so the result
    /// can always take part in intersection tests.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let min_x = x1.min(x2);
        let min_y = y1.min(y2);
        Self {
            x: min_x,
            y: min_y,
            width: (x1.max(x2) - min_x).max(1),
            height: (y1.max(y2) - min_y).max(1),
        }
    }

    pub fn max_x(&self) -> i32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> i32 {
        self.y + self.height
    }

    /// Returns true when the two rectangles overlap. Shared edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    /// Returns true when the point lies inside the rectangle (max edges exclusive).
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.max_x() && y >= self.y && y < self.max_y()
    }

    /// Returns a rectangle that covers both input rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        Rect {
            x: min_x,
            y: min_y,
            width: self.max_x().max(other.max_x()) - min_x,
            height: self.max_y().max(other.max_y()) - min_y,
        }
    }

    /// Expands the rectangle evenly in all directions by `amount`.
    pub fn inflate(&self, amount: i32) -> Rect {
        Rect {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + amount * 2,
            height: self.height + amount * 2,
        }
    }

    /// Returns true if rectangle has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

// ============================================================================
// Ellipses
// ============================================================================

/// Calculates ellipse parameters from two corner points.
///
/// Converts a drag rectangle (from corner to corner) into ellipse parameters
/// (center point and radii) suitable for Cairo's ellipse rendering.
///
/// # Returns
/// Tuple `(cx, cy, rx, ry)` where:
/// - `cx`, `cy` = center point coordinates
/// - `rx` = horizontal radius (half width)
/// - `ry` = vertical radius (half height)
pub fn ellipse_bounds(x1: i32, y1: i32, x2: i32, y2: i32) -> (f64, f64, f64, f64) {
    let cx = (x1 + x2) as f64 / 2.0;
    let cy = (y1 + y2) as f64 / 2.0;
    let rx = (x2 - x1).abs() as f64 / 2.0;
    let ry = (y2 - y1).abs() as f64 / 2.0;
    (cx, cy, rx, ry)
}
