//! Core geometry types and operations
//!
//! This module defines the plain geometric values shared by the grid layout,
//! the gesture controller and the renderer. Screen points are in logical
//! pixels as reported by the input source; board points are in the grid
//! container's own coordinate space, before the viewport transform.

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Creates a new point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points
    pub fn distance(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point halfway between two points
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Rectangle in board coordinates
///
/// The renderer and the hit tester both work from these rectangles, so a cell
/// drawn at a position is always the cell a tap at that position resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Creates a new rectangle
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the right edge coordinate
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Returns the bottom edge coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Returns the center of the rectangle
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Returns true if this rectangle contains the given point
    ///
    /// Left and top edges are inclusive, right and bottom edges exclusive, so
    /// adjacent rectangles never both claim a point.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Returns a rectangle shrunk by `amount` on every side
    pub fn inset(&self, amount: f32) -> Rect {
        let w = (self.w - amount * 2.0).max(0.0);
        let h = (self.h - amount * 2.0).max(0.0);
        Rect::new(self.x + amount, self.y + amount, w, h)
    }
}

/// Pan/zoom state of the grid viewport
///
/// Maps a board point to the screen as `board * scale + translate`: the scale
/// is applied first, then the translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl ViewportTransform {
    /// The untouched viewport
    pub const IDENTITY: ViewportTransform = ViewportTransform {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Returns true when no pan or zoom is applied
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Maps a board point to screen coordinates
    pub fn apply(&self, board: Point) -> Point {
        Point::new(
            board.x * self.scale + self.translate_x,
            board.y * self.scale + self.translate_y,
        )
    }

    /// Maps a screen point back to board coordinates
    ///
    /// The scale is always clamped to a positive range by the gesture
    /// controller, so the inverse exists.
    pub fn invert(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate_x) / self.scale,
            (screen.y - self.translate_y) / self.scale,
        )
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
        assert_eq!(a.midpoint(b), Point::new(1.5, 2.0));
    }

    #[test]
    fn rect_basic_properties() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn rect_contains_point() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains_point(Point::new(15.0, 15.0))); // Inside
        assert!(rect.contains_point(Point::new(10.0, 10.0))); // Top-left corner
        assert!(!rect.contains_point(Point::new(30.0, 30.0))); // Bottom-right edge is exclusive
        assert!(!rect.contains_point(Point::new(5.0, 5.0))); // Outside left-top
    }

    #[test]
    fn rect_inset_never_goes_negative() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect.inset(2.0), Rect::new(2.0, 2.0, 6.0, 6.0));
        assert_eq!(rect.inset(8.0).w, 0.0);
    }

    #[test]
    fn transform_apply_and_invert() {
        let t = ViewportTransform {
            scale: 2.0,
            translate_x: 10.0,
            translate_y: -4.0,
        };
        let board = Point::new(5.0, 5.0);
        let screen = t.apply(board);
        assert_eq!(screen, Point::new(20.0, 6.0));
        assert_eq!(t.invert(screen), board);
    }

    #[test]
    fn identity_is_default() {
        assert!(ViewportTransform::default().is_identity());
        assert_eq!(ViewportTransform::IDENTITY.apply(Point::new(7.0, 8.0)), Point::new(7.0, 8.0));
    }
}
