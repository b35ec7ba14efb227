//! Integer screen-coordinate rectangles.

/// A screen rectangle in pixel coordinates, origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    /// X coordinate of the left edge.
    pub left: i32,
    /// Y coordinate of the top edge.
    pub top: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Construct a rectangle from edges and extent.
    #[must_use]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// X coordinate one past the right edge.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Y coordinate one past the bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// True when the rectangle has no area. Callers treat a degenerate
    /// placement target as "placement skipped".
    #[inline]
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True when the two rectangles share interior area. Edge-adjacent
    /// rectangles do not intersect, and degenerate rectangles never do.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges() {
        let rect = Rect::new(10, 20, 30, 40);
        assert_eq!(rect.right(), 40);
        assert_eq!(rect.bottom(), 60);
        assert!(!rect.is_degenerate());
    }

    #[test]
    fn degenerate_when_any_extent_is_zero() {
        assert!(Rect::new(0, 0, 0, 100).is_degenerate());
        assert!(Rect::new(0, 0, 100, 0).is_degenerate());
        assert!(!Rect::new(0, 0, 1, 1).is_degenerate());
    }

    #[test]
    fn adjacent_rects_do_not_intersect() {
        let upper = Rect::new(0, 0, 100, 50);
        let lower = Rect::new(0, 50, 100, 50);
        assert!(!upper.intersects(&lower));
        assert!(!lower.intersects(&upper));
    }

    #[test]
    fn overlapping_rects_intersect() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn degenerate_rect_never_intersects() {
        let line = Rect::new(0, 0, 0, 100);
        let full = Rect::new(0, 0, 100, 100);
        assert!(!line.intersects(&full));
        assert!(!full.intersects(&line));
    }
}
