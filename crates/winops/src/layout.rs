//! Target-rectangle planner for the two AVL plot windows.
//!
//! Both windows land on the right half of the screen; the policy decides how
//! that half is divided between the geometry view and the Trefftz view. The
//! planner is pure: it never consults the platform and never fails. Zero
//! screen dimensions simply produce zero-area rectangles, which downstream
//! placement treats as "skip".

use crate::geom::Rect;

/// How the right half of the screen is split between the two plot windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Geometry on the upper half, Trefftz on the lower half. This is the
    /// canonical layout.
    #[default]
    Stacked,
    /// Geometry on the left quarter of the screen's right half, Trefftz on
    /// the rightmost quarter, both full height.
    SideBySide,
}

/// Compute the geometry and Trefftz target rectangles for a screen of
/// `width` x `height` pixels. The two rectangles never overlap; remainder
/// pixels from integer division go to the second rectangle.
///
/// Both rectangles have positive area whenever the split axis is at least
/// two divisions long: a 1-pixel-tall screen under [`SplitPolicy::Stacked`],
/// or one narrower than three pixels under [`SplitPolicy::SideBySide`],
/// leaves the first rectangle with zero extent, and placement skips it like
/// any other degenerate target.
#[must_use]
pub fn plan_targets(width: i32, height: i32, policy: SplitPolicy) -> (Rect, Rect) {
    let width = width.max(0);
    let height = height.max(0);
    let half_left = width / 2;
    let half_width = width - half_left;

    match policy {
        SplitPolicy::Stacked => {
            let upper_height = height / 2;
            let geometry = Rect::new(half_left, 0, half_width, upper_height);
            let trefftz = Rect::new(half_left, upper_height, half_width, height - upper_height);
            (geometry, trefftz)
        }
        SplitPolicy::SideBySide => {
            let quarter_width = half_width / 2;
            let geometry = Rect::new(half_left, 0, quarter_width, height);
            let trefftz = Rect::new(
                half_left + quarter_width,
                0,
                half_width - quarter_width,
                height,
            );
            (geometry, trefftz)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_covers_right_half() {
        let (geometry, trefftz) = plan_targets(1920, 1080, SplitPolicy::Stacked);
        assert_eq!(geometry, Rect::new(960, 0, 960, 540));
        assert_eq!(trefftz, Rect::new(960, 540, 960, 540));
        assert!(!geometry.intersects(&trefftz));
    }

    #[test]
    fn side_by_side_splits_the_right_half_vertically() {
        let (geometry, trefftz) = plan_targets(1920, 1080, SplitPolicy::SideBySide);
        assert_eq!(geometry, Rect::new(960, 0, 480, 1080));
        assert_eq!(trefftz, Rect::new(1440, 0, 480, 1080));
        assert!(!geometry.intersects(&trefftz));
    }

    #[test]
    fn odd_dimensions_stay_disjoint_and_positive() {
        for policy in [SplitPolicy::Stacked, SplitPolicy::SideBySide] {
            for (width, height) in [(1921, 1081), (3, 3), (801, 601)] {
                let (geometry, trefftz) = plan_targets(width, height, policy);
                assert!(!geometry.intersects(&trefftz), "{policy:?} {width}x{height}");
                assert!(!geometry.is_degenerate());
                assert!(!trefftz.is_degenerate());
                assert!(geometry.right() <= width && trefftz.right() <= width);
                assert!(geometry.bottom() <= height && trefftz.bottom() <= height);
            }
        }
    }

    #[test]
    fn one_pixel_axes_leave_one_skippable_target() {
        let (geometry, trefftz) = plan_targets(1920, 1, SplitPolicy::Stacked);
        assert!(geometry.is_degenerate());
        assert!(!trefftz.is_degenerate());
        assert!(!geometry.intersects(&trefftz));

        let (geometry, trefftz) = plan_targets(2, 1080, SplitPolicy::SideBySide);
        assert!(geometry.is_degenerate());
        assert!(!trefftz.is_degenerate());
        assert!(!geometry.intersects(&trefftz));
    }

    #[test]
    fn zero_screen_yields_degenerate_targets() {
        let (geometry, trefftz) = plan_targets(0, 1080, SplitPolicy::Stacked);
        assert!(geometry.is_degenerate());
        assert!(trefftz.is_degenerate());

        let (geometry, trefftz) = plan_targets(1920, 0, SplitPolicy::Stacked);
        assert!(geometry.is_degenerate());
        assert!(trefftz.is_degenerate());
    }

    #[test]
    fn negative_dimensions_are_clamped() {
        let (geometry, trefftz) = plan_targets(-100, -100, SplitPolicy::SideBySide);
        assert!(geometry.is_degenerate());
        assert!(trefftz.is_degenerate());
    }
}
