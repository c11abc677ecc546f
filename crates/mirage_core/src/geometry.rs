//! Hidden anchor computation.
//!
//! The mirror window has to stay a real, visible, capturable window while never appearing on a
//! physical screen. Placing it just below the union of every display achieves that regardless of
//! how the monitors are arranged.

/// Distance kept between the bottom edge of the virtual desktop and the hidden anchor.
pub const HIDDEN_ANCHOR_MARGIN: i32 = 100;

/// Display rectangle in virtual desktop coordinates (right/bottom exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl DisplayRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Smallest rectangle containing both. Empty rectangles do not contribute.
    pub fn union(&self, other: &DisplayRect) -> DisplayRect {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => DisplayRect::default(),
            (true, false) => *other,
            (false, true) => *self,
            (false, false) => DisplayRect {
                left: self.left.min(other.left),
                top: self.top.min(other.top),
                right: self.right.max(other.right),
                bottom: self.bottom.max(other.bottom),
            },
        }
    }
}

/// Union bounding rectangle of all displays.
pub fn virtual_desktop_bounds(displays: &[DisplayRect]) -> DisplayRect {
    displays
        .iter()
        .fold(DisplayRect::default(), |acc, rect| acc.union(rect))
}

/// Point below every display: the union's left edge, its bottom edge plus the margin.
///
/// With no displays the union is empty and the anchor is `(0, HIDDEN_ANCHOR_MARGIN)`.
pub fn compute_hidden_anchor(displays: &[DisplayRect]) -> (i32, i32) {
    let bounds = virtual_desktop_bounds(displays);
    (
        bounds.left,
        bounds.bottom.saturating_add(HIDDEN_ANCHOR_MARGIN),
    )
}
