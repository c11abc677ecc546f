use mirage_core::DisplayRect;

use crate::win_api;

/// Bounds of every active monitor, in virtual desktop coordinates.
pub fn display_rects() -> Vec<DisplayRect> {
    win_api::enum_display_rects()
        .into_iter()
        .map(|r| DisplayRect::new(r.left, r.top, r.right, r.bottom))
        .collect()
}
