//! Menu placement against the viewport edges.

use ctxmenu_core::{Point, Size};

/// Top-left corner for a menu of `footprint` opened at `pointer`.
///
/// On each axis the menu opens at the pointer, unless the space between
/// the pointer and the far viewport edge is smaller than the menu; then
/// the menu's far edge is pinned to the viewport edge. The result is
/// clamped at zero, so a menu larger than the viewport hangs off the
/// right/bottom edge instead of the left/top.
#[must_use]
pub fn place_menu(pointer: Point, footprint: Size, viewport: Size) -> Point {
    Point::new(
        place_axis(pointer.x, footprint.width, viewport.width),
        place_axis(pointer.y, footprint.height, viewport.height),
    )
}

fn place_axis(at: f32, extent: f32, limit: f32) -> f32 {
    let start = if limit - at < extent { limit - extent } else { at };
    start.max(0.0)
}

/// Format a length as a CSS pixel value.
#[must_use]
pub fn px(value: f32) -> String {
    format!("{value}px")
}
