//! Placement of the popup surface on its monitor.

use crate::config::Align;
use crate::monitor::Rect;

/// Coordinate of a span of `content` pixels aligned inside
/// `[origin, origin + size)`.
///
/// Edge alignments keep `offset` pixels away from their edge; centering
/// ignores it. Content larger than the monitor is allowed to overflow.
pub fn align(origin: i32, size: u32, content: u32, alignment: Align, offset: i32) -> i32 {
    let free = i64::from(size) - i64::from(content);
    let position = match alignment {
        Align::Start => i64::from(offset),
        Align::Center => free / 2,
        Align::End => free - i64::from(offset),
    };
    (i64::from(origin) + position) as i32
}

/// Screen rectangle of a `width` x `height` popup on `monitor`.
pub fn place(
    monitor: Rect,
    width: u32,
    height: u32,
    horizontal: Align,
    vertical: Align,
    offset: i32,
) -> Rect {
    Rect {
        x: align(monitor.x, monitor.width, width, horizontal, offset),
        y: align(monitor.y, monitor.height, height, vertical, offset),
        width,
        height,
    }
}
