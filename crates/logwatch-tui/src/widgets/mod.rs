//! Reusable rendering helpers.

pub mod fmt;
pub mod pagination;
pub mod sub_tabs;

use ratatui::layout::Rect;

/// Centered rectangle of at most `width` x `height` inside `area`,
/// leaving a small margin on each side.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}
