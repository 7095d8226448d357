//! UI rendering module for the storefront
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

use ratatui::layout::Rect;

pub mod help_overlay;
pub mod storefront;

pub use help_overlay::render as render_help_overlay;
pub use storefront::render as render_storefront;

/// A `width` x `height` rect centered in `area`, clipped to fit
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
