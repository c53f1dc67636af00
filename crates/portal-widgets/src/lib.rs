#![forbid(unsafe_code)]

//! Widgets for the Portal Lab board.

pub mod banner;
pub mod block;
pub mod card;
pub mod column;
pub mod toast;
pub mod virtualized;

pub use banner::Banner;
pub use block::Block;
pub use column::{ColumnHit, ColumnVisual, DimensionColumn};
pub use toast::{Severity, Toast, ToastId, ToastQueue, ToastStack};
pub use virtualized::{ColumnScroll, OVERSCAN, ROW_HEIGHT, WINDOW_THRESHOLD, WindowMode, WindowPlan};

use portal_core::buffer::Buffer;
use portal_core::geometry::Rect;

/// A renderable component.
///
/// Widgets draw themselves into a `Buffer` within a given `Rect` and must not
/// write outside it.
pub trait Widget {
    fn render(&self, area: Rect, buf: &mut Buffer);
}
