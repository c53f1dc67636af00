#![forbid(unsafe_code)]

//! Windowed layout for long dimension columns.
//!
//! Every item occupies a fixed-height row ([`ROW_HEIGHT`] cells: name line,
//! detail line, gap). Columns with up to [`WINDOW_THRESHOLD`] items lay out
//! every row. Longer columns lay out only the rows that intersect the
//! viewport plus [`OVERSCAN`] rows on each side, positioned by offset inside a
//! virtual spacer of `count × ROW_HEIGHT` cells.
//!
//! The plan depends only on `(count, viewport, scroll)`, so it is recomputed
//! when the scroll position or item count changes and never otherwise.
//!
//! # Invariants
//!
//! 1. `total_height == count × ROW_HEIGHT` in both modes.
//! 2. Row indices are strictly increasing and all `< count`.
//! 3. Each row's `offset == index × ROW_HEIGHT`.
//! 4. In windowed mode, every row intersecting `[scroll, scroll + viewport)`
//!    is present.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `count == 0` | Empty plan, `total_height == 0` |
//! | `viewport == 0` | Windowed plans contain only the overscan rows |
//! | `scroll` past the end | Clamped to `total_height − viewport` first |

use std::ops::Range;

/// Columns with more items than this are windowed.
pub const WINDOW_THRESHOLD: usize = 20;

/// Extra rows laid out above and below the viewport.
pub const OVERSCAN: usize = 5;

/// Cells per item row.
pub const ROW_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// Every item is laid out.
    Full,
    /// Only the visible rows plus overscan are laid out.
    Windowed,
}

/// One laid-out row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedRow {
    pub index: usize,
    /// Distance from the top of the spacer, in cells.
    pub offset: u32,
}

/// The rows a column lays out for one scroll position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPlan {
    pub mode: WindowMode,
    /// Height of the virtual spacer.
    pub total_height: u32,
    /// The scroll offset the plan was computed for, after clamping.
    pub scroll: u32,
    pub rows: Vec<PlannedRow>,
}

/// Height of the spacer holding `count` rows.
pub fn total_height(count: usize) -> u32 {
    (count as u32).saturating_mul(u32::from(ROW_HEIGHT))
}

/// Largest valid scroll offset.
pub fn max_scroll(count: usize, viewport: u16) -> u32 {
    total_height(count).saturating_sub(u32::from(viewport))
}

/// Indices of rows intersecting `[scroll, scroll + viewport)`.
pub fn visible_rows(count: usize, viewport: u16, scroll: u32) -> Range<usize> {
    let row = u32::from(ROW_HEIGHT);
    let first = (scroll / row) as usize;
    let end = (scroll + u32::from(viewport)).div_ceil(row) as usize;
    first.min(count)..end.min(count)
}

impl WindowPlan {
    /// Plan the rows for a column of `count` items.
    pub fn compute(count: usize, viewport: u16, scroll: u32) -> Self {
        let total = total_height(count);
        let scroll = scroll.min(max_scroll(count, viewport));
        let row = u32::from(ROW_HEIGHT);

        let (mode, range) = if count <= WINDOW_THRESHOLD {
            (WindowMode::Full, 0..count)
        } else {
            let visible = visible_rows(count, viewport, scroll);
            let start = visible.start.saturating_sub(OVERSCAN);
            let end = (visible.end + OVERSCAN).min(count);
            (WindowMode::Windowed, start..end)
        };

        let rows = range
            .map(|index| PlannedRow {
                index,
                offset: index as u32 * row,
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::trace!(count, viewport, scroll, ?mode, "window planned");

        Self {
            mode,
            total_height: total,
            scroll,
            rows,
        }
    }

    pub fn is_windowed(&self) -> bool {
        self.mode == WindowMode::Windowed
    }

    pub fn contains(&self, index: usize) -> bool {
        self.rows.iter().any(|r| r.index == index)
    }
}

/// Scroll position of one column, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnScroll {
    offset: u32,
}

impl ColumnScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Scroll by `delta` cells (positive is down), clamped to the content.
    pub fn scroll_by(&mut self, delta: i32, count: usize, viewport: u16) {
        let max = i64::from(max_scroll(count, viewport));
        let next = (i64::from(self.offset) + i64::from(delta)).clamp(0, max);
        self.offset = next as u32;
    }

    /// Scroll by whole rows.
    pub fn scroll_rows(&mut self, rows: i32, count: usize, viewport: u16) {
        self.scroll_by(rows.saturating_mul(i32::from(ROW_HEIGHT)), count, viewport);
    }

    pub fn page_down(&mut self, count: usize, viewport: u16) {
        self.scroll_by(i32::from(viewport.max(1)), count, viewport);
    }

    pub fn page_up(&mut self, count: usize, viewport: u16) {
        self.scroll_by(-i32::from(viewport.max(1)), count, viewport);
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_end(&mut self, count: usize, viewport: u16) {
        self.offset = max_scroll(count, viewport);
    }

    /// Re-clamp after the item count or viewport changed.
    pub fn clamp(&mut self, count: usize, viewport: u16) {
        self.offset = self.offset.min(max_scroll(count, viewport));
    }
}
