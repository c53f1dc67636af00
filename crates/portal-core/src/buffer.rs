#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! The `Buffer` is a 2D grid of [`Cell`]s representing one frame of the
//! terminal display. Widgets draw into it; the runtime presents it.
//!
//! # Layout
//!
//! Cells are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. A wide grapheme occupies its cell plus `width - 1` continuation cells
//!    whose symbol is empty
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Write outside the grid | Silently clipped |
//! | Wide glyph straddling the right edge | Replaced by a space |

use crate::geometry::Rect;
use crate::style::{Color, Style, StyleFlags};
use crate::text::grapheme_width;
use unicode_segmentation::UnicodeSegmentation;

/// A single terminal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Grapheme shown in this cell; empty for wide-glyph continuations.
    pub symbol: String,
    pub fg: Color,
    pub bg: Color,
    pub attrs: StyleFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: " ".to_string(),
            fg: Color::Reset,
            bg: Color::Reset,
            attrs: StyleFlags::empty(),
        }
    }
}

impl Cell {
    #[must_use]
    pub fn from_char(c: char) -> Self {
        Self {
            symbol: c.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.apply_style(style);
        self
    }

    /// Apply the set fields of `style` to this cell.
    pub fn apply_style(&mut self, style: Style) {
        if let Some(fg) = style.fg {
            self.fg = fg;
        }
        if let Some(bg) = style.bg {
            self.bg = bg;
        }
        self.attrs |= style.attrs;
    }

    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.symbol.is_empty()
    }
}

/// A 2D grid of terminal cells.
///
/// # Example
///
/// ```
/// use portal_core::buffer::{Buffer, Cell};
///
/// let mut buffer = Buffer::new(10, 2);
/// buffer.set(0, 0, Cell::from_char('R'));
/// assert_eq!(buffer.row_text(0), "R         ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a buffer filled with default (blank) cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The full area of the buffer.
    #[inline]
    pub fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(move |i| &mut self.cells[i])
    }

    /// Set a cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = cell;
        }
    }

    /// Fill `rect` (clipped to the buffer) with copies of `cell`.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let rect = rect.intersection(&self.area());
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set(x, y, cell.clone());
            }
        }
    }

    /// Apply `style` to every cell in `rect`, preserving content.
    pub fn set_style(&mut self, rect: Rect, style: Style) {
        if style.is_empty() {
            return;
        }
        let rect = rect.intersection(&self.area());
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.apply_style(style);
                }
            }
        }
    }

    /// Write `text` starting at `(x, y)`, never past `x + max_width`.
    ///
    /// Returns the column just after the last written cell.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style, max_width: u16) -> u16 {
        if y >= self.height {
            return x;
        }
        let limit = x.saturating_add(max_width).min(self.width);
        let mut cx = x;
        for g in text.graphemes(true) {
            if cx >= limit {
                break;
            }
            let w = grapheme_width(g) as u16;
            if cx + w > limit {
                self.set(cx, y, Cell::from_char(' ').with_style(style));
                cx += 1;
                break;
            }
            let cell = Cell {
                symbol: g.to_string(),
                ..Cell::default()
            }
            .with_style(style);
            self.set(cx, y, cell);
            for k in 1..w {
                let cont = Cell {
                    symbol: String::new(),
                    ..Cell::default()
                }
                .with_style(style);
                self.set(cx + k, y, cont);
            }
            cx += w;
        }
        cx
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Cells of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Text content of row `y`, continuations skipped. Empty when out of range.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        self.row_cells(y).iter().map(|c| c.symbol.as_str()).collect()
    }

    /// Whole-frame text, rows joined by newlines. Handy in assertions.
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_writes_are_clipped() {
        let mut buf = Buffer::new(4, 2);
        buf.set(9, 9, Cell::from_char('x'));
        assert_eq!(buf.to_text(), "    \n    ");
        assert!(buf.get(4, 0).is_none());
    }

    #[test]
    fn set_string_respects_max_width() {
        let mut buf = Buffer::new(10, 1);
        let end = buf.set_string(1, 0, "Birdperson", Style::new(), 4);
        assert_eq!(end, 5);
        assert_eq!(buf.row_text(0), " Bird     ");
    }

    #[test]
    fn wide_glyph_uses_continuation_cell() {
        let mut buf = Buffer::new(4, 1);
        buf.set_string(0, 0, "日x", Style::new(), 4);
        assert!(buf.get(1, 0).is_some_and(Cell::is_continuation));
        assert_eq!(buf.row_text(0), "日x ");
    }

    #[test]
    fn wide_glyph_at_edge_becomes_space() {
        let mut buf = Buffer::new(3, 1);
        let end = buf.set_string(2, 0, "日", Style::new(), 5);
        assert_eq!(end, 3);
        assert_eq!(buf.row_text(0), "   ");
    }

    #[test]
    fn set_style_keeps_content() {
        let mut buf = Buffer::new(3, 1);
        buf.set_string(0, 0, "abc", Style::new(), 3);
        buf.set_style(Rect::new(1, 0, 1, 1), Style::new().fg(Color::Green).bold());
        let cell = buf.get(1, 0).cloned().unwrap_or_default();
        assert_eq!(cell.symbol, "b");
        assert_eq!(cell.fg, Color::Green);
        assert!(cell.attrs.contains(StyleFlags::BOLD));
    }

    #[test]
    fn fill_clips_to_area() {
        let mut buf = Buffer::new(3, 2);
        buf.fill(Rect::new(1, 1, 10, 10), Cell::from_char('#'));
        assert_eq!(buf.to_text(), "   \n ##");
    }
}
