#![forbid(unsafe_code)]

use portal_core::buffer::{Buffer, Cell};
use portal_core::geometry::Rect;
use portal_core::style::Style;
use portal_core::text::truncate_with_ellipsis;

use crate::Widget;

/// Rounded box-drawing set.
struct BorderSet {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

const ROUNDED: BorderSet = BorderSet {
    top_left: '╭',
    top_right: '╮',
    bottom_left: '╰',
    bottom_right: '╯',
    horizontal: '─',
    vertical: '│',
};

/// A bordered box with an optional title on the top edge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block<'a> {
    border_style: Style,
    title: Option<&'a str>,
    title_style: Style,
    style: Style,
}

impl<'a> Block<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    #[must_use]
    pub fn title_style(mut self, style: Style) -> Self {
        self.title_style = style;
        self
    }

    /// Style applied to the whole area before the border is drawn.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Area inside the border.
    pub fn inner(&self, area: Rect) -> Rect {
        area.inner(1)
    }

    fn border_cell(&self, c: char) -> Cell {
        Cell::from_char(c).with_style(self.border_style)
    }
}

impl Widget for Block<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.width < 2 || area.height < 2 {
            return;
        }
        buf.fill(area, Cell::default().with_style(self.style));

        let right = area.right() - 1;
        let bottom = area.bottom() - 1;
        for x in area.x..area.right() {
            buf.set(x, area.y, self.border_cell(ROUNDED.horizontal));
            buf.set(x, bottom, self.border_cell(ROUNDED.horizontal));
        }
        for y in area.y..area.bottom() {
            buf.set(area.x, y, self.border_cell(ROUNDED.vertical));
            buf.set(right, y, self.border_cell(ROUNDED.vertical));
        }
        buf.set(area.x, area.y, self.border_cell(ROUNDED.top_left));
        buf.set(right, area.y, self.border_cell(ROUNDED.top_right));
        buf.set(area.x, bottom, self.border_cell(ROUNDED.bottom_left));
        buf.set(right, bottom, self.border_cell(ROUNDED.bottom_right));

        if let Some(title) = self.title {
            // One cell of border on each side plus a space of padding.
            let room = area.width.saturating_sub(4);
            if room > 0 {
                let text = format!(" {} ", truncate_with_ellipsis(title, room as usize));
                let style = self.border_style.patch(self.title_style);
                buf.set_string(area.x + 1, area.y, &text, style, area.width - 2);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_rounded_border_with_title() {
        let mut buf = Buffer::new(12, 3);
        Block::new().title("C-137").render(buf.area(), &mut buf);
        assert_eq!(buf.row_text(0), "╭ C-137 ───╮");
        assert_eq!(buf.row_text(1), "│          │");
        assert_eq!(buf.row_text(2), "╰──────────╯");
    }

    #[test]
    fn long_title_is_truncated() {
        let mut buf = Buffer::new(10, 3);
        Block::new()
            .title("RICK_PRIME_DIMENSION")
            .render(buf.area(), &mut buf);
        assert_eq!(buf.row_text(0), "╭ RICK_… ╮");
    }

    #[test]
    fn inner_excludes_border() {
        assert_eq!(
            Block::new().inner(Rect::new(2, 2, 10, 5)),
            Rect::new(3, 3, 8, 3)
        );
    }

    #[test]
    fn tiny_area_draws_nothing() {
        let mut buf = Buffer::new(1, 1);
        Block::new().render(buf.area(), &mut buf);
        assert_eq!(buf.row_text(0), " ");
    }
}
