#![forbid(unsafe_code)]

//! Centered modal box: overlays, loading and error panels.

use portal_core::buffer::Buffer;
use portal_core::geometry::Rect;
use portal_core::style::{Color, Style};
use portal_core::text::{display_width, truncate_with_ellipsis};

use crate::Widget;
use crate::block::Block;

pub struct Banner<'a> {
    title: &'a str,
    lines: Vec<&'a str>,
    accent: Color,
}

impl<'a> Banner<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            lines: Vec::new(),
            accent: Color::Yellow,
        }
    }

    #[must_use]
    pub fn line(mut self, line: &'a str) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn accent(mut self, color: Color) -> Self {
        self.accent = color;
        self
    }

    /// Where the banner lands inside `area`.
    pub fn layout(&self, area: Rect) -> Rect {
        let content = self
            .lines
            .iter()
            .map(|l| display_width(l))
            .chain([display_width(self.title) + 2])
            .max()
            .unwrap_or(0) as u16;
        let width = (content + 4).min(area.width);
        let height = (self.lines.len() as u16 + 2).min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }
}

impl Widget for Banner<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let rect = self.layout(area);
        let block = Block::new()
            .title(self.title)
            .border_style(Style::new().fg(self.accent).bold());
        block.render(rect, buf);
        let inner = block.inner(rect);
        for (k, line) in self.lines.iter().enumerate().take(inner.height as usize) {
            let text = truncate_with_ellipsis(line, inner.width.saturating_sub(2) as usize);
            buf.set_string(inner.x + 1, inner.y + k as u16, &text, Style::new(), inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_in_area() {
        let banner = Banner::new("Rick Prime").line("Stealing a character...");
        let rect = banner.layout(Rect::new(0, 0, 80, 24));
        assert_eq!(rect.width, 27);
        assert_eq!(rect.height, 3);
        assert_eq!(rect.x, 26);
        assert_eq!(rect.y, 10);
    }

    #[test]
    fn renders_lines_inside_border() {
        let mut buf = Buffer::new(40, 7);
        Banner::new("Error")
            .line("Could not reach the portal service")
            .line("press r to retry")
            .accent(Color::Red)
            .render(buf.area(), &mut buf);
        let text = buf.to_text();
        assert!(text.contains("Could not reach the portal service"));
        assert!(text.contains("press r to retry"));
        assert!(text.contains(" Error "));
    }

    #[test]
    fn clipped_to_small_area() {
        let mut buf = Buffer::new(10, 3);
        let banner = Banner::new("Loading").line("Fetching characters from the citadel");
        assert_eq!(banner.layout(buf.area()), Rect::new(0, 0, 10, 3));
        banner.render(buf.area(), &mut buf);
        assert!(buf.row_text(1).contains('…'));
    }
}
