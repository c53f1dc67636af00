#![forbid(unsafe_code)]

//! Presenter: turns frame buffers into terminal output.
//!
//! The presenter keeps the previously presented frame's shape in mind and
//! only rewrites cells that changed, grouped into per-row runs so each run
//! costs one cursor move. Style escapes are emitted only when the style of
//! the next cell differs from the last one written.
//!
//! # Invariants
//!
//! - A full repaint happens whenever there is no previous frame or its size
//!   differs from the next one.
//! - Continuation cells of wide glyphs are never written.
//! - Every present ends with an attribute reset and a flush.

use std::io::{self, BufWriter, Write};

use crossterm::style::{self as cts, Attribute, Print, SetAttribute};
use crossterm::{cursor, queue, terminal};
use portal_core::buffer::{Buffer, Cell};
use portal_core::style::{Color, StyleFlags};

const BUFFER_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fg: Color,
    bg: Color,
    attrs: StyleFlags,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            attrs: cell.attrs,
        }
    }
}

/// A horizontal span of changed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRun {
    pub y: u16,
    pub x0: u16,
    /// Inclusive.
    pub x1: u16,
}

/// Changed spans between two same-sized buffers, in row-major order.
pub fn diff_runs(prev: &Buffer, next: &Buffer) -> Vec<ChangeRun> {
    let mut runs = Vec::new();
    for y in 0..next.height() {
        let old = prev.row_cells(y);
        let new = next.row_cells(y);
        let mut open: Option<u16> = None;
        for (x, (a, b)) in old.iter().zip(new).enumerate() {
            let x = x as u16;
            match (a != b, open) {
                (true, None) => open = Some(x),
                (false, Some(x0)) => {
                    runs.push(ChangeRun { y, x0, x1: x - 1 });
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(x0) = open {
            runs.push(ChangeRun {
                y,
                x0,
                x1: next.width() - 1,
            });
        }
    }
    runs
}

fn to_crossterm(color: Color) -> cts::Color {
    match color {
        Color::Reset => cts::Color::Reset,
        Color::Black => cts::Color::Black,
        Color::White => cts::Color::White,
        Color::Grey => cts::Color::Grey,
        Color::DarkGrey => cts::Color::DarkGrey,
        Color::Red => cts::Color::Red,
        Color::Green => cts::Color::Green,
        Color::Yellow => cts::Color::Yellow,
        Color::Blue => cts::Color::Blue,
        Color::Magenta => cts::Color::Magenta,
        Color::Cyan => cts::Color::Cyan,
        Color::Rgb(r, g, b) => cts::Color::Rgb { r, g, b },
    }
}

/// State-tracked frame writer.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    current_style: Option<CellStyle>,
    cursor: Option<(u16, u16)>,
}

impl<W: Write> Presenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            current_style: None,
            cursor: None,
        }
    }

    /// Write `next`, diffing against `prev` when the shapes match.
    ///
    /// Returns the number of cells written.
    pub fn present(&mut self, prev: Option<&Buffer>, next: &Buffer) -> io::Result<usize> {
        let runs = match prev {
            Some(prev) if prev.width() == next.width() && prev.height() == next.height() => {
                diff_runs(prev, next)
            }
            _ => {
                queue!(self.writer, terminal::Clear(terminal::ClearType::All))?;
                self.cursor = None;
                self.current_style = None;
                (0..next.height())
                    .filter(|_| next.width() > 0)
                    .map(|y| ChangeRun {
                        y,
                        x0: 0,
                        x1: next.width() - 1,
                    })
                    .collect()
            }
        };

        let mut written = 0;
        for run in &runs {
            self.move_cursor_to(run.x0, run.y)?;
            for x in run.x0..=run.x1 {
                if let Some(cell) = next.get(x, run.y) {
                    written += self.emit_cell(cell)?;
                }
            }
            // Wide glyphs at the end of a run leave the cursor position unknown.
            self.cursor = None;
        }

        queue!(self.writer, SetAttribute(Attribute::Reset))?;
        self.current_style = None;
        self.writer.flush()?;
        Ok(written)
    }

    /// Forget tracked state, e.g. after something else wrote to the terminal.
    pub fn reset(&mut self) {
        self.current_style = None;
        self.cursor = None;
    }

    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }

    // ---- private helpers ----

    fn emit_cell(&mut self, cell: &Cell) -> io::Result<usize> {
        if cell.is_continuation() {
            return Ok(0);
        }
        self.emit_style_changes(cell)?;
        queue!(self.writer, Print(&cell.symbol))?;
        Ok(1)
    }

    fn emit_style_changes(&mut self, cell: &Cell) -> io::Result<()> {
        let style = CellStyle::from_cell(cell);
        if self.current_style == Some(style) {
            return Ok(());
        }
        queue!(
            self.writer,
            SetAttribute(Attribute::Reset),
            cts::SetForegroundColor(to_crossterm(style.fg)),
            cts::SetBackgroundColor(to_crossterm(style.bg)),
        )?;
        for (flag, attribute) in [
            (StyleFlags::BOLD, Attribute::Bold),
            (StyleFlags::DIM, Attribute::Dim),
            (StyleFlags::ITALIC, Attribute::Italic),
            (StyleFlags::UNDERLINE, Attribute::Underlined),
            (StyleFlags::REVERSE, Attribute::Reverse),
        ] {
            if style.attrs.contains(flag) {
                queue!(self.writer, SetAttribute(attribute))?;
            }
        }
        self.current_style = Some(style);
        Ok(())
    }

    fn move_cursor_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        if self.cursor == Some((x, y)) {
            return Ok(());
        }
        queue!(self.writer, cursor::MoveTo(x, y))?;
        self.cursor = Some((x, y));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::style::Style;

    fn output(presenter: Presenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn runs_group_adjacent_changes() {
        let prev = Buffer::new(10, 2);
        let mut next = Buffer::new(10, 2);
        next.set_string(2, 0, "ab", Style::new(), 10);
        next.set_string(9, 1, "z", Style::new(), 10);
        assert_eq!(
            diff_runs(&prev, &next),
            vec![
                ChangeRun { y: 0, x0: 2, x1: 3 },
                ChangeRun { y: 1, x0: 9, x1: 9 },
            ]
        );
    }

    #[test]
    fn identical_frames_write_nothing() {
        let mut presenter = Presenter::new(Vec::new());
        let frame = Buffer::new(8, 3);
        assert_eq!(presenter.present(Some(&frame), &frame).unwrap(), 0);
        let out = output(presenter);
        assert!(!out.contains("\x1b[2J"));
    }

    #[test]
    fn first_frame_is_full_repaint() {
        let mut presenter = Presenter::new(Vec::new());
        let mut frame = Buffer::new(4, 2);
        frame.set_string(0, 0, "Rick", Style::new(), 4);
        assert_eq!(presenter.present(None, &frame).unwrap(), 8);
        let out = output(presenter);
        assert!(out.contains("\x1b[2J"));
        assert!(out.contains("Rick"));
    }

    #[test]
    fn resize_forces_full_repaint() {
        let mut presenter = Presenter::new(Vec::new());
        let small = Buffer::new(2, 2);
        let big = Buffer::new(3, 2);
        assert_eq!(presenter.present(Some(&small), &big).unwrap(), 6);
    }

    #[test]
    fn style_is_not_repeated_within_a_run() {
        let mut presenter = Presenter::new(Vec::new());
        let prev = Buffer::new(6, 1);
        let mut next = Buffer::new(6, 1);
        next.set_string(0, 0, "Morty", Style::new().bold(), 6);
        presenter.present(Some(&prev), &next).unwrap();
        let out = output(presenter);
        // One reset before the run's style, one at the end of the frame.
        assert_eq!(out.matches("\x1b[0m").count(), 2);
        assert!(out.contains("Morty"));
    }
}
