#![forbid(unsafe_code)]

//! Item cards: the two text lines drawn for each row of a column.

use portal_core::buffer::Buffer;
use portal_core::style::{Color, Style};
use portal_core::text::truncate_with_ellipsis;
use portal_model::{Character, CharacterStatus, ContainerItem, DimensionalStone, ImageCache};

/// Shown in place of the initial once a portrait has loaded.
pub const PORTRAIT_MARKER: char = '◉';

/// Lines of text a card draws; the third row of a slot is the gap.
pub const CARD_LINES: u16 = 2;

#[derive(Debug, Clone, Copy)]
enum CardKind<'a> {
    Character(&'a Character),
    Stone(&'a DimensionalStone),
    Trophy(&'a Character),
}

#[derive(Debug, Clone, Copy)]
pub struct Card<'a> {
    kind: CardKind<'a>,
    portrait: bool,
    lifted: bool,
}

fn has_portrait(character: &Character, images: &ImageCache) -> bool {
    character
        .image_url
        .as_deref()
        .is_some_and(|url| images.contains(url))
}

fn status_color(status: &CharacterStatus) -> Color {
    match status {
        CharacterStatus::Alive => Color::Green,
        CharacterStatus::Dead => Color::Red,
        CharacterStatus::Captured => Color::Yellow,
        CharacterStatus::Unknown | CharacterStatus::Other(_) => Color::Grey,
    }
}

impl<'a> Card<'a> {
    pub fn for_item(item: ContainerItem<'a>, images: &ImageCache) -> Self {
        match item {
            ContainerItem::Character(c) => Self {
                kind: CardKind::Character(c),
                portrait: has_portrait(c, images),
                lifted: false,
            },
            ContainerItem::Stone(s) => Self {
                kind: CardKind::Stone(s),
                portrait: false,
                lifted: false,
            },
        }
    }

    pub fn trophy(character: &'a Character, images: &ImageCache) -> Self {
        Self {
            kind: CardKind::Trophy(character),
            portrait: has_portrait(character, images),
            lifted: false,
        }
    }

    /// Highlight the card as the one being dragged.
    #[must_use]
    pub fn lifted(mut self, lifted: bool) -> Self {
        self.lifted = lifted;
        self
    }

    fn badge(&self, character: &Character) -> char {
        if self.portrait {
            PORTRAIT_MARKER
        } else {
            character.initial()
        }
    }

    /// Text and style of line `line` (0 or 1).
    pub fn line(&self, line: u16) -> Option<(String, Style)> {
        let (text, style) = match (self.kind, line) {
            (CardKind::Character(c), 0) => {
                let style = if self.lifted {
                    Style::new().fg(Color::Yellow).bold().reverse()
                } else {
                    Style::new().fg(Color::White).bold()
                };
                (format!("{} {}", self.badge(c), c.name), style)
            }
            (CardKind::Character(c), 1) => (
                format!("  {} · {}", c.species, c.status),
                Style::new().fg(status_color(&c.status)),
            ),
            (CardKind::Stone(_), 0) => (
                "◆ Dimensional stone".to_string(),
                Style::new().fg(Color::Magenta).bold(),
            ),
            (CardKind::Stone(s), 1) => (
                format!("  once {}", s.previous_character_id),
                Style::new().fg(Color::DarkGrey),
            ),
            (CardKind::Trophy(c), 0) => (
                format!("{} {}", self.badge(c), c.name),
                Style::new().fg(Color::Red).bold(),
            ),
            (CardKind::Trophy(c), 1) => {
                let from = c.original_dimension.as_ref().unwrap_or(&c.origin_dimension);
                (format!("  taken from {from}"), Style::new().fg(Color::DarkGrey))
            }
            _ => return None,
        };
        Some((text, style))
    }

    /// Draw line `line` at `(x, y)`, at most `width` cells wide.
    pub fn render_line(&self, line: u16, x: u16, y: u16, width: u16, buf: &mut Buffer) {
        if let Some((text, style)) = self.line(line) {
            let text = truncate_with_ellipsis(&text, width as usize);
            buf.set_string(x, y, &text, style, width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_until_portrait_cached() {
        let images = ImageCache::new();
        let rick = Character::new("1", "Rick Sanchez", "C-137").with_image_url("https://img/1.png");
        let card = Card::for_item(ContainerItem::Character(&rick), &images);
        assert_eq!(card.line(0).map(|l| l.0), Some("R Rick Sanchez".to_string()));

        images.insert("https://img/1.png");
        let card = Card::for_item(ContainerItem::Character(&rick), &images);
        assert_eq!(card.line(0).map(|l| l.0), Some("◉ Rick Sanchez".to_string()));
    }

    #[test]
    fn detail_line_shows_species_and_status() {
        let images = ImageCache::new();
        let bird = Character::new("2", "Birdperson", "C-137")
            .with_species("Bird-Person")
            .with_status(CharacterStatus::Dead);
        let card = Card::for_item(ContainerItem::Character(&bird), &images);
        let (text, style) = card.line(1).expect("detail line");
        assert_eq!(text, "  Bird-Person · dead");
        assert_eq!(style.fg, Some(Color::Red));
        assert!(card.line(2).is_none());
    }

    #[test]
    fn stone_and_trophy_lines() {
        let images = ImageCache::new();
        let mut morty = Character::new("m", "Morty", "C-131");
        let stone = DimensionalStone::left_by(&morty);
        let card = Card::for_item(ContainerItem::Stone(&stone), &images);
        assert_eq!(card.line(1).map(|l| l.0), Some("  once m".to_string()));

        morty.original_dimension = Some("C-131".into());
        let trophy = Card::trophy(&morty, &images);
        assert_eq!(
            trophy.line(1).map(|l| l.0),
            Some("  taken from C-131".to_string())
        );
    }

    #[test]
    fn render_line_truncates() {
        let images = ImageCache::new();
        let rick = Character::new("1", "Rick Sanchez", "C-137");
        let mut buf = Buffer::new(8, 1);
        Card::for_item(ContainerItem::Character(&rick), &images)
            .lifted(true)
            .render_line(0, 0, 0, 8, &mut buf);
        assert_eq!(buf.row_text(0), "R Rick …");
    }
}
