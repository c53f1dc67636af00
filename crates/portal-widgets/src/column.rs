#![forbid(unsafe_code)]

//! A dimension column: bordered, titled, scrollable list of cards.
//!
//! Rows come from [`WindowPlan`], so a long column only builds cards for the
//! rows near the viewport. The same geometry backs [`DimensionColumn::hit_test`],
//! which is how pointer positions become drop targets.

use portal_core::buffer::{Buffer, Cell};
use portal_core::geometry::Rect;
use portal_core::style::{Color, Style};
use portal_model::{Character, ContainerItem, EntityId, ImageCache};

use crate::Widget;
use crate::block::Block;
use crate::card::{CARD_LINES, Card};
use crate::virtualized::{ROW_HEIGHT, WindowPlan, max_scroll};

/// Drop feedback state of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnVisual {
    #[default]
    Inert,
    /// The pointer's live drop target resolves to this column during a drag.
    Hovered,
}

/// What a point inside a column lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnHit {
    /// The title row.
    Header,
    /// The card at this index of the column's item list.
    Item(usize),
    /// Border, gap line, or empty space below the last card.
    Body,
}

#[derive(Debug, Clone, Copy)]
enum Items<'a> {
    Container(&'a [ContainerItem<'a>]),
    Trophies(&'a [Character]),
}

impl Items<'_> {
    fn len(&self) -> usize {
        match self {
            Self::Container(items) => items.len(),
            Self::Trophies(items) => items.len(),
        }
    }
}

pub struct DimensionColumn<'a> {
    title: &'a str,
    items: Items<'a>,
    images: &'a ImageCache,
    visual: ColumnVisual,
    scroll: u32,
    lifted: Option<&'a EntityId>,
    empty_hint: &'a str,
}

impl<'a> DimensionColumn<'a> {
    /// A regular dimension holding characters and stones.
    pub fn new(title: &'a str, items: &'a [ContainerItem<'a>], images: &'a ImageCache) -> Self {
        Self {
            title,
            items: Items::Container(items),
            images,
            visual: ColumnVisual::Inert,
            scroll: 0,
            lifted: None,
            empty_hint: "drop characters here",
        }
    }

    /// The trophy column. It is never drawn as hovered.
    pub fn trophies(title: &'a str, items: &'a [Character], images: &'a ImageCache) -> Self {
        Self {
            title,
            items: Items::Trophies(items),
            images,
            visual: ColumnVisual::Inert,
            scroll: 0,
            lifted: None,
            empty_hint: "nothing stolen yet",
        }
    }

    #[must_use]
    pub fn visual(mut self, visual: ColumnVisual) -> Self {
        if matches!(self.items, Items::Container(_)) {
            self.visual = visual;
        }
        self
    }

    #[must_use]
    pub fn scroll(mut self, offset: u32) -> Self {
        self.scroll = offset;
        self
    }

    /// Entity currently being dragged, highlighted if it is in this column.
    #[must_use]
    pub fn lifted(mut self, id: Option<&'a EntityId>) -> Self {
        self.lifted = id;
        self
    }

    /// Height available to cards inside a column drawn in `area`.
    pub fn viewport(area: Rect) -> u16 {
        area.inner(1).height
    }

    /// Map a point to what it lands on, or `None` if it is outside `area`.
    pub fn hit_test(area: Rect, count: usize, scroll: u32, x: u16, y: u16) -> Option<ColumnHit> {
        if !area.contains(x, y) {
            return None;
        }
        if y == area.y {
            return Some(ColumnHit::Header);
        }
        let body = area.inner(1);
        if !body.contains(x, y) {
            return Some(ColumnHit::Body);
        }
        let scroll = scroll.min(max_scroll(count, body.height));
        let virtual_y = u32::from(y - body.y) + scroll;
        let index = (virtual_y / u32::from(ROW_HEIGHT)) as usize;
        let line = (virtual_y % u32::from(ROW_HEIGHT)) as u16;
        if index < count && line < CARD_LINES {
            Some(ColumnHit::Item(index))
        } else {
            Some(ColumnHit::Body)
        }
    }

    fn card(&self, index: usize) -> Option<Card<'a>> {
        let (card, id) = match self.items {
            Items::Container(items) => {
                let item = *items.get(index)?;
                (Card::for_item(item, self.images), item.id())
            }
            Items::Trophies(items) => {
                let character = items.get(index)?;
                (Card::trophy(character, self.images), &character.id)
            }
        };
        Some(card.lifted(self.lifted == Some(id)))
    }

    fn border_style(&self) -> Style {
        match (self.items, self.visual) {
            (Items::Trophies(_), _) => Style::new().fg(Color::Red),
            (_, ColumnVisual::Hovered) => Style::new().fg(Color::Cyan).bold(),
            (_, ColumnVisual::Inert) => Style::new().fg(Color::DarkGrey),
        }
    }

    fn render_scrollbar(&self, area: Rect, body: Rect, plan: &WindowPlan, buf: &mut Buffer) {
        let viewport = u32::from(body.height);
        if plan.total_height <= viewport || viewport == 0 {
            return;
        }
        let thumb = (viewport * viewport / plan.total_height).max(1);
        let travel = viewport - thumb;
        let max = plan.total_height - viewport;
        let start = plan.scroll * travel / max;
        let x = area.right() - 1;
        let style = self.border_style();
        for k in start..start + thumb {
            buf.set(x, body.y + k as u16, Cell::from_char('┃').with_style(style));
        }
    }
}

impl Widget for DimensionColumn<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::new()
            .title(self.title)
            .border_style(self.border_style())
            .title_style(Style::new().bold());
        block.render(area, buf);

        let body = block.inner(area);
        if body.is_empty() {
            return;
        }
        let count = self.items.len();
        if count == 0 {
            let hint_style = match self.visual {
                ColumnVisual::Hovered => Style::new().fg(Color::Cyan),
                ColumnVisual::Inert => Style::new().fg(Color::DarkGrey),
            };
            buf.set_string(body.x + 1, body.y, self.empty_hint, hint_style, body.width - 1);
            return;
        }

        let plan = WindowPlan::compute(count, body.height, self.scroll);
        let bottom = plan.scroll + u32::from(body.height);
        for row in &plan.rows {
            let Some(card) = self.card(row.index) else {
                continue;
            };
            for line in 0..CARD_LINES {
                let virtual_y = row.offset + u32::from(line);
                if virtual_y < plan.scroll || virtual_y >= bottom {
                    continue;
                }
                let y = body.y + (virtual_y - plan.scroll) as u16;
                card.render_line(line, body.x + 1, y, body.width.saturating_sub(2), buf);
            }
        }
        self.render_scrollbar(area, body, &plan, buf);

        #[cfg(feature = "tracing")]
        tracing::trace!(title = self.title, count, laid_out = plan.rows.len(), "column rendered");
    }
}
