//! Windowed column behavior across scroll positions.

use portal_core::buffer::Buffer;
use portal_core::geometry::Rect;
use portal_model::{Character, ContainerItem, ImageCache};
use portal_widgets::virtualized::{OVERSCAN, ROW_HEIGHT, WINDOW_THRESHOLD};
use portal_widgets::{ColumnScroll, DimensionColumn, Widget, WindowMode, WindowPlan};
use proptest::prelude::*;

fn residents(n: usize) -> Vec<Character> {
    (0..n)
        .map(|i| Character::new(format!("c{i}"), format!("Morty {i:02}"), "C-137"))
        .collect()
}

#[test]
fn twenty_five_items_scroll_to_the_last() {
    let viewport = 12;
    let mut scroll = ColumnScroll::new();
    let first = WindowPlan::compute(25, viewport, scroll.offset());
    assert_eq!(first.mode, WindowMode::Windowed);
    assert_eq!(first.total_height, 25 * u32::from(ROW_HEIGHT));
    assert!(!first.contains(24));

    let mut steps = 0;
    while !WindowPlan::compute(25, viewport, scroll.offset()).contains(24) {
        scroll.scroll_rows(1, 25, viewport);
        steps += 1;
        assert!(steps < 25, "never reached the last item");
    }
    scroll.scroll_to_end(25, viewport);
    let last = WindowPlan::compute(25, viewport, scroll.offset());
    assert!(last.contains(24));
    assert!(!last.contains(0));
}

#[test]
fn threshold_is_inclusive() {
    assert_eq!(
        WindowPlan::compute(WINDOW_THRESHOLD, 6, 0).mode,
        WindowMode::Full
    );
    assert_eq!(
        WindowPlan::compute(WINDOW_THRESHOLD + 1, 6, 0).mode,
        WindowMode::Windowed
    );
}

#[test]
fn rendered_column_matches_hit_test() {
    let cast = residents(25);
    let items: Vec<_> = cast.iter().map(ContainerItem::Character).collect();
    let images = ImageCache::new();
    let area = Rect::new(0, 0, 24, 14);
    let viewport = DimensionColumn::viewport(area);
    let mut scroll = ColumnScroll::new();
    scroll.scroll_rows(7, items.len(), viewport);

    let mut buf = Buffer::new(24, 14);
    DimensionColumn::new("C-137", &items, &images)
        .scroll(scroll.offset())
        .render(area, &mut buf);

    // The first body line shows the card the hit test reports there.
    let hit = DimensionColumn::hit_test(area, items.len(), scroll.offset(), 3, 1);
    assert_eq!(hit, Some(portal_widgets::ColumnHit::Item(7)));
    assert!(buf.row_text(1).contains("Morty 07"));
}

proptest! {
    #[test]
    fn windowed_rows_are_bounded(
        count in (WINDOW_THRESHOLD + 1)..2_000usize,
        viewport in 0u16..120,
        scroll in 0u32..10_000,
    ) {
        let plan = WindowPlan::compute(count, viewport, scroll);
        let bound = usize::from(viewport.div_ceil(ROW_HEIGHT)) + 1 + 2 * OVERSCAN;
        prop_assert!(plan.rows.len() <= bound);
        prop_assert_eq!(plan.total_height, count as u32 * u32::from(ROW_HEIGHT));
        for pair in plan.rows.windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
        }
        for row in &plan.rows {
            prop_assert!(row.index < count);
            prop_assert_eq!(row.offset, row.index as u32 * u32::from(ROW_HEIGHT));
        }
    }

    #[test]
    fn every_visible_row_is_laid_out(
        count in 0usize..500,
        viewport in 1u16..90,
        scroll in 0u32..3_000,
    ) {
        let plan = WindowPlan::compute(count, viewport, scroll);
        let row = u32::from(ROW_HEIGHT);
        for index in 0..count {
            let top = index as u32 * row;
            let visible = top < plan.scroll + u32::from(viewport) && top + row > plan.scroll;
            if visible {
                prop_assert!(plan.contains(index));
            }
        }
    }

    #[test]
    fn short_columns_lay_out_everything(count in 0..=WINDOW_THRESHOLD, scroll in 0u32..200) {
        let plan = WindowPlan::compute(count, 9, scroll);
        prop_assert_eq!(plan.rows.len(), count);
    }
}
