#![forbid(unsafe_code)]

//! Board geometry.
//!
//! The board is a header row, one column per live dimension followed by the
//! trophy column, and a footer row. [`BoardLayout`] is recomputed from the
//! terminal size and the store's containers whenever either changes; the
//! same rectangles drive rendering and pointer hit-testing.

use portal_core::geometry::Rect;
use portal_model::{ContainerItem, DimensionId, DropTargetId, EntityId, EntityStore};
use portal_widgets::{ColumnHit, DimensionColumn};

/// Cells between adjacent columns.
pub const COLUMN_GAP: u16 = 1;

/// A column and the dimension it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSlot {
    pub dimension: DimensionId,
    pub area: Rect,
}

impl ColumnSlot {
    pub fn is_trophy(&self) -> bool {
        self.dimension.is_trophy()
    }

    /// Cells available to cards.
    pub fn viewport(&self) -> u16 {
        DimensionColumn::viewport(self.area)
    }
}

/// What a pointer position lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardHit {
    /// Index into [`BoardLayout::columns`].
    pub column: usize,
    pub hit: ColumnHit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
    pub columns: Vec<ColumnSlot>,
}

impl BoardLayout {
    /// Lay out `area` for the store's live containers plus the trophy column.
    pub fn compute(area: Rect, store: &EntityStore) -> Self {
        let (header, rest) = area.split_top(1);
        let (body, footer) = rest.split_bottom(1);
        let dimensions: Vec<DimensionId> = store
            .containers()
            .cloned()
            .chain([DimensionId::trophy()])
            .collect();
        let columns = body
            .columns(dimensions.len(), COLUMN_GAP)
            .into_iter()
            .zip(dimensions)
            .map(|(area, dimension)| ColumnSlot { dimension, area })
            .collect();
        Self {
            header,
            body,
            footer,
            columns,
        }
    }

    /// Hit-test `(x, y)`. `scroll_of` gives each column's scroll offset.
    pub fn hit(
        &self,
        store: &EntityStore,
        scroll_of: impl Fn(&DimensionId) -> u32,
        x: u16,
        y: u16,
    ) -> Option<BoardHit> {
        self.columns.iter().enumerate().find_map(|(column, slot)| {
            let count = item_count(store, &slot.dimension);
            DimensionColumn::hit_test(slot.area, count, scroll_of(&slot.dimension), x, y)
                .map(|hit| BoardHit { column, hit })
        })
    }

    /// The drop target under a hit: the card's entity, or else its column.
    ///
    /// Every hit in the trophy column targets the trophy container. A trophy
    /// shares its id with the stone it left, so its card cannot stand in for
    /// its column.
    pub fn drop_target(&self, store: &EntityStore, hit: &BoardHit) -> Option<DropTargetId> {
        let slot = self.columns.get(hit.column)?;
        if slot.is_trophy() {
            return Some(DropTargetId::Container(DimensionId::trophy()));
        }
        match hit.hit {
            ColumnHit::Item(index) => entity_at(store, &slot.dimension, index)
                .map(|id| DropTargetId::Entity(id.clone()))
                .or_else(|| Some(DropTargetId::Container(slot.dimension.clone()))),
            ColumnHit::Header | ColumnHit::Body => {
                Some(DropTargetId::Container(slot.dimension.clone()))
            }
        }
    }

    /// The character a press at `hit` would pick up, if any.
    ///
    /// Stones and trophies are not draggable.
    pub fn draggable<'s>(&self, store: &'s EntityStore, hit: &BoardHit) -> Option<&'s EntityId> {
        let slot = self.columns.get(hit.column)?;
        let ColumnHit::Item(index) = hit.hit else {
            return None;
        };
        if slot.is_trophy() {
            return None;
        }
        match *store.items(slot.dimension.as_str()).get(index)? {
            ContainerItem::Character(c) => Some(&c.id),
            ContainerItem::Stone(_) => None,
        }
    }
}

/// Number of cards shown in `dimension`'s column.
pub fn item_count(store: &EntityStore, dimension: &DimensionId) -> usize {
    if dimension.is_trophy() {
        store.trophies().len()
    } else {
        store.items(dimension.as_str()).len()
    }
}

fn entity_at<'s>(store: &'s EntityStore, dimension: &DimensionId, index: usize) -> Option<&'s EntityId> {
    store.items(dimension.as_str()).get(index).map(|item| item.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_model::{Character, DimensionalStone};
    use proptest::prelude::*;

    fn store() -> EntityStore {
        let mut store = EntityStore::with_pinned_containers(["C-137", "C-131"]);
        store.load(vec![
            Character::new("rick", "Rick", "C-137"),
            Character::new("morty", "Morty", "C-131"),
        ]);
        store
    }

    #[test]
    fn columns_follow_containers_then_trophies() {
        let store = store();
        let layout = BoardLayout::compute(Rect::from_size(62, 20), &store);
        let names: Vec<_> = layout.columns.iter().map(|c| c.dimension.as_str()).collect();
        assert_eq!(names, ["C-131", "C-137", "RICK_PRIME_DIMENSION"]);
        assert_eq!(layout.header, Rect::new(0, 0, 62, 1));
        assert_eq!(layout.footer, Rect::new(0, 19, 62, 1));
        assert_eq!(layout.columns[0].area, Rect::new(0, 1, 20, 18));
        assert_eq!(layout.columns[1].area, Rect::new(21, 1, 20, 18));
        assert!(layout.columns[2].is_trophy());
    }

    #[test]
    fn hits_map_to_drop_targets() {
        let store = store();
        let layout = BoardLayout::compute(Rect::from_size(62, 20), &store);
        let at = |x, y| {
            layout
                .hit(&store, |_| 0, x, y)
                .and_then(|hit| layout.drop_target(&store, &hit))
        };
        // First card of C-137 sits on the first body line of the column.
        assert_eq!(at(24, 2), Some(DropTargetId::entity("rick")));
        assert_eq!(at(24, 10), Some(DropTargetId::container("C-137")));
        assert_eq!(at(24, 1), Some(DropTargetId::container("C-137")));
        // The gap between columns and the header row hit nothing.
        assert_eq!(at(20, 5), None);
        assert_eq!(at(5, 0), None);
        assert_eq!(at(50, 5), Some(DropTargetId::container("RICK_PRIME_DIMENSION")));
    }

    #[test]
    fn only_characters_are_draggable() {
        let mut store = store();
        let summer = Character::new("summer", "Summer", "C-131");
        store.apply_move_result(summer.clone());
        store.apply_steal_result(summer.clone(), DimensionalStone::left_by(&summer));
        let layout = BoardLayout::compute(Rect::from_size(62, 20), &store);

        let pick = |x, y| {
            layout
                .hit(&store, |_| 0, x, y)
                .and_then(|hit| layout.draggable(&store, &hit).cloned())
        };
        assert_eq!(pick(3, 2), Some(EntityId::new("morty")));
        // C-131: Morty then the stone Summer left behind.
        assert_eq!(pick(3, 5), None);
        // Trophies cannot be picked up.
        assert_eq!(pick(45, 2), None);
        assert_eq!(item_count(&store, &DimensionId::trophy()), 1);

        // A trophy card targets the trophy column, not the stone left behind.
        let target = layout
            .hit(&store, |_| 0, 45, 2)
            .and_then(|hit| layout.drop_target(&store, &hit));
        assert_eq!(target, Some(DropTargetId::Container(DimensionId::trophy())));
    }

    proptest! {
        #[test]
        fn drop_targets_stay_in_their_column(
            width in 20u16..200,
            height in 4u16..60,
            x in 0u16..200,
            y in 0u16..60,
            scroll in 0u32..40,
        ) {
            let mut store = EntityStore::with_pinned_containers(["C-137", "C-131"]);
            store.load(
                (0..12)
                    .map(|i| Character::new(format!("c{i}"), format!("Rick {i:02}"), "C-137"))
                    .collect(),
            );
            let layout = BoardLayout::compute(Rect::from_size(width, height), &store);
            if let Some(hit) = layout.hit(&store, |_| scroll, x, y) {
                let slot = &layout.columns[hit.column];
                prop_assert!(slot.area.contains(x, y));
                let target = layout.drop_target(&store, &hit);
                let dimension = match target {
                    Some(DropTargetId::Container(dim)) => dim,
                    Some(DropTargetId::Entity(id)) => {
                        store.container_of(id.as_str()).expect("listed entity")
                    }
                    None => unreachable!("a hit always has a target"),
                };
                prop_assert_eq!(&dimension, &slot.dimension);
            } else {
                prop_assert!(layout.columns.iter().all(|c| !c.area.contains(x, y)));
            }
        }
    }
}
