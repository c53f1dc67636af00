#![forbid(unsafe_code)]

//! In-memory entity store with derived per-container groupings.
//!
//! The store owns three collections: characters keyed by id, stones in
//! insertion order, and trophies (characters taken by the steal action).
//! Groupings are recomputed eagerly after every mutation, so reads never see
//! a stale partition.
//!
//! # Invariants
//!
//! 1. Every character and stone appears in exactly one container grouping.
//! 2. Within a container, characters come first ordered by `(name, id)`,
//!    then stones in insertion order.
//! 3. The trophy container never appears among the live containers.
//! 4. `revision` strictly increases with every mutation.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Move result for an unknown id | Inserted (the service is authoritative) |
//! | Move result for a stolen id | Ignored |
//! | Move result into the trophy dimension | Filed as a trophy |
//! | Steal result for an unknown id | Stone still appended, trophy recorded |
//! | Same stone delivered twice | Second copy ignored |
//! | Loaded character already in the trophy dimension | Filed as a trophy |

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::character::{Character, ContainerItem, DimensionalStone, EntityId};
use crate::dimension::{DEFAULT_DIMENSION, DimensionId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Character(EntityId),
    Stone(usize),
}

/// Characters, stones, and trophies plus their container partition.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    characters: HashMap<EntityId, Character>,
    stones: Vec<DimensionalStone>,
    trophies: Vec<Character>,
    /// Containers shown even when empty.
    pinned: BTreeSet<DimensionId>,
    groups: BTreeMap<DimensionId, Vec<Slot>>,
    revision: u64,
}

impl EntityStore {
    /// An empty store; its only live container is the default one.
    pub fn new() -> Self {
        let mut store = Self::default();
        store.regroup();
        store
    }

    /// An empty store that always lists `names` as containers.
    pub fn with_pinned_containers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self {
            pinned: names
                .into_iter()
                .map(|n| DimensionId::new(n))
                .filter(|d| !d.is_trophy())
                .collect(),
            ..Self::default()
        };
        store.regroup();
        store
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Replace the character collection with a fresh snapshot.
    ///
    /// Stones and trophies are additive records the snapshot does not carry,
    /// so they are kept.
    pub fn load(&mut self, characters: Vec<Character>) {
        self.characters.clear();
        for character in characters {
            if character.current_dimension.is_trophy() {
                self.file_trophy(character);
            } else {
                self.characters.insert(character.id.clone(), character);
            }
        }
        self.touch();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            characters = self.characters.len(),
            revision = self.revision,
            "store loaded"
        );
    }

    /// Merge an authoritative character record, replacing by id.
    ///
    /// Returns the record it replaced, if any. A record for a character that
    /// was already stolen is ignored; a record placing a character in the
    /// trophy dimension files it as a trophy.
    pub fn apply_move_result(&mut self, updated: Character) -> Option<Character> {
        if self.trophy(updated.id.as_str()).is_some() {
            #[cfg(feature = "tracing")]
            tracing::warn!(id = %updated.id, "move result for a stolen character ignored");
            return None;
        }
        let previous = if updated.current_dimension.is_trophy() {
            let previous = self.characters.remove(&updated.id);
            self.file_trophy(updated);
            previous
        } else {
            self.characters.insert(updated.id.clone(), updated)
        };
        self.touch();
        previous
    }

    /// Remove a stolen character, leave its stone, and keep it as a trophy.
    ///
    /// Returns `true` when the character was present before the steal.
    pub fn apply_steal_result(&mut self, stolen: Character, stone: DimensionalStone) -> bool {
        let removed = self.characters.remove(&stolen.id);
        let source = removed
            .as_ref()
            .map(|c| c.current_dimension.clone())
            .unwrap_or_else(|| stone.dimension.clone());

        if !self.stones.iter().any(|s| s.id == stone.id) {
            self.stones.push(stone);
        }

        let mut trophy = stolen;
        trophy.stolen_by_rick_prime = true;
        trophy.original_dimension = Some(source);
        trophy.current_dimension = DimensionId::trophy();
        self.file_trophy(trophy);

        self.touch();
        removed.is_some()
    }

    fn file_trophy(&mut self, trophy: Character) {
        match self.trophies.iter_mut().find(|t| t.id == trophy.id) {
            Some(existing) => *existing = trophy,
            None => self.trophies.push(trophy),
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.regroup();
    }

    fn regroup(&mut self) {
        let mut groups: BTreeMap<DimensionId, Vec<Slot>> = self
            .pinned
            .iter()
            .map(|d| (d.clone(), Vec::new()))
            .collect();

        let mut chars: Vec<&Character> = self.characters.values().collect();
        chars.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        for c in chars {
            groups
                .entry(c.current_dimension.clone())
                .or_default()
                .push(Slot::Character(c.id.clone()));
        }
        for (idx, stone) in self.stones.iter().enumerate() {
            groups
                .entry(stone.dimension.clone())
                .or_default()
                .push(Slot::Stone(idx));
        }
        if groups.is_empty() {
            groups.insert(DimensionId::new(DEFAULT_DIMENSION), Vec::new());
        }
        self.groups = groups;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.get(id)
    }

    pub fn stone(&self, id: &str) -> Option<&DimensionalStone> {
        self.stones.iter().find(|s| s.id.as_str() == id)
    }

    pub fn trophy(&self, id: &str) -> Option<&Character> {
        self.trophies.iter().find(|t| t.id.as_str() == id)
    }

    /// Container currently holding entity `id`.
    ///
    /// Live characters win over stones that reuse their id; trophies report
    /// the trophy container.
    pub fn container_of(&self, id: &str) -> Option<DimensionId> {
        if let Some(c) = self.character(id) {
            return Some(c.current_dimension.clone());
        }
        if let Some(s) = self.stone(id) {
            return Some(s.dimension.clone());
        }
        self.trophy(id).map(|_| DimensionId::trophy())
    }

    /// Live container names, sorted.
    pub fn containers(&self) -> impl Iterator<Item = &DimensionId> {
        self.groups.keys()
    }

    pub fn is_container(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Display list for one container: characters by name, then stones.
    pub fn items(&self, container: &str) -> Vec<ContainerItem<'_>> {
        self.groups
            .get(container)
            .map(|slots| slots.iter().filter_map(|s| self.resolve_slot(s)).collect())
            .unwrap_or_default()
    }

    /// Every live container with its display list.
    pub fn by_container(&self) -> BTreeMap<&DimensionId, Vec<ContainerItem<'_>>> {
        self.groups
            .iter()
            .map(|(dim, slots)| {
                (
                    dim,
                    slots.iter().filter_map(|s| self.resolve_slot(s)).collect(),
                )
            })
            .collect()
    }

    fn resolve_slot(&self, slot: &Slot) -> Option<ContainerItem<'_>> {
        match slot {
            Slot::Character(id) => self.characters.get(id).map(ContainerItem::Character),
            Slot::Stone(idx) => self.stones.get(*idx).map(ContainerItem::Stone),
        }
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn stones(&self) -> &[DimensionalStone] {
        &self.stones
    }

    /// Stolen characters in the order they were taken.
    pub fn trophies(&self) -> &[Character] {
        &self.trophies
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(store: &EntityStore, dim: &str) -> Vec<String> {
        store
            .items(dim)
            .into_iter()
            .map(|item| match item {
                ContainerItem::Character(c) => c.name.clone(),
                ContainerItem::Stone(s) => format!("stone:{}", s.id),
            })
            .collect()
    }

    #[test]
    fn empty_store_falls_back_to_default_container() {
        let store = EntityStore::new();
        let dims: Vec<_> = store.containers().map(DimensionId::as_str).collect();
        assert_eq!(dims, vec![DEFAULT_DIMENSION]);
        assert!(store.items(DEFAULT_DIMENSION).is_empty());
    }

    #[test]
    fn characters_sorted_by_name_then_stones() {
        let mut store = EntityStore::new();
        store.load(vec![
            Character::new("3", "Summer", "C-137"),
            Character::new("1", "Rick", "C-137"),
            Character::new("2", "Beth", "C-137"),
        ]);
        store.apply_steal_result(
            Character::new("2", "Beth", "C-137"),
            DimensionalStone {
                id: EntityId::new("2"),
                dimension: DimensionId::new("C-137"),
                previous_character_id: EntityId::new("2"),
            },
        );
        assert_eq!(names(&store, "C-137"), vec!["Rick", "Summer", "stone:2"]);
    }

    #[test]
    fn containers_are_union_of_characters_and_stones() {
        let mut store = EntityStore::new();
        store.load(vec![
            Character::new("1", "Rick", "C-137"),
            Character::new("2", "Morty", "C-131"),
        ]);
        store.apply_steal_result(
            Character::new("2", "Morty", "C-131"),
            DimensionalStone::left_by(&Character::new("2", "Morty", "C-131")),
        );
        let dims: Vec<_> = store.containers().map(DimensionId::as_str).collect();
        assert_eq!(dims, vec!["C-131", "C-137"]);
        assert!(!store.is_container(crate::dimension::RICK_PRIME_DIMENSION));
    }

    #[test]
    fn pinned_containers_survive_emptying() {
        let mut store = EntityStore::with_pinned_containers(["C-137", "C-131"]);
        store.load(vec![Character::new("1", "Rick", "C-137")]);
        let mut moved = Character::new("1", "Rick", "C-137");
        moved.current_dimension = DimensionId::new("C-131");
        store.apply_move_result(moved);
        assert!(store.is_container("C-137"));
        assert!(store.items("C-137").is_empty());
        assert_eq!(names(&store, "C-131"), vec!["Rick"]);
    }

    #[test]
    fn move_result_replaces_by_id() {
        let mut store = EntityStore::new();
        store.load(vec![Character::new("1", "Rick", "C-137")]);
        let before = store.revision();
        let mut moved = Character::new("1", "Rick", "C-137");
        moved.current_dimension = DimensionId::new("C-131");
        let previous = store.apply_move_result(moved);
        assert_eq!(
            previous.map(|p| p.current_dimension),
            Some(DimensionId::new("C-137"))
        );
        assert_eq!(store.container_of("1"), Some(DimensionId::new("C-131")));
        assert!(store.revision() > before);
        assert_eq!(store.character_count(), 1);
    }

    #[test]
    fn late_move_result_does_not_resurrect_a_trophy() {
        let mut store = EntityStore::new();
        let rick = Character::new("1", "Rick", "C-137");
        store.load(vec![rick.clone()]);
        store.apply_steal_result(rick.clone(), DimensionalStone::left_by(&rick));
        let revision = store.revision();

        let mut moved = rick;
        moved.current_dimension = DimensionId::new("C-131");
        assert_eq!(store.apply_move_result(moved), None);

        assert!(store.character("1").is_none());
        assert_eq!(store.trophies().len(), 1);
        assert_eq!(store.revision(), revision);
        assert!(!store.is_container("C-131"));
    }

    #[test]
    fn move_result_into_trophy_dimension_files_a_trophy() {
        let mut store = EntityStore::with_pinned_containers(["C-137"]);
        store.load(vec![Character::new("1", "Rick", "C-137")]);
        let mut taken = Character::new("1", "Rick", "C-137");
        taken.current_dimension = DimensionId::trophy();

        let previous = store.apply_move_result(taken);
        assert_eq!(
            previous.map(|p| p.current_dimension),
            Some(DimensionId::new("C-137"))
        );
        assert_eq!(store.character_count(), 0);
        assert_eq!(store.trophies().len(), 1);
        assert!(store.containers().all(|d| !d.is_trophy()));
        assert_eq!(store.container_of("1"), Some(DimensionId::trophy()));
    }

    #[test]
    fn steal_moves_character_into_trophies() {
        let mut store = EntityStore::new();
        let rick = Character::new("1", "Rick", "C-137");
        store.load(vec![rick.clone()]);
        assert!(store.apply_steal_result(rick.clone(), DimensionalStone::left_by(&rick)));

        assert!(store.character("1").is_none());
        assert_eq!(store.stones().len(), 1);
        let trophy = &store.trophies()[0];
        assert!(trophy.stolen_by_rick_prime);
        assert!(trophy.current_dimension.is_trophy());
        assert_eq!(trophy.original_dimension, Some(DimensionId::new("C-137")));
        // The stone keeps the old id, and it now resolves to the stone's container.
        assert_eq!(store.container_of("1"), Some(DimensionId::new("C-137")));
    }

    #[test]
    fn duplicate_stone_is_ignored() {
        let mut store = EntityStore::new();
        let rick = Character::new("1", "Rick", "C-137");
        store.load(vec![rick.clone()]);
        store.apply_steal_result(rick.clone(), DimensionalStone::left_by(&rick));
        assert!(!store.apply_steal_result(rick.clone(), DimensionalStone::left_by(&rick)));
        assert_eq!(store.stones().len(), 1);
        assert_eq!(store.trophies().len(), 1);
    }

    #[test]
    fn load_keeps_stones_and_files_trophy_dimension() {
        let mut store = EntityStore::new();
        let rick = Character::new("1", "Rick", "C-137");
        store.load(vec![rick.clone()]);
        store.apply_steal_result(rick.clone(), DimensionalStone::left_by(&rick));

        let mut prime = Character::new("9", "Evil Morty", "C-137");
        prime.current_dimension = DimensionId::trophy();
        store.load(vec![Character::new("2", "Morty", "C-131"), prime]);

        assert_eq!(store.stones().len(), 1);
        assert_eq!(store.trophies().len(), 2);
        assert_eq!(store.character_count(), 1);
        assert!(!store.is_container(crate::dimension::RICK_PRIME_DIMENSION));
    }

    #[test]
    fn by_container_matches_items() {
        let mut store = EntityStore::new();
        store.load(vec![
            Character::new("1", "Rick", "C-137"),
            Character::new("2", "Morty", "C-131"),
        ]);
        let grouped = store.by_container();
        assert_eq!(grouped.len(), 2);
        for (dim, items) in grouped {
            assert_eq!(items, store.items(dim.as_str()));
        }
    }
}
