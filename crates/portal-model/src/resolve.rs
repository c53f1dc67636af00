#![forbid(unsafe_code)]

//! Drop resolution.
//!
//! [`resolve_drop`] maps a dragged entity and the target it was released over
//! to either a move or a reason nothing should happen. It reads the store at
//! call time, so the entity's container is whatever the latest merged
//! response says, not what it was when the drag began.
//!
//! # Decision Rule
//!
//! 1. A container target naming a live container resolves to it.
//! 2. An entity target resolves to that entity's container.
//! 3. Anything else is `Unresolved`.
//! 4. The trophy container, reached either way, is `Rejected`.
//! 5. A dragged id that is not a live character, or a target equal to its
//!    current container, is a `NoOp`.

use crate::character::EntityId;
use crate::dimension::{DimensionId, DropTargetId};
use crate::store::EntityStore;

/// A real move to hand to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub entity: EntityId,
    pub from: DimensionId,
    pub to: DimensionId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoOpReason {
    /// Dropped back where it came from.
    SameContainer(DimensionId),
    /// The dragged id is not a character in the store.
    UnknownEntity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Move(MovePlan),
    NoOp(NoOpReason),
    /// The target is neither a live container nor a known entity.
    Unresolved,
    /// The target is a container that never accepts drops.
    Rejected(DimensionId),
}

impl Resolution {
    pub fn is_move(&self) -> bool {
        matches!(self, Self::Move(_))
    }
}

/// Resolve a release of `entity` over `target`.
pub fn resolve_drop(
    store: &EntityStore,
    entity: &EntityId,
    target: Option<&DropTargetId>,
) -> Resolution {
    let resolution = resolve_inner(store, entity, target);
    #[cfg(feature = "tracing")]
    tracing::debug!(
        entity = %entity,
        target = ?target.map(ToString::to_string),
        ?resolution,
        "drop resolved"
    );
    resolution
}

fn resolve_inner(
    store: &EntityStore,
    entity: &EntityId,
    target: Option<&DropTargetId>,
) -> Resolution {
    let to = match target {
        None => return Resolution::Unresolved,
        Some(DropTargetId::Container(dim)) if dim.is_trophy() => {
            return Resolution::Rejected(dim.clone());
        }
        Some(DropTargetId::Container(dim)) if store.is_container(dim.as_str()) => dim.clone(),
        Some(DropTargetId::Container(_)) => return Resolution::Unresolved,
        Some(DropTargetId::Entity(id)) => match store.container_of(id.as_str()) {
            Some(dim) if dim.is_trophy() => return Resolution::Rejected(dim),
            Some(dim) => dim,
            None => return Resolution::Unresolved,
        },
    };

    let Some(character) = store.character(entity.as_str()) else {
        return Resolution::NoOp(NoOpReason::UnknownEntity);
    };
    if character.current_dimension == to {
        return Resolution::NoOp(NoOpReason::SameContainer(to));
    }
    Resolution::Move(MovePlan {
        entity: entity.clone(),
        from: character.current_dimension.clone(),
        to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Character, DimensionalStone};

    fn board() -> EntityStore {
        let mut store = EntityStore::new();
        store.load(vec![
            Character::new("rick", "Rick", "C-137"),
            Character::new("morty", "Morty", "C-131"),
            Character::new("summer", "Summer", "C-131"),
        ]);
        store
    }

    fn id(s: &str) -> EntityId {
        EntityId::new(s)
    }

    #[test]
    fn container_target_moves() {
        let store = board();
        let r = resolve_drop(&store, &id("rick"), Some(&DropTargetId::container("C-131")));
        assert_eq!(
            r,
            Resolution::Move(MovePlan {
                entity: id("rick"),
                from: DimensionId::new("C-137"),
                to: DimensionId::new("C-131"),
            })
        );
    }

    #[test]
    fn entity_target_uses_its_container() {
        let store = board();
        let r = resolve_drop(&store, &id("rick"), Some(&DropTargetId::entity("morty")));
        assert!(matches!(r, Resolution::Move(ref p) if p.to.as_str() == "C-131"));
    }

    #[test]
    fn own_container_is_noop() {
        let store = board();
        let r = resolve_drop(&store, &id("morty"), Some(&DropTargetId::entity("summer")));
        assert_eq!(
            r,
            Resolution::NoOp(NoOpReason::SameContainer(DimensionId::new("C-131")))
        );
    }

    #[test]
    fn unknown_targets_are_unresolved() {
        let store = board();
        assert_eq!(
            resolve_drop(&store, &id("rick"), Some(&DropTargetId::entity("ghost"))),
            Resolution::Unresolved
        );
        assert_eq!(
            resolve_drop(&store, &id("rick"), Some(&DropTargetId::container("C-999"))),
            Resolution::Unresolved
        );
        assert_eq!(resolve_drop(&store, &id("rick"), None), Resolution::Unresolved);
    }

    #[test]
    fn entity_id_equal_to_dimension_name_stays_in_entity_namespace() {
        let store = board();
        // "C-131" as an entity id is not the C-131 container.
        assert_eq!(
            resolve_drop(&store, &id("rick"), Some(&DropTargetId::entity("C-131"))),
            Resolution::Unresolved
        );
    }

    #[test]
    fn trophy_container_is_rejected() {
        let mut store = board();
        let summer = Character::new("summer", "Summer", "C-131");
        store.apply_steal_result(summer.clone(), DimensionalStone::left_by(&summer));
        assert_eq!(
            resolve_drop(&store, &id("rick"), Some(&DropTargetId::Container(DimensionId::trophy()))),
            Resolution::Rejected(DimensionId::trophy())
        );
    }

    #[test]
    fn stone_card_resolves_to_the_dimension_it_was_left_in() {
        let mut store = board();
        let summer = Character::new("summer", "Summer", "C-131");
        store.apply_steal_result(summer.clone(), DimensionalStone::left_by(&summer));
        // The id names both the stone and the trophy; as an entity target it
        // is the stone. Trophy cards are targeted through their container.
        let r = resolve_drop(&store, &id("rick"), Some(&DropTargetId::entity("summer")));
        assert!(matches!(r, Resolution::Move(ref p) if p.to.as_str() == "C-131"));
        assert_eq!(
            resolve_drop(&store, &id("rick"), Some(&DropTargetId::Container(DimensionId::trophy()))),
            Resolution::Rejected(DimensionId::trophy())
        );
    }

    #[test]
    fn dragging_unknown_entity_is_noop() {
        let store = board();
        assert_eq!(
            resolve_drop(&store, &id("jerry"), Some(&DropTargetId::container("C-131"))),
            Resolution::NoOp(NoOpReason::UnknownEntity)
        );
    }
}
