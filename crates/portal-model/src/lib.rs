#![forbid(unsafe_code)]

//! Domain model for Portal Lab.
//!
//! Characters live in dimensions (containers). This crate owns the pieces of
//! the drag/drop engine that do no I/O:
//!
//! - [`character`]: wire-compatible `Character` / `DimensionalStone` records
//! - [`dimension`]: container names, the trophy container, drop-target ids
//! - [`store`]: the in-memory [`EntityStore`] with derived per-container groupings
//! - [`drag`]: the three-state [`DragSession`] tracker and press arming
//! - [`resolve`]: the pure drop resolver
//! - [`image_cache`]: the injected portrait cache

pub mod character;
pub mod dimension;
pub mod drag;
pub mod image_cache;
pub mod resolve;
pub mod store;

pub use character::{Character, CharacterStatus, ContainerItem, DimensionalStone, EntityId};
pub use dimension::{DimensionId, DropTargetId};
pub use drag::{DragConfig, DragSession, DropRelease, PressArm};
pub use image_cache::ImageCache;
pub use resolve::{MovePlan, NoOpReason, Resolution, resolve_drop};
pub use store::EntityStore;
