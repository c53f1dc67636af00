#![forbid(unsafe_code)]

//! Dimension (container) names and drop-target identifiers.
//!
//! Drop targets live in two namespaces: containers and entities. The textual
//! form keeps them apart with a `dim-` prefix on container targets, so an
//! entity whose id happens to equal a dimension name is never mistaken for
//! the dimension.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::character::EntityId;

/// Name of the trophy container the steal action fills.
pub const RICK_PRIME_DIMENSION: &str = "RICK_PRIME_DIMENSION";

/// Container shown when nothing else is live.
pub const DEFAULT_DIMENSION: &str = "C-137";

/// The regular dimensions a fresh board always shows.
pub const REGULAR_DIMENSIONS: [&str; 2] = ["C-137", "C-131"];

/// Prefix marking the container namespace in textual drop-target ids.
pub const CONTAINER_TARGET_PREFIX: &str = "dim-";

/// An opaque dimension name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionId(String);

impl DimensionId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The trophy container.
    #[must_use]
    pub fn trophy() -> Self {
        Self(RICK_PRIME_DIMENSION.to_string())
    }

    #[must_use]
    pub fn is_trophy(&self) -> bool {
        self.0 == RICK_PRIME_DIMENSION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DimensionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DimensionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DimensionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// What the pointer was over: a whole container or a single card.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTargetId {
    Container(DimensionId),
    Entity(EntityId),
}

impl DropTargetId {
    pub fn container(name: impl Into<String>) -> Self {
        Self::Container(DimensionId::new(name))
    }

    pub fn entity(id: impl Into<String>) -> Self {
        Self::Entity(EntityId::new(id))
    }

    /// Parse the textual form: `dim-<name>` is a container, anything else an entity.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(CONTAINER_TARGET_PREFIX) {
            Some(name) => Self::container(name),
            None => Self::entity(raw),
        }
    }
}

impl fmt::Display for DropTargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container(dim) => write!(f, "{CONTAINER_TARGET_PREFIX}{dim}"),
            Self::Entity(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_form_separates_namespaces() {
        assert_eq!(
            DropTargetId::parse("dim-C-131"),
            DropTargetId::container("C-131")
        );
        assert_eq!(DropTargetId::parse("C-131"), DropTargetId::entity("C-131"));
        assert_eq!(DropTargetId::container("C-137").to_string(), "dim-C-137");
        assert_eq!(DropTargetId::entity("abc").to_string(), "abc");
    }

    #[test]
    fn trophy_is_recognised() {
        assert!(DimensionId::trophy().is_trophy());
        assert!(!DimensionId::new(DEFAULT_DIMENSION).is_trophy());
    }
}
