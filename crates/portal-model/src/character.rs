#![forbid(unsafe_code)]

//! Character and stone records.
//!
//! Field names match the JSON the character service speaks, so these types
//! double as wire types for the gateway.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::dimension::DimensionId;

/// Opaque, immutable identity of a character or stone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Life status as reported by the service.
///
/// Unrecognised strings survive a round trip through [`CharacterStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CharacterStatus {
    Alive,
    Dead,
    Unknown,
    Captured,
    Other(String),
}

impl CharacterStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Alive => "alive",
            Self::Dead => "dead",
            Self::Unknown => "unknown",
            Self::Captured => "captured",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for CharacterStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "alive" => Self::Alive,
            "dead" => Self::Dead,
            "unknown" => Self::Unknown,
            "captured" => Self::Captured,
            _ => Self::Other(value),
        }
    }
}

impl From<CharacterStatus> for String {
    fn from(value: CharacterStatus) -> Self {
        match value {
            CharacterStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A character. `current_dimension` alone decides container membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub species: String,
    pub status: CharacterStatus,
    pub origin_dimension: DimensionId,
    pub current_dimension: DimensionId,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub captured_at: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub stolen_by_rick_prime: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_dimension: Option<DimensionId>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl Character {
    /// Minimal constructor; the rest of the fields take neutral defaults.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        dimension: impl Into<String>,
    ) -> Self {
        let dimension = DimensionId::new(dimension);
        Self {
            id: EntityId::new(id),
            name: name.into(),
            species: "Human".to_string(),
            status: CharacterStatus::Alive,
            origin_dimension: dimension.clone(),
            current_dimension: dimension,
            image_url: None,
            captured_at: String::new(),
            stolen_by_rick_prime: false,
            original_dimension: None,
        }
    }

    #[must_use]
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = species.into();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: CharacterStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// First grapheme-ish letter of the name, used when no portrait is cached.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .find(|c| c.is_alphanumeric())
            .map_or('?', |c| c.to_uppercase().next().unwrap_or(c))
    }
}

/// Placeholder left in a dimension after its character was stolen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionalStone {
    pub id: EntityId,
    pub dimension: DimensionId,
    pub previous_character_id: EntityId,
}

impl DimensionalStone {
    /// The stone the service leaves for `character`: same id, same dimension.
    pub fn left_by(character: &Character) -> Self {
        Self {
            id: character.id.clone(),
            dimension: character.current_dimension.clone(),
            previous_character_id: character.id.clone(),
        }
    }
}

/// One entry of a container's display list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerItem<'a> {
    Character(&'a Character),
    Stone(&'a DimensionalStone),
}

impl<'a> ContainerItem<'a> {
    pub fn id(&self) -> &'a EntityId {
        match self {
            Self::Character(c) => &c.id,
            Self::Stone(s) => &s.id,
        }
    }

    pub fn is_stone(&self) -> bool {
        matches!(self, Self::Stone(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_service_payload() {
        let json = r#"{
            "id": "65f0",
            "name": "Rick Sanchez",
            "species": "Human",
            "status": "alive",
            "origin_dimension": "C-137",
            "current_dimension": "C-137",
            "image_url": null,
            "captured_at": "2024-03-01T10:00:00",
            "stolen_by_rick_prime": null
        }"#;
        let c: Character = serde_json::from_str(json).expect("decode");
        assert_eq!(c.id.as_str(), "65f0");
        assert_eq!(c.status, CharacterStatus::Alive);
        assert!(!c.stolen_by_rick_prime);
        assert_eq!(c.original_dimension, None);
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status: CharacterStatus = serde_json::from_str(r#""Squanched""#).expect("decode");
        assert_eq!(status, CharacterStatus::Other("Squanched".into()));
        assert_eq!(serde_json::to_string(&status).expect("encode"), r#""Squanched""#);
        let known: CharacterStatus = serde_json::from_str(r#""Dead""#).expect("decode");
        assert_eq!(known, CharacterStatus::Dead);
    }

    #[test]
    fn initial_skips_punctuation() {
        assert_eq!(Character::new("1", "Mr. Meeseeks", "C-137").initial(), 'M');
        assert_eq!(Character::new("2", "...", "C-137").initial(), '?');
        assert_eq!(Character::new("3", "birdperson", "C-137").initial(), 'B');
    }

    #[test]
    fn stone_keeps_character_identity() {
        let c = Character::new("abc", "Squanchy", "C-131");
        let stone = DimensionalStone::left_by(&c);
        assert_eq!(stone.id, c.id);
        assert_eq!(stone.previous_character_id, c.id);
        assert_eq!(stone.dimension.as_str(), "C-131");
    }
}
