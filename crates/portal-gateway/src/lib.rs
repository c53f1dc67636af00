#![forbid(unsafe_code)]

//! Remote gateway: the boundary to the character, insult, and steal service.
//!
//! [`Gateway`] is synchronous. The runtime calls it from background tasks,
//! never from the event loop, so a slow service only delays the message
//! that carries the result.
//!
//! Two implementations ship:
//!
//! - [`HttpGateway`]: the JSON/HTTP service
//! - [`InMemoryGateway`]: a seeded in-process stand-in for offline runs and tests

pub mod error;
pub mod http;
pub mod memory;
pub mod roster;

pub use error::GatewayError;
pub use http::{HttpGateway, HttpGatewayConfig};
pub use memory::{InMemoryGateway, Operation};

use portal_model::{Character, DimensionId, DimensionalStone, EntityId};
use serde::{Deserialize, Serialize};

/// A line of flavor text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insult {
    #[serde(rename = "insult")]
    pub text: String,
}

impl Insult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// What a successful steal hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealOutcome {
    pub character: Character,
    pub stone: DimensionalStone,
}

/// Operations the board consumes from the service.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Gateway: Send + Sync {
    /// Full snapshot of every character still in circulation.
    fn list_characters(&self) -> Result<Vec<Character>, GatewayError>;

    /// Move `id` to `target`; the returned record is authoritative.
    fn move_character(
        &self,
        id: &EntityId,
        target: &DimensionId,
    ) -> Result<Character, GatewayError>;

    fn fetch_random_insult(&self) -> Result<Insult, GatewayError>;

    /// Take a random character out of circulation, leaving a stone.
    fn steal_random_character(&self) -> Result<StealOutcome, GatewayError>;

    /// Fetch a portrait, returning its size in bytes.
    fn fetch_image(&self, url: &str) -> Result<usize, GatewayError>;
}
