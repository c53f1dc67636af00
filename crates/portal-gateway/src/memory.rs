//! Seeded in-process gateway.
//!
//! Behaves like the HTTP service for a single local client: moves update the
//! stored record, steals remove a random character and return it with the
//! stone that replaces it. Failures can be injected per [`Operation`] for
//! tests, and every call is counted.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use portal_model::image_cache::is_fetchable;
use portal_model::{Character, DimensionId, DimensionalStone, EntityId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use tracing::debug;

use crate::roster::{INSULTS, default_roster};
use crate::{Gateway, GatewayError, Insult, StealOutcome};

/// Gateway operations, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Move,
    Insult,
    Steal,
    Image,
}

#[derive(Debug)]
struct State {
    /// Ordered so a given seed always steals the same victim.
    characters: BTreeMap<EntityId, Character>,
    rng: StdRng,
    failing: HashMap<Operation, String>,
    calls: HashMap<Operation, usize>,
}

/// In-process stand-in for the character service.
#[derive(Debug)]
pub struct InMemoryGateway {
    state: Mutex<State>,
}

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 137;

impl InMemoryGateway {
    /// A gateway holding exactly `characters`.
    pub fn new(characters: Vec<Character>) -> Self {
        Self::with_seed(characters, DEFAULT_SEED)
    }

    pub fn with_seed(characters: Vec<Character>, seed: u64) -> Self {
        Self {
            state: Mutex::new(State {
                characters: characters.into_iter().map(|c| (c.id.clone(), c)).collect(),
                rng: StdRng::seed_from_u64(seed),
                failing: HashMap::new(),
                calls: HashMap::new(),
            }),
        }
    }

    /// A gateway pre-populated with the built-in roster.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let roster = default_roster(&mut rng);
        Self::with_seed(roster, seed)
    }

    /// Make `op` fail with [`GatewayError::Unavailable`] until healed.
    pub fn fail(&self, op: Operation, message: impl Into<String>) {
        self.lock().failing.insert(op, message.into());
    }

    pub fn heal(&self, op: Operation) {
        self.lock().failing.remove(&op);
    }

    /// How many times `op` has been called, failed calls included.
    pub fn calls(&self, op: Operation) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Current server-side records, ordered by id.
    pub fn snapshot(&self) -> Vec<Character> {
        self.lock().characters.values().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the call and apply any injected failure.
    fn enter(&self, op: Operation) -> Result<MutexGuard<'_, State>, GatewayError> {
        let mut state = self.lock();
        *state.calls.entry(op).or_insert(0) += 1;
        if let Some(message) = state.failing.get(&op) {
            return Err(GatewayError::Unavailable(message.clone()));
        }
        Ok(state)
    }
}

impl Gateway for InMemoryGateway {
    fn list_characters(&self) -> Result<Vec<Character>, GatewayError> {
        let state = self.enter(Operation::List)?;
        Ok(state.characters.values().cloned().collect())
    }

    fn move_character(
        &self,
        id: &EntityId,
        target: &DimensionId,
    ) -> Result<Character, GatewayError> {
        let mut state = self.enter(Operation::Move)?;
        let character = state
            .characters
            .get_mut(id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        character.current_dimension = target.clone();
        debug!(%id, %target, "in-memory move");
        Ok(character.clone())
    }

    fn fetch_random_insult(&self) -> Result<Insult, GatewayError> {
        let mut state = self.enter(Operation::Insult)?;
        let text = INSULTS
            .choose(&mut state.rng)
            .copied()
            .unwrap_or("Wubba lubba dub dub.");
        Ok(Insult::new(text))
    }

    fn steal_random_character(&self) -> Result<StealOutcome, GatewayError> {
        let mut state = self.enter(Operation::Steal)?;
        let State {
            characters, rng, ..
        } = &mut *state;
        let victim = characters
            .keys()
            .choose(rng)
            .cloned()
            .ok_or(GatewayError::NothingToSteal)?;
        let character = characters
            .remove(&victim)
            .ok_or(GatewayError::NothingToSteal)?;
        let stone = DimensionalStone::left_by(&character);
        debug!(id = %character.id, dimension = %stone.dimension, "in-memory steal");
        Ok(StealOutcome { character, stone })
    }

    fn fetch_image(&self, url: &str) -> Result<usize, GatewayError> {
        let _state = self.enter(Operation::Image)?;
        if is_fetchable(url) {
            Ok(0)
        } else {
            Err(GatewayError::InvalidUrl(url.to_string()))
        }
    }
}
