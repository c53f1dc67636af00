//! Built-in data for the in-memory gateway: insults and the seed roster.

use portal_model::{Character, CharacterStatus, DimensionId, EntityId};
use rand::Rng;

/// Flavor text served by the offline insult endpoint.
pub const INSULTS: [&str; 24] = [
    "Your existence is an insult to every dimension.",
    "You're more useless than a Jerry at a Rick convention.",
    "Not even the most miserable dimension would want your DNA.",
    "Your incompetence crosses the entire multiverse.",
    "You're proof that the universe sometimes makes mistakes.",
    "Any random Morty is worth more than you.",
    "Your brain is a portal to stupidity.",
    "The Galactic Federation wouldn't take what you produce for free.",
    "You are the Jerry of Jerries.",
    "In no dimension are you the preferred option.",
    "You're not even a decent backup Morty.",
    "Your IQ doesn't reach dimension C-137.",
    "Even the Cromulons would find you a pathetic show.",
    "You're the discarded draft of a side character.",
    "Your value to the multiverse is exactly zero.",
    "Not even a portal gun could save you from irrelevance.",
    "The dark matter formula is simpler than you.",
    "You're what's left when a Rick picks the wrong dimension.",
    "Your DNA doesn't deserve a jar in the garage.",
    "At the Citadel of Ricks you'd be the laughingstock.",
    "You don't even rank as a memory parasite.",
    "Your contribution to the multiverse is negative.",
    "You're the rounding error of the universe.",
    "A Jerry has more dignity than you on your best day.",
];

struct Seed {
    name: &'static str,
    species: &'static str,
    status: &'static str,
    dimension: &'static str,
    avatar: Option<u32>,
}

const fn seed(
    name: &'static str,
    species: &'static str,
    status: &'static str,
    dimension: &'static str,
    avatar: Option<u32>,
) -> Seed {
    Seed {
        name,
        species,
        status,
        dimension,
        avatar,
    }
}

// Enough C-137 residents to push that column past the windowing threshold.
const ROSTER: [Seed; 30] = [
    seed("Rick Sanchez", "Human", "alive", "C-137", Some(1)),
    seed("Morty Smith", "Human", "alive", "C-137", Some(2)),
    seed("Summer Smith", "Human", "alive", "C-137", Some(3)),
    seed("Beth Smith", "Human", "alive", "C-137", Some(4)),
    seed("Jerry Smith", "Human", "alive", "C-137", Some(5)),
    seed("Birdperson", "Bird-Person", "dead", "C-137", None),
    seed("Squanchy", "Cat-Person", "unknown", "C-137", None),
    seed("Mr. Meeseeks", "Meeseeks", "unknown", "C-137", None),
    seed("Abadango Cluster Princess", "Alien", "alive", "C-137", None),
    seed("Abradolf Lincler", "Human", "unknown", "C-137", None),
    seed("Adjudicator Rick", "Human", "dead", "C-137", None),
    seed("Agency Director", "Human", "dead", "C-137", None),
    seed("Alan Rails", "Human", "dead", "C-137", None),
    seed("Albert Einstein", "Human", "dead", "C-137", None),
    seed("Alexander", "Human", "dead", "C-137", None),
    seed("Alien Googah", "Alien", "unknown", "C-137", None),
    seed("Alien Morty", "Human", "unknown", "C-137", None),
    seed("Amish Cyborg", "Alien", "dead", "C-137", None),
    seed("Annie", "Human", "alive", "C-137", None),
    seed("Antenna Morty", "Human", "alive", "C-137", None),
    seed("Mr. Poopybutthole", "Poopybutthole", "alive", "C-137", None),
    seed("Pickle Rick", "Pickle", "alive", "C-137", None),
    seed("Scary Terry", "Alien", "alive", "C-137", None),
    seed("Noob-Noob", "Alien", "alive", "C-137", None),
    seed("Evil Morty", "Human", "alive", "C-131", None),
    seed("Doofus Rick", "Human", "alive", "C-131", None),
    seed("Unity", "Hive Mind", "alive", "C-131", None),
    seed("Gearhead", "Gear-Person", "alive", "C-131", None),
    seed("Krombopulos Michael", "Gromflomite", "dead", "C-131", None),
    seed("Tammy Guetermann", "Human", "captured", "C-131", None),
];

const AVATAR_BASE: &str = "https://rickandmortyapi.com/api/character/avatar";

/// Build the seed roster. Ids come from `rng`, so a seeded RNG gives stable ids.
pub fn default_roster<R: Rng + ?Sized>(rng: &mut R) -> Vec<Character> {
    ROSTER
        .iter()
        .map(|s| {
            let id = uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid();
            let dimension = DimensionId::new(s.dimension);
            Character {
                id: EntityId::new(id.simple().to_string()),
                name: s.name.to_string(),
                species: s.species.to_string(),
                status: CharacterStatus::from(s.status.to_string()),
                origin_dimension: dimension.clone(),
                current_dimension: dimension,
                image_url: s.avatar.map(|n| format!("{AVATAR_BASE}/{n}.jpeg")),
                captured_at: "2024-01-01T00:00:00".to_string(),
                stolen_by_rick_prime: false,
                original_dimension: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn roster_ids_are_unique_and_stable() {
        let a = default_roster(&mut StdRng::seed_from_u64(7));
        let b = default_roster(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        let ids: HashSet<_> = a.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), a.len());
    }

    #[test]
    fn c137_exceeds_window_threshold() {
        let roster = default_roster(&mut StdRng::seed_from_u64(1));
        let c137 = roster
            .iter()
            .filter(|c| c.current_dimension.as_str() == "C-137")
            .count();
        assert!(c137 > 20);
        assert_eq!(
            roster[0].image_url.as_deref(),
            Some("https://rickandmortyapi.com/api/character/avatar/1.jpeg")
        );
    }
}
