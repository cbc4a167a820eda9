//! Deck and model identifier generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// Range identifiers are drawn from, `[2^30, 2^31)`.
pub const ID_RANGE: Range<i64> = (1 << 30)..(1 << 31);

/// Source of deck and model identifiers.
///
/// No collision avoidance: two decks may receive the same id.
pub trait IdGenerator {
    fn next_id(&mut self) -> i64;
}

/// Thread-local random identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> i64 {
        rand::thread_rng().gen_range(ID_RANGE)
    }
}

/// Reproducible identifiers from a fixed seed.
#[derive(Debug, Clone)]
pub struct SeededIds {
    rng: StdRng,
}

impl SeededIds {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IdGenerator for SeededIds {
    fn next_id(&mut self) -> i64 {
        self.rng.gen_range(ID_RANGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_stay_in_range() {
        let mut ids = RandomIds;
        for _ in 0..1000 {
            assert!(ID_RANGE.contains(&ids.next_id()));
        }
    }

    #[test]
    fn seeded_ids_repeat_for_same_seed() {
        let mut a = SeededIds::new(7);
        let mut b = SeededIds::new(7);
        let first: Vec<i64> = (0..5).map(|_| a.next_id()).collect();
        let second: Vec<i64> = (0..5).map(|_| b.next_id()).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|id| ID_RANGE.contains(id)));
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededIds::new(1);
        let mut b = SeededIds::new(2);
        let first: Vec<i64> = (0..5).map(|_| a.next_id()).collect();
        let second: Vec<i64> = (0..5).map(|_| b.next_id()).collect();
        assert_ne!(first, second);
    }
}
