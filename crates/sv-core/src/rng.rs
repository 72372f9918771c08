//! Dice source for character generation
//!
//! Seeded ChaCha RNG. Never persisted: it is rebuilt from the campaign seed
//! whenever a campaign is reset or restored.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded dice roller
#[derive(Debug, Clone)]
pub struct DiceRoller {
    rng: ChaCha8Rng,
    seed: u64,
}

impl DiceRoller {
    /// Create a new roller with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Get the seed used to create this roller
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Roll in `min..max`. Returns `min` if the range is empty.
    pub fn roll(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Returns true with probability percent/100
    pub fn roll_chance(&mut self, percent: i32) -> bool {
        self.roll(0, 100) < percent
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.roll(0, items.len() as i32) as usize])
        }
    }
}

impl Default for DiceRoller {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_bounds() {
        let mut dice = DiceRoller::new(42);
        for _ in 0..1000 {
            let n = dice.roll(3, 9);
            assert!((3..9).contains(&n));
        }
    }

    #[test]
    fn test_empty_range() {
        let mut dice = DiceRoller::new(42);
        assert_eq!(dice.roll(5, 5), 5);
        assert_eq!(dice.roll(7, 2), 7);
        assert!(dice.choose::<u8>(&[]).is_none());
    }

    #[test]
    fn test_reproducibility() {
        let mut a = DiceRoller::new(7);
        let mut b = DiceRoller::new(7);
        for _ in 0..100 {
            assert_eq!(a.roll(0, 100), b.roll(0, 100));
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut dice = DiceRoller::new(1);
        for _ in 0..100 {
            assert!(dice.roll_chance(100));
            assert!(!dice.roll_chance(0));
        }
    }
}
