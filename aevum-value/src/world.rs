//! Game state mutated by the native builtins: the inventory, per-character stats and the RNG.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// A stat named `MAX_<stat>` caps `<stat>` for the same character.
pub const MAX_PREFIX: &str = "MAX_";

pub type Stats = BTreeMap<String, f64>;

pub struct World {
    inventory: Vec<String>,
    stats: BTreeMap<String, Stats>,
    rng: ChaCha8Rng,
}

impl World {
    /// `seed` makes `random` reproducible; without one the generator is seeded from OS randomness.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            inventory: Vec::new(),
            stats: BTreeMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Empties the inventory and forgets every stat.
    pub fn reset(&mut self) {
        self.inventory.clear();
        self.stats.clear();
    }

    /* Inventory */
    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn add_item(&mut self, item: impl Into<String>) {
        self.inventory.push(item.into());
    }

    /// Removes the first matching item. Returns `false` if there was none.
    pub fn remove_item(&mut self, item: &str) -> bool {
        match self.inventory.iter().position(|held| held == item) {
            Some(index) => {
                self.inventory.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|held| held == item)
    }

    /* Stats */
    pub fn stats(&self, who: &str) -> Option<&Stats> {
        self.stats.get(who)
    }

    pub fn stat(&self, who: &str, stat: &str) -> Option<f64> {
        self.stats.get(who).and_then(|stats| stats.get(stat)).copied()
    }

    /// Stores `value`, clamped to `MAX_<stat>` when `who` has one, and returns the stored value.
    /// Lowering a `MAX_<stat>` clamps the existing `<stat>` down with it.
    pub fn set_stat(&mut self, who: &str, stat: &str, value: f64) -> f64 {
        let stats = self.stats.entry(who.to_string()).or_default();

        let stored = match stat.strip_prefix(MAX_PREFIX) {
            Some(capped) => {
                if let Some(current) = stats.get_mut(capped) {
                    *current = current.min(value);
                }
                value
            }
            None => match stats.get(&format!("{}{}", MAX_PREFIX, stat)) {
                Some(max) => value.min(*max),
                None => value,
            },
        };

        stats.insert(stat.to_string(), stored);
        stored
    }

    /// Adds `delta` to a stat (a missing stat counts as `0`), clamping like [`World::set_stat`].
    pub fn mod_stat(&mut self, who: &str, stat: &str, delta: f64) -> f64 {
        let current = self.stat(who, stat).unwrap_or(0.0);
        self.set_stat(who, stat, current + delta)
    }

    /* Randomness */
    /// Uniform integer in `low..=high`. `low` must not exceed `high`.
    pub fn random_int(&mut self, low: i64, high: i64) -> i64 {
        self.rng.gen_range(low..=high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory() {
        let mut world = World::new(Some(0));
        world.add_item("sword");
        world.add_item("potion");
        world.add_item("potion");
        assert!(world.has_item("potion"));
        assert!(world.remove_item("potion"));
        assert_eq!(world.inventory(), ["sword", "potion"]);
        assert!(!world.remove_item("shield"));
        world.reset();
        assert!(world.inventory().is_empty());
    }

    #[test]
    fn stats_are_per_character() {
        let mut world = World::new(Some(0));
        world.set_stat("hero", "hp", 10.0);
        world.set_stat("goblin", "hp", 3.0);
        assert_eq!(world.stat("hero", "hp"), Some(10.0));
        assert_eq!(world.stat("goblin", "hp"), Some(3.0));
        assert_eq!(world.stat("goblin", "mp"), None);
        assert_eq!(world.mod_stat("goblin", "mp", 2.0), 2.0);
    }

    #[test]
    fn max_stat_clamps() {
        let mut world = World::new(Some(0));
        world.set_stat("hero", "MAX_hp", 20.0);
        assert_eq!(world.set_stat("hero", "hp", 25.0), 20.0);
        assert_eq!(world.mod_stat("hero", "hp", -5.0), 15.0);
        assert_eq!(world.mod_stat("hero", "hp", 100.0), 20.0);

        // lowering the cap lowers the stat
        world.set_stat("hero", "MAX_hp", 12.0);
        assert_eq!(world.stat("hero", "hp"), Some(12.0));

        // caps are per character
        assert_eq!(world.set_stat("goblin", "hp", 99.0), 99.0);
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let mut a = World::new(Some(42));
        let mut b = World::new(Some(42));
        let rolls_a: Vec<i64> = (0..16).map(|_| a.random_int(1, 6)).collect();
        let rolls_b: Vec<i64> = (0..16).map(|_| b.random_int(1, 6)).collect();
        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().all(|roll| (1..=6).contains(roll)));
        assert_eq!(a.random_int(3, 3), 3);
    }
}
