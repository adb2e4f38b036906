//! Seed handling for map generation
//!
//! A map is seeded from free text. The text is folded into a master seed,
//! and every stochastic subsystem derives its own seed from that master so
//! each can be reasoned about (and reproduced) on its own.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Master seed plus the sub-seeds derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapSeed {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Serial shaping phase: partitioning, walks, rotation, placement and
    /// the fill noise offsets
    pub shaping: u64,
    /// Noise permutation table
    pub noise: u64,
    /// Per-shape fill generators (reseeding after a leak)
    pub fill: u64,
    /// Whether the master came from text (false = drawn at random)
    pub from_text: bool,
}

impl MapSeed {
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            shaping: derive_seed(master, "shaping"),
            noise: derive_seed(master, "noise"),
            fill: derive_seed(master, "fill"),
            from_text: false,
        }
    }

    /// Fold seed text into a master seed by summing its UTF-8 bytes. Empty
    /// text draws a random master instead.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::from_master(rand::random());
        }
        let master = text.bytes().map(u64::from).sum();
        Self {
            from_text: true,
            ..Self::from_master(master)
        }
    }

    /// Seed for the `index`-th shape's private generator.
    pub fn for_shape(&self, index: u32) -> u64 {
        derive_seed(self.fill, &format!("shape-{index}"))
    }
}

/// Derive a sub-seed from a master seed and a system name.
pub fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for MapSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MapSeed {{ master: {}, shaping: {}, noise: {}, fill: {} }}",
            self.master, self.shaping, self.noise, self.fill,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_seed_sums_bytes() {
        // 't' + 'e' + 's' + 't'
        let seed = MapSeed::from_text("test");
        assert_eq!(seed.master, 116 + 101 + 115 + 116);
        assert!(seed.from_text);

        // Anagrams fold to the same seed.
        assert_eq!(MapSeed::from_text("tset"), seed);
    }

    #[test]
    fn test_multibyte_text() {
        let seed = MapSeed::from_text("é");
        assert_eq!(seed.master, 0xC3 + 0xA9);
    }

    #[test]
    fn test_empty_text_is_random() {
        let seed = MapSeed::from_text("");
        assert!(!seed.from_text);
    }

    #[test]
    fn test_subsystems_get_different_seeds() {
        let seed = MapSeed::from_master(448);
        assert_ne!(seed.shaping, seed.noise);
        assert_ne!(seed.noise, seed.fill);
        assert_ne!(seed.for_shape(1), seed.for_shape(2));
        assert_eq!(seed.for_shape(3), MapSeed::from_master(448).for_shape(3));
    }

    #[test]
    fn test_shape_seeds_follow_fill_seed_only() {
        let seed = MapSeed::from_master(448);
        let reshaped = MapSeed {
            shaping: seed.shaping ^ 1,
            ..seed.clone()
        };
        assert_eq!(seed.for_shape(2), reshaped.for_shape(2));
    }
}
