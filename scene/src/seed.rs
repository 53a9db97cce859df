//! Per-level random streams derived from the global seed.
//!
//! Each level gets independent labelled streams, so a change in how
//! enemies are drawn never shifts the cave layout of the same level.

use blind_jump_core::Level;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Label of the stream that drives the cave generator.
pub const LAYOUT_STREAM: &str = "layout";

/// Label of the stream that drives enemies, the chest and other placement.
pub const POPULATION_STREAM: &str = "population";

/// Derives the seed of a labelled per-level stream from the run seed.
#[must_use]
pub fn derive_level_seed(global_seed: u64, level: Level, label: &str) -> u64 {
    derive_labeled_seed(derive_base_seed(global_seed, level), label)
}

/// Random stream for one labelled concern of one level.
#[must_use]
pub fn level_rng(global_seed: u64, level: Level, label: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_level_seed(global_seed, level, label))
}

fn derive_base_seed(global_seed: u64, level: Level) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(level.get().to_le_bytes());
    finalize_seed(hasher)
}

fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
