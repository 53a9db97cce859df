#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural level generation.
//!
//! A [`LayoutGenerator`] produces a candidate [`Layout`]. The [`RetryPolicy`]
//! keeps drawing candidates from the same random stream until one offers
//! enough walkable floor, giving up after a bounded number of attempts. The
//! [`details`] module derives decorative fixtures (rocks and lights) from an
//! accepted grid.

mod cave;
pub mod details;
mod retry;

use blind_jump_core::{Level, TileCoord, TileGrid};
use rand::RngCore;

pub use cave::{canned_layout, CaveGenerator, GeneratorTuning};
pub use retry::{Accepted, RetryPolicy};

/// Candidate level layout.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    /// Classified map cells.
    pub grid: TileGrid,
    /// Floor cell the player spawns on.
    pub spawn: TileCoord,
}

impl Layout {
    /// Number of walkable cells in the layout.
    #[must_use]
    pub fn open_cells(&self) -> usize {
        self.grid.open_cell_count()
    }
}

/// Produces candidate layouts from a random stream.
pub trait LayoutGenerator {
    /// Generates one candidate for the level.
    fn generate(&self, level: Level, rng: &mut dyn RngCore) -> Layout;

    /// Grid dimensions the generator works in.
    fn dimensions(&self) -> (u32, u32);
}
