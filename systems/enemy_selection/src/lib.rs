#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted enemy selection for generated levels.
//!
//! Enemy types unlock progressively as the run advances. Each unlocked type
//! carries a target level at which it is most common; its weight on a given
//! level is inversely proportional to the distance from that target. A level
//! is populated by repeatedly drawing a type from the cumulative weight table
//! and asking an [`EnemyPlacement`] to put it on an empty floor cell.

use blind_jump_core::{ConfigurationError, EnemyKind, Level};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on pick-and-place iterations per level.
pub const MAX_ITERATIONS: u32 = 15;

/// Schedule entry describing when a type unlocks and how it is weighted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockEntry {
    /// Enemy type.
    pub kind: EnemyKind,
    /// First level on which the type may appear.
    pub unlock_level: i32,
    /// Level at which the type is most likely.
    pub target_level: i32,
    /// Difficulty points charged for each placed instance.
    pub cost: u32,
}

impl UnlockEntry {
    /// Selection weight of the entry on the given level.
    ///
    /// Computed as `(100 + level) / max(|level - target|, 1)` in integer
    /// arithmetic.
    #[must_use]
    pub fn weight(&self, level: Level) -> u32 {
        let level = i64::from(level.get());
        let distance = (level - i64::from(self.target_level)).unsigned_abs().max(1);
        let weight = (100 + level).unsigned_abs() / distance;
        u32::try_from(weight).unwrap_or(u32::MAX)
    }
}

/// Ordered list of unlockable enemy types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockSchedule {
    entries: Vec<UnlockEntry>,
}

impl Default for UnlockSchedule {
    fn default() -> Self {
        Self::new(vec![
            UnlockEntry {
                kind: EnemyKind::Scoot,
                unlock_level: 1,
                target_level: 4,
                cost: 1,
            },
            UnlockEntry {
                kind: EnemyKind::Critter,
                unlock_level: 1,
                target_level: 5,
                cost: 2,
            },
            UnlockEntry {
                kind: EnemyKind::Dasher,
                unlock_level: 2,
                target_level: 20,
                cost: 3,
            },
            UnlockEntry {
                kind: EnemyKind::Turret,
                unlock_level: 4,
                target_level: 28,
                cost: 8,
            },
        ])
    }
}

impl UnlockSchedule {
    /// Creates a schedule from entries in unlock order.
    #[must_use]
    pub fn new(entries: Vec<UnlockEntry>) -> Self {
        Self { entries }
    }

    /// Entries in the order they were declared.
    #[must_use]
    pub fn entries(&self) -> &[UnlockEntry] {
        &self.entries
    }

    /// Rejects negative levels, free enemies and duplicated types.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.unlock_level < 0 {
                return Err(ConfigurationError::new(
                    format!("schedule[{index}].unlock_level"),
                    "must not be negative",
                ));
            }
            if entry.target_level < 0 {
                return Err(ConfigurationError::new(
                    format!("schedule[{index}].target_level"),
                    "must not be negative",
                ));
            }
            if entry.cost == 0 {
                return Err(ConfigurationError::new(
                    format!("schedule[{index}].cost"),
                    "must be positive",
                ));
            }
            if self.entries[..index]
                .iter()
                .any(|earlier| earlier.kind == entry.kind)
            {
                return Err(ConfigurationError::new(
                    format!("schedule[{index}].kind"),
                    format!("{} is listed twice", entry.kind.name()),
                ));
            }
        }
        Ok(())
    }
}

/// Selection entry of a [`WeightTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightedKind {
    /// Enemy type.
    pub kind: EnemyKind,
    /// Weight on the level the table was built for.
    pub weight: u32,
    /// Difficulty points charged per placement.
    pub cost: u32,
}

/// Cumulative weight table for one level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeightTable {
    entries: Vec<WeightedKind>,
    intervals: Vec<u32>,
}

impl WeightTable {
    /// Weighted entries, in unlock order.
    #[must_use]
    pub fn entries(&self) -> &[WeightedKind] {
        &self.entries
    }

    /// Running sums of the entry weights.
    #[must_use]
    pub fn intervals(&self) -> &[u32] {
        &self.intervals
    }

    /// Sum of every weight.
    #[must_use]
    pub fn total_weight(&self) -> u32 {
        self.intervals.last().copied().unwrap_or(0)
    }

    /// Exclusive upper bound for draws, never zero.
    #[must_use]
    pub fn draw_bound(&self) -> u32 {
        self.total_weight().max(1)
    }

    /// Reports whether no type is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first entry whose interval exceeds `draw`.
    #[must_use]
    pub fn select(&self, draw: u32) -> Option<usize> {
        self.intervals.iter().position(|bound| draw < *bound)
    }
}

/// Places a chosen enemy type into the level under construction.
pub trait EnemyPlacement {
    /// Attempts to place one enemy, returning whether a cell was available.
    fn place(&mut self, kind: EnemyKind, rng: &mut dyn RngCore) -> bool;
}

/// Outcome of populating a level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlacementReport {
    /// Types placed, in placement order.
    pub placed: Vec<EnemyKind>,
    /// Iterations that selected a type but found no free cell.
    pub unplaced: u32,
    /// Sum of the cost of every placed enemy.
    pub difficulty_cost: u32,
}

/// Number of pick-and-place iterations for a level.
///
/// `2 + level^1.1` truncated, capped at [`MAX_ITERATIONS`].
#[must_use]
pub fn iteration_count(level: Level) -> u32 {
    let raw = 2.0 + f64::from(level.get()).powf(1.1);
    (raw as u32).min(MAX_ITERATIONS)
}

/// Tracks unlocked enemy types across a run.
#[derive(Clone, Debug, Default)]
pub struct EnemySelector {
    schedule: UnlockSchedule,
    unlocked: Vec<UnlockEntry>,
}

impl EnemySelector {
    /// Creates a selector with nothing unlocked.
    #[must_use]
    pub fn new(schedule: UnlockSchedule) -> Self {
        Self {
            schedule,
            unlocked: Vec::new(),
        }
    }

    /// Entries unlocked so far, in unlock order.
    #[must_use]
    pub fn unlocked(&self) -> &[UnlockEntry] {
        &self.unlocked
    }

    /// Forgets every unlocked type. Used when a run restarts.
    pub fn clear(&mut self) {
        self.unlocked.clear();
    }

    /// Unlocks every scheduled type available on `level` that is not yet
    /// unlocked, returning how many were added.
    pub fn unlock(&mut self, level: Level) -> usize {
        let before = self.unlocked.len();
        for entry in self.schedule.entries() {
            let available = i64::from(entry.unlock_level) <= i64::from(level.get());
            if available && !self.unlocked.iter().any(|known| known.kind == entry.kind) {
                debug!(kind = entry.kind.name(), level = level.get(), "enemy type unlocked");
                self.unlocked.push(*entry);
            }
        }
        self.unlocked.len() - before
    }

    /// Builds a fresh weight table for `level` from the unlocked types.
    #[must_use]
    pub fn reweight(&self, level: Level) -> WeightTable {
        let mut table = WeightTable::default();
        let mut collector = 0u32;
        for entry in &self.unlocked {
            let weight = entry.weight(level);
            collector = collector.saturating_add(weight);
            table.entries.push(WeightedKind {
                kind: entry.kind,
                weight,
                cost: entry.cost,
            });
            table.intervals.push(collector);
        }
        table
    }

    /// Runs the pick-and-place loop against a prepared table.
    ///
    /// Each iteration draws uniformly in `[0, draw_bound)` and places the
    /// selected type. Cost accrues only for successful placements. An empty
    /// table places nothing.
    pub fn pick_and_place(
        &self,
        table: &WeightTable,
        level: Level,
        rng: &mut dyn RngCore,
        placement: &mut dyn EnemyPlacement,
    ) -> PlacementReport {
        let mut report = PlacementReport::default();
        if table.is_empty() {
            return report;
        }

        for _ in 0..iteration_count(level) {
            let draw = rng.gen_range(0..table.draw_bound());
            let Some(index) = table.select(draw) else {
                continue;
            };
            let chosen = table.entries[index];
            if placement.place(chosen.kind, rng) {
                report.placed.push(chosen.kind);
                report.difficulty_cost += chosen.cost;
            } else {
                report.unplaced += 1;
            }
        }
        report
    }

    /// Unlocks, reweights and populates `level` in one step.
    pub fn populate(
        &mut self,
        level: Level,
        rng: &mut dyn RngCore,
        placement: &mut dyn EnemyPlacement,
    ) -> PlacementReport {
        let added = self.unlock(level);
        let table = self.reweight(level);
        debug!(
            level = level.get(),
            added,
            unlocked = self.unlocked.len(),
            total_weight = table.total_weight(),
            "selection table rebuilt"
        );
        self.pick_and_place(&table, level, rng, placement)
    }
}
