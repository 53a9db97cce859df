use std::cell::Cell;

use blind_jump_core::{LayoutSource, Level, TileCoord, TileGrid, TileKind};
use blind_jump_system_procgen::{CaveGenerator, Layout, LayoutGenerator, RetryPolicy};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generator whose candidates open a scripted number of cells.
struct ScriptedGenerator {
    open_cells: Vec<usize>,
    calls: Cell<usize>,
}

impl ScriptedGenerator {
    fn new(open_cells: Vec<usize>) -> Self {
        Self {
            open_cells,
            calls: Cell::new(0),
        }
    }
}

impl LayoutGenerator for ScriptedGenerator {
    fn generate(&self, _level: Level, _rng: &mut dyn RngCore) -> Layout {
        let call = self.calls.get();
        self.calls.set(call + 1);
        let wanted = self.open_cells[call.min(self.open_cells.len() - 1)];

        let mut grid = TileGrid::new(40, 40);
        for index in 0..wanted {
            let coord = TileCoord::new((index % 38) as i32 + 1, (index / 38) as i32 + 1);
            grid.set(coord, TileKind::Floor);
        }
        Layout {
            grid,
            spawn: TileCoord::new(1, 1),
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        (40, 40)
    }
}

#[test]
fn accepts_first_layout_meeting_threshold() {
    let generator = ScriptedGenerator::new(vec![20, 149, 150, 400]);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let accepted = RetryPolicy::default()
        .generate(&generator, Level::new(1), &mut rng)
        .expect("third candidate qualifies");

    assert_eq!(accepted.attempts, 3);
    assert_eq!(accepted.layout.open_cells(), 150);
    assert_eq!(accepted.source, LayoutSource::Generated);
    assert_eq!(accepted.exhausted, None);
}

#[test]
fn exhaustion_reports_best_attempt() {
    let generator = ScriptedGenerator::new(vec![10, 90, 40]);
    let policy = RetryPolicy {
        max_attempts: 3,
        ..RetryPolicy::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let error = policy
        .generate(&generator, Level::new(4), &mut rng)
        .expect_err("no candidate qualifies");

    assert_eq!(error.level, Level::new(4));
    assert_eq!(error.attempts, 3);
    assert_eq!(error.best_open_cells, 90);
    assert_eq!(error.required, 150);
    assert_eq!(generator.calls.get(), 3);
}

#[test]
fn fallback_relaxes_before_canning() {
    let generator = ScriptedGenerator::new(vec![10, 10, 120]);
    let policy = RetryPolicy {
        max_attempts: 2,
        ..RetryPolicy::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let accepted = policy.generate_or_fallback(&generator, Level::new(2), &mut rng);

    assert_eq!(accepted.source, LayoutSource::Relaxed);
    assert_eq!(accepted.attempts, 3);
    assert_eq!(accepted.layout.open_cells(), 120);
    assert_eq!(accepted.exhausted.map(|error| error.best_open_cells), Some(10));
}

#[test]
fn fallback_ends_with_canned_room() {
    let generator = ScriptedGenerator::new(vec![5]);
    let policy = RetryPolicy {
        max_attempts: 4,
        ..RetryPolicy::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let accepted = policy.generate_or_fallback(&generator, Level::new(9), &mut rng);

    assert_eq!(accepted.source, LayoutSource::Canned);
    assert_eq!(accepted.attempts, 8);
    assert!(accepted.layout.open_cells() >= policy.min_open_cells);
    assert_eq!(generator.calls.get(), 8);
}

#[test]
fn retry_loop_terminates_for_many_seeds() {
    let generator = CaveGenerator::default();
    let policy = RetryPolicy::default();

    for seed in 0..48 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let level = Level::new(1 + (seed % 12) as u32);
        let accepted = policy.generate_or_fallback(&generator, level, &mut rng);
        assert!(accepted.attempts >= 1);
        assert!(accepted.attempts <= policy.max_attempts * 2);
        if accepted.source == LayoutSource::Generated {
            assert!(accepted.layout.open_cells() >= policy.min_open_cells);
        }
    }
}

#[test]
fn seeded_streams_reproduce_layouts() {
    let generator = CaveGenerator::default();
    let policy = RetryPolicy::default();

    let first = policy.generate_or_fallback(
        &generator,
        Level::new(5),
        &mut ChaCha8Rng::seed_from_u64(0xB1D),
    );
    let second = policy.generate_or_fallback(
        &generator,
        Level::new(5),
        &mut ChaCha8Rng::seed_from_u64(0xB1D),
    );

    assert_eq!(first, second);
}
