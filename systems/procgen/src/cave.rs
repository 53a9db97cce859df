use blind_jump_core::{ConfigurationError, Level, TileCoord, TileGrid, TileKind};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{Layout, LayoutGenerator};

const NEIGHBOURS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const NEIGHBOURS_4: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Tuning knobs for the cave generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorTuning {
    /// Number of columns in the generated grid.
    pub width: u32,
    /// Number of rows in the generated grid.
    pub height: u32,
    /// Random-walk steps taken on level one.
    pub base_walk_steps: u32,
    /// Extra random-walk steps added per level.
    pub walk_steps_per_level: u32,
    /// Upper bound on random-walk steps.
    pub max_walk_steps: u32,
    /// Probability that a walk step also carves a 3x3 chamber.
    pub chamber_chance: f64,
    /// Number of cellular smoothing passes applied after the walk.
    pub smoothing_passes: u32,
}

impl Default for GeneratorTuning {
    fn default() -> Self {
        Self {
            width: 61,
            height: 61,
            base_walk_steps: 700,
            walk_steps_per_level: 25,
            max_walk_steps: 1_600,
            chamber_chance: 0.025,
            smoothing_passes: 2,
        }
    }
}

impl GeneratorTuning {
    /// Checks that the tuning describes a usable grid.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.width < 8 || self.height < 8 {
            return Err(ConfigurationError::new(
                "generator.width",
                "grid must be at least 8x8",
            ));
        }
        if self.max_walk_steps < self.base_walk_steps {
            return Err(ConfigurationError::new(
                "generator.max_walk_steps",
                "must not be smaller than base_walk_steps",
            ));
        }
        if !(0.0..=1.0).contains(&self.chamber_chance) {
            return Err(ConfigurationError::new(
                "generator.chamber_chance",
                "must be a probability",
            ));
        }
        Ok(())
    }

    /// Random-walk length used for the level.
    #[must_use]
    pub fn walk_steps(&self, level: Level) -> u32 {
        self.walk_steps_per_level
            .saturating_mul(level.get())
            .saturating_add(self.base_walk_steps)
            .min(self.max_walk_steps)
    }

    fn centre(&self) -> TileCoord {
        TileCoord::new((self.width / 2) as i32, (self.height / 2) as i32)
    }
}

/// Random-walk cave generator smoothed by a cellular pass.
#[derive(Clone, Debug, Default)]
pub struct CaveGenerator {
    tuning: GeneratorTuning,
}

impl CaveGenerator {
    /// Creates a generator with the provided tuning.
    #[must_use]
    pub fn new(tuning: GeneratorTuning) -> Self {
        Self { tuning }
    }

    /// Tuning applied by the generator.
    #[must_use]
    pub fn tuning(&self) -> &GeneratorTuning {
        &self.tuning
    }

    fn carve_walk(&self, grid: &mut TileGrid, level: Level, rng: &mut dyn RngCore) {
        let margin = 2;
        let max_x = self.tuning.width as i32 - 1 - margin;
        let max_y = self.tuning.height as i32 - 1 - margin;
        let mut cursor = self.tuning.centre();
        grid.set(cursor, TileKind::Floor);

        for _ in 0..self.tuning.walk_steps(level) {
            let (dx, dy) = NEIGHBOURS_4[rng.gen_range(0..NEIGHBOURS_4.len())];
            cursor = TileCoord::new(
                (cursor.x() + dx).clamp(margin, max_x),
                (cursor.y() + dy).clamp(margin, max_y),
            );
            grid.set(cursor, TileKind::Floor);

            if rng.gen_bool(self.tuning.chamber_chance) {
                for (ox, oy) in NEIGHBOURS_8 {
                    let cell = TileCoord::new(
                        (cursor.x() + ox).clamp(margin, max_x),
                        (cursor.y() + oy).clamp(margin, max_y),
                    );
                    grid.set(cell, TileKind::Floor);
                }
            }
        }
    }

    fn smooth(&self, grid: &TileGrid) -> TileGrid {
        let mut next = grid.clone();
        for (coord, kind) in grid.iter() {
            if is_border(grid, coord) {
                continue;
            }
            let floors = floor_neighbours(grid, coord);
            match kind {
                TileKind::Floor if floors <= 1 => next.set(coord, TileKind::Void),
                TileKind::Void if floors >= 5 => next.set(coord, TileKind::Floor),
                _ => {}
            }
        }
        next
    }
}

impl LayoutGenerator for CaveGenerator {
    fn generate(&self, level: Level, rng: &mut dyn RngCore) -> Layout {
        let mut grid = TileGrid::new(self.tuning.width, self.tuning.height);
        self.carve_walk(&mut grid, level, rng);
        for _ in 0..self.tuning.smoothing_passes {
            grid = self.smooth(&grid);
        }

        let spawn = self.tuning.centre();
        grid.set(spawn, TileKind::Floor);
        retain_connected(&mut grid, spawn);
        outline_walls(&mut grid);

        Layout { grid, spawn }
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.tuning.width, self.tuning.height)
    }
}

/// Rectangular room used when no generated layout could be accepted.
///
/// The room is centred in the grid and sized to offer at least
/// `min_open_cells` walkable cells where the grid allows it.
#[must_use]
pub fn canned_layout(width: u32, height: u32, min_open_cells: usize) -> Layout {
    let mut grid = TileGrid::new(width, height);
    let max_side_x = width.saturating_sub(2).max(1);
    let max_side_y = height.saturating_sub(2).max(1);
    let mut side = 1;
    while side * side < min_open_cells as u32 && (side < max_side_x || side < max_side_y) {
        side += 1;
    }
    let room_width = side.min(max_side_x);
    let room_height = side.min(max_side_y);
    let left = ((width - room_width) / 2) as i32;
    let top = ((height - room_height) / 2) as i32;

    for y in top..top + room_height as i32 {
        for x in left..left + room_width as i32 {
            grid.set(TileCoord::new(x, y), TileKind::Floor);
        }
    }
    outline_walls(&mut grid);

    let spawn = TileCoord::new((width / 2) as i32, (height / 2) as i32);
    Layout { grid, spawn }
}

fn is_border(grid: &TileGrid, coord: TileCoord) -> bool {
    coord.x() == 0
        || coord.y() == 0
        || coord.x() == grid.width() as i32 - 1
        || coord.y() == grid.height() as i32 - 1
}

fn floor_neighbours(grid: &TileGrid, coord: TileCoord) -> usize {
    NEIGHBOURS_8
        .iter()
        .filter(|(dx, dy)| grid.is_floor(TileCoord::new(coord.x() + dx, coord.y() + dy)))
        .count()
}

/// Removes every floor cell not 4-connected to `origin`.
fn retain_connected(grid: &mut TileGrid, origin: TileCoord) {
    let mut reached = TileGrid::new(grid.width(), grid.height());
    let mut frontier = vec![origin];
    reached.set(origin, TileKind::Floor);

    while let Some(cell) = frontier.pop() {
        for (dx, dy) in NEIGHBOURS_4 {
            let next = TileCoord::new(cell.x() + dx, cell.y() + dy);
            if grid.is_floor(next) && !reached.is_floor(next) {
                reached.set(next, TileKind::Floor);
                frontier.push(next);
            }
        }
    }

    *grid = reached;
}

/// Marks every non-floor cell touching floor as wall.
fn outline_walls(grid: &mut TileGrid) {
    let walls: Vec<TileCoord> = grid
        .iter()
        .filter(|(coord, kind)| *kind != TileKind::Floor && floor_neighbours(grid, *coord) > 0)
        .map(|(coord, _)| coord)
        .collect();
    for coord in walls {
        grid.set(coord, TileKind::Wall);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn walk_length_grows_with_level_and_caps() {
        let tuning = GeneratorTuning::default();
        assert_eq!(tuning.walk_steps(Level::new(1)), 725);
        assert!(tuning.walk_steps(Level::new(10)) > tuning.walk_steps(Level::new(2)));
        assert_eq!(tuning.walk_steps(Level::new(10_000)), tuning.max_walk_steps);
    }

    #[test]
    fn generated_floor_is_connected_and_walled() {
        let generator = CaveGenerator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let layout = generator.generate(Level::new(3), &mut rng);

        assert!(layout.grid.is_floor(layout.spawn));
        let mut copy = layout.grid.clone();
        retain_connected(&mut copy, layout.spawn);
        assert_eq!(copy.open_cell_count(), layout.open_cells());

        for (coord, kind) in layout.grid.iter() {
            if kind == TileKind::Floor {
                assert!(!is_border(&layout.grid, coord), "floor on border at {coord:?}");
                for (dx, dy) in NEIGHBOURS_8 {
                    let neighbour = TileCoord::new(coord.x() + dx, coord.y() + dy);
                    assert_ne!(layout.grid.get(neighbour), Some(TileKind::Void));
                }
            }
        }
    }

    #[test]
    fn canned_layout_meets_requested_open_cells() {
        let layout = canned_layout(61, 61, 150);
        assert!(layout.open_cells() >= 150);
        assert!(layout.grid.is_floor(layout.spawn));
    }

    #[test]
    fn canned_layout_fits_small_grids() {
        let layout = canned_layout(8, 8, 500);
        assert_eq!(layout.open_cells(), 36);
    }

    #[test]
    fn tuning_rejects_tiny_grids() {
        let tuning = GeneratorTuning {
            width: 4,
            ..GeneratorTuning::default()
        };
        assert_eq!(
            tuning.validate().map_err(|error| error.field().to_owned()),
            Err("generator.width".to_owned())
        );
    }
}
