use std::collections::VecDeque;

use blind_jump_core::{TileCoord, TileGrid, TileKind, Tileset};
use glam::Vec2;
use rand::{Rng, RngCore};

use crate::{
    intro::{INTRO_SPAWN, INTRO_TELEPORTER, INTRO_TELEPORTER_TILE, INTRO_WALLS},
    tile_centre, world_to_tile, WallSet,
};

/// Cells within this Chebyshev distance of the spawn are never handed out.
pub const SPAWN_CLEARANCE: u32 = 2;

/// Cells within this Chebyshev distance of the teleporter are never handed out.
pub const TELEPORTER_CLEARANCE: u32 = 1;

/// Unordered pool of free floor cells.
///
/// Only membership is meaningful. [`EmptyLocationPool::pick`] removes a
/// random member by swapping it with the last element, so the order of the
/// remaining cells changes after every pick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmptyLocationPool {
    cells: Vec<TileCoord>,
}

impl EmptyLocationPool {
    /// Creates a pool holding the provided cells.
    #[must_use]
    pub fn new(cells: Vec<TileCoord>) -> Self {
        Self { cells }
    }

    /// Removes and returns a uniformly chosen cell, or `None` when empty.
    pub fn pick(&mut self, rng: &mut dyn RngCore) -> Option<TileCoord> {
        if self.cells.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.cells.len());
        Some(self.cells.swap_remove(index))
    }

    /// Reports whether the cell is still free.
    #[must_use]
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.cells.contains(&coord)
    }

    /// Number of free cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no cell is free.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over the free cells in no meaningful order.
    pub fn iter(&self) -> impl Iterator<Item = &TileCoord> + '_ {
        self.cells.iter()
    }

    fn clear(&mut self) {
        self.cells.clear();
    }
}

/// Tile layout of the active level and everything derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    tileset: Tileset,
    grid: TileGrid,
    spawn: TileCoord,
    walls: WallSet,
    empty: EmptyLocationPool,
    teleporter: Option<TileCoord>,
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TileMap {
    /// Creates a cleared map with no walls and no teleporter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tileset: Tileset::Intro,
            grid: TileGrid::empty(),
            spawn: TileCoord::new(0, 0),
            walls: WallSet::default(),
            empty: EmptyLocationPool::default(),
            teleporter: None,
        }
    }

    /// Builds the hand-authored intro map.
    #[must_use]
    pub fn intro() -> Self {
        let mut map = Self::new();
        map.rebuild(Tileset::Intro);
        map
    }

    /// Builds a map from a generated grid.
    #[must_use]
    pub fn generated(grid: TileGrid, spawn: TileCoord, tileset: Tileset) -> Self {
        let mut map = Self::new();
        map.grid = grid;
        map.spawn = spawn;
        map.rebuild(tileset);
        map
    }

    /// Derives walls, the empty-location pool and the teleporter.
    ///
    /// The intro ignores the grid and installs its authored walls. Generated
    /// tilesets place the teleporter on the floor cell farthest from the
    /// spawn by walking distance.
    pub fn rebuild(&mut self, tileset: Tileset) {
        self.tileset = tileset;
        if !tileset.is_generated() {
            self.grid = TileGrid::empty();
            self.walls = WallSet::from_corners(&INTRO_WALLS);
            self.empty.clear();
            self.teleporter = Some(INTRO_TELEPORTER_TILE);
            self.spawn = world_to_tile(INTRO_SPAWN);
            return;
        }

        self.walls = WallSet::from_tiles(self.grid.cells_of(TileKind::Wall));
        self.teleporter = farthest_floor(&self.grid, self.spawn);
        let spawn = self.spawn;
        let teleporter = self.teleporter;
        let free = self
            .grid
            .cells_of(TileKind::Floor)
            .filter(|cell| cell.chebyshev_distance(spawn) > SPAWN_CLEARANCE)
            .filter(|cell| {
                teleporter.map_or(true, |tele| cell.chebyshev_distance(tele) > TELEPORTER_CLEARANCE)
            })
            .collect();
        self.empty = EmptyLocationPool::new(free);
    }

    /// Removes the layout, walls and teleporter.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Tileset the map was built with.
    #[must_use]
    pub fn tileset(&self) -> Tileset {
        self.tileset
    }

    /// Generated cells. Empty for the intro.
    #[must_use]
    pub fn map_array(&self) -> &TileGrid {
        &self.grid
    }

    /// Free floor cells available for placement.
    #[must_use]
    pub fn empty_locations(&self) -> &EmptyLocationPool {
        &self.empty
    }

    /// Mutable access to the free floor cells.
    pub fn empty_locations_mut(&mut self) -> &mut EmptyLocationPool {
        &mut self.empty
    }

    /// Tile holding the teleporter.
    ///
    /// The intro reports its authored tile, on the intro's own grid.
    #[must_use]
    pub fn teleporter_location(&self) -> Option<TileCoord> {
        self.teleporter
    }

    /// World position that triggers the teleport.
    #[must_use]
    pub fn teleporter_anchor(&self) -> Option<Vec2> {
        match self.tileset {
            Tileset::Intro => self.teleporter.map(|_| INTRO_TELEPORTER),
            Tileset::Regular | Tileset::Nova => self.teleporter.map(tile_centre),
        }
    }

    /// Spawn tile.
    #[must_use]
    pub fn spawn(&self) -> TileCoord {
        self.spawn
    }

    /// World position the player starts from.
    #[must_use]
    pub fn spawn_position(&self) -> Vec2 {
        match self.tileset {
            Tileset::Intro => INTRO_SPAWN,
            Tileset::Regular | Tileset::Nova => tile_centre(self.spawn),
        }
    }

    /// Collision boxes of every wall.
    #[must_use]
    pub fn walls(&self) -> &WallSet {
        &self.walls
    }
}

/// Floor cell with the longest 4-connected walk from `origin`.
///
/// Ties resolve to the cell discovered first.
fn farthest_floor(grid: &TileGrid, origin: TileCoord) -> Option<TileCoord> {
    if !grid.is_floor(origin) {
        return None;
    }
    let mut visited = TileGrid::new(grid.width(), grid.height());
    let mut queue = VecDeque::from([(origin, 0u32)]);
    visited.set(origin, TileKind::Floor);
    let mut farthest = (origin, 0);

    while let Some((cell, distance)) = queue.pop_front() {
        if distance > farthest.1 {
            farthest = (cell, distance);
        }
        for (dx, dy) in [(0, -1), (-1, 0), (1, 0), (0, 1)] {
            let next = TileCoord::new(cell.x() + dx, cell.y() + dy);
            if grid.is_floor(next) && !visited.is_floor(next) {
                visited.set(next, TileKind::Floor);
                queue.push_back((next, distance + 1));
            }
        }
    }
    Some(farthest.0)
}
