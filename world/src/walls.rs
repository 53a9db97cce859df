//! Axis-aligned collision boxes for level walls.

use blind_jump_core::{TileCoord, TILE_HEIGHT, TILE_WIDTH};
use glam::Vec2;

/// Size of a single wall collision box.
pub const WALL_SIZE: Vec2 = Vec2::new(TILE_WIDTH, TILE_HEIGHT);

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Aabb {
    /// Creates a box from its top-left corner and size.
    #[must_use]
    pub fn from_origin(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Creates a box centred on `centre`.
    #[must_use]
    pub fn centred(centre: Vec2, size: Vec2) -> Self {
        Self::from_origin(centre - size * 0.5, size)
    }

    /// Top-left corner.
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.min
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.max
    }

    /// Reports whether the boxes share interior area. Touching edges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Box moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// Collision boxes of every wall in a level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WallSet {
    boxes: Vec<Aabb>,
}

impl WallSet {
    /// Builds the set from wall tiles.
    #[must_use]
    pub fn from_tiles(tiles: impl IntoIterator<Item = TileCoord>) -> Self {
        Self {
            boxes: tiles
                .into_iter()
                .map(|coord| Aabb::from_origin(crate::tile_position(coord), WALL_SIZE))
                .collect(),
        }
    }

    /// Builds the set from literal top-left corners in world units.
    #[must_use]
    pub fn from_corners(corners: &[(i32, i32)]) -> Self {
        Self {
            boxes: corners
                .iter()
                .map(|(x, y)| Aabb::from_origin(Vec2::new(*x as f32, *y as f32), WALL_SIZE))
                .collect(),
        }
    }

    /// Reports whether any wall overlaps the box.
    #[must_use]
    pub fn blocks(&self, aabb: &Aabb) -> bool {
        self.boxes.iter().any(|wall| wall.overlaps(aabb))
    }

    /// Iterates over every wall box.
    pub fn iter(&self) -> impl Iterator<Item = &Aabb> + '_ {
        self.boxes.iter()
    }

    /// Number of wall boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Reports whether the level has no walls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_do_not_overlap() {
        let left = Aabb::from_origin(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let right = Aabb::from_origin(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!left.overlaps(&right));
        assert!(left.overlaps(&right.translated(Vec2::new(-0.5, 0.0))));
    }

    #[test]
    fn wall_tiles_use_tile_dimensions() {
        let walls = WallSet::from_tiles([TileCoord::new(2, 3)]);
        let wall = walls.iter().next().copied().expect("one wall");
        assert_eq!(wall.min(), Vec2::new(64.0, 78.0));
        assert_eq!(wall.max(), Vec2::new(96.0, 104.0));
    }

    #[test]
    fn blocks_reports_any_overlap() {
        let walls = WallSet::from_corners(&[(0, 0), (100, 100)]);
        assert!(walls.blocks(&Aabb::centred(Vec2::new(110.0, 110.0), Vec2::splat(4.0))));
        assert!(!walls.blocks(&Aabb::centred(Vec2::new(60.0, 60.0), Vec2::splat(4.0))));
    }
}
