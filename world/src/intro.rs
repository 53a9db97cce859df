//! Hand-authored intro level.
//!
//! The intro is a lower room holding the crashed pod, joined by a narrow
//! corridor to an upper room holding the first teleporter. Walls and
//! fixtures are in world units. The teleporter is authored on the intro's
//! own tile grid, whose origin sits at [`INTRO_TILE_ORIGIN`].

use blind_jump_core::{TileCoord, TILE_HEIGHT, TILE_WIDTH};
use glam::Vec2;

/// Top-left corners of every intro wall.
pub const INTRO_WALLS: [(i32, i32); 59] = [
    (-20, 500),
    (-20, 526),
    (-20, 474),
    (-20, 448),
    (-20, 422),
    (-20, 396),
    (-20, 370),
    (-20, 552),
    (-20, 578),
    (196, 500),
    (196, 526),
    (196, 474),
    (196, 448),
    (196, 422),
    (196, 396),
    (196, 370),
    (196, 552),
    (196, 578),
    (12, 604),
    (44, 604),
    (76, 604),
    (108, 604),
    (140, 604),
    (172, 604),
    (12, 370),
    (34, 370),
    (120, 370),
    (152, 370),
    (184, 370),
    (34, 344),
    (120, 344),
    (34, 318),
    (120, 318),
    (34, 292),
    (120, 292),
    (34, 266),
    (120, 266),
    (12, 266),
    (-20, 266),
    (152, 266),
    (-20, 240),
    (172, 240),
    (-20, 214),
    (172, 214),
    (-20, 188),
    (172, 188),
    (-20, 162),
    (172, 162),
    (-20, 136),
    (172, 136),
    (-20, 110),
    (172, 110),
    (-20, 84),
    (172, 84),
    (12, 58),
    (44, 58),
    (76, 58),
    (108, 58),
    (140, 58),
];

/// World position of the top-left corner of intro tile `(0, 0)`.
pub const INTRO_TILE_ORIGIN: Vec2 = Vec2::new(-180.0, 288.0);

/// Tile holding the intro teleporter, in intro tile coordinates.
pub const INTRO_TELEPORTER_TILE: TileCoord = TileCoord::new(8, -7);

/// Trigger point of the intro teleporter, the centre of its tile.
pub const INTRO_TELEPORTER: Vec2 = Vec2::new(92.0, 119.0);

/// Where the player stands when the intro begins, beside the pod.
pub const INTRO_SPAWN: Vec2 = Vec2::new(92.0, 480.0);

/// Resting place of the crashed pod.
pub const INTRO_POD: Vec2 = Vec2::new(96.0, 446.0);

/// Broken wall section at the mouth of the corridor.
pub const INTRO_WALL_PIECE: Vec2 = Vec2::new(0.0, 301.0);

/// Wall-mounted lamps. The last one hangs above the upper room and only
/// shows as light.
pub const INTRO_LAMPS: [Vec2; 4] = [
    Vec2::new(-4.0, 353.0),
    Vec2::new(-4.0, 197.0),
    Vec2::new(188.0, 483.0),
    Vec2::new(156.0, -26.0),
];

/// Centre of an intro tile in world units.
#[must_use]
pub fn intro_tile_centre(tile: TileCoord) -> Vec2 {
    INTRO_TILE_ORIGIN
        + Vec2::new(
            tile.x() as f32 * TILE_WIDTH + TILE_WIDTH * 0.5,
            tile.y() as f32 * TILE_HEIGHT + TILE_HEIGHT * 0.5,
        )
}
