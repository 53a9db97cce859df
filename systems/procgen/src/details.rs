//! Decorative fixtures derived from an accepted grid.
//!
//! Both functions are pure: the same grid always yields the same positions,
//! in row-major order.

use blind_jump_core::{TileCoord, TileGrid, TileKind};

/// Minimum Chebyshev spacing between two rocks.
pub const ROCK_SPACING: u32 = 4;

/// Minimum Chebyshev spacing between two wall lights.
pub const LIGHT_SPACING: u32 = 6;

/// Floor cells deep enough inside open ground to hold a rock.
///
/// A cell qualifies when all eight neighbours are floor. Candidates closer
/// than [`ROCK_SPACING`] to an earlier rock are skipped.
#[must_use]
pub fn rock_positions(grid: &TileGrid) -> Vec<TileCoord> {
    spaced(grid, ROCK_SPACING, |coord| {
        grid.is_floor(coord)
            && (-1..=1).all(|dy| {
                (-1..=1).all(|dx| grid.is_floor(TileCoord::new(coord.x() + dx, coord.y() + dy)))
            })
    })
}

/// Wall cells facing floor to the south, suitable for mounted lights.
#[must_use]
pub fn light_positions(grid: &TileGrid) -> Vec<TileCoord> {
    spaced(grid, LIGHT_SPACING, |coord| {
        grid.get(coord) == Some(TileKind::Wall)
            && grid.is_floor(TileCoord::new(coord.x(), coord.y() + 1))
    })
}

fn spaced(
    grid: &TileGrid,
    spacing: u32,
    accept: impl Fn(TileCoord) -> bool,
) -> Vec<TileCoord> {
    let mut chosen: Vec<TileCoord> = Vec::new();
    for (coord, _) in grid.iter() {
        if accept(coord)
            && chosen
                .iter()
                .all(|other| other.chebyshev_distance(coord) >= spacing)
        {
            chosen.push(coord);
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(width: u32, height: u32) -> TileGrid {
        let mut grid = TileGrid::new(width, height);
        for y in 1..height as i32 - 1 {
            for x in 1..width as i32 - 1 {
                grid.set(TileCoord::new(x, y), TileKind::Floor);
            }
        }
        for x in 0..width as i32 {
            grid.set(TileCoord::new(x, 0), TileKind::Wall);
            grid.set(TileCoord::new(x, height as i32 - 1), TileKind::Wall);
        }
        grid
    }

    #[test]
    fn rocks_need_open_surroundings() {
        let grid = room(5, 5);
        assert_eq!(rock_positions(&grid), vec![TileCoord::new(2, 2)]);
    }

    #[test]
    fn rocks_respect_spacing() {
        let grid = room(20, 20);
        let rocks = rock_positions(&grid);
        assert!(rocks.len() > 1);
        for (index, rock) in rocks.iter().enumerate() {
            for other in &rocks[index + 1..] {
                assert!(rock.chebyshev_distance(*other) >= ROCK_SPACING);
            }
        }
    }

    #[test]
    fn lights_hang_on_north_walls() {
        let grid = room(14, 5);
        let lights = light_positions(&grid);
        assert_eq!(lights, vec![TileCoord::new(1, 0), TileCoord::new(7, 0)]);
    }

    #[test]
    fn empty_grid_has_no_details() {
        let grid = TileGrid::new(6, 6);
        assert!(rock_positions(&grid).is_empty());
        assert!(light_positions(&grid).is_empty());
    }
}
