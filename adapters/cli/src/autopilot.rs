//! Scripted input that walks the player to each teleporter.

use std::collections::{HashMap, VecDeque};

use blind_jump_core::{TileCoord, TileGrid};
use blind_jump_rendering::InputSnapshot;
use blind_jump_scene::InputSource;
use blind_jump_world::{query, tile_centre, world_to_tile, PlayerState, World};
use glam::Vec2;
use tracing::debug;

/// Offsets closer than this are treated as reached on each axis.
const DEADZONE: f32 = 1.0;

/// Waypoints closer than this are dropped from the route.
const ARRIVAL: f32 = 3.0;

/// Steers towards the teleporter along a breadth-first route over the floor.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    enabled: bool,
    planned_for: Option<(TileCoord, TileCoord)>,
    route: VecDeque<TileCoord>,
}

impl Autopilot {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    fn waypoint(&mut self, world: &World, position: Vec2, anchor: Vec2) -> Vec2 {
        let map = query::map(world);
        if !map.tileset().is_generated() {
            return anchor;
        }
        let Some(goal) = map.teleporter_location() else {
            return anchor;
        };

        let key = (map.spawn(), goal);
        if self.planned_for != Some(key) {
            self.route = plan_route(map.map_array(), world_to_tile(position), goal);
            self.planned_for = Some(key);
            debug!(steps = self.route.len(), "autopilot route planned");
        }
        while let Some(next) = self.route.front() {
            let offset = (tile_centre(*next) - position).abs();
            if offset.max_element() > ARRIVAL {
                break;
            }
            let _ = self.route.pop_front();
        }
        self.route.front().map_or(anchor, |next| tile_centre(*next))
    }
}

impl InputSource for Autopilot {
    fn sample(&mut self, _frame: u64, world: &World) -> InputSnapshot {
        let idle = InputSnapshot::default();
        if !self.enabled {
            return idle;
        }
        let player = query::player(world);
        if player.state() != PlayerState::Nominal {
            return idle;
        }
        let Some(anchor) = query::teleporter_anchor(world) else {
            return idle;
        };

        let position = player.position();
        let target = self.waypoint(world, position, anchor);
        steer(position, target)
    }
}

fn steer(from: Vec2, to: Vec2) -> InputSnapshot {
    let delta = to - from;
    InputSnapshot {
        left: delta.x < -DEADZONE,
        right: delta.x > DEADZONE,
        up: delta.y < -DEADZONE,
        down: delta.y > DEADZONE,
        ..InputSnapshot::default()
    }
}

/// Shortest 4-connected floor route from `start` to `goal`, excluding `start`.
///
/// Empty when the goal is unreachable.
fn plan_route(grid: &TileGrid, start: TileCoord, goal: TileCoord) -> VecDeque<TileCoord> {
    let mut came_from = HashMap::new();
    let mut frontier = VecDeque::from([start]);
    let _ = came_from.insert(start, start);

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            break;
        }
        for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
            let next = TileCoord::new(current.x() + dx, current.y() + dy);
            if grid.is_floor(next) && !came_from.contains_key(&next) {
                let _ = came_from.insert(next, current);
                frontier.push_back(next);
            }
        }
    }

    let mut route = VecDeque::new();
    if !came_from.contains_key(&goal) {
        return route;
    }
    let mut cursor = goal;
    while cursor != start {
        route.push_front(cursor);
        cursor = came_from[&cursor];
    }
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use blind_jump_core::TileKind;

    fn corridor() -> TileGrid {
        let mut grid = TileGrid::new(5, 4);
        for x in 0..5 {
            grid.set(TileCoord::new(x, 1), TileKind::Floor);
        }
        grid.set(TileCoord::new(4, 2), TileKind::Floor);
        grid.set(TileCoord::new(4, 3), TileKind::Floor);
        grid
    }

    #[test]
    fn route_follows_the_floor() {
        let route = plan_route(&corridor(), TileCoord::new(0, 1), TileCoord::new(4, 3));
        let expected: Vec<TileCoord> = [(1, 1), (2, 1), (3, 1), (4, 1), (4, 2), (4, 3)]
            .into_iter()
            .map(|(x, y)| TileCoord::new(x, y))
            .collect();
        assert_eq!(Vec::from(route), expected);
    }

    #[test]
    fn unreachable_goal_yields_no_route() {
        let route = plan_route(&corridor(), TileCoord::new(0, 1), TileCoord::new(0, 3));
        assert!(route.is_empty());
    }

    #[test]
    fn steering_respects_the_deadzone() {
        let input = steer(Vec2::new(10.0, 10.0), Vec2::new(10.5, 4.0));
        assert!(input.up);
        assert!(!input.left && !input.right && !input.down);
    }

    #[test]
    fn disabled_autopilot_stays_idle() {
        let mut autopilot = Autopilot::new(false);
        assert_eq!(autopilot.sample(0, &World::new()), InputSnapshot::default());
    }
}
