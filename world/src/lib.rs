#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Blind Jump.
//!
//! The world owns the active [`TileMap`], the entities placed on it, the
//! player and the camera shake. Levels are assembled off to the side as a
//! [`LevelLayout`] and installed wholesale, so a partially built level is
//! never observable. All other mutations flow through [`apply`].

mod entities;
pub mod intro;
mod map;
mod walls;

use std::time::Duration;

use blind_jump_core::{EnemyKind, EntityId, Event, TileCoord, TILE_HEIGHT, TILE_WIDTH};
use glam::Vec2;
use rand::RngCore;

pub use entities::{
    enemy_keyframes, Detail, DetailKind, Effect, EffectKind, Enemy, Player, PlayerState,
    ScreenShake, PLAYER_FOOTPRINT, SHAKE_AMPLITUDE, SHAKE_DURATION,
};
pub use map::{EmptyLocationPool, TileMap, SPAWN_CLEARANCE, TELEPORTER_CLEARANCE};
pub use walls::{Aabb, WallSet, WALL_SIZE};

/// World position of a tile's top-left corner.
#[must_use]
pub fn tile_position(coord: TileCoord) -> Vec2 {
    Vec2::new(coord.x() as f32 * TILE_WIDTH, coord.y() as f32 * TILE_HEIGHT)
}

/// World position of a tile's centre.
#[must_use]
pub fn tile_centre(coord: TileCoord) -> Vec2 {
    tile_position(coord) + Vec2::new(TILE_WIDTH, TILE_HEIGHT) * 0.5
}

/// Tile containing a world position.
#[must_use]
pub fn world_to_tile(position: Vec2) -> TileCoord {
    TileCoord::new(
        (position.x / TILE_WIDTH).floor() as i32,
        (position.y / TILE_HEIGHT).floor() as i32,
    )
}

/// Level content assembled before it is installed into the world.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelLayout {
    map: TileMap,
    enemies: Vec<Enemy>,
    details: Vec<Detail>,
    next_entity: u32,
}

impl LevelLayout {
    /// Starts a layout on the provided map.
    #[must_use]
    pub fn new(map: TileMap) -> Self {
        Self {
            map,
            enemies: Vec::new(),
            details: Vec::new(),
            next_entity: 0,
        }
    }

    /// Map the layout is built on.
    #[must_use]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Enemies placed so far.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Fixtures placed so far.
    #[must_use]
    pub fn details(&self) -> &[Detail] {
        &self.details
    }

    /// Takes a random free cell out of the empty-location pool.
    pub fn take_empty_location(&mut self, rng: &mut dyn RngCore) -> Option<TileCoord> {
        self.map.empty_locations_mut().pick(rng)
    }

    /// Places an enemy of `kind` on a random free cell.
    pub fn place_enemy(&mut self, kind: EnemyKind, rng: &mut dyn RngCore) -> Option<EntityId> {
        let tile = self.take_empty_location(rng)?;
        let id = EntityId::new(self.next_entity);
        self.next_entity += 1;
        self.enemies.push(Enemy::new(id, kind, tile));
        Some(id)
    }

    /// Adds a fixture at a world position.
    pub fn add_detail(&mut self, kind: DetailKind, position: Vec2) {
        self.details.push(Detail { kind, position });
    }
}

/// Mutations accepted by [`apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the level content and moves the player to the spawn.
    InstallLevel {
        /// Fully assembled level.
        layout: Box<LevelLayout>,
    },
    /// Advances gameplay: player movement and enemy animation.
    Simulate {
        /// Time elapsed since the previous frame.
        dt: Duration,
        /// Direction requested by the input, not necessarily normalised.
        heading: Vec2,
        /// Player speed in world units per second.
        speed: f32,
    },
    /// Advances presentation state that runs during transitions as well.
    Animate {
        /// Time elapsed since the previous frame.
        dt: Duration,
    },
    /// Suspends control and moves the player onto a point.
    DeactivatePlayer {
        /// Position the player snaps to.
        snap_to: Vec2,
    },
    /// Returns control to the player.
    ActivatePlayer,
    /// Shows or hides the player sprite.
    SetPlayerVisible {
        /// Whether the sprite is drawn.
        visible: bool,
    },
    /// Starts a camera shake.
    ShakeCamera {
        /// Intensity of the shake.
        intensity: f32,
    },
    /// Spawns a short-lived effect.
    SpawnEffect {
        /// Kind of effect.
        kind: EffectKind,
        /// World position of the effect.
        position: Vec2,
    },
}

/// Authoritative world state.
#[derive(Clone, Debug, Default)]
pub struct World {
    map: TileMap,
    enemies: Vec<Enemy>,
    details: Vec<Detail>,
    effects: Vec<Effect>,
    player: Player,
    shake: ScreenShake,
    tick_index: u64,
}

impl World {
    /// Creates an empty world with a hidden, deactivated player.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Applies the provided command to the world.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::InstallLevel { layout } => {
            let LevelLayout {
                map,
                enemies,
                details,
                ..
            } = *layout;
            world.player.place(map.spawn_position());
            world.map = map;
            world.enemies = enemies;
            world.details = details;
            world.effects.clear();
        }
        Command::Simulate { dt, heading, speed } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.player.walk(heading, speed, dt, world.map.walls());
            for enemy in &mut world.enemies {
                enemy.animate(dt);
            }
        }
        Command::Animate { dt } => {
            world.shake.update(dt);
            for effect in &mut world.effects {
                effect.elapsed += dt;
            }
            world.effects.retain(|effect| !effect.expired());
        }
        Command::DeactivatePlayer { snap_to } => {
            world.player.place(snap_to);
            world.player.set_state(PlayerState::Deactivated);
        }
        Command::ActivatePlayer => world.player.set_state(PlayerState::Nominal),
        Command::SetPlayerVisible { visible } => world.player.set_visible(visible),
        Command::ShakeCamera { intensity } => {
            world.shake.start(intensity);
            out_events.push(Event::ScreenShake { intensity });
        }
        Command::SpawnEffect { kind, position } => world.effects.push(Effect {
            kind,
            position,
            elapsed: Duration::ZERO,
        }),
    }
}

/// Read-only views over the world.
pub mod query {
    use glam::Vec2;

    use super::{Detail, Effect, Enemy, Player, TileMap, World};

    /// Active tile map.
    #[must_use]
    pub fn map(world: &World) -> &TileMap {
        &world.map
    }

    /// Enemies in the active level.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// Fixtures in the active level.
    #[must_use]
    pub fn details(world: &World) -> &[Detail] {
        &world.details
    }

    /// Running effects.
    #[must_use]
    pub fn effects(world: &World) -> &[Effect] {
        &world.effects
    }

    /// The player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Teleporter trigger point of the active level.
    #[must_use]
    pub fn teleporter_anchor(world: &World) -> Option<Vec2> {
        world.map.teleporter_anchor()
    }

    /// World position shown at the top-left corner of a viewport.
    ///
    /// The camera keeps the player centred, displaced by any running shake.
    #[must_use]
    pub fn camera_origin(world: &World, viewport: Vec2) -> Vec2 {
        world.player.position() - viewport * 0.5 + world.shake.offset()
    }

    /// Number of gameplay ticks simulated so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
