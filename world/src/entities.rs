use std::time::Duration;

use blind_jump_core::{EnemyKind, EntityId, TileCoord};
use glam::Vec2;

use crate::{walls::Aabb, WallSet};

const ENEMY_FRAME_TIME: Duration = Duration::from_millis(90);

/// Length of the animation strip of an enemy archetype.
#[must_use]
pub fn enemy_keyframes(kind: EnemyKind) -> u8 {
    match kind {
        EnemyKind::Turret => 1,
        EnemyKind::Scoot | EnemyKind::Critter => 6,
        EnemyKind::Dasher => 4,
    }
}

/// Enemy occupying a floor cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EntityId,
    kind: EnemyKind,
    tile: TileCoord,
    position: Vec2,
    keyframe: u8,
    frame_timer: Duration,
}

impl Enemy {
    pub(crate) fn new(id: EntityId, kind: EnemyKind, tile: TileCoord) -> Self {
        Self {
            id,
            kind,
            tile,
            position: crate::tile_centre(tile),
            keyframe: 0,
            frame_timer: Duration::ZERO,
        }
    }

    /// Identifier of the enemy.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Archetype of the enemy.
    #[must_use]
    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Cell the enemy was placed on.
    #[must_use]
    pub fn tile(&self) -> TileCoord {
        self.tile
    }

    /// World position of the enemy.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current animation keyframe.
    #[must_use]
    pub fn keyframe(&self) -> u8 {
        self.keyframe
    }

    /// Number of animation keyframes for the archetype.
    #[must_use]
    pub fn keyframe_count(&self) -> u8 {
        enemy_keyframes(self.kind)
    }

    pub(crate) fn animate(&mut self, dt: Duration) {
        self.frame_timer += dt;
        while self.frame_timer >= ENEMY_FRAME_TIME {
            self.frame_timer -= ENEMY_FRAME_TIME;
            self.keyframe = (self.keyframe + 1) % self.keyframe_count();
        }
    }
}

/// Static fixtures placed into a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetailKind {
    /// Level exit.
    Teleporter,
    /// Reward container.
    Chest,
    /// Boulder sitting on open floor.
    Rock,
    /// Wall-mounted light.
    Light,
    /// Free-standing lamp.
    Lamp,
    /// Crashed pod in the intro.
    Pod,
    /// Broken wall section in the intro.
    IntroWall,
}

/// Fixture placed at a world position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detail {
    /// Kind of fixture.
    pub kind: DetailKind,
    /// World position of the fixture.
    pub position: Vec2,
}

/// Short-lived visual effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Smoke puff left behind when the player is beamed out.
    TeleportSmoke,
    /// Dust kicked up when the entry beam lands.
    LandingDust,
}

impl EffectKind {
    /// Time the effect stays alive.
    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        match self {
            Self::TeleportSmoke => Duration::from_millis(600),
            Self::LandingDust => Duration::from_millis(400),
        }
    }
}

/// Running effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effect {
    /// Kind of effect.
    pub kind: EffectKind,
    /// World position of the effect.
    pub position: Vec2,
    /// Time the effect has been alive.
    pub elapsed: Duration,
}

impl Effect {
    /// Fraction of the lifetime consumed, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        let lifetime = self.kind.lifetime().as_secs_f32();
        (self.elapsed.as_secs_f32() / lifetime).min(1.0)
    }

    pub(crate) fn expired(&self) -> bool {
        self.elapsed >= self.kind.lifetime()
    }
}

/// Whether the player accepts input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerState {
    /// Normal control.
    Nominal,
    /// Control suspended while a transition plays.
    Deactivated,
}

/// Size of the player's feet collision box.
pub const PLAYER_FOOTPRINT: Vec2 = Vec2::new(12.0, 8.0);

/// The player character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    position: Vec2,
    state: PlayerState,
    visible: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            state: PlayerState::Deactivated,
            visible: false,
        }
    }
}

impl Player {
    /// World position of the player's feet.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Control state.
    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Reports whether the sprite is drawn.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Feet collision box at the current position.
    #[must_use]
    pub fn footprint(&self) -> Aabb {
        Aabb::centred(self.position, PLAYER_FOOTPRINT)
    }

    pub(crate) fn place(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn set_state(&mut self, state: PlayerState) {
        self.state = state;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Moves along `heading`, resolving each axis against the walls separately.
    pub(crate) fn walk(&mut self, heading: Vec2, speed: f32, dt: Duration, walls: &WallSet) {
        if self.state != PlayerState::Nominal || heading == Vec2::ZERO {
            return;
        }
        let step = heading.normalize_or_zero() * speed * dt.as_secs_f32();
        for axis in [Vec2::new(step.x, 0.0), Vec2::new(0.0, step.y)] {
            if axis == Vec2::ZERO {
                continue;
            }
            let moved = self.footprint().translated(axis);
            if !walls.blocks(&moved) {
                self.position += axis;
            }
        }
    }
}

/// Decaying camera shake.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenShake {
    intensity: f32,
    elapsed: Duration,
}

/// Time a shake takes to settle.
pub const SHAKE_DURATION: Duration = Duration::from_millis(300);

/// Camera displacement, in world units, of a shake with intensity one.
pub const SHAKE_AMPLITUDE: f32 = 24.0;

impl ScreenShake {
    /// Starts a new shake, replacing any running one.
    pub(crate) fn start(&mut self, intensity: f32) {
        self.intensity = intensity;
        self.elapsed = Duration::ZERO;
    }

    pub(crate) fn update(&mut self, dt: Duration) {
        if self.is_active() {
            self.elapsed += dt;
        }
    }

    /// Reports whether the camera is still moving.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.intensity > 0.0 && self.elapsed < SHAKE_DURATION
    }

    /// Current camera displacement.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        if !self.is_active() {
            return Vec2::ZERO;
        }
        let t = self.elapsed.as_secs_f32();
        let remaining = 1.0 - t / SHAKE_DURATION.as_secs_f32();
        let magnitude = self.intensity * SHAKE_AMPLITUDE * remaining;
        Vec2::new((t * 90.0).sin(), (t * 70.0).cos()) * magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal_player_at(position: Vec2) -> Player {
        let mut player = Player::default();
        player.place(position);
        player.set_state(PlayerState::Nominal);
        player
    }

    #[test]
    fn player_slides_along_walls() {
        let walls = WallSet::from_corners(&[(20, -100), (20, -74), (20, -48), (20, -22)]);
        let mut player = nominal_player_at(Vec2::new(10.0, -30.0));
        player.walk(Vec2::new(1.0, 1.0), 100.0, Duration::from_millis(100), &walls);

        assert!((player.position().x - 10.0).abs() < 1e-4, "x blocked by wall");
        assert!(player.position().y > -30.0, "y still free");
    }

    #[test]
    fn deactivated_player_does_not_move() {
        let mut player = nominal_player_at(Vec2::ZERO);
        player.set_state(PlayerState::Deactivated);
        player.walk(Vec2::X, 100.0, Duration::from_secs(1), &WallSet::default());
        assert_eq!(player.position(), Vec2::ZERO);
    }

    #[test]
    fn enemies_cycle_keyframes() {
        let mut enemy = Enemy::new(EntityId::new(1), EnemyKind::Dasher, TileCoord::new(0, 0));
        enemy.animate(Duration::from_millis(90 * 5));
        assert_eq!(enemy.keyframe(), 1);

        let mut turret = Enemy::new(EntityId::new(2), EnemyKind::Turret, TileCoord::new(0, 0));
        turret.animate(Duration::from_secs(3));
        assert_eq!(turret.keyframe(), 0);
    }

    #[test]
    fn shake_settles() {
        let mut shake = ScreenShake::default();
        assert_eq!(shake.offset(), Vec2::ZERO);
        shake.start(0.19);
        assert!(shake.is_active());
        shake.update(SHAKE_DURATION);
        assert!(!shake.is_active());
        assert_eq!(shake.offset(), Vec2::ZERO);
    }
}
