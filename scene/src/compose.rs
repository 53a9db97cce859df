//! Frame composition.
//!
//! Layers are submitted back to front: background tiles, shadows, y-sorted
//! sprites, additive glows, the vignette, post-processing, and finally the
//! transition overlay.

use blind_jump_core::{EnemyKind, Level, TileKind, Tileset, TransitionState, TILE_HEIGHT, TILE_WIDTH};
use blind_jump_rendering::{
    post::{self, PostPass},
    BlendMode, Color, DrawCall, Drawable, FlashColor, FontId, RenderTarget, RenderType,
    ResourceHandler, TextureId,
};
use blind_jump_system_transition::TransitionVisual;
use blind_jump_world::{query, tile_position, DetailKind, EffectKind, Enemy, World};
use glam::Vec2;

/// Text shown on the intro title card.
pub const TITLE_TEXT: &str = "BLIND JUMP";

/// Tint of lamp and light glows.
const GLOW_TINT: Color = Color::from_rgb_u8(185, 185, 185);

/// Opacity of the shadow drawn under the vignette.
const VIGNETTE_SHADOW_ALPHA: u8 = 100;

/// Opacity of entity drop shadows.
const SHADOW_ALPHA: u8 = 90;

/// Drop shadows sit this far below the entity.
const SHADOW_OFFSET: Vec2 = Vec2::new(0.0, 6.0);

/// Frame indices within the game object sheet.
mod frames {
    pub(super) const PLAYER: u16 = 0;
    pub(super) const SHADOW: u16 = 1;
    pub(super) const TELEPORTER: u16 = 10;
    pub(super) const CHEST: u16 = 11;
    pub(super) const ROCK: u16 = 12;
    pub(super) const LIGHT: u16 = 13;
    pub(super) const LAMP: u16 = 14;
    pub(super) const POD: u16 = 15;
    pub(super) const INTRO_WALL: u16 = 16;
    pub(super) const SCOOT: u16 = 20;
    pub(super) const CRITTER: u16 = 26;
    pub(super) const DASHER: u16 = 32;
    pub(super) const TURRET: u16 = 36;
    pub(super) const SMOKE: u16 = 40;
    pub(super) const DUST: u16 = 46;
    pub(super) const FLOOR: u16 = 0;
    pub(super) const WALL: u16 = 1;
}

/// Borrowed view of everything a frame draws.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    /// World to draw.
    pub world: &'a World,
    /// Active level.
    pub level: Level,
    /// Tileset of the active level.
    pub tileset: Tileset,
    /// Vignette opacity.
    pub vignette_alpha: u8,
    /// Transition state the frame was taken in.
    pub transition_state: TransitionState,
    /// Transition overlay.
    pub transition: TransitionVisual,
    /// Post-processing passes planned for the frame.
    pub post_passes: &'a [PostPass],
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

/// Owned copy of a frame, taken under the shared-state locks.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    /// World to draw.
    pub world: World,
    /// Active level.
    pub level: Level,
    /// Tileset of the active level.
    pub tileset: Tileset,
    /// Vignette opacity.
    pub vignette_alpha: u8,
    /// Transition state the frame was taken in.
    pub transition_state: TransitionState,
    /// Transition overlay.
    pub transition: TransitionVisual,
    /// Post-processing passes planned for the frame.
    pub post_passes: Vec<PostPass>,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    /// Whether the window had focus when the snapshot was taken.
    pub focused: bool,
}

impl FrameSnapshot {
    /// Borrows the snapshot for composition.
    #[must_use]
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            world: &self.world,
            level: self.level,
            tileset: self.tileset,
            vignette_alpha: self.vignette_alpha,
            transition_state: self.transition_state,
            transition: self.transition,
            post_passes: &self.post_passes,
            viewport: self.viewport,
        }
    }
}

struct Sprite {
    depth: f32,
    frame: u16,
    position: Vec2,
    render: RenderType,
}

/// Submits every layer of the frame to `target`.
pub fn compose(frame: &FrameView<'_>, resources: &dyn ResourceHandler, target: &mut dyn RenderTarget) {
    let camera = query::camera_origin(frame.world, frame.viewport);
    draw_background(frame, camera, resources, target);

    let sprites = collect_sprites(frame);
    draw_shadows(&sprites, camera, resources, target);
    draw_sprites(&sprites, camera, resources, target);
    draw_glows(frame, camera, resources, target);
    draw_vignette(frame, resources, target);
    post::submit(frame.post_passes, resources, target);
    draw_transition(frame, resources, target);
}

fn draw_background(
    frame: &FrameView<'_>,
    camera: Vec2,
    resources: &dyn ResourceHandler,
    target: &mut dyn RenderTarget,
) {
    if frame.tileset == Tileset::Intro {
        target.draw(DrawCall::plain(Drawable::Sprite {
            texture: resources.texture(TextureId::IntroTiles),
            frame: 0,
            position: -camera,
            color: Color::WHITE,
        }));
        return;
    }

    let texture = resources.texture(TextureId::RegularTiles);
    let tile = Vec2::new(TILE_WIDTH, TILE_HEIGHT);
    for (coord, kind) in query::map(frame.world).map_array().iter() {
        let frame_index = match kind {
            TileKind::Void => continue,
            TileKind::Floor => frames::FLOOR,
            TileKind::Wall => frames::WALL,
        };
        let position = tile_position(coord) - camera;
        let visible = position.x + tile.x > 0.0
            && position.y + tile.y > 0.0
            && position.x < frame.viewport.x
            && position.y < frame.viewport.y;
        if visible {
            target.draw(DrawCall::plain(Drawable::Sprite {
                texture,
                frame: frame_index,
                position,
                color: Color::WHITE,
            }));
        }
    }
}

fn collect_sprites(frame: &FrameView<'_>) -> Vec<Sprite> {
    let world = frame.world;
    let mut sprites = Vec::new();

    for detail in query::details(world) {
        let frame_index = match detail.kind {
            DetailKind::Teleporter => frames::TELEPORTER,
            DetailKind::Chest => frames::CHEST,
            DetailKind::Rock => frames::ROCK,
            DetailKind::Light => frames::LIGHT,
            DetailKind::Lamp => frames::LAMP,
            DetailKind::Pod => frames::POD,
            DetailKind::IntroWall => frames::INTRO_WALL,
        };
        sprites.push(Sprite {
            depth: detail.position.y,
            frame: frame_index,
            position: detail.position,
            render: RenderType::ShadeDefault,
        });
    }

    for enemy in query::enemies(world) {
        sprites.push(Sprite {
            depth: enemy.position().y,
            frame: enemy_frame(enemy),
            position: enemy.position(),
            render: RenderType::ShadeDefault,
        });
    }

    let player = query::player(world);
    if player.visible() {
        let glow = frame.transition.glow_brightness;
        let render = if glow > 0 {
            RenderType::Flash {
                color: FlashColor::Neon,
                amount: f32::from(glow) / 255.0,
            }
        } else {
            RenderType::ShadeDefault
        };
        sprites.push(Sprite {
            depth: player.position().y,
            frame: frames::PLAYER,
            position: player.position(),
            render,
        });
    }

    for effect in query::effects(world) {
        let (base, count) = match effect.kind {
            EffectKind::TeleportSmoke => (frames::SMOKE, 6.0),
            EffectKind::LandingDust => (frames::DUST, 4.0),
        };
        let step = (effect.progress() * (count - 1.0)).round() as u16;
        sprites.push(Sprite {
            depth: effect.position.y,
            frame: base + step,
            position: effect.position,
            render: RenderType::ShadeNone,
        });
    }

    sprites.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    sprites
}

fn enemy_base(kind: EnemyKind) -> u16 {
    match kind {
        EnemyKind::Scoot => frames::SCOOT,
        EnemyKind::Critter => frames::CRITTER,
        EnemyKind::Dasher => frames::DASHER,
        EnemyKind::Turret => frames::TURRET,
    }
}

fn enemy_frame(enemy: &Enemy) -> u16 {
    enemy_base(enemy.kind()) + u16::from(enemy.keyframe())
}

fn casts_shadow(sprite: &Sprite) -> bool {
    !matches!(
        sprite.frame,
        frames::LIGHT | frames::TELEPORTER | frames::INTRO_WALL
    )
        && !matches!(sprite.render, RenderType::ShadeNone)
}

fn draw_shadows(
    sprites: &[Sprite],
    camera: Vec2,
    resources: &dyn ResourceHandler,
    target: &mut dyn RenderTarget,
) {
    let texture = resources.texture(TextureId::GameObjects);
    for sprite in sprites.iter().filter(|sprite| casts_shadow(sprite)) {
        target.draw(DrawCall::plain(Drawable::Sprite {
            texture,
            frame: frames::SHADOW,
            position: sprite.position + SHADOW_OFFSET - camera,
            color: Color::BLACK.with_alpha_u8(SHADOW_ALPHA),
        }));
    }
}

fn draw_sprites(
    sprites: &[Sprite],
    camera: Vec2,
    resources: &dyn ResourceHandler,
    target: &mut dyn RenderTarget,
) {
    let texture = resources.texture(TextureId::GameObjects);
    for sprite in sprites {
        let (color, shader) = sprite.render.shading(resources);
        let call = DrawCall::plain(Drawable::Sprite {
            texture,
            frame: sprite.frame,
            position: sprite.position - camera,
            color,
        });
        target.draw(match shader {
            Some(shader) => call.shaded(shader),
            None => call,
        });
    }
}

fn draw_glows(
    frame: &FrameView<'_>,
    camera: Vec2,
    resources: &dyn ResourceHandler,
    target: &mut dyn RenderTarget,
) {
    let texture = resources.texture(TextureId::Glow);
    let lit = query::details(frame.world).iter().filter(|detail| {
        matches!(
            detail.kind,
            DetailKind::Lamp | DetailKind::Light | DetailKind::Teleporter
        )
    });
    for detail in lit {
        target.draw(
            DrawCall::plain(Drawable::Sprite {
                texture,
                frame: 0,
                position: detail.position - camera,
                color: GLOW_TINT,
            })
            .blended(BlendMode::Add),
        );
    }

    let brightness = frame.transition.glow_brightness;
    if brightness > 0 {
        target.draw(
            DrawCall::plain(Drawable::Sprite {
                texture,
                frame: 0,
                position: frame.viewport * 0.5,
                color: Color::WHITE.with_alpha_u8(brightness),
            })
            .blended(BlendMode::Add),
        );
    }
}

fn draw_vignette(frame: &FrameView<'_>, resources: &dyn ResourceHandler, target: &mut dyn RenderTarget) {
    target.draw(
        DrawCall::plain(Drawable::Sprite {
            texture: resources.texture(TextureId::Vignette),
            frame: 0,
            position: Vec2::ZERO,
            color: Color::WHITE.with_alpha_u8(frame.vignette_alpha),
        })
        .blended(BlendMode::Multiply),
    );
    target.draw(DrawCall::plain(Drawable::Sprite {
        texture: resources.texture(TextureId::VignetteShadow),
        frame: 0,
        position: Vec2::ZERO,
        color: Color::WHITE.with_alpha_u8(VIGNETTE_SHADOW_ALPHA),
    }));
}

fn draw_transition(frame: &FrameView<'_>, resources: &dyn ResourceHandler, target: &mut dyn RenderTarget) {
    let overlay = frame.transition;
    if let Some(beam) = overlay.beam {
        target.draw(DrawCall::plain(Drawable::Rect {
            position: beam.origin,
            size: beam.size,
            color: beam.color.into(),
        }));
    }
    if overlay.fade_alpha > 0 {
        target.draw(DrawCall::plain(Drawable::Rect {
            position: Vec2::ZERO,
            size: frame.viewport,
            color: Color::BLACK.with_alpha_u8(overlay.fade_alpha),
        }));
    }
    if let Some(alpha) = overlay.title_alpha {
        target.draw(DrawCall::plain(Drawable::Text {
            font: resources.font(FontId::Title),
            position: frame.viewport * 0.5,
            text: TITLE_TEXT.to_owned(),
            color: Color::WHITE.with_alpha_u8(alpha),
        }));
    }
}

#[cfg(test)]
mod tests {
    use std::{ops::Range, time::Duration};

    use blind_jump_core::{Event, TileCoord, TileGrid};
    use blind_jump_world::{apply, enemy_keyframes, Command, LevelLayout, TileMap};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    const KINDS: [EnemyKind; 4] = [
        EnemyKind::Scoot,
        EnemyKind::Critter,
        EnemyKind::Dasher,
        EnemyKind::Turret,
    ];

    fn strip(kind: EnemyKind) -> Range<u16> {
        let base = enemy_base(kind);
        base..base + u16::from(enemy_keyframes(kind))
    }

    fn overlaps(a: &Range<u16>, b: &Range<u16>) -> bool {
        a.start < b.end && b.start < a.end
    }

    #[test]
    fn enemy_strips_do_not_overlap() {
        let effects = [frames::SMOKE..frames::SMOKE + 6, frames::DUST..frames::DUST + 4];
        for (index, kind) in KINDS.iter().enumerate() {
            let own = strip(*kind);
            for other in &KINDS[index + 1..] {
                assert!(!overlaps(&own, &strip(*other)), "{kind:?} overlaps {other:?}");
            }
            for effect in &effects {
                assert!(!overlaps(&own, effect), "{kind:?} overlaps an effect strip");
            }
        }
    }

    #[test]
    fn animated_enemies_stay_in_their_strip() {
        let mut grid = TileGrid::new(14, 3);
        for x in 0..14 {
            grid.set(TileCoord::new(x, 1), TileKind::Floor);
        }
        let map = TileMap::generated(grid, TileCoord::new(0, 1), Tileset::Regular);
        let mut layout = LevelLayout::new(map);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for kind in KINDS {
            assert!(layout.place_enemy(kind, &mut rng).is_some());
        }

        let mut world = World::new();
        let mut events: Vec<Event> = Vec::new();
        apply(
            &mut world,
            Command::InstallLevel {
                layout: Box::new(layout),
            },
            &mut events,
        );
        assert_eq!(query::enemies(&world).len(), KINDS.len());

        for _ in 0..13 {
            for enemy in query::enemies(&world) {
                assert!(
                    strip(enemy.kind()).contains(&enemy_frame(enemy)),
                    "{:?} drew frame {}",
                    enemy.kind(),
                    enemy_frame(enemy)
                );
            }
            apply(
                &mut world,
                Command::Simulate {
                    dt: Duration::from_millis(90),
                    heading: Vec2::ZERO,
                    speed: 0.0,
                },
                &mut events,
            );
        }
    }
}
