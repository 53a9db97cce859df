use std::time::Duration;

use blind_jump_core::{Event, TransitionState};
use blind_jump_rendering::{
    BlendMode, DrawCall, Drawable, InputSnapshot, PreloadedResources, RecordingTarget,
    ResourceHandler, ShaderId, TextureId,
};
use blind_jump_scene::{Scene, SceneConfig, TITLE_TEXT};

const FRAME: Duration = Duration::from_millis(16);

fn booted_scene() -> Scene {
    let mut scene = Scene::new(SceneConfig::default()).expect("default config is valid");
    let mut events = Vec::new();
    for _ in 0..200 {
        scene.update(FRAME, &InputSnapshot::default(), &mut events);
        if scene.transition_state() == TransitionState::None {
            break;
        }
    }
    scene
}

fn draw(scene: &Scene, resources: &PreloadedResources) -> Vec<DrawCall> {
    let mut target = RecordingTarget::new();
    scene.draw(resources, &mut target);
    target.take()
}

fn position_of(calls: &[DrawCall], predicate: impl Fn(&DrawCall) -> bool) -> Option<usize> {
    calls.iter().position(predicate)
}

fn uses_texture(call: &DrawCall, texture: blind_jump_rendering::TextureHandle) -> bool {
    matches!(&call.drawable, Drawable::Sprite { texture: used, .. } if *used == texture)
}

#[test]
fn layers_are_submitted_back_to_front() {
    let resources = PreloadedResources::with_all();
    let scene = booted_scene();
    let calls = draw(&scene, &resources);

    let background = resources.texture(TextureId::IntroTiles);
    let objects = resources.texture(TextureId::GameObjects);
    let glow = resources.texture(TextureId::Glow);
    let vignette = resources.texture(TextureId::Vignette);
    let shadow = resources.texture(TextureId::VignetteShadow);

    assert_eq!(position_of(&calls, |call| uses_texture(call, background)), Some(0));
    let first_object = position_of(&calls, |call| uses_texture(call, objects)).expect("objects");
    let first_glow = position_of(&calls, |call| uses_texture(call, glow)).expect("glows");
    let vignette_at = position_of(&calls, |call| uses_texture(call, vignette)).expect("vignette");
    let shadow_at = position_of(&calls, |call| uses_texture(call, shadow)).expect("shadow");

    assert!(first_object < first_glow);
    assert!(first_glow < vignette_at);
    assert_eq!(shadow_at, vignette_at + 1);
    assert_eq!(calls[first_glow].blend, BlendMode::Add);
    assert_eq!(calls[vignette_at].blend, BlendMode::Multiply);
    assert_eq!(shadow_at, calls.len() - 1, "no overlay once the fade is over");
}

#[test]
fn sprites_are_sorted_by_depth() {
    let resources = PreloadedResources::with_all();
    let scene = booted_scene();
    let objects = resources.texture(TextureId::GameObjects);
    let depths: Vec<f32> = draw(&scene, &resources)
        .iter()
        .filter_map(|call| match &call.drawable {
            Drawable::Sprite {
                texture,
                frame,
                position,
                ..
            } if *texture == objects && *frame != 1 => Some(position.y),
            _ => None,
        })
        .collect();
    assert!(depths.len() >= 6, "pod, teleporter, lamps and the player");
    assert!(depths.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn boot_frame_is_covered_by_the_fade() {
    let resources = PreloadedResources::with_all();
    let mut scene = Scene::new(SceneConfig::default()).expect("default config is valid");
    let mut events = Vec::new();
    scene.update(FRAME, &InputSnapshot::default(), &mut events);

    let calls = draw(&scene, &resources);
    match calls.last().map(|call| &call.drawable) {
        Some(Drawable::Rect { position, size, color }) => {
            assert_eq!(*position, glam::Vec2::ZERO);
            assert_eq!(*size, scene.config().viewport.size());
            assert!(color.alpha > 0.9);
        }
        other => panic!("expected the fade overlay, got {other:?}"),
    }
}

#[test]
fn leaving_the_intro_shows_the_title_and_flashes_the_player() {
    let resources = PreloadedResources::with_all();
    let mut scene = booted_scene();
    let up = InputSnapshot {
        up: true,
        ..InputSnapshot::default()
    };
    let mut events: Vec<Event> = Vec::new();
    let mut flashed = false;
    let mut titled = false;
    for _ in 0..1000 {
        scene.update(FRAME, &up, &mut events);
        let calls = draw(&scene, &resources);
        if scene.transition_state() == TransitionState::ExitBeamEnter {
            flashed |= calls.iter().any(|call| {
                call.shader
                    .map_or(false, |shader| shader.shader == resources.shader(ShaderId::Color))
            });
        }
        titled |= calls.iter().any(|call| {
            matches!(&call.drawable, Drawable::Text { text, .. } if text == TITLE_TEXT)
        });
        if scene.transition_state() == TransitionState::TransitionIn {
            break;
        }
    }
    assert!(flashed, "player never drawn with the colour shader");
    assert!(titled, "title card never drawn");
}

#[test]
fn unfocused_scene_draws_nothing() {
    let resources = PreloadedResources::with_all();
    let mut scene = booted_scene();
    let mut events = Vec::new();
    scene.update(
        FRAME,
        &InputSnapshot {
            focused: false,
            ..InputSnapshot::default()
        },
        &mut events,
    );
    assert!(draw(&scene, &resources).is_empty());
}

#[test]
fn menu_frames_run_post_processing() {
    let resources = PreloadedResources::with_all();
    let mut scene = booted_scene();
    let mut events = Vec::new();
    scene.update(
        FRAME,
        &InputSnapshot {
            escape: true,
            ..InputSnapshot::default()
        },
        &mut events,
    );
    let calls = draw(&scene, &resources);
    let blur = resources.shader(ShaderId::BlurVertical);
    assert!(calls
        .iter()
        .any(|call| call.shader.map_or(false, |shader| shader.shader == blur)));
}
