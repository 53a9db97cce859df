use std::time::Duration;

use blind_jump_core::{Event, Level, SceneError};
use blind_jump_rendering::{InputController, RenderTarget, ResourceHandler};
use blind_jump_system_enemy_selection::EnemySelector;
use blind_jump_system_transition::TransitionMachine;
use blind_jump_world::World;
use parking_lot::Mutex;
use tracing::debug;

use crate::{
    compose::{compose, FrameSnapshot},
    scene::snapshot_of,
    state::{step, Overworld, UiState},
    LevelBuilder, Scene, SceneConfig,
};

/// Scene shared between a logic thread and a render thread.
///
/// State is split behind three coarse locks, always taken in the order
/// overworld, UI, transition. A logic step holds all three for one critical
/// section, so the render side never observes a half-applied frame. Level
/// generation runs with no lock held and only the finished level is
/// published under the overworld lock.
#[derive(Debug)]
pub struct SharedScene {
    config: SceneConfig,
    builder: LevelBuilder,
    selector: Mutex<EnemySelector>,
    overworld: Mutex<Overworld>,
    ui: Mutex<UiState>,
    transition: Mutex<TransitionMachine>,
}

impl SharedScene {
    /// Validates `config` and enters the intro.
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        Scene::new(config).map(Self::from_scene)
    }

    /// Moves a single-threaded scene behind the shared-state locks.
    #[must_use]
    pub fn from_scene(scene: Scene) -> Self {
        let (config, builder, selector, overworld, ui, transition) = scene.into_parts();
        Self {
            config,
            builder,
            selector: Mutex::new(selector),
            overworld: Mutex::new(overworld),
            ui: Mutex::new(ui),
            transition: Mutex::new(transition),
        }
    }

    /// Advances one frame. Called from the logic thread only.
    pub fn update(&self, dt: Duration, input: &dyn InputController, out_events: &mut Vec<Event>) {
        let next = {
            let mut overworld = self.overworld.lock();
            let mut ui = self.ui.lock();
            let mut transition = self.transition.lock();
            step(
                &self.config,
                &mut overworld,
                &mut ui,
                &mut transition,
                dt,
                input,
                out_events,
            )
        };
        if let Some(level) = next {
            self.enter(level, out_events);
        }
    }

    /// Builds and enters the level after the current one.
    pub fn next_level(&self, out_events: &mut Vec<Event>) {
        let current = self.overworld.lock().level;
        self.enter(Level::after(Some(current)), out_events);
    }

    /// Runs `read` against the world under the overworld lock.
    pub fn with_world<R>(&self, read: impl FnOnce(&World) -> R) -> R {
        read(&self.overworld.lock().world)
    }

    /// Consistent copy of the current frame.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        let overworld = self.overworld.lock();
        let ui = self.ui.lock();
        let transition = self.transition.lock();
        snapshot_of(&self.config, &overworld, &ui, &transition)
    }

    /// Draws the current frame from a snapshot. Called from the render thread.
    pub fn draw(&self, resources: &dyn ResourceHandler, target: &mut dyn RenderTarget) {
        let frame = self.snapshot();
        if frame.focused {
            compose(&frame.view(), resources, target);
        }
    }

    /// Configuration the scene runs with.
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    fn enter(&self, level: Level, out_events: &mut Vec<Event>) {
        let built = {
            let mut selector = self.selector.lock();
            self.builder.build(level, &mut selector)
        };
        debug!(level = level.get(), "publishing regenerated level");
        self.overworld.lock().install(built, out_events);
    }
}
