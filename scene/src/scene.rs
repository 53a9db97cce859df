use std::time::Duration;

use blind_jump_core::{Event, Level, LevelSummary, SceneError, Tileset, TransitionState};
use blind_jump_rendering::{InputController, RenderTarget, ResourceHandler};
use blind_jump_system_enemy_selection::EnemySelector;
use blind_jump_system_transition::TransitionMachine;
use blind_jump_world::World;
use tracing::info;

use crate::{
    compose::{compose, FrameSnapshot, FrameView},
    state::{step, Overworld, UiState},
    LevelBuilder, SceneConfig,
};

/// Single-threaded game scene.
///
/// Owns the world, the transition machine and the enemy selector, and wires
/// them together frame by frame. A freshly created scene shows the intro
/// behind the boot fade-in.
#[derive(Clone, Debug)]
pub struct Scene {
    config: SceneConfig,
    builder: LevelBuilder,
    selector: EnemySelector,
    overworld: Overworld,
    ui: UiState,
    transition: TransitionMachine,
}

impl Scene {
    /// Validates `config` and enters the intro.
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let builder = LevelBuilder::new(&config);
        let mut selector = EnemySelector::new(config.schedule.clone());
        let intro = builder.build(Level::after(None), &mut selector);
        let transition = TransitionMachine::booting(config.transition.clone());
        Ok(Self {
            builder,
            selector,
            overworld: Overworld::new(intro),
            ui: UiState::default(),
            transition,
            config,
        })
    }

    /// Advances one frame.
    ///
    /// Gameplay only runs while no transition is active; the transition
    /// machine always advances. Nothing happens while the window is
    /// unfocused.
    pub fn update(&mut self, dt: Duration, input: &dyn InputController, out_events: &mut Vec<Event>) {
        let next = step(
            &self.config,
            &mut self.overworld,
            &mut self.ui,
            &mut self.transition,
            dt,
            input,
            out_events,
        );
        if let Some(level) = next {
            self.enter(level, out_events);
        }
    }

    /// Builds and enters the level after the current one.
    pub fn next_level(&mut self, out_events: &mut Vec<Event>) {
        let level = Level::after(Some(self.overworld.level));
        self.enter(level, out_events);
    }

    /// Ends the run and starts over from the intro.
    ///
    /// Unlocked enemy types are forgotten and the boot fade-in plays again.
    pub fn restart(&mut self, out_events: &mut Vec<Event>) {
        info!(level = self.overworld.level.get(), "run restarted");
        self.selector.clear();
        self.transition.restart();
        out_events.push(Event::RunRestarted);
        self.enter(Level::after(None), out_events);
        self.overworld.suspend_player(out_events);
    }

    /// Draws the current frame. Skipped while the window is unfocused.
    pub fn draw(&self, resources: &dyn ResourceHandler, target: &mut dyn RenderTarget) {
        if self.overworld.focused {
            compose(&self.view(), resources, target);
        }
    }

    /// Owned copy of the current frame.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        snapshot_of(&self.config, &self.overworld, &self.ui, &self.transition)
    }

    /// Active level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.overworld.level
    }

    /// Tileset of the active level.
    #[must_use]
    pub fn tileset(&self) -> Tileset {
        self.overworld.summary.tileset
    }

    /// Summary of the active level.
    #[must_use]
    pub fn summary(&self) -> &LevelSummary {
        &self.overworld.summary
    }

    /// Current transition state.
    #[must_use]
    pub fn transition_state(&self) -> TransitionState {
        self.transition.state()
    }

    /// World state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.overworld.world
    }

    /// Enemy selector, with the types unlocked so far.
    #[must_use]
    pub fn selector(&self) -> &EnemySelector {
        &self.selector
    }

    /// Configuration the scene runs with.
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub(crate) fn into_parts(
        self,
    ) -> (SceneConfig, LevelBuilder, EnemySelector, Overworld, UiState, TransitionMachine) {
        (
            self.config,
            self.builder,
            self.selector,
            self.overworld,
            self.ui,
            self.transition,
        )
    }

    fn enter(&mut self, level: Level, out_events: &mut Vec<Event>) {
        let built = self.builder.build(level, &mut self.selector);
        self.overworld.install(built, out_events);
    }

    fn view(&self) -> FrameView<'_> {
        FrameView {
            world: &self.overworld.world,
            level: self.overworld.level,
            tileset: self.overworld.summary.tileset,
            vignette_alpha: self.overworld.vignette_alpha,
            transition_state: self.transition.state(),
            transition: self.transition.visual(self.config.viewport.size()),
            post_passes: &self.ui.passes,
            viewport: self.config.viewport.size(),
        }
    }
}

pub(crate) fn snapshot_of(
    config: &SceneConfig,
    overworld: &Overworld,
    ui: &UiState,
    transition: &TransitionMachine,
) -> FrameSnapshot {
    FrameSnapshot {
        world: overworld.world.clone(),
        level: overworld.level,
        tileset: overworld.summary.tileset,
        vignette_alpha: overworld.vignette_alpha,
        transition_state: transition.state(),
        transition: transition.visual(config.viewport.size()),
        post_passes: ui.passes.clone(),
        viewport: config.viewport.size(),
        focused: overworld.focused,
    }
}
