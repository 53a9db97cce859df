use std::time::Duration;

use blind_jump_core::{Event, Level, LevelSummary, TransitionState};
use blind_jump_rendering::{
    heading,
    post::{PostPass, PostProcessor, UiEffects},
    InputController,
};
use blind_jump_system_transition::{TransitionEffect, TransitionInput, TransitionMachine};
use blind_jump_world::{apply, query, Command, EffectKind, World};
use tracing::info;

use crate::{BuiltLevel, SceneConfig};

/// Time the menu blur takes to reach full strength.
const MENU_FADE: Duration = Duration::from_millis(300);

/// Desaturation applied per unit of menu blur.
const MENU_DESATURATION: f32 = 0.6;

/// World state guarded by the overworld lock.
#[derive(Clone, Debug)]
pub(crate) struct Overworld {
    pub(crate) world: World,
    pub(crate) level: Level,
    pub(crate) summary: LevelSummary,
    pub(crate) vignette_alpha: u8,
    pub(crate) focused: bool,
    pending: Vec<Event>,
}

impl Overworld {
    /// Installs the first level. Its entry event is reported by the next step.
    pub(crate) fn new(built: BuiltLevel) -> Self {
        let mut overworld = Self {
            world: World::new(),
            level: built.summary.level,
            summary: built.summary.clone(),
            vignette_alpha: u8::MAX,
            focused: true,
            pending: Vec::new(),
        };
        let mut events = Vec::new();
        overworld.install(built, &mut events);
        overworld.pending = events;
        overworld
    }

    /// Publishes a finished level and restores the default visual state.
    pub(crate) fn install(&mut self, built: BuiltLevel, out_events: &mut Vec<Event>) {
        let BuiltLevel { layout, summary } = built;
        apply(
            &mut self.world,
            Command::InstallLevel {
                layout: Box::new(layout),
            },
            out_events,
        );
        self.level = summary.level;
        self.vignette_alpha = u8::MAX;
        info!(
            level = summary.level.get(),
            tileset = ?summary.tileset,
            layout = ?summary.layout,
            attempts = summary.attempts,
            open_cells = summary.open_cells,
            enemies = summary.enemies,
            difficulty_cost = summary.difficulty_cost,
            "level entered"
        );
        out_events.push(Event::LevelEntered {
            summary: summary.clone(),
        });
        self.summary = summary;
    }

    /// Hides and freezes the player until the boot fade-in completes.
    pub(crate) fn suspend_player(&mut self, out_events: &mut Vec<Event>) {
        let spawn = query::map(&self.world).spawn_position();
        apply(&mut self.world, Command::SetPlayerVisible { visible: false }, out_events);
        apply(&mut self.world, Command::DeactivatePlayer { snap_to: spawn }, out_events);
    }
}

/// Menu and post-processing state guarded by the UI lock.
#[derive(Clone, Debug, Default)]
pub(crate) struct UiState {
    pub(crate) effects: UiEffects,
    post: PostProcessor,
    pub(crate) passes: Vec<PostPass>,
}

impl UiState {
    fn update(&mut self, dt: Duration, escape_pressed: bool) {
        if escape_pressed {
            self.effects.menu_open = !self.effects.menu_open;
        }
        let rate = dt.as_secs_f32() / MENU_FADE.as_secs_f32();
        self.effects.blur = if self.effects.menu_open {
            (self.effects.blur + rate).min(1.0)
        } else {
            (self.effects.blur - rate).max(0.0)
        };
        self.effects.desaturate = self.effects.blur * MENU_DESATURATION;
        self.passes = self.post.plan(&self.effects, escape_pressed);
    }
}

/// Runs one logical frame against the three pieces of shared state.
///
/// Returns the level to build when the transition requested a regeneration.
/// The caller builds it and publishes it with [`Overworld::install`].
pub(crate) fn step(
    config: &SceneConfig,
    overworld: &mut Overworld,
    ui: &mut UiState,
    transition: &mut TransitionMachine,
    dt: Duration,
    input: &dyn InputController,
    out_events: &mut Vec<Event>,
) -> Option<Level> {
    out_events.append(&mut overworld.pending);
    overworld.focused = input.is_focused();
    if !overworld.focused {
        return None;
    }

    ui.update(dt, input.escape_pressed());
    let world = &mut overworld.world;
    if transition.player_interactive() && !ui.effects.menu_open {
        apply(
            world,
            Command::Simulate {
                dt,
                heading: heading(input),
                speed: config.player_speed,
            },
            out_events,
        );
    }
    apply(world, Command::Animate { dt }, out_events);

    let before = transition.state();
    let transition_input = TransitionInput {
        player_position: query::player(world).position(),
        teleporter_anchor: query::teleporter_anchor(world),
        on_intro_level: overworld.level.is_intro(),
    };
    for effect in transition.update(dt, &transition_input) {
        apply_effect(world, effect, out_events);
    }
    let after = transition.state();
    if before != after {
        out_events.push(Event::TransitionChanged {
            from: before,
            to: after,
        });
    }

    if is_exit_beam(after) {
        let glow = transition.visual(config.viewport.size()).glow_brightness;
        overworld.vignette_alpha = overworld.vignette_alpha.min(u8::MAX - glow / 2);
    }

    transition
        .take_regeneration_request()
        .then(|| overworld.level.next())
}

fn is_exit_beam(state: TransitionState) -> bool {
    matches!(
        state,
        TransitionState::ExitBeamEnter
            | TransitionState::ExitBeamInflate
            | TransitionState::ExitBeamDeflate
    )
}

fn apply_effect(world: &mut World, effect: TransitionEffect, out_events: &mut Vec<Event>) {
    match effect {
        TransitionEffect::PlayerDeactivated { snap_to } => {
            apply(world, Command::DeactivatePlayer { snap_to }, out_events);
            apply(
                world,
                Command::SpawnEffect {
                    kind: EffectKind::TeleportSmoke,
                    position: snap_to,
                },
                out_events,
            );
        }
        TransitionEffect::PlayerHidden => {
            apply(world, Command::SetPlayerVisible { visible: false }, out_events);
        }
        TransitionEffect::RegenerateLevel => {}
        TransitionEffect::PlayerRevealed => {
            apply(world, Command::SetPlayerVisible { visible: true }, out_events);
        }
        TransitionEffect::ScreenShake { intensity } => {
            let position = query::player(world).position();
            apply(world, Command::ShakeCamera { intensity }, out_events);
            apply(
                world,
                Command::SpawnEffect {
                    kind: EffectKind::LandingDust,
                    position,
                },
                out_events,
            );
        }
        TransitionEffect::PlayerActivated => apply(world, Command::ActivatePlayer, out_events),
    }
}
