use std::time::Duration;

use blind_jump_core::TransitionState;
use glam::Vec2;

use crate::tuning::{ms, TransitionTuning};

/// Active transition state together with its own timer.
///
/// The timer restarts from zero on every state change; any time left over
/// when a state completes is discarded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionPhase {
    /// Normal play.
    None,
    /// Exit beam rising.
    ExitBeamEnter {
        /// Time spent in the state.
        elapsed: Duration,
    },
    /// Exit beam widening.
    ExitBeamInflate {
        /// Time spent in the state.
        elapsed: Duration,
    },
    /// Exit beam collapsing.
    ExitBeamDeflate {
        /// Time spent in the state.
        elapsed: Duration,
    },
    /// Fade to black.
    TransitionOut {
        /// Time spent in the state.
        elapsed: Duration,
        /// Whether the intro title is held on screen before fading.
        title_hold: bool,
    },
    /// Fade back in.
    TransitionIn {
        /// Time spent in the state.
        elapsed: Duration,
    },
    /// Entry beam dropping.
    EntryBeamDrop {
        /// Time spent in the state.
        elapsed: Duration,
    },
    /// Entry beam fading.
    EntryBeamFade {
        /// Time spent in the state.
        elapsed: Duration,
    },
}

impl TransitionPhase {
    /// Named state of the phase.
    #[must_use]
    pub const fn state(&self) -> TransitionState {
        match self {
            Self::None => TransitionState::None,
            Self::ExitBeamEnter { .. } => TransitionState::ExitBeamEnter,
            Self::ExitBeamInflate { .. } => TransitionState::ExitBeamInflate,
            Self::ExitBeamDeflate { .. } => TransitionState::ExitBeamDeflate,
            Self::TransitionOut { .. } => TransitionState::TransitionOut,
            Self::TransitionIn { .. } => TransitionState::TransitionIn,
            Self::EntryBeamDrop { .. } => TransitionState::EntryBeamDrop,
            Self::EntryBeamFade { .. } => TransitionState::EntryBeamFade,
        }
    }

    /// Time spent in the current state. Always zero in [`TransitionPhase::None`].
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::ExitBeamEnter { elapsed }
            | Self::ExitBeamInflate { elapsed }
            | Self::ExitBeamDeflate { elapsed }
            | Self::TransitionOut { elapsed, .. }
            | Self::TransitionIn { elapsed }
            | Self::EntryBeamDrop { elapsed }
            | Self::EntryBeamFade { elapsed } => *elapsed,
        }
    }

    /// Phase entered when the game boots: a fade in from black.
    #[must_use]
    pub const fn boot() -> Self {
        Self::TransitionIn {
            elapsed: Duration::ZERO,
        }
    }

    fn with_elapsed(self, elapsed: Duration) -> Self {
        match self {
            Self::None => Self::None,
            Self::ExitBeamEnter { .. } => Self::ExitBeamEnter { elapsed },
            Self::ExitBeamInflate { .. } => Self::ExitBeamInflate { elapsed },
            Self::ExitBeamDeflate { .. } => Self::ExitBeamDeflate { elapsed },
            Self::TransitionOut { title_hold, .. } => Self::TransitionOut {
                elapsed,
                title_hold,
            },
            Self::TransitionIn { .. } => Self::TransitionIn { elapsed },
            Self::EntryBeamDrop { .. } => Self::EntryBeamDrop { elapsed },
            Self::EntryBeamFade { .. } => Self::EntryBeamFade { elapsed },
        }
    }

    /// Advances the phase by `dt`, moving at most one state forward.
    #[must_use]
    pub fn advance(
        self,
        dt: Duration,
        input: &TransitionInput,
        tuning: &TransitionTuning,
    ) -> Step {
        if let Self::None = self {
            return match input.teleporter_anchor {
                Some(anchor) if within_reach(input.player_position, anchor, tuning) => Step {
                    phase: Self::ExitBeamEnter {
                        elapsed: Duration::ZERO,
                    },
                    effects: vec![TransitionEffect::PlayerDeactivated { snap_to: anchor }],
                },
                _ => Step::stay(self),
            };
        }

        let elapsed = self.elapsed() + dt;
        let zero = Duration::ZERO;
        let (phase, effects) = match self {
            Self::None => (Self::None, Vec::new()),
            Self::ExitBeamEnter { .. } if elapsed > ms(tuning.exit_beam_enter_ms) => {
                (Self::ExitBeamInflate { elapsed: zero }, Vec::new())
            }
            Self::ExitBeamInflate { .. } if elapsed > ms(tuning.exit_beam_inflate_ms) => (
                Self::ExitBeamDeflate { elapsed: zero },
                vec![TransitionEffect::PlayerHidden],
            ),
            Self::ExitBeamDeflate { .. } if elapsed >= ms(tuning.exit_beam_deflate_ms) => (
                Self::TransitionOut {
                    elapsed: zero,
                    title_hold: input.on_intro_level,
                },
                Vec::new(),
            ),
            Self::TransitionOut { title_hold, .. } if fade_out_done(elapsed, title_hold, tuning) => (
                Self::TransitionIn { elapsed: zero },
                vec![TransitionEffect::RegenerateLevel],
            ),
            Self::TransitionIn { .. } if elapsed >= ms(tuning.fade_in_ms) => {
                if input.on_intro_level {
                    (
                        Self::None,
                        vec![
                            TransitionEffect::PlayerRevealed,
                            TransitionEffect::PlayerActivated,
                        ],
                    )
                } else {
                    (Self::EntryBeamDrop { elapsed: zero }, Vec::new())
                }
            }
            Self::EntryBeamDrop { .. } if elapsed > ms(tuning.entry_beam_drop_ms) => (
                Self::EntryBeamFade { elapsed: zero },
                vec![
                    TransitionEffect::PlayerRevealed,
                    TransitionEffect::ScreenShake {
                        intensity: tuning.landing_shake,
                    },
                ],
            ),
            Self::EntryBeamFade { .. } if elapsed > ms(tuning.entry_beam_fade_ms) => {
                (Self::None, vec![TransitionEffect::PlayerActivated])
            }
            running => (running.with_elapsed(elapsed), Vec::new()),
        };

        Step { phase, effects }
    }
}

/// World facts the machine reads each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionInput {
    /// Player position in world space.
    pub player_position: Vec2,
    /// Teleporter anchor in world space, when the level has one.
    pub teleporter_anchor: Option<Vec2>,
    /// Whether the currently loaded level is the intro.
    pub on_intro_level: bool,
}

/// Side effect the orchestrator applies after a state change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionEffect {
    /// Stop accepting input and move the player onto the teleporter.
    PlayerDeactivated {
        /// Position the player snaps to.
        snap_to: Vec2,
    },
    /// Hide the player sprite.
    PlayerHidden,
    /// Build the next level.
    RegenerateLevel,
    /// Show the player sprite.
    PlayerRevealed,
    /// Shake the camera.
    ScreenShake {
        /// Shake intensity.
        intensity: f32,
    },
    /// Return control to the player.
    PlayerActivated,
}

/// Result of advancing a phase.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Phase after the update.
    pub phase: TransitionPhase,
    /// Effects triggered by a state change, in application order.
    pub effects: Vec<TransitionEffect>,
}

impl Step {
    fn stay(phase: TransitionPhase) -> Self {
        Self {
            phase,
            effects: Vec::new(),
        }
    }
}

fn within_reach(player: Vec2, anchor: Vec2, tuning: &TransitionTuning) -> bool {
    (player.x - anchor.x).abs() < tuning.proximity_half_width
        && (player.y - anchor.y).abs() < tuning.proximity_half_height
}

fn fade_out_done(elapsed: Duration, title_hold: bool, tuning: &TransitionTuning) -> bool {
    if title_hold {
        elapsed > tuning.intro_fade_out_total()
    } else {
        elapsed >= tuning.fade_out_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(player: Vec2) -> TransitionInput {
        TransitionInput {
            player_position: player,
            teleporter_anchor: Some(Vec2::new(100.0, 100.0)),
            on_intro_level: false,
        }
    }

    #[test]
    fn idle_stays_idle_out_of_reach() {
        let tuning = TransitionTuning::default();
        let step = TransitionPhase::None.advance(
            Duration::from_secs(5),
            &input(Vec2::new(100.0, 120.0)),
            &tuning,
        );
        assert_eq!(step.phase, TransitionPhase::None);
        assert!(step.effects.is_empty());
    }

    #[test]
    fn reaching_teleporter_snaps_player() {
        let tuning = TransitionTuning::default();
        let step = TransitionPhase::None.advance(
            Duration::from_millis(16),
            &input(Vec2::new(105.0, 96.0)),
            &tuning,
        );
        assert_eq!(step.phase.state(), TransitionState::ExitBeamEnter);
        assert_eq!(step.phase.elapsed(), Duration::ZERO);
        assert_eq!(
            step.effects,
            vec![TransitionEffect::PlayerDeactivated {
                snap_to: Vec2::new(100.0, 100.0)
            }]
        );
    }

    #[test]
    fn no_teleporter_means_no_trigger() {
        let tuning = TransitionTuning::default();
        let step = TransitionPhase::None.advance(
            Duration::from_millis(16),
            &TransitionInput {
                player_position: Vec2::ZERO,
                teleporter_anchor: None,
                on_intro_level: false,
            },
            &tuning,
        );
        assert_eq!(step.phase, TransitionPhase::None);
    }

    #[test]
    fn enter_requires_strictly_exceeding_duration() {
        let tuning = TransitionTuning::default();
        let phase = TransitionPhase::ExitBeamEnter {
            elapsed: Duration::from_millis(400),
        };
        let at_limit = phase.advance(Duration::from_millis(100), &input(Vec2::ZERO), &tuning);
        assert_eq!(at_limit.phase.state(), TransitionState::ExitBeamEnter);
        let past = at_limit
            .phase
            .advance(Duration::from_millis(1), &input(Vec2::ZERO), &tuning);
        assert_eq!(past.phase.state(), TransitionState::ExitBeamInflate);
    }

    #[test]
    fn deflate_exits_at_its_duration() {
        let tuning = TransitionTuning::default();
        let phase = TransitionPhase::ExitBeamDeflate {
            elapsed: Duration::from_millis(600),
        };
        let step = phase.advance(Duration::from_millis(40), &input(Vec2::ZERO), &tuning);
        assert_eq!(
            step.phase,
            TransitionPhase::TransitionOut {
                elapsed: Duration::ZERO,
                title_hold: false
            }
        );
    }

    #[test]
    fn leftover_time_is_discarded() {
        let tuning = TransitionTuning::default();
        let phase = TransitionPhase::EntryBeamFade {
            elapsed: Duration::ZERO,
        };
        let step = phase.advance(Duration::from_secs(10), &input(Vec2::ZERO), &tuning);
        assert_eq!(step.phase, TransitionPhase::None);
        assert_eq!(step.effects, vec![TransitionEffect::PlayerActivated]);
    }
}
