#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level transition state machine.
//!
//! A teleport walks the cycle `None → ExitBeamEnter → ExitBeamInflate →
//! ExitBeamDeflate → TransitionOut → TransitionIn → EntryBeamDrop →
//! EntryBeamFade → None`. Each state owns a timer and a completion condition.
//! [`TransitionPhase::advance`] is a pure step function returning the next
//! phase and the side effects the orchestrator must apply, while
//! [`TransitionPhase::visual`] describes what the current state draws.
//! [`TransitionMachine`] wraps both and records pending regeneration
//! requests.

mod phase;
mod tuning;
mod visual;

use std::time::Duration;

use blind_jump_core::TransitionState;
use glam::Vec2;
use tracing::debug;

pub use phase::{Step, TransitionEffect, TransitionInput, TransitionPhase};
pub use tuning::TransitionTuning;
pub use visual::{BeamShape, TransitionVisual};

/// Stateful driver around [`TransitionPhase`].
#[derive(Clone, Debug)]
pub struct TransitionMachine {
    phase: TransitionPhase,
    tuning: TransitionTuning,
    regeneration_pending: bool,
}

impl TransitionMachine {
    /// Creates an idle machine.
    #[must_use]
    pub fn new(tuning: TransitionTuning) -> Self {
        Self::starting_at(TransitionPhase::None, tuning)
    }

    /// Creates a machine that begins with the boot fade-in.
    #[must_use]
    pub fn booting(tuning: TransitionTuning) -> Self {
        Self::starting_at(TransitionPhase::boot(), tuning)
    }

    /// Creates a machine positioned at an arbitrary phase.
    #[must_use]
    pub fn starting_at(phase: TransitionPhase, tuning: TransitionTuning) -> Self {
        Self {
            phase,
            tuning,
            regeneration_pending: false,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Named current state.
    #[must_use]
    pub fn state(&self) -> TransitionState {
        self.phase.state()
    }

    /// Tuning the machine runs with.
    #[must_use]
    pub fn tuning(&self) -> &TransitionTuning {
        &self.tuning
    }

    /// Reports whether gameplay should run this frame.
    #[must_use]
    pub fn player_interactive(&self) -> bool {
        self.state().is_player_interactive()
    }

    /// Advances the timer and returns the effects of any state change.
    pub fn update(&mut self, dt: Duration, input: &TransitionInput) -> Vec<TransitionEffect> {
        let before = self.state();
        let step = self.phase.advance(dt, input, &self.tuning);
        self.phase = step.phase;

        if step.effects.contains(&TransitionEffect::RegenerateLevel) {
            self.regeneration_pending = true;
        }
        let after = self.state();
        if before != after {
            debug!(from = ?before, to = ?after, "transition state changed");
        }
        step.effects
    }

    /// Consumes the pending regeneration request, if any.
    pub fn take_regeneration_request(&mut self) -> bool {
        std::mem::take(&mut self.regeneration_pending)
    }

    /// Restarts the boot fade-in, dropping any pending request.
    pub fn restart(&mut self) {
        self.phase = TransitionPhase::boot();
        self.regeneration_pending = false;
    }

    /// Overlay for the current state.
    #[must_use]
    pub fn visual(&self, viewport: Vec2) -> TransitionVisual {
        self.phase.visual(viewport, &self.tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regeneration_request_is_consumed_once() {
        let mut machine = TransitionMachine::starting_at(
            TransitionPhase::TransitionOut {
                elapsed: Duration::from_millis(990),
                title_hold: false,
            },
            TransitionTuning::default(),
        );
        let input = TransitionInput {
            player_position: Vec2::ZERO,
            teleporter_anchor: None,
            on_intro_level: false,
        };
        let effects = machine.update(Duration::from_millis(10), &input);

        assert_eq!(effects, vec![TransitionEffect::RegenerateLevel]);
        assert_eq!(machine.state(), TransitionState::TransitionIn);
        assert!(machine.take_regeneration_request());
        assert!(!machine.take_regeneration_request());
    }

    #[test]
    fn restart_returns_to_boot_fade() {
        let mut machine = TransitionMachine::new(TransitionTuning::default());
        machine.restart();
        assert_eq!(machine.phase(), TransitionPhase::boot());
        assert!(!machine.player_interactive());
    }
}
