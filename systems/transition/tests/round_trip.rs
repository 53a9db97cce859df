use std::time::Duration;

use blind_jump_core::TransitionState;
use blind_jump_system_transition::{
    TransitionEffect, TransitionInput, TransitionMachine, TransitionPhase, TransitionTuning,
};
use glam::Vec2;

const FRAME: Duration = Duration::from_millis(10);

fn on_teleporter(on_intro_level: bool) -> TransitionInput {
    TransitionInput {
        player_position: Vec2::new(40.0, 40.0),
        teleporter_anchor: Some(Vec2::new(40.0, 40.0)),
        on_intro_level,
    }
}

fn away_from_teleporter(on_intro_level: bool) -> TransitionInput {
    TransitionInput {
        player_position: Vec2::new(400.0, 400.0),
        teleporter_anchor: Some(Vec2::new(40.0, 40.0)),
        on_intro_level,
    }
}

struct Trace {
    states: Vec<TransitionState>,
    effects: Vec<TransitionEffect>,
    frames: u32,
}

/// Drives one teleport from the idle state back to idle.
fn run_cycle(tuning: TransitionTuning, leaving_intro: bool) -> Trace {
    let mut machine = TransitionMachine::new(tuning);
    let mut states = vec![machine.state()];
    let mut effects = machine.update(FRAME, &on_teleporter(leaving_intro));
    states.push(machine.state());
    let mut frames = 1;
    let mut on_intro = leaving_intro;

    while machine.state() != TransitionState::None {
        assert!(frames < 10_000, "transition never settled");
        if machine.take_regeneration_request() {
            on_intro = false;
        }
        let step_effects = machine.update(FRAME, &away_from_teleporter(on_intro));
        effects.extend(step_effects);
        if states.last() != Some(&machine.state()) {
            states.push(machine.state());
        }
        frames += 1;
    }

    Trace {
        states,
        effects,
        frames,
    }
}

#[test]
fn full_cycle_visits_every_state_in_order() {
    let trace = run_cycle(TransitionTuning::default(), false);
    let mut expected = TransitionState::CYCLE.to_vec();
    expected.push(TransitionState::None);
    assert_eq!(trace.states, expected);
}

#[test]
fn full_cycle_emits_effects_in_order() {
    let tuning = TransitionTuning::default();
    let trace = run_cycle(tuning.clone(), false);
    assert_eq!(
        trace.effects,
        vec![
            TransitionEffect::PlayerDeactivated {
                snap_to: Vec2::new(40.0, 40.0)
            },
            TransitionEffect::PlayerHidden,
            TransitionEffect::RegenerateLevel,
            TransitionEffect::PlayerRevealed,
            TransitionEffect::ScreenShake {
                intensity: tuning.landing_shake
            },
            TransitionEffect::PlayerActivated,
        ]
    );
}

#[test]
fn cycle_length_is_bounded_by_state_durations() {
    let tuning = TransitionTuning::default();
    let total_ms = tuning.exit_beam_enter_ms
        + tuning.exit_beam_inflate_ms
        + tuning.exit_beam_deflate_ms
        + tuning.fade_out_delay_ms
        + tuning.fade_out_ms
        + tuning.fade_in_ms
        + tuning.entry_beam_drop_ms
        + tuning.entry_beam_fade_ms;
    let trace = run_cycle(tuning, false);

    let elapsed_ms = u64::from(trace.frames) * FRAME.as_millis() as u64;
    assert!(elapsed_ms >= total_ms);
    // Each of the eight boundaries may cost one extra frame.
    assert!(elapsed_ms <= total_ms + 8 * FRAME.as_millis() as u64);
}

#[test]
fn regeneration_is_requested_exactly_once_per_cycle() {
    for frame_ms in [1, 7, 16, 33, 250] {
        let mut machine = TransitionMachine::new(TransitionTuning::default());
        let _ = machine.update(Duration::from_millis(frame_ms), &on_teleporter(false));
        let mut requests = 0;
        let mut returned_to_idle = 0;
        for _ in 0..20_000 {
            let _ = machine.update(
                Duration::from_millis(frame_ms),
                &away_from_teleporter(false),
            );
            if machine.take_regeneration_request() {
                requests += 1;
            }
            if machine.state() == TransitionState::None {
                returned_to_idle += 1;
                break;
            }
        }
        assert_eq!(requests, 1, "frame {frame_ms}ms");
        assert_eq!(returned_to_idle, 1, "frame {frame_ms}ms");
    }
}

#[test]
fn player_is_never_interactive_mid_transition() {
    let mut machine = TransitionMachine::new(TransitionTuning::default());
    let _ = machine.update(FRAME, &on_teleporter(false));
    while machine.state() != TransitionState::None {
        assert!(!machine.player_interactive(), "{:?}", machine.state());
        let _ = machine.update(FRAME, &away_from_teleporter(false));
    }
    assert!(machine.player_interactive());
}

#[test]
fn leaving_the_intro_holds_the_title() {
    let tuning = TransitionTuning::default();
    let mut machine = TransitionMachine::starting_at(
        TransitionPhase::ExitBeamDeflate {
            elapsed: Duration::from_millis(630),
        },
        tuning.clone(),
    );
    let _ = machine.update(FRAME, &away_from_teleporter(true));
    assert_eq!(
        machine.phase(),
        TransitionPhase::TransitionOut {
            elapsed: Duration::ZERO,
            title_hold: true
        }
    );

    let mut fade_frames = 0;
    while machine.state() == TransitionState::TransitionOut {
        let _ = machine.update(FRAME, &away_from_teleporter(true));
        fade_frames += 1;
    }
    let held_ms = fade_frames * FRAME.as_millis() as u64;
    assert!(held_ms > tuning.intro_fade_out_total().as_millis() as u64);
    assert!(machine.take_regeneration_request());
}

#[test]
fn boot_fade_in_on_intro_skips_entry_beam() {
    let mut machine = TransitionMachine::booting(TransitionTuning::default());
    let mut effects = Vec::new();
    for _ in 0..200 {
        effects.extend(machine.update(FRAME, &away_from_teleporter(true)));
        if machine.state() == TransitionState::None {
            break;
        }
    }

    assert_eq!(machine.state(), TransitionState::None);
    assert_eq!(
        effects,
        vec![
            TransitionEffect::PlayerRevealed,
            TransitionEffect::PlayerActivated
        ]
    );
    assert!(!machine.take_regeneration_request());
}
