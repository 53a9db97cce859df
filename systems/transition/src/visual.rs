use blind_jump_core::Rgba8;
use blind_jump_system_easing::{ease_in, ease_out, millis, to_channel};
use glam::Vec2;

use crate::{tuning::TransitionTuning, TransitionPhase};

/// Screen-space rectangle of a teleport beam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamShape {
    /// Top-left corner of the beam.
    pub origin: Vec2,
    /// Width and height of the beam.
    pub size: Vec2,
    /// Fill colour, alpha included.
    pub color: Rgba8,
}

/// Everything the transition contributes to a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitionVisual {
    /// Beam drawn over the player, if any.
    pub beam: Option<BeamShape>,
    /// Brightness of the additive glow around the beam.
    pub glow_brightness: u8,
    /// Opacity of the full-screen black overlay.
    pub fade_alpha: u8,
    /// Opacity of the intro title card, when shown.
    pub title_alpha: Option<u8>,
}

impl TransitionPhase {
    /// Computes the overlay for a viewport of the given size.
    ///
    /// The player is assumed to sit at the centre of the viewport.
    #[must_use]
    pub fn visual(&self, viewport: Vec2, tuning: &TransitionTuning) -> TransitionVisual {
        let t = millis(self.elapsed());
        let centre = viewport * 0.5;
        let rise_height = centre.y + tuning.beam_rise_margin;
        let drop_height = centre.y + tuning.beam_drop_margin;
        let color = tuning.beam_color;

        let exit_beam = |width: f32, height: f32, alpha: u8| BeamShape {
            origin: Vec2::new(centre.x - width * 0.5, centre.y - height),
            size: Vec2::new(width, height),
            color: color.with_alpha(alpha),
        };
        let entry_beam = |height: f32, alpha: u8| BeamShape {
            origin: Vec2::new(centre.x - tuning.entry_beam_width * 0.5, 0.0),
            size: Vec2::new(tuning.entry_beam_width, height),
            color: color.with_alpha(alpha),
        };

        match *self {
            Self::None => TransitionVisual::default(),
            Self::ExitBeamEnter { .. } => {
                let enter_ms = tuning.exit_beam_enter_ms as f32;
                let rise = ease_in::<1>(t, enter_ms);
                let alpha = to_channel(ease_in::<1>(t, tuning.exit_beam_alpha_ms as f32), 255);
                TransitionVisual {
                    beam: Some(exit_beam(tuning.beam_min_width, rise * rise_height, alpha)),
                    glow_brightness: to_channel(rise, 255),
                    ..TransitionVisual::default()
                }
            }
            Self::ExitBeamInflate { .. } => {
                let eased = ease_in::<2>(t, tuning.exit_beam_inflate_ms as f32);
                let width = (eased * tuning.beam_max_width).max(tuning.beam_min_width);
                TransitionVisual {
                    beam: Some(exit_beam(width, rise_height, 255)),
                    glow_brightness: 255,
                    ..TransitionVisual::default()
                }
            }
            Self::ExitBeamDeflate { .. } => {
                let width = tuning.deflate_amplitude
                    * (-tuning.deflate_decay_per_ms * t).exp()
                    * tuning.beam_max_width;
                TransitionVisual {
                    beam: Some(exit_beam(width, rise_height, 255)),
                    glow_brightness: 255,
                    ..TransitionVisual::default()
                }
            }
            Self::TransitionOut { title_hold, .. } => {
                let (delay, fade) = if title_hold {
                    (tuning.intro_title_hold_ms, tuning.intro_fade_out_ms)
                } else {
                    (tuning.fade_out_delay_ms, tuning.fade_out_ms)
                };
                let since_delay = t - delay as f32;
                let fade_alpha = if since_delay < 0.0 {
                    0
                } else {
                    to_channel(ease_in::<1>(since_delay, fade as f32), 255)
                };
                let title_alpha = title_hold.then(|| {
                    let faded = ease_out::<1>(since_delay.max(0.0), tuning.intro_title_fade_ms as f32);
                    to_channel(1.0 - faded, 255)
                });
                TransitionVisual {
                    fade_alpha,
                    title_alpha,
                    ..TransitionVisual::default()
                }
            }
            Self::TransitionIn { .. } => TransitionVisual {
                fade_alpha: to_channel(1.0 - ease_out::<1>(t, tuning.fade_in_ms as f32), 255),
                ..TransitionVisual::default()
            },
            Self::EntryBeamDrop { .. } => {
                let drop_ms = tuning.entry_beam_drop_ms as f32;
                let height = ease_in::<2>(t, drop_ms) * drop_height;
                TransitionVisual {
                    beam: Some(entry_beam(height, tuning.entry_beam_alpha)),
                    glow_brightness: to_channel(ease_in::<1>(t, drop_ms), 255),
                    ..TransitionVisual::default()
                }
            }
            Self::EntryBeamFade { .. } => {
                let fade_ms = tuning.entry_beam_fade_ms as f32;
                let remaining = 1.0 - ease_out::<1>(t, fade_ms);
                TransitionVisual {
                    beam: Some(entry_beam(
                        drop_height,
                        to_channel(remaining, tuning.entry_beam_alpha),
                    )),
                    glow_brightness: to_channel(1.0 - ease_out::<2>(t, fade_ms), 255),
                    ..TransitionVisual::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(450.0, 300.0);

    #[test]
    fn idle_draws_nothing() {
        let visual = TransitionPhase::None.visual(VIEWPORT, &TransitionTuning::default());
        assert_eq!(visual, TransitionVisual::default());
    }

    #[test]
    fn exit_beam_reaches_above_the_screen() {
        let tuning = TransitionTuning::default();
        let phase = TransitionPhase::ExitBeamEnter {
            elapsed: Duration::from_millis(500),
        };
        let beam = phase.visual(VIEWPORT, &tuning).beam.expect("beam");
        assert!((beam.size.y - (150.0 + 48.0)).abs() < 1e-3);
        assert!((beam.origin.y + 48.0).abs() < 1e-3);
        assert_eq!(beam.color.alpha, 255);
    }

    #[test]
    fn inflate_never_narrower_than_minimum() {
        let tuning = TransitionTuning::default();
        let start = TransitionPhase::ExitBeamInflate {
            elapsed: Duration::ZERO,
        };
        let end = TransitionPhase::ExitBeamInflate {
            elapsed: Duration::from_millis(250),
        };
        let narrow = start.visual(VIEWPORT, &tuning).beam.expect("beam");
        let wide = end.visual(VIEWPORT, &tuning).beam.expect("beam");
        assert!((narrow.size.x - 2.0).abs() < 1e-6);
        assert!((wide.size.x - 20.0).abs() < 1e-4);
        assert!((wide.origin.x - (225.0 - 10.0)).abs() < 1e-4);
    }

    #[test]
    fn deflate_collapses_exponentially() {
        let tuning = TransitionTuning::default();
        let start = TransitionPhase::ExitBeamDeflate {
            elapsed: Duration::ZERO,
        };
        let end = TransitionPhase::ExitBeamDeflate {
            elapsed: Duration::from_millis(640),
        };
        let start_width = start.visual(VIEWPORT, &tuning).beam.expect("beam").size.x;
        let end_width = end.visual(VIEWPORT, &tuning).beam.expect("beam").size.x;
        assert!((start_width - 20.0).abs() < 1e-3);
        assert!(end_width < 1.0);
    }

    #[test]
    fn fade_out_waits_for_its_delay() {
        let tuning = TransitionTuning::default();
        let early = TransitionPhase::TransitionOut {
            elapsed: Duration::from_millis(80),
            title_hold: false,
        };
        let done = TransitionPhase::TransitionOut {
            elapsed: Duration::from_millis(1_000),
            title_hold: false,
        };
        assert_eq!(early.visual(VIEWPORT, &tuning).fade_alpha, 0);
        assert_eq!(done.visual(VIEWPORT, &tuning).fade_alpha, 255);
        assert_eq!(done.visual(VIEWPORT, &tuning).title_alpha, None);
    }

    #[test]
    fn intro_title_holds_then_fades() {
        let tuning = TransitionTuning::default();
        let holding = TransitionPhase::TransitionOut {
            elapsed: Duration::from_millis(1_000),
            title_hold: true,
        };
        let faded = TransitionPhase::TransitionOut {
            elapsed: Duration::from_millis(2_400),
            title_hold: true,
        };
        let holding = holding.visual(VIEWPORT, &tuning);
        assert_eq!(holding.title_alpha, Some(255));
        assert_eq!(holding.fade_alpha, 0);
        assert_eq!(faded.visual(VIEWPORT, &tuning).title_alpha, Some(0));
    }

    #[test]
    fn fade_in_starts_black_and_clears() {
        let tuning = TransitionTuning::default();
        let start = TransitionPhase::boot();
        let end = TransitionPhase::TransitionIn {
            elapsed: Duration::from_millis(800),
        };
        assert_eq!(start.visual(VIEWPORT, &tuning).fade_alpha, 255);
        assert_eq!(end.visual(VIEWPORT, &tuning).fade_alpha, 0);
    }

    #[test]
    fn entry_beam_fades_from_its_drop_alpha() {
        let tuning = TransitionTuning::default();
        let start = TransitionPhase::EntryBeamFade {
            elapsed: Duration::ZERO,
        };
        let beam = start.visual(VIEWPORT, &tuning).beam.expect("beam");
        assert_eq!(beam.color.alpha, 240);
        assert!((beam.size.y - 186.0).abs() < 1e-3);
    }
}
