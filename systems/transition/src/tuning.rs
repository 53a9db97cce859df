use std::time::Duration;

use blind_jump_core::{ConfigurationError, Rgba8};
use serde::{Deserialize, Serialize};

/// Timings and shape parameters of the teleport sequence.
///
/// Durations are expressed in milliseconds so they read naturally in
/// configuration files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionTuning {
    /// Time for the exit beam to rise.
    pub exit_beam_enter_ms: u64,
    /// Time for the exit beam to reach full opacity.
    pub exit_beam_alpha_ms: u64,
    /// Time for the exit beam to widen.
    pub exit_beam_inflate_ms: u64,
    /// Time the exit beam spends collapsing.
    pub exit_beam_deflate_ms: u64,
    /// Pause before the screen starts fading out.
    pub fade_out_delay_ms: u64,
    /// Length of the fade to black.
    pub fade_out_ms: u64,
    /// Time the intro title holds before the fade to black begins.
    pub intro_title_hold_ms: u64,
    /// Length of the fade to black when leaving the intro.
    pub intro_fade_out_ms: u64,
    /// Time for the intro title to fade away once the hold ends.
    pub intro_title_fade_ms: u64,
    /// Length of the fade back in on the new level.
    pub fade_in_ms: u64,
    /// Time for the entry beam to drop onto the spawn point.
    pub entry_beam_drop_ms: u64,
    /// Time for the entry beam to fade away.
    pub entry_beam_fade_ms: u64,
    /// Extra height the exit beam climbs past the top half of the screen.
    pub beam_rise_margin: f32,
    /// Extra height the entry beam falls past the centre of the screen.
    pub beam_drop_margin: f32,
    /// Narrowest exit beam width.
    pub beam_min_width: f32,
    /// Widest exit beam width.
    pub beam_max_width: f32,
    /// Width of the entry beam.
    pub entry_beam_width: f32,
    /// Opacity of the entry beam before it fades.
    pub entry_beam_alpha: u8,
    /// Scale factor of the exponential collapse.
    pub deflate_amplitude: f32,
    /// Decay rate per millisecond of the exponential collapse.
    pub deflate_decay_per_ms: f32,
    /// Horizontal reach of the teleporter trigger.
    pub proximity_half_width: f32,
    /// Vertical reach of the teleporter trigger.
    pub proximity_half_height: f32,
    /// Camera shake applied when the entry beam lands.
    pub landing_shake: f32,
    /// Colour of both beams.
    pub beam_color: Rgba8,
}

impl Default for TransitionTuning {
    fn default() -> Self {
        Self {
            exit_beam_enter_ms: 500,
            exit_beam_alpha_ms: 450,
            exit_beam_inflate_ms: 250,
            exit_beam_deflate_ms: 640,
            fade_out_delay_ms: 100,
            fade_out_ms: 900,
            intro_title_hold_ms: 1_600,
            intro_fade_out_ms: 1_400,
            intro_title_fade_ms: 600,
            fade_in_ms: 800,
            entry_beam_drop_ms: 350,
            entry_beam_fade_ms: 300,
            beam_rise_margin: 48.0,
            beam_drop_margin: 36.0,
            beam_min_width: 2.0,
            beam_max_width: 20.0,
            entry_beam_width: 4.0,
            entry_beam_alpha: 240,
            deflate_amplitude: 0.999_999_5,
            deflate_decay_per_ms: 0.005_012_535_5,
            proximity_half_width: 10.0,
            proximity_half_height: 8.0,
            landing_shake: 0.19,
            beam_color: Rgba8::opaque(114, 255, 229),
        }
    }
}

impl TransitionTuning {
    /// Rejects shapes that cannot be drawn and triggers that can never fire.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let animated = [
            ("transition.exit_beam_enter_ms", self.exit_beam_enter_ms),
            ("transition.exit_beam_alpha_ms", self.exit_beam_alpha_ms),
            ("transition.exit_beam_inflate_ms", self.exit_beam_inflate_ms),
            ("transition.exit_beam_deflate_ms", self.exit_beam_deflate_ms),
            ("transition.fade_out_ms", self.fade_out_ms),
            ("transition.intro_fade_out_ms", self.intro_fade_out_ms),
            ("transition.intro_title_fade_ms", self.intro_title_fade_ms),
            ("transition.fade_in_ms", self.fade_in_ms),
            ("transition.entry_beam_drop_ms", self.entry_beam_drop_ms),
            ("transition.entry_beam_fade_ms", self.entry_beam_fade_ms),
        ];
        for (field, value) in animated {
            if value == 0 {
                return Err(ConfigurationError::new(field, "animation length must be positive"));
            }
        }

        let positive = [
            ("transition.beam_min_width", self.beam_min_width),
            ("transition.beam_max_width", self.beam_max_width),
            ("transition.entry_beam_width", self.entry_beam_width),
            ("transition.proximity_half_width", self.proximity_half_width),
            ("transition.proximity_half_height", self.proximity_half_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigurationError::new(field, "must be positive"));
            }
        }
        if self.beam_min_width > self.beam_max_width {
            return Err(ConfigurationError::new(
                "transition.beam_min_width",
                "must not exceed beam_max_width",
            ));
        }
        if !(self.deflate_decay_per_ms.is_finite() && self.deflate_decay_per_ms >= 0.0) {
            return Err(ConfigurationError::new(
                "transition.deflate_decay_per_ms",
                "must be non-negative",
            ));
        }
        if !(self.landing_shake.is_finite() && self.landing_shake >= 0.0) {
            return Err(ConfigurationError::new(
                "transition.landing_shake",
                "must be non-negative",
            ));
        }
        Ok(())
    }

    /// Total time of a regular fade to black, delay included.
    #[must_use]
    pub fn fade_out_total(&self) -> Duration {
        Duration::from_millis(self.fade_out_delay_ms + self.fade_out_ms)
    }

    /// Total time of the intro title hold and its fade to black.
    #[must_use]
    pub fn intro_fade_out_total(&self) -> Duration {
        Duration::from_millis(self.intro_title_hold_ms + self.intro_fade_out_ms)
    }
}

pub(crate) fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}
