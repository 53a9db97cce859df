use blind_jump_core::ConfigurationError;
use blind_jump_system_enemy_selection::UnlockSchedule;
use blind_jump_system_procgen::{GeneratorTuning, RetryPolicy};
use blind_jump_system_transition::TransitionTuning;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Seed used when the configuration does not name one.
pub const DEFAULT_SEED: u64 = 0x5eed_b11d;

/// Size of the visible area in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 450.0,
            height: 300.0,
        }
    }
}

impl Viewport {
    /// Width and height as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Every tunable value the scene runs with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Visible area.
    pub viewport: Viewport,
    /// Global seed every per-level stream is derived from.
    pub seed: u64,
    /// Chance that a generated level receives a reward chest.
    pub chest_probability: f64,
    /// Player walking speed in world units per second.
    pub player_speed: f32,
    /// Cave generator parameters.
    pub generator: GeneratorTuning,
    /// Bounded regeneration policy.
    pub retry: RetryPolicy,
    /// Enemy unlock schedule.
    pub schedule: UnlockSchedule,
    /// Transition animation table.
    pub transition: TransitionTuning,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            seed: DEFAULT_SEED,
            chest_probability: 0.5,
            player_speed: 90.0,
            generator: GeneratorTuning::default(),
            retry: RetryPolicy::default(),
            schedule: UnlockSchedule::default(),
            transition: TransitionTuning::default(),
        }
    }
}

impl SceneConfig {
    /// Validates this table and every nested one.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;
        positive("player_speed", self.player_speed)?;
        if !(0.0..=1.0).contains(&self.chest_probability) {
            return Err(ConfigurationError::new(
                "chest_probability",
                "must lie within [0, 1]",
            ));
        }
        self.generator.validate()?;
        self.retry.validate()?;
        self.schedule.validate()?;
        self.transition.validate()
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::new(field, "must be a positive finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SceneConfig::default().validate(), Ok(()));
    }

    #[test]
    fn chest_probability_is_bounded() {
        let config = SceneConfig {
            chest_probability: 1.5,
            ..SceneConfig::default()
        };
        let error = config.validate().expect_err("probability above one");
        assert_eq!(error.field(), "chest_probability");
    }

    #[test]
    fn nested_tables_are_validated() {
        let mut config = SceneConfig::default();
        config.retry.max_attempts = 0;
        let error = config.validate().expect_err("zero retry budget");
        assert_eq!(error.field(), "retry.max_attempts");
    }

    #[test]
    fn viewport_must_be_visible() {
        let mut config = SceneConfig::default();
        config.viewport.height = 0.0;
        let error = config.validate().expect_err("empty viewport");
        assert_eq!(error.field(), "viewport.height");
    }
}
