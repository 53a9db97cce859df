use blind_jump_core::{ConfigurationError, GenerationExhausted, LayoutSource, Level};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{canned_layout, Layout, LayoutGenerator};

/// Bounded regeneration policy for procedural layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of candidates drawn per threshold.
    pub max_attempts: u32,
    /// Open cells a layout needs to be accepted outright.
    pub min_open_cells: usize,
    /// Lower threshold tried once the strict one is exhausted.
    pub relaxed_open_cells: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 64,
            min_open_cells: 150,
            relaxed_open_cells: 100,
        }
    }
}

/// Layout accepted by the retry policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accepted {
    /// Accepted layout.
    pub layout: Layout,
    /// Attempts consumed, across every threshold tried.
    pub attempts: u32,
    /// Which threshold (or fallback) produced the layout.
    pub source: LayoutSource,
    /// Exhaustion report when the strict threshold was not met.
    pub exhausted: Option<GenerationExhausted>,
}

impl RetryPolicy {
    /// Checks that the policy can terminate and accept something.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_attempts == 0 {
            return Err(ConfigurationError::new(
                "retry.max_attempts",
                "at least one attempt is required",
            ));
        }
        if self.min_open_cells == 0 {
            return Err(ConfigurationError::new(
                "retry.min_open_cells",
                "must be positive",
            ));
        }
        if self.relaxed_open_cells > self.min_open_cells {
            return Err(ConfigurationError::new(
                "retry.relaxed_open_cells",
                "must not exceed min_open_cells",
            ));
        }
        Ok(())
    }

    /// Draws candidates until one reaches `min_open_cells`.
    ///
    /// Every attempt consumes the same random stream, so a seeded stream
    /// reproduces the same accepted layout and attempt count.
    pub fn generate(
        &self,
        generator: &dyn LayoutGenerator,
        level: Level,
        rng: &mut dyn RngCore,
    ) -> Result<Accepted, GenerationExhausted> {
        self.attempt(generator, level, rng, self.min_open_cells)
            .map(|(layout, attempts)| Accepted {
                layout,
                attempts,
                source: LayoutSource::Generated,
                exhausted: None,
            })
    }

    /// Like [`RetryPolicy::generate`], but never fails.
    ///
    /// After exhausting the strict threshold the policy retries against
    /// `relaxed_open_cells`, and finally falls back to a canned room.
    pub fn generate_or_fallback(
        &self,
        generator: &dyn LayoutGenerator,
        level: Level,
        rng: &mut dyn RngCore,
    ) -> Accepted {
        let exhausted = match self.generate(generator, level, rng) {
            Ok(accepted) => return accepted,
            Err(exhausted) => exhausted,
        };
        warn!(
            level = level.get(),
            attempts = exhausted.attempts,
            best_open_cells = exhausted.best_open_cells,
            "strict layout threshold exhausted, relaxing"
        );

        match self.attempt(generator, level, rng, self.relaxed_open_cells) {
            Ok((layout, attempts)) => Accepted {
                layout,
                attempts: exhausted.attempts + attempts,
                source: LayoutSource::Relaxed,
                exhausted: Some(exhausted),
            },
            Err(relaxed) => {
                warn!(
                    level = level.get(),
                    best_open_cells = relaxed.best_open_cells,
                    "relaxed layout threshold exhausted, using canned room"
                );
                let (width, height) = generator.dimensions();
                Accepted {
                    layout: canned_layout(width, height, self.min_open_cells),
                    attempts: exhausted.attempts + relaxed.attempts,
                    source: LayoutSource::Canned,
                    exhausted: Some(exhausted),
                }
            }
        }
    }

    fn attempt(
        &self,
        generator: &dyn LayoutGenerator,
        level: Level,
        rng: &mut dyn RngCore,
        required: usize,
    ) -> Result<(Layout, u32), GenerationExhausted> {
        let mut best_open_cells = 0;
        for attempt in 1..=self.max_attempts {
            let layout = generator.generate(level, rng);
            let open_cells = layout.open_cells();
            if open_cells >= required {
                debug!(level = level.get(), attempt, open_cells, "layout accepted");
                return Ok((layout, attempt));
            }
            debug!(level = level.get(), attempt, open_cells, required, "layout rejected");
            best_open_cells = best_open_cells.max(open_cells);
        }

        Err(GenerationExhausted {
            level,
            attempts: self.max_attempts,
            best_open_cells,
            required,
        })
    }
}
