use blind_jump_core::{EnemyKind, LayoutSource, Level, LevelSummary, Tileset, TILE_HEIGHT, TILE_WIDTH};
use blind_jump_system_enemy_selection::{EnemyPlacement, EnemySelector};
use blind_jump_system_procgen::{details, CaveGenerator, RetryPolicy};
use blind_jump_world::{
    intro::{INTRO_LAMPS, INTRO_POD, INTRO_TELEPORTER, INTRO_WALL_PIECE},
    tile_centre, tile_position, DetailKind, LevelLayout, TileMap,
};
use glam::Vec2;
use rand::{Rng, RngCore};
use tracing::{debug, warn};

use crate::{
    seed::{level_rng, LAYOUT_STREAM, POPULATION_STREAM},
    SceneConfig,
};

/// Level content ready to be installed, with its summary.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltLevel {
    /// Assembled content.
    pub layout: LevelLayout,
    /// Facts about how the level was built.
    pub summary: LevelSummary,
}

/// Assembles levels without touching shared state.
///
/// Building runs entirely on a private [`LevelLayout`], so the caller can
/// hold no lock while the generator retries.
#[derive(Clone, Debug)]
pub struct LevelBuilder {
    seed: u64,
    chest_probability: f64,
    generator: CaveGenerator,
    retry: RetryPolicy,
}

impl LevelBuilder {
    /// Creates a builder from validated configuration.
    #[must_use]
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            seed: config.seed,
            chest_probability: config.chest_probability,
            generator: CaveGenerator::new(config.generator.clone()),
            retry: config.retry,
        }
    }

    /// Builds `level`, unlocking and placing enemies through `selector`.
    ///
    /// The intro uses its authored layout and never consults the generator
    /// or the selector.
    pub fn build(&self, level: Level, selector: &mut EnemySelector) -> BuiltLevel {
        match Tileset::for_level(level) {
            Tileset::Intro => build_intro(level),
            tileset => self.build_generated(level, tileset, selector),
        }
    }

    fn build_generated(
        &self,
        level: Level,
        tileset: Tileset,
        selector: &mut EnemySelector,
    ) -> BuiltLevel {
        let mut layout_rng = level_rng(self.seed, level, LAYOUT_STREAM);
        let accepted = self
            .retry
            .generate_or_fallback(&self.generator, level, &mut layout_rng);
        let open_cells = accepted.layout.open_cells();
        let grid = accepted.layout.grid.clone();
        let map = TileMap::generated(accepted.layout.grid, accepted.layout.spawn, tileset);

        let mut layout = LevelLayout::new(map);
        if let Some(anchor) = layout.map().teleporter_anchor() {
            layout.add_detail(DetailKind::Teleporter, anchor);
        }

        let mut population_rng = level_rng(self.seed, level, POPULATION_STREAM);
        let report = selector.populate(
            level,
            &mut population_rng,
            &mut LayoutPlacement(&mut layout),
        );
        if report.unplaced > 0 {
            warn!(
                level = level.get(),
                unplaced = report.unplaced,
                "empty-location pool exhausted while placing enemies"
            );
        }

        let chest_placed = self.place_chest(&mut layout, &mut population_rng);

        if tileset == Tileset::Regular {
            for tile in details::rock_positions(&grid) {
                if layout.map().empty_locations().contains(tile) {
                    layout.add_detail(DetailKind::Rock, tile_centre(tile));
                }
            }
        }
        for tile in details::light_positions(&grid) {
            let face = tile_position(tile) + Vec2::new(TILE_WIDTH * 0.5, TILE_HEIGHT);
            layout.add_detail(DetailKind::Light, face);
        }
        debug!(
            level = level.get(),
            details = layout.details().len(),
            "level details placed"
        );

        let summary = LevelSummary {
            level,
            tileset,
            layout: accepted.source,
            attempts: accepted.attempts,
            open_cells,
            enemies: report.placed.len(),
            difficulty_cost: report.difficulty_cost,
            chest_placed,
        };
        BuiltLevel { layout, summary }
    }

    fn place_chest(&self, layout: &mut LevelLayout, rng: &mut dyn RngCore) -> bool {
        if !rng.gen_bool(self.chest_probability) {
            return false;
        }
        match layout.take_empty_location(rng) {
            Some(tile) => {
                layout.add_detail(DetailKind::Chest, tile_centre(tile));
                true
            }
            None => false,
        }
    }
}

fn build_intro(level: Level) -> BuiltLevel {
    let mut layout = LevelLayout::new(TileMap::intro());
    layout.add_detail(DetailKind::Teleporter, INTRO_TELEPORTER);
    layout.add_detail(DetailKind::Pod, INTRO_POD);
    layout.add_detail(DetailKind::IntroWall, INTRO_WALL_PIECE);
    for lamp in INTRO_LAMPS {
        layout.add_detail(DetailKind::Lamp, lamp);
    }
    let summary = LevelSummary {
        level,
        tileset: Tileset::Intro,
        layout: LayoutSource::Authored,
        attempts: 0,
        open_cells: 0,
        enemies: 0,
        difficulty_cost: 0,
        chest_placed: false,
    };
    BuiltLevel { layout, summary }
}

struct LayoutPlacement<'a>(&'a mut LevelLayout);

impl EnemyPlacement for LayoutPlacement<'_> {
    fn place(&mut self, kind: EnemyKind, rng: &mut dyn RngCore) -> bool {
        self.0.place_enemy(kind, rng).is_some()
    }
}
