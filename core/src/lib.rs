#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Blind Jump runtime.
//!
//! This crate defines the vocabulary that connects the pure systems (easing,
//! procedural generation, enemy selection and the transition machine), the
//! authoritative world, the scene orchestrator and the adapters. Systems take
//! these values as inputs and return new ones; the scene broadcasts [`Event`]
//! values so adapters can observe level changes without reaching into the
//! world directly.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the runtime boots.
pub const WELCOME_BANNER: &str = "Blind Jump";

/// Width of a single map tile measured in world units.
pub const TILE_WIDTH: f32 = 32.0;

/// Height of a single map tile measured in world units.
pub const TILE_HEIGHT: f32 = 26.0;

/// Index of a level within a run.
///
/// The intro level is [`Level::INTRO`]. A run that has not entered any level
/// yet (or has just ended in death) is represented by `Option::<Level>::None`,
/// so [`Level::after`] always yields a valid level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Level(u32);

impl Level {
    /// The hand-authored intro level.
    pub const INTRO: Self = Self(0);

    /// Creates a new level index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the level is the hand-authored intro.
    #[must_use]
    pub const fn is_intro(&self) -> bool {
        self.0 == 0
    }

    /// Level that follows this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Level entered after `current`, where `None` means no level is active.
    #[must_use]
    pub const fn after(current: Option<Self>) -> Self {
        match current {
            Some(level) => level.next(),
            None => Self::INTRO,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual theme and layout family applied to a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tileset {
    /// Fixed layout used by the intro level.
    Intro,
    /// Procedurally generated cave.
    Regular,
    /// Alternate generated theme. Never selected while the nova rotation is disabled.
    Nova,
}

impl Tileset {
    /// Selects the tileset for the provided level.
    ///
    /// Level zero is always the intro. Every other level uses the regular set.
    #[must_use]
    pub const fn for_level(level: Level) -> Self {
        if level.is_intro() {
            Self::Intro
        } else {
            Self::Regular
        }
    }

    /// Reports whether the tileset is built by the procedural generator.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        !matches!(self, Self::Intro)
    }
}

/// Location of a tile within a level's tile grid.
///
/// Coordinates are signed because the intro layout anchors some fixtures
/// outside the generated grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    x: i32,
    y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two tiles.
    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Computes the Chebyshev (king move) distance between two tiles.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Classification of a single map cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Solid rock with no adjacent floor. Never rendered.
    #[default]
    Void,
    /// Walkable floor.
    Floor,
    /// Solid cell bordering floor. Each wall cell produces a collision box.
    Wall,
}

/// Rectangular grid of map cells stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    cells: Vec<TileKind>,
}

impl TileGrid {
    /// Creates a grid with every cell set to [`TileKind::Void`].
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![TileKind::Void; width as usize * height as usize],
        }
    }

    /// Creates an empty grid with no cells.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x() >= 0
            && coord.y() >= 0
            && (coord.x() as u32) < self.width
            && (coord.y() as u32) < self.height
    }

    /// Cell stored at the coordinate, or `None` when outside the grid.
    #[must_use]
    pub fn get(&self, coord: TileCoord) -> Option<TileKind> {
        self.index(coord).map(|index| self.cells[index])
    }

    /// Overwrites a cell. Coordinates outside the grid are ignored.
    pub fn set(&mut self, coord: TileCoord, kind: TileKind) {
        if let Some(index) = self.index(coord) {
            self.cells[index] = kind;
        }
    }

    /// Reports whether the cell at the coordinate is walkable floor.
    #[must_use]
    pub fn is_floor(&self, coord: TileCoord) -> bool {
        self.get(coord) == Some(TileKind::Floor)
    }

    /// Number of walkable floor cells.
    #[must_use]
    pub fn open_cell_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|kind| **kind == TileKind::Floor)
            .count()
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, TileKind)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let coord = TileCoord::new((index % width) as i32, (index / width) as i32);
            (coord, *kind)
        })
    }

    /// Iterates over the coordinates of every cell of the given kind.
    pub fn cells_of(&self, kind: TileKind) -> impl Iterator<Item = TileCoord> + '_ {
        self.iter()
            .filter(move |(_, cell)| *cell == kind)
            .map(|(coord, _)| coord)
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y() as usize * self.width as usize + coord.x() as usize)
        } else {
            None
        }
    }
}

/// Enemy archetypes that can populate a generated level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Small skittering drone.
    Scoot,
    /// Ground crawler that chases the player.
    Critter,
    /// Fast charger that fires bursts.
    Dasher,
    /// Stationary emplacement.
    Turret,
}

impl EnemyKind {
    /// Human-readable name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scoot => "scoot",
            Self::Critter => "critter",
            Self::Dasher => "dasher",
            Self::Turret => "turret",
        }
    }
}

/// Identifier assigned to entities spawned into the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Named states of the level transition sequence.
///
/// The order of [`TransitionState::CYCLE`] is the order a full teleport walks
/// through, starting and ending at [`TransitionState::None`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionState {
    /// Normal play. Proximity to the teleporter starts a new transition.
    None,
    /// Beam grows upward from the teleporter.
    ExitBeamEnter,
    /// Beam widens.
    ExitBeamInflate,
    /// Beam narrows exponentially while the player is hidden.
    ExitBeamDeflate,
    /// Screen fades to black.
    TransitionOut,
    /// Screen fades back in on the new level.
    TransitionIn,
    /// Beam drops from the top of the screen onto the spawn point.
    EntryBeamDrop,
    /// Beam fades out and control returns to the player.
    EntryBeamFade,
}

impl TransitionState {
    /// Every state in the order a complete teleport visits them.
    pub const CYCLE: [Self; 8] = [
        Self::None,
        Self::ExitBeamEnter,
        Self::ExitBeamInflate,
        Self::ExitBeamDeflate,
        Self::TransitionOut,
        Self::TransitionIn,
        Self::EntryBeamDrop,
        Self::EntryBeamFade,
    ];

    /// Reports whether gameplay input and simulation run in this state.
    #[must_use]
    pub const fn is_player_interactive(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Reports whether the player sprite is drawn in this state.
    #[must_use]
    pub const fn is_player_visible(&self) -> bool {
        !matches!(
            self,
            Self::ExitBeamDeflate | Self::TransitionOut | Self::TransitionIn | Self::EntryBeamDrop
        )
    }
}

/// Colour with 8-bit channels and straight alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha channel.
    pub alpha: u8,
}

impl Rgba8 {
    /// Creates a colour from its channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque colour.
    #[must_use]
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Returns the colour with its alpha replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self::new(self.red, self.green, self.blue, alpha)
    }
}

/// How the layout of a generated level was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutSource {
    /// Hand-authored intro layout.
    Authored,
    /// Generated layout satisfying the strict open-cell threshold.
    Generated,
    /// Generated layout accepted under the relaxed threshold.
    Relaxed,
    /// Built-in fallback room used when every attempt failed.
    Canned,
}

/// Summary of the level that was most recently built.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelSummary {
    /// Level the summary describes.
    pub level: Level,
    /// Tileset applied to the level.
    pub tileset: Tileset,
    /// Origin of the layout.
    pub layout: LayoutSource,
    /// Number of generator attempts consumed.
    pub attempts: u32,
    /// Walkable cells in the accepted layout.
    pub open_cells: usize,
    /// Enemies placed into the level.
    pub enemies: usize,
    /// Sum of the cost of every enemy placed.
    pub difficulty_cost: u32,
    /// Whether a reward chest was placed.
    pub chest_placed: bool,
}

/// Events broadcast by the scene after each update.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new level is active.
    LevelEntered {
        /// Summary of the freshly built level.
        summary: LevelSummary,
    },
    /// Reports that the transition machine moved between states.
    TransitionChanged {
        /// State that was left.
        from: TransitionState,
        /// State that became active.
        to: TransitionState,
    },
    /// Reports that the camera started shaking.
    ScreenShake {
        /// Intensity of the shake.
        intensity: f32,
    },
    /// Reports that the run ended and restarted from the intro.
    RunRestarted,
}

/// Reports invalid tuning or configuration values.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("invalid configuration for `{field}`: {reason}")]
pub struct ConfigurationError {
    field: String,
    reason: String,
}

impl ConfigurationError {
    /// Creates an error naming the offending field.
    #[must_use]
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Dotted path of the field that failed validation.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Explanation of why the value was rejected.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Reports that the generator never produced a habitable layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error(
    "level {level}: no layout reached {required} open cells after {attempts} attempts \
     (best had {best_open_cells})"
)]
pub struct GenerationExhausted {
    /// Level being generated.
    pub level: Level,
    /// Number of attempts consumed.
    pub attempts: u32,
    /// Largest open-cell count observed across the attempts.
    pub best_open_cells: usize,
    /// Threshold that had to be met.
    pub required: usize,
}

/// Families of resources an adapter must preload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Texture resource.
    Texture,
    /// Shader program.
    Shader,
    /// Font resource.
    Font,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Texture => "texture",
            Self::Shader => "shader",
            Self::Font => "font",
        };
        f.write_str(label)
    }
}

/// Reports that a required resource was not loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind} `{id}` was not loaded")]
pub struct ResourceMissing {
    /// Kind of resource.
    pub kind: ResourceKind,
    /// Identifier of the missing resource.
    pub id: String,
}

/// Errors surfaced by the scene orchestrator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Configuration failed validation.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Level generation ran out of attempts.
    #[error(transparent)]
    Generation(#[from] GenerationExhausted),
    /// A render resource was missing.
    #[error(transparent)]
    Resource(#[from] ResourceMissing),
}
