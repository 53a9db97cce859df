#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scene orchestration for Blind Jump.
//!
//! The scene composes the systems into a playable loop. Each frame it gates
//! gameplay behind the transition machine, applies the machine's side
//! effects to the world and, when a teleport asks for it, builds the next
//! level: a cave from the generator under its retry policy, enemies from
//! the selector, a chance of a chest, and decorative details. Levels are
//! assembled off to the side by [`LevelBuilder`] and installed in one step.
//!
//! [`Scene`] runs on one thread. [`SharedScene`] splits the same state
//! behind locks so a render thread can draw snapshots while the logic
//! thread runs, and [`FrameLoop`] drives either until a [`ShutdownSignal`]
//! fires.

mod builder;
mod compose;
mod config;
mod frame_loop;
mod scene;
pub mod seed;
mod shared;
mod state;

pub use builder::{BuiltLevel, LevelBuilder};
pub use compose::{compose, FrameSnapshot, FrameView, TITLE_TEXT};
pub use config::{SceneConfig, Viewport, DEFAULT_SEED};
pub use frame_loop::{FrameLoop, InputSource, LoopReport, ShutdownSignal};
pub use scene::Scene;
pub use shared::SharedScene;
