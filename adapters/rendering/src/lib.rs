#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Blind Jump adapters.
//!
//! The runtime never talks to a graphics API directly. It resolves textures
//! and shaders through a [`ResourceHandler`], reads input through an
//! [`InputController`], and submits [`DrawCall`] values to a
//! [`RenderTarget`]. Adapters implement these traits for a real window; the
//! in-crate implementations ([`PreloadedResources`], [`InputSnapshot`],
//! [`RecordingTarget`]) drive headless runs and tests.

mod draw;
mod input;
pub mod post;
mod resources;

use blind_jump_core::Rgba8;

pub use draw::{
    BlendMode, DrawCall, Drawable, FlashColor, RecordingTarget, RenderTarget, RenderType,
    ShaderUse,
};
pub use input::{heading, InputController, InputSnapshot};
pub use resources::{
    FontHandle, FontId, PreloadedResources, ResourceHandler, ResourceId, ShaderHandle, ShaderId,
    TextureHandle, TextureId,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white, the neutral sprite tint.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba_u8(red, green, blue, 255)
    }

    /// Creates a color from byte RGBA values.
    #[must_use]
    pub const fn from_rgba_u8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: alpha as f32 / 255.0,
        }
    }

    /// Returns the color with its alpha replaced by a byte value.
    #[must_use]
    pub fn with_alpha_u8(self, alpha: u8) -> Self {
        Self {
            alpha: f32::from(alpha) / 255.0,
            ..self
        }
    }
}

impl From<Rgba8> for Color {
    fn from(value: Rgba8) -> Self {
        Self::from_rgba_u8(value.red, value.green, value.blue, value.alpha)
    }
}
