use glam::Vec2;

use crate::{Color, FontHandle, ResourceHandler, ShaderHandle, ShaderId, TextureHandle};

/// How a draw call is composited onto the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Standard alpha blending.
    #[default]
    Alpha,
    /// Additive blending, used for glows.
    Add,
    /// Multiplicative blending, used for the vignette.
    Multiply,
}

/// Shader bound for a single draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShaderUse {
    /// Shader program.
    pub shader: ShaderHandle,
    /// Strength of the effect in `[0, 1]`.
    pub amount: f32,
    /// Colour the colour shader mixes towards.
    pub target: Color,
}

/// Shape submitted by a draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum Drawable {
    /// Frame of a sprite sheet.
    Sprite {
        /// Sprite sheet.
        texture: TextureHandle,
        /// Frame index within the sheet.
        frame: u16,
        /// Screen position of the sprite's origin.
        position: Vec2,
        /// Tint multiplied into the sprite.
        color: Color,
    },
    /// Solid rectangle.
    Rect {
        /// Screen position of the top-left corner.
        position: Vec2,
        /// Width and height.
        size: Vec2,
        /// Fill colour.
        color: Color,
    },
    /// Line of text.
    Text {
        /// Font to print with.
        font: FontHandle,
        /// Screen position of the text's centre.
        position: Vec2,
        /// Text to print.
        text: String,
        /// Text colour.
        color: Color,
    },
    /// Full-screen pass over what has been drawn so far.
    Pass,
}

/// One unit of work for a [`RenderTarget`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    /// Shape to draw.
    pub drawable: Drawable,
    /// Optional shader.
    pub shader: Option<ShaderUse>,
    /// Blend mode.
    pub blend: BlendMode,
}

impl DrawCall {
    /// Alpha-blended call without a shader.
    #[must_use]
    pub fn plain(drawable: Drawable) -> Self {
        Self {
            drawable,
            shader: None,
            blend: BlendMode::Alpha,
        }
    }

    /// Returns the call with a different blend mode.
    #[must_use]
    pub fn blended(self, blend: BlendMode) -> Self {
        Self { blend, ..self }
    }

    /// Returns the call with a shader bound.
    #[must_use]
    pub fn shaded(self, shader: ShaderUse) -> Self {
        Self {
            shader: Some(shader),
            ..self
        }
    }
}

/// Accepts draw calls. Calls are composited in submission order.
pub trait RenderTarget {
    /// Submits a draw call.
    fn draw(&mut self, call: DrawCall);
}

/// Target colour of a flash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlashColor {
    /// Hit flash.
    White,
    /// Damage flash.
    Red,
    /// Critical flash.
    Crimson,
    /// Teleport flash.
    Neon,
}

impl FlashColor {
    /// Colour the colour shader mixes towards.
    #[must_use]
    pub const fn target(&self) -> Color {
        match self {
            Self::White => Color::new(1.0, 1.0, 1.0, 1.0),
            Self::Red => Color::new(0.98, 0.22, 0.03, 1.0),
            Self::Crimson => Color::new(0.94, 0.09, 0.34, 1.0),
            Self::Neon => Color::new(0.29, 0.99, 0.99, 1.0),
        }
    }
}

/// How a sprite is shaded when drawn into the lit layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderType {
    /// Tinted by the ambient light colour.
    ShadeDefault,
    /// Drawn with its own colours.
    ShadeNone,
    /// Mixed towards a flat colour by the colour shader.
    Flash {
        /// Colour to mix towards.
        color: FlashColor,
        /// Strength of the mix in `[0, 1]`.
        amount: f32,
    },
}

impl RenderType {
    /// Ambient tint applied by [`RenderType::ShadeDefault`].
    pub const AMBIENT_TINT: Color = Color::new(190.0 / 255.0, 190.0 / 255.0, 210.0 / 255.0, 1.0);

    /// Tint and shader for a sprite drawn with this render type.
    #[must_use]
    pub fn shading(&self, resources: &dyn ResourceHandler) -> (Color, Option<ShaderUse>) {
        match self {
            Self::ShadeDefault => (Self::AMBIENT_TINT, None),
            Self::ShadeNone => (Color::WHITE, None),
            Self::Flash { color, amount } => (
                Color::WHITE,
                Some(ShaderUse {
                    shader: resources.shader(ShaderId::Color),
                    amount: amount.clamp(0.0, 1.0),
                    target: color.target(),
                }),
            ),
        }
    }
}

/// Target that keeps every call for later inspection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingTarget {
    calls: Vec<DrawCall>,
}

impl RecordingTarget {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Removes and returns every recorded call.
    pub fn take(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }
}

impl RenderTarget for RecordingTarget {
    fn draw(&mut self, call: DrawCall) {
        self.calls.push(call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PreloadedResources;

    #[test]
    fn default_shading_uses_ambient_tint() {
        let resources = PreloadedResources::with_all();
        let (tint, shader) = RenderType::ShadeDefault.shading(&resources);
        assert_eq!(tint, RenderType::AMBIENT_TINT);
        assert_eq!(shader, None);
    }

    #[test]
    fn flashes_bind_the_color_shader() {
        let resources = PreloadedResources::with_all();
        let flash = RenderType::Flash {
            color: FlashColor::Neon,
            amount: 1.5,
        };
        let (_, shader) = flash.shading(&resources);
        let shader = shader.expect("flash binds a shader");
        assert_eq!(shader.shader, resources.shader(ShaderId::Color));
        assert_eq!(shader.amount, 1.0);
        assert_eq!(shader.target, FlashColor::Neon.target());
    }

    #[test]
    fn recording_keeps_submission_order() {
        let mut target = RecordingTarget::new();
        target.draw(DrawCall::plain(Drawable::Pass));
        target.draw(DrawCall::plain(Drawable::Pass).blended(BlendMode::Multiply));
        let calls = target.take();
        assert_eq!(calls[1].blend, BlendMode::Multiply);
        assert!(target.calls().is_empty());
    }
}
