//! Full-screen post-processing selection.
//!
//! Menus blur and desaturate the frame behind them. The blurred frame is
//! stashed the first time it is produced and replayed while the menu stays
//! open. Pressing escape stashes the current frame one frame early so the
//! menu opens without recomputing the blur.

use crate::{DrawCall, Drawable, RenderTarget, ResourceHandler, ShaderId, ShaderUse, Color};

/// Interface state that drives post-processing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UiEffects {
    /// Blur strength in `[0, 1]`.
    pub blur: f32,
    /// Desaturation strength in `[0, 1]`.
    pub desaturate: f32,
    /// A menu or stats screen covers the frame.
    pub menu_open: bool,
}

/// One post-processing step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PostPass {
    /// Vertical blur.
    BlurVertical(f32),
    /// Horizontal blur.
    BlurHorizontal(f32),
    /// Desaturation.
    Desaturate(f32),
    /// Store the processed frame for reuse.
    Stash,
    /// Present the stored frame instead of processing again.
    ReplayStash,
}

/// Chooses post-processing passes frame by frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PostProcessor {
    stash_valid: bool,
}

impl PostProcessor {
    /// Creates a processor with an empty stash.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether a processed frame is stashed.
    #[must_use]
    pub fn has_stash(&self) -> bool {
        self.stash_valid
    }

    /// Passes to run this frame.
    pub fn plan(&mut self, ui: &UiEffects, escape_pressed: bool) -> Vec<PostPass> {
        if ui.menu_open && self.stash_valid {
            return vec![PostPass::ReplayStash];
        }

        let mut passes = Vec::new();
        if ui.blur > 0.0 {
            passes.push(PostPass::BlurVertical(ui.blur));
            passes.push(PostPass::BlurHorizontal(ui.blur));
        }
        if ui.desaturate > 0.0 {
            passes.push(PostPass::Desaturate(ui.desaturate));
        }

        if ui.menu_open || escape_pressed {
            passes.push(PostPass::Stash);
            self.stash_valid = true;
        } else {
            self.stash_valid = false;
        }
        passes
    }
}

/// Submits planned passes to `target`, binding the matching shaders.
pub fn submit(passes: &[PostPass], resources: &dyn ResourceHandler, target: &mut dyn RenderTarget) {
    for pass in passes {
        let (shader, amount) = match *pass {
            PostPass::BlurVertical(amount) => (ShaderId::BlurVertical, amount),
            PostPass::BlurHorizontal(amount) => (ShaderId::BlurHorizontal, amount),
            PostPass::Desaturate(amount) => (ShaderId::Desaturate, amount),
            PostPass::Stash | PostPass::ReplayStash => {
                target.draw(DrawCall::plain(Drawable::Pass));
                continue;
            }
        };
        target.draw(DrawCall::plain(Drawable::Pass).shaded(ShaderUse {
            shader: resources.shader(shader),
            amount,
            target: Color::WHITE,
        }));
    }
}
