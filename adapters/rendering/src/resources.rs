use std::collections::HashSet;

use blind_jump_core::{ResourceKind, ResourceMissing};

/// Textures the runtime draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureId {
    /// Sprite sheet holding every entity and fixture.
    GameObjects,
    /// Floor and wall tiles of generated levels.
    RegularTiles,
    /// Background art of the intro.
    IntroTiles,
    /// Radial light used for lamps, glows and beams.
    Glow,
    /// Darkened frame edges.
    Vignette,
    /// Soft shadow under the vignette.
    VignetteShadow,
}

impl TextureId {
    /// Every texture, in handle order.
    pub const ALL: [Self; 6] = [
        Self::GameObjects,
        Self::RegularTiles,
        Self::IntroTiles,
        Self::Glow,
        Self::Vignette,
        Self::VignetteShadow,
    ];

    const fn name(&self) -> &'static str {
        match self {
            Self::GameObjects => "game_objects",
            Self::RegularTiles => "regular_tiles",
            Self::IntroTiles => "intro_tiles",
            Self::Glow => "glow",
            Self::Vignette => "vignette",
            Self::VignetteShadow => "vignette_shadow",
        }
    }
}

/// Shader programs the runtime applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderId {
    /// Mixes a sprite towards a flat target colour.
    Color,
    /// Gaussian blur along the vertical axis.
    BlurVertical,
    /// Gaussian blur along the horizontal axis.
    BlurHorizontal,
    /// Removes colour saturation.
    Desaturate,
}

impl ShaderId {
    /// Every shader, in handle order.
    pub const ALL: [Self; 4] = [
        Self::Color,
        Self::BlurVertical,
        Self::BlurHorizontal,
        Self::Desaturate,
    ];

    const fn name(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::BlurVertical => "blur_vertical",
            Self::BlurHorizontal => "blur_horizontal",
            Self::Desaturate => "desaturate",
        }
    }
}

/// Fonts the runtime prints with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontId {
    /// Title card font.
    Title,
}

impl FontId {
    /// Every font, in handle order.
    pub const ALL: [Self; 1] = [Self::Title];

    const fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
        }
    }
}

/// Any resource the runtime requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// Texture resource.
    Texture(TextureId),
    /// Shader program.
    Shader(ShaderId),
    /// Font resource.
    Font(FontId),
}

impl ResourceId {
    /// Every resource that must be loaded before the frame loop starts.
    pub fn required() -> impl Iterator<Item = Self> {
        TextureId::ALL
            .into_iter()
            .map(Self::Texture)
            .chain(ShaderId::ALL.into_iter().map(Self::Shader))
            .chain(FontId::ALL.into_iter().map(Self::Font))
    }

    /// Error describing this resource as missing.
    #[must_use]
    pub fn missing(&self) -> ResourceMissing {
        let (kind, id) = match self {
            Self::Texture(texture) => (ResourceKind::Texture, texture.name()),
            Self::Shader(shader) => (ResourceKind::Shader, shader.name()),
            Self::Font(font) => (ResourceKind::Font, font.name()),
        };
        ResourceMissing {
            kind,
            id: id.to_owned(),
        }
    }
}

/// Opaque texture handle issued by a [`ResourceHandler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

/// Opaque shader handle issued by a [`ResourceHandler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShaderHandle(u32);

/// Opaque font handle issued by a [`ResourceHandler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontHandle(u32);

macro_rules! handle_accessors {
    ($($handle:ident),*) => {
        $(
            impl $handle {
                /// Creates a handle from its raw value.
                #[must_use]
                pub const fn new(value: u32) -> Self {
                    Self(value)
                }

                /// Raw value of the handle.
                #[must_use]
                pub const fn get(&self) -> u32 {
                    self.0
                }
            }
        )*
    };
}

handle_accessors!(TextureHandle, ShaderHandle, FontHandle);

/// Resolves resource identifiers to handles.
///
/// Lookups are infallible: every resource must be loaded before the frame
/// loop starts, which [`ResourceHandler::ensure_loaded`] verifies.
pub trait ResourceHandler {
    /// Handle of a texture.
    fn texture(&self, id: TextureId) -> TextureHandle;

    /// Handle of a shader.
    fn shader(&self, id: ShaderId) -> ShaderHandle;

    /// Handle of a font.
    fn font(&self, id: FontId) -> FontHandle;

    /// Reports whether a resource finished loading.
    fn is_loaded(&self, id: ResourceId) -> bool;

    /// Fails with the first required resource that is not loaded.
    fn ensure_loaded(&self) -> Result<(), ResourceMissing> {
        match ResourceId::required().find(|id| !self.is_loaded(*id)) {
            Some(missing) => Err(missing.missing()),
            None => Ok(()),
        }
    }
}

/// Resource table filled before the frame loop starts.
///
/// Handles are the position of the identifier in its `ALL` table.
#[derive(Clone, Debug, Default)]
pub struct PreloadedResources {
    loaded: HashSet<ResourceId>,
}

impl PreloadedResources {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with every required resource loaded.
    #[must_use]
    pub fn with_all() -> Self {
        Self {
            loaded: ResourceId::required().collect(),
        }
    }

    /// Marks a resource as loaded.
    pub fn load(&mut self, id: ResourceId) {
        let _ = self.loaded.insert(id);
    }
}

fn index_of<T: PartialEq>(all: &[T], id: &T) -> u32 {
    all.iter().position(|candidate| candidate == id).unwrap_or(0) as u32
}

impl ResourceHandler for PreloadedResources {
    fn texture(&self, id: TextureId) -> TextureHandle {
        TextureHandle(index_of(&TextureId::ALL, &id))
    }

    fn shader(&self, id: ShaderId) -> ShaderHandle {
        ShaderHandle(index_of(&ShaderId::ALL, &id))
    }

    fn font(&self, id: FontId) -> FontHandle {
        FontHandle(index_of(&FontId::ALL, &id))
    }

    fn is_loaded(&self, id: ResourceId) -> bool {
        self.loaded.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_table_passes_the_startup_check() {
        assert_eq!(PreloadedResources::with_all().ensure_loaded(), Ok(()));
    }

    #[test]
    fn missing_shader_is_reported_by_name() {
        let mut resources = PreloadedResources::new();
        for texture in TextureId::ALL {
            resources.load(ResourceId::Texture(texture));
        }
        let error = resources.ensure_loaded().expect_err("shaders are missing");
        assert_eq!(error.kind, ResourceKind::Shader);
        assert_eq!(error.id, "color");
        assert_eq!(error.to_string(), "shader `color` was not loaded");
    }

    #[test]
    fn handles_are_stable_per_identifier() {
        let resources = PreloadedResources::with_all();
        assert_eq!(resources.texture(TextureId::Glow).get(), 3);
        assert_eq!(resources.shader(ShaderId::Desaturate).get(), 3);
        assert_ne!(
            resources.texture(TextureId::Vignette),
            resources.texture(TextureId::VignetteShadow)
        );
    }
}
