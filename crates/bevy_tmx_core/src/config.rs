use bevy::prelude::*;

/// Scene conversion settings.
///
/// One tile width is one world unit; cell heights follow the tile aspect ratio.
#[derive(Resource, Clone, Debug)]
pub struct SceneConfig {
    /// Mirror hexagonal tile layers vertically at render time.
    ///
    /// Hexagonal grids are never reordered, so the host flips them instead.
    pub hexagonal_render_flip: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            hexagonal_render_flip: true,
        }
    }
}
