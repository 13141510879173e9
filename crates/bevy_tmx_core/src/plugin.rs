//! Plugin for `bevy_tmx_core`.

use bevy::prelude::*;

use crate::components::TemplateRegistry;
use crate::config::SceneConfig;
use crate::systems::process_loaded_maps;

/// Plugin for the `bevy_tmx_core` scene conversion.
///
/// Add this plugin after `TmxAssetsPlugin`.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_tmx_assets::TmxAssetsPlugin;
/// use bevy_tmx_core::{SceneConfig, TmxCorePlugin};
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(TmxAssetsPlugin::default())
///     .add_plugins(TmxCorePlugin::new(SceneConfig {
///         hexagonal_render_flip: false,
///     }))
///     .run();
/// ```
#[derive(Default)]
pub struct TmxCorePlugin {
    pub config: SceneConfig,
}

impl TmxCorePlugin {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }
}

impl Plugin for TmxCorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .init_resource::<TemplateRegistry>()
            .add_systems(PreUpdate, process_loaded_maps);
    }
}
