//! Unified plugin for bevy_tmx.

use bevy::prelude::*;

use bevy_tmx_assets::{ImportConfig, TmxAssetsPlugin};
use bevy_tmx_core::{SceneConfig, TmxCorePlugin};

/// Adds asset loading ([`TmxAssetsPlugin`]) and scene conversion
/// ([`TmxCorePlugin`]).
///
/// # With Custom Configuration
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_tmx::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(
///         BevyTmxPlugin::default()
///             .with_scene(SceneConfig {
///                 hexagonal_render_flip: false,
///             })
///     )
///     .run();
/// ```
#[derive(Default)]
pub struct BevyTmxPlugin {
    /// Import configuration
    pub import: ImportConfig,

    /// Scene conversion configuration
    pub scene: SceneConfig,
}

impl BevyTmxPlugin {
    pub fn with_import(mut self, config: ImportConfig) -> Self {
        self.import = config;
        self
    }

    pub fn with_scene(mut self, config: SceneConfig) -> Self {
        self.scene = config;
        self
    }
}

impl Plugin for BevyTmxPlugin {
    fn build(&self, app: &mut App) {
        // Layer 1: Assets
        app.add_plugins(TmxAssetsPlugin::new(self.import.clone()));

        // Layer 2: Scene conversion
        app.add_plugins(TmxCorePlugin::new(self.scene.clone()));

        info!("BevyTmxPlugin initialized");
    }
}
