use bevy::prelude::*;

use crate::assets::{map::TmxMapAsset, tileset::TsxTilesetAsset};
use crate::config::ImportConfig;
use crate::loaders::{map::TmxMapAssetLoader, tileset::TsxTilesetAssetLoader};

/// Plugin that registers the TMX/TSX asset types and loaders
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_tmx_assets::TmxAssetsPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(TmxAssetsPlugin::default())
///     .run();
/// ```
///
/// # What this plugin does
///
/// - Registers `TmxMapAsset` and `TsxTilesetAsset`
/// - Registers loaders for `.tmx` and `.tsx` files
/// - Inserts the [`ImportConfig`] resource
///
/// Turning a map into entities is Layer 2 (`bevy_tmx_core`).
#[derive(Default)]
pub struct TmxAssetsPlugin {
    pub config: ImportConfig,
}

impl TmxAssetsPlugin {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }
}

impl Plugin for TmxAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<TmxMapAsset>()
            .init_asset::<TsxTilesetAsset>();

        app.register_asset_loader(TmxMapAssetLoader {
            config: self.config.clone(),
        })
        .register_asset_loader(TsxTilesetAssetLoader {
            config: self.config.clone(),
        });

        app.insert_resource(self.config.clone());
    }
}
