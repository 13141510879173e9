use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    log::info,
    tasks::ConditionalSendFuture,
};
use thiserror::Error;

use crate::assets::map::TmxMapAsset;
use crate::cache::ConversionCache;
use crate::config::ImportConfig;
use crate::error::TmxError;
use crate::format::parse_map;
use crate::loaders::{load_textures, read_document};
use crate::resolve::assemble_map;
use crate::source::FileSystemSource;

/// Asset loader for Tiled maps (.tmx files)
///
/// The map itself comes through Bevy's reader. External tilesets and image
/// headers are read below [`ImportConfig::asset_root`], and every texture is
/// registered as a load dependency.
#[derive(Default)]
pub struct TmxMapAssetLoader {
    pub config: ImportConfig,
}

#[derive(Debug, Error)]
pub enum TmxLoaderError {
    #[error("Failed to import map: {0}")]
    Import(#[from] TmxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetLoader for TmxMapAssetLoader {
    type Asset = TmxMapAsset;
    type Settings = ();
    type Error = TmxLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        async move {
            let text = read_document(reader).await?;
            let document = parse_map(&text)?;

            // One cache per load: each map import is its own conversion run
            let map_path = load_context.asset_path().path().to_path_buf();
            let source = FileSystemSource::from_config(&self.config);
            let map = assemble_map(&document, &map_path, &source, &mut ConversionCache::new())?;

            let textures = load_textures(
                load_context,
                map.gid_table
                    .tilesets()
                    .iter()
                    .flat_map(|tileset| tileset.textures()),
            );
            info!(
                "Loaded map {} with {} textures",
                map_path.display(),
                textures.len()
            );

            Ok(TmxMapAsset { map, textures })
        }
    }

    fn extensions(&self) -> &[&str] {
        &["tmx"]
    }
}
