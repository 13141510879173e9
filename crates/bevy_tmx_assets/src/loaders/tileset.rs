use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    tasks::ConditionalSendFuture,
};
use thiserror::Error;

use crate::assets::tileset::TsxTilesetAsset;
use crate::cache::ConversionCache;
use crate::config::ImportConfig;
use crate::error::TmxError;
use crate::format::parse_tileset;
use crate::loaders::{load_textures, read_document};
use crate::resolve::resolve_tileset;
use crate::source::FileSystemSource;

/// Asset loader for standalone Tiled tilesets (.tsx files)
#[derive(Default)]
pub struct TsxTilesetAssetLoader {
    pub config: ImportConfig,
}

#[derive(Debug, Error)]
pub enum TsxLoaderError {
    #[error("Failed to import tileset: {0}")]
    Import(#[from] TmxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetLoader for TsxTilesetAssetLoader {
    type Asset = TsxTilesetAsset;
    type Settings = ();
    type Error = TsxLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        async move {
            let text = read_document(reader).await?;
            let definition = parse_tileset(&text)?;

            let path = load_context.asset_path().path().to_path_buf();
            let source = FileSystemSource::from_config(&self.config);
            let tileset = resolve_tileset(&definition, &path, &source, &mut ConversionCache::new())?;

            let textures = load_textures(load_context, tileset.textures());
            Ok(TsxTilesetAsset { tileset, textures })
        }
    }

    fn extensions(&self) -> &[&str] {
        &["tsx"]
    }
}
