use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy::{log::debug, platform::collections::HashMap};

use crate::error::TmxError;
use crate::resolve::ResolvedTileset;
use crate::source::{LoadedImage, TmxAssetSource};

/// Resources already loaded during one conversion run.
///
/// A map that references the same external tileset or image several times
/// loads it once. The cache lives as long as the run that owns it; create a
/// fresh one per run instead of clearing a shared one.
#[derive(Debug, Default)]
pub struct ConversionCache {
    tilesets: HashMap<PathBuf, Arc<ResolvedTileset>>,
    images: HashMap<(PathBuf, Option<String>), LoadedImage>,
}

impl ConversionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tileset(&self, path: &Path) -> Option<Arc<ResolvedTileset>> {
        let hit = self.tilesets.get(path).cloned();
        if hit.is_some() {
            debug!("Tileset cache hit: {}", path.display());
        }
        hit
    }

    pub fn insert_tileset(&mut self, path: PathBuf, tileset: Arc<ResolvedTileset>) {
        self.tilesets.insert(path, tileset);
    }

    /// Load an image through `source` unless this run already did.
    pub fn image(
        &mut self,
        source: &dyn TmxAssetSource,
        path: &Path,
        transparent_color: Option<&str>,
    ) -> Result<LoadedImage, TmxError> {
        let key = (path.to_path_buf(), transparent_color.map(str::to_string));
        if let Some(image) = self.images.get(&key) {
            return Ok(image.clone());
        }
        let image = source.load_image(path, transparent_color)?;
        self.images.insert(key, image.clone());
        Ok(image)
    }

    pub fn tileset_count(&self) -> usize {
        self.tilesets.len()
    }
}
