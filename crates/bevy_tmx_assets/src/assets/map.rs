use bevy::{platform::collections::HashMap, prelude::*};

use crate::resolve::AssembledMap;
use crate::source::TextureKey;

#[derive(TypePath, Asset, Debug)]
pub struct TmxMapAsset {
    /// Tilesets resolved, layers decoded and placed in the Y-up frame.
    pub map: AssembledMap,

    /// One image handle per texture referenced by the map's tilesets.
    /// Transparent colour keys stay in the key; applying them is up to the renderer.
    pub textures: HashMap<TextureKey, Handle<Image>>,
}

impl TmxMapAsset {
    pub fn texture(&self, key: &TextureKey) -> Option<&Handle<Image>> {
        self.textures.get(key)
    }
}
