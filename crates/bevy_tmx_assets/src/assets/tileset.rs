use bevy::{platform::collections::HashMap, prelude::*};

use crate::resolve::ResolvedTileset;
use crate::source::TextureKey;

/// A `.tsx` loaded on its own, outside of any map.
#[derive(TypePath, Asset, Debug)]
pub struct TsxTilesetAsset {
    pub tileset: ResolvedTileset,
    pub textures: HashMap<TextureKey, Handle<Image>>,
}
