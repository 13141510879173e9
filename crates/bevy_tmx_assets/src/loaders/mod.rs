pub mod map;
pub mod tileset;

use std::io::{Error as IoError, ErrorKind};

use bevy::{
    asset::{LoadContext, io::Reader},
    platform::collections::HashMap,
    prelude::*,
};

use crate::source::{TextureKey, asset_path_string};

/// Read the whole asset as UTF-8 text.
async fn read_document(reader: &mut dyn Reader) -> Result<String, IoError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).await?;
    String::from_utf8(bytes).map_err(|err| IoError::new(ErrorKind::InvalidData, err))
}

/// Register every texture as a dependency of the asset being loaded.
fn load_textures<'a>(
    load_context: &mut LoadContext,
    keys: impl IntoIterator<Item = &'a TextureKey>,
) -> HashMap<TextureKey, Handle<Image>> {
    let mut textures = HashMap::default();
    for key in keys {
        if !textures.contains_key(key) {
            let handle: Handle<Image> = load_context.load(asset_path_string(&key.path));
            textures.insert(key.clone(), handle);
        }
    }
    textures
}
