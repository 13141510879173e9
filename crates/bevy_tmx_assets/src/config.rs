use std::path::PathBuf;

use bevy::prelude::*;

/// Configuration for TMX/TSX imports.
#[derive(Resource, Clone, Debug)]
pub struct ImportConfig {
    /// Directory the filesystem source resolves asset paths against.
    ///
    /// Bevy serves assets from `assets/` by default, so that is the default here too.
    pub asset_root: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
        }
    }
}
