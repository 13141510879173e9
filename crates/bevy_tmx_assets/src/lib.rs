//! # `bevy_tmx_assets`
//!
//! Layer 1 of `bevy_tmx`: turns Tiled TMX maps and TSX tilesets into decoded,
//! fully resolved data. No entities are spawned here.
//!
//! ## Pipeline
//!
//! 1. [`format`] parses the XML into typed documents.
//! 2. [`codec`] decodes base64 layer payloads, optionally gzip/zlib compressed.
//! 3. [`grid`] reorders the top-down GID grids into the Y-up target frame.
//! 4. [`resolve`] loads tilesets (external ones once per run), slices atlases,
//!    and builds the GID table the layers index into.
//!
//! File and image access goes through [`TmxAssetSource`], so the pipeline runs
//! the same against the filesystem, Bevy's asset loaders or in-memory fixtures.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use bevy_tmx_assets::prelude::*;
//!
//! let source = FileSystemSource::new("assets");
//! let map = import_map(Path::new("maps/level1.tmx"), &source).unwrap();
//! println!("{} layers", map.layers.len());
//! ```

pub mod assets;
pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod grid;
pub mod loaders;
pub mod plugin;
pub mod resolve;
pub mod source;

pub use cache::ConversionCache;
pub use config::ImportConfig;
pub use error::TmxError;
pub use plugin::TmxAssetsPlugin;
pub use source::{FileSystemSource, LoadedImage, MemorySource, TextureKey, TmxAssetSource};

pub mod prelude {
    pub use crate::assets::{map::TmxMapAsset, tileset::TsxTilesetAsset};
    pub use crate::cache::ConversionCache;
    pub use crate::config::ImportConfig;
    pub use crate::error::TmxError;
    pub use crate::format::{MapObject, ObjectShape, Orientation, Property, PropertyValue};
    pub use crate::plugin::TmxAssetsPlugin;
    pub use crate::resolve::{
        AssembledLayer, AssembledMap, GidTable, LayerContent, PlacedChunk, ResolvedTile,
        ResolvedTileset, TileSprite, assemble_map, import_map, import_tileset,
    };
    pub use crate::source::{FileSystemSource, MemorySource, TextureKey, TmxAssetSource};
}
