//! Tileset resolution and map assembly.

pub mod gid_table;
pub mod map;
pub mod tileset;

pub use gid_table::{GID_INDEX_MASK, GidTable, GidTableBuilder, TileRef};
pub use map::{
    AssembledLayer, AssembledMap, LayerContent, PlacedChunk, assemble_map, import_map,
    import_tileset,
};
pub use tileset::{
    ResolvedFrame, ResolvedTile, ResolvedTileset, TileSprite, TilesetKind, load_external_tileset,
    resolve_tileset,
};
