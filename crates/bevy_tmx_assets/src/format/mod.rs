//! Typed TMX/TSX documents.
//!
//! This is the syntax layer: attributes are read and defaulted here, but no
//! file is loaded and no payload is decoded.

pub mod object;
pub mod properties;
pub mod tmx;
pub mod tsx;
pub mod xml;

pub use object::{MapObject, ObjectShape};
pub use properties::{Property, PropertyValue};
pub use tmx::{
    ChunkDocument, LayerDocument, LayerKind, MapDocument, Orientation, TileData, TilesetRef,
    TilesetSource, parse_map,
};
pub use tsx::{FrameDef, ImageRef, TileDef, TilesetDocument, parse_tileset};
