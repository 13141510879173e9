//! TSX tileset documents, also used for tilesets embedded in a TMX.

use bevy::math::Vec2;

use crate::error::TmxError;
use crate::format::object::{MapObject, read_object};
use crate::format::properties::{Property, read_properties};
use crate::format::xml::{self, Element};
use crate::resolve::GID_INDEX_MASK;

/// `<image source trans width height/>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Path relative to the document that declares it.
    pub source: String,
    /// Transparent colour key, `RRGGBB` without the leading `#`.
    pub transparent_color: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDef {
    /// Local tile id inside the same tileset.
    pub tile_id: u32,
    pub duration_ms: u32,
}

/// `<tile>` element of a tileset.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDef {
    pub id: u32,
    pub type_name: Option<String>,
    /// Per-tile image of an image-collection tileset.
    pub image: Option<ImageRef>,
    /// Shapes from the tile's `<objectgroup>`.
    pub collision: Vec<MapObject>,
    pub animation: Vec<FrameDef>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TilesetDocument {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    /// Declared count; may undercount collections and be stale for atlases.
    pub tile_count: Option<u32>,
    pub columns: Option<u32>,
    /// `<tileoffset x y/>` in pixels.
    pub tile_offset: Vec2,
    /// Single atlas image; `None` for image collections.
    pub image: Option<ImageRef>,
    /// Sorted by id.
    pub tiles: Vec<TileDef>,
    pub properties: Vec<Property>,
}

impl TilesetDocument {
    pub fn is_image_collection(&self) -> bool {
        self.image.is_none()
    }

    /// Tile count including undeclared gaps: `max(tilecount, highest id + 1)`.
    pub fn declared_extent(&self) -> u32 {
        let highest = self
            .tiles
            .iter()
            .filter_map(|tile| tile.id.checked_add(1))
            .max()
            .unwrap_or(0);
        self.tile_count.unwrap_or(0).max(highest)
    }

    pub fn tile(&self, id: u32) -> Option<&TileDef> {
        self.tiles
            .binary_search_by_key(&id, |tile| tile.id)
            .ok()
            .map(|index| &self.tiles[index])
    }
}

/// Parse a standalone `.tsx` document.
pub fn parse_tileset(text: &str) -> Result<TilesetDocument, TmxError> {
    let root = xml::parse(text)?;
    root.expect_name("tileset")?;
    read_tileset(&root)
}

/// Read a `<tileset>` element that carries its full definition.
pub fn read_tileset(element: &Element) -> Result<TilesetDocument, TmxError> {
    let tile_offset = match element.child("tileoffset") {
        Some(offset) => Vec2::new(offset.attr_or("x", 0.0)?, offset.attr_or("y", 0.0)?),
        None => Vec2::ZERO,
    };

    let image = element.child("image").map(read_image).transpose()?;

    let mut tiles = element
        .children_named("tile")
        .map(read_tile)
        .collect::<Result<Vec<_>, _>>()?;
    tiles.sort_by_key(|tile| tile.id);

    if let Some(pair) = tiles.windows(2).find(|pair| pair[0].id == pair[1].id) {
        return Err(TmxError::MalformedDocument(format!(
            "tile id {} is declared twice",
            pair[0].id
        )));
    }

    Ok(TilesetDocument {
        name: element.attr_string("name").unwrap_or_default(),
        tile_width: element.required("tilewidth")?,
        tile_height: element.required("tileheight")?,
        spacing: element.attr_or("spacing", 0)?,
        margin: element.attr_or("margin", 0)?,
        tile_count: element.parse_attr("tilecount")?,
        columns: element.parse_attr("columns")?,
        tile_offset,
        image,
        tiles,
        properties: read_properties(element)?,
    })
}

fn read_image(element: &Element) -> Result<ImageRef, TmxError> {
    Ok(ImageRef {
        source: element.required("source")?,
        transparent_color: element
            .attr("trans")
            .map(|color| color.trim_start_matches('#').to_string()),
        width: element.parse_attr("width")?,
        height: element.parse_attr("height")?,
    })
}

fn read_tile(element: &Element) -> Result<TileDef, TmxError> {
    let id: u32 = element.required("id")?;
    if id > GID_INDEX_MASK {
        return Err(TmxError::MalformedDocument(format!(
            "tile id {id} does not fit in a GID"
        )));
    }

    let collision = match element.child("objectgroup") {
        Some(group) => group
            .children_named("object")
            .map(read_object)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let animation = match element.child("animation") {
        Some(animation) => animation
            .children_named("frame")
            .map(|frame| {
                Ok(FrameDef {
                    tile_id: frame.required("tileid")?,
                    duration_ms: frame.required("duration")?,
                })
            })
            .collect::<Result<Vec<_>, TmxError>>()?,
        None => Vec::new(),
    };

    Ok(TileDef {
        id,
        type_name: element
            .attr_string("type")
            .or_else(|| element.attr_string("class")),
        image: element.child("image").map(read_image).transpose()?,
        collision,
        animation,
        properties: read_properties(element)?,
    })
}
