//! TMX map documents.

use bevy::math::Vec2;

use crate::error::TmxError;
use crate::format::object::{MapObject, read_object};
use crate::format::properties::{Property, read_properties};
use crate::format::tsx::{TilesetDocument, read_tileset};
use crate::format::xml::{self, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Orthogonal,
    Isometric,
    Hexagonal,
}

impl Orientation {
    pub fn from_attr(value: &str) -> Result<Self, TmxError> {
        match value {
            "orthogonal" => Ok(Self::Orthogonal),
            "isometric" => Ok(Self::Isometric),
            "hexagonal" => Ok(Self::Hexagonal),
            other => Err(TmxError::UnsupportedFeature(format!(
                "map orientation '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TilesetSource {
    /// Path of a `.tsx`, relative to the map.
    External(String),
    Embedded(TilesetDocument),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TilesetRef {
    pub first_gid: u32,
    pub source: TilesetSource,
}

/// A `<chunk>`, or the whole `<data>` of a finite layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDocument {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Encoded payload text, untouched.
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileData {
    pub encoding: Option<String>,
    pub compression: Option<String>,
    pub chunks: Vec<ChunkDocument>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Tiles(TileData),
    Objects(Vec<MapObject>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerDocument {
    pub id: u32,
    pub name: String,
    pub opacity: f32,
    pub visible: bool,
    pub offset: Vec2,
    pub width: u32,
    pub height: u32,
    pub properties: Vec<Property>,
    pub kind: LayerKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub infinite: bool,
    /// In declaration order.
    pub tilesets: Vec<TilesetRef>,
    /// In declaration order, bottom-most first.
    pub layers: Vec<LayerDocument>,
    pub properties: Vec<Property>,
}

pub fn parse_map(text: &str) -> Result<MapDocument, TmxError> {
    let root = xml::parse(text)?;
    root.expect_name("map")?;

    let orientation = Orientation::from_attr(&root.required::<String>("orientation")?)?;
    let width = root.required("width")?;
    let height = root.required("height")?;

    let tilesets = root
        .children_named("tileset")
        .map(read_tileset_ref)
        .collect::<Result<Vec<_>, _>>()?;

    let mut layers = Vec::new();
    for child in &root.children {
        match child.name.as_str() {
            "layer" => layers.push(read_tile_layer(child, width, height)?),
            "objectgroup" => layers.push(read_object_layer(child, width, height)?),
            _ => {}
        }
    }

    Ok(MapDocument {
        orientation,
        width,
        height,
        tile_width: root.required("tilewidth")?,
        tile_height: root.required("tileheight")?,
        infinite: root.flag("infinite", false)?,
        tilesets,
        layers,
        properties: read_properties(&root)?,
    })
}

fn read_tileset_ref(element: &Element) -> Result<TilesetRef, TmxError> {
    let first_gid = element.required("firstgid")?;
    let source = match element.attr_string("source") {
        Some(path) => TilesetSource::External(path),
        None => TilesetSource::Embedded(read_tileset(element)?),
    };
    Ok(TilesetRef { first_gid, source })
}

fn read_layer_header(
    element: &Element,
    map_width: u32,
    map_height: u32,
    kind: LayerKind,
) -> Result<LayerDocument, TmxError> {
    Ok(LayerDocument {
        id: element.attr_or("id", 0)?,
        name: element.attr_string("name").unwrap_or_default(),
        opacity: element.attr_or("opacity", 1.0)?,
        visible: element.flag("visible", true)?,
        offset: Vec2::new(
            element.attr_or("offsetx", 0.0)?,
            element.attr_or("offsety", 0.0)?,
        ),
        width: element.attr_or("width", map_width)?,
        height: element.attr_or("height", map_height)?,
        properties: read_properties(element)?,
        kind,
    })
}

fn read_tile_layer(
    element: &Element,
    map_width: u32,
    map_height: u32,
) -> Result<LayerDocument, TmxError> {
    let data = element.child("data").ok_or_else(|| {
        TmxError::MalformedDocument(format!(
            "tile layer '{}' has no <data>",
            element.attr("name").unwrap_or_default()
        ))
    })?;

    let width = element.attr_or("width", map_width)?;
    let height = element.attr_or("height", map_height)?;

    let mut chunks = data
        .children_named("chunk")
        .map(|chunk| {
            Ok(ChunkDocument {
                x: chunk.required("x")?,
                y: chunk.required("y")?,
                width: chunk.required("width")?,
                height: chunk.required("height")?,
                payload: chunk.text.clone(),
            })
        })
        .collect::<Result<Vec<_>, TmxError>>()?;

    // Finite layers store one flat grid; treat it as a single chunk at the origin.
    if chunks.is_empty() {
        chunks.push(ChunkDocument {
            x: 0,
            y: 0,
            width,
            height,
            payload: data.text.clone(),
        });
    }

    let tile_data = TileData {
        encoding: data.attr_string("encoding"),
        compression: data.attr_string("compression"),
        chunks,
    };
    read_layer_header(element, map_width, map_height, LayerKind::Tiles(tile_data))
}

fn read_object_layer(
    element: &Element,
    map_width: u32,
    map_height: u32,
) -> Result<LayerDocument, TmxError> {
    let objects = element
        .children_named("object")
        .map(read_object)
        .collect::<Result<Vec<_>, _>>()?;
    read_layer_header(element, map_width, map_height, LayerKind::Objects(objects))
}
