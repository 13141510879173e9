use std::path::Path;
use std::sync::Arc;

use bevy::{
    log::{debug, info, warn},
    math::{IVec2, UVec2, Vec2},
};

use crate::cache::ConversionCache;
use crate::codec::decode_gids;
use crate::error::TmxError;
use crate::format::{
    ChunkDocument, LayerDocument, LayerKind, MapDocument, MapObject, Orientation, Property, TileData,
    TilesetSource, parse_map, parse_tileset,
};
use crate::grid::reorder;
use crate::resolve::gid_table::{GID_INDEX_MASK, GidTable};
use crate::resolve::tileset::{ResolvedTileset, load_external_tileset, resolve_tileset};
use crate::source::TmxAssetSource;

/// A decoded chunk placed in the Y-up target grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedChunk {
    /// Cell of the chunk's bottom-left corner. Negative for infinite maps.
    pub origin: IVec2,
    /// Columns and rows after reordering; isometric chunks are transposed.
    pub size: UVec2,
    /// Row-major from the bottom row up, raw GIDs with flip bits.
    pub gids: Vec<u32>,
}

impl PlacedChunk {
    /// Non-empty cells as `(cell, raw gid)`.
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, u32)> + '_ {
        let width = self.size.x.max(1) as usize;
        self.gids
            .iter()
            .enumerate()
            .filter(|(_, gid)| **gid & GID_INDEX_MASK != 0)
            .map(move |(index, gid)| {
                let offset = IVec2::new((index % width) as i32, (index / width) as i32);
                (self.origin + offset, *gid)
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    Tiles(Vec<PlacedChunk>),
    /// Copied verbatim; property merging needs the GID table and happens later.
    Objects(Vec<MapObject>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembledLayer {
    pub id: u32,
    pub name: String,
    pub opacity: f32,
    pub visible: bool,
    pub offset: Vec2,
    pub width: u32,
    pub height: u32,
    pub properties: Vec<Property>,
    pub content: LayerContent,
}

/// A map with every tileset resolved and every payload decoded.
#[derive(Debug, Clone)]
pub struct AssembledMap {
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub infinite: bool,
    pub properties: Vec<Property>,
    pub gid_table: GidTable,
    pub layers: Vec<AssembledLayer>,
}

impl AssembledMap {
    pub fn tile_size(&self) -> UVec2 {
        UVec2::new(self.tile_width, self.tile_height)
    }
}

/// Read, parse and assemble the TMX at `path` with a fresh per-run cache.
pub fn import_map(path: &Path, source: &dyn TmxAssetSource) -> Result<AssembledMap, TmxError> {
    let text = source.read_text(path)?;
    let document = parse_map(&text)?;
    assemble_map(&document, path, source, &mut ConversionCache::new())
}

/// Read and resolve a standalone TSX.
pub fn import_tileset(
    path: &Path,
    source: &dyn TmxAssetSource,
) -> Result<ResolvedTileset, TmxError> {
    let text = source.read_text(path)?;
    let definition = parse_tileset(&text)?;
    resolve_tileset(&definition, path, source, &mut ConversionCache::new())
}

/// Resolve all tilesets into a GID table and decode every layer.
///
/// `map_path` anchors the relative references inside the document.
pub fn assemble_map(
    document: &MapDocument,
    map_path: &Path,
    source: &dyn TmxAssetSource,
    cache: &mut ConversionCache,
) -> Result<AssembledMap, TmxError> {
    let mut builder = GidTable::builder();
    for reference in &document.tilesets {
        let tileset = match &reference.source {
            TilesetSource::External(file) => load_external_tileset(map_path, file, source, cache)?,
            TilesetSource::Embedded(definition) => {
                Arc::new(resolve_tileset(definition, map_path, source, cache)?)
            }
        };
        builder.push_tileset(reference.first_gid, tileset)?;
    }
    let gid_table = builder.build();

    let layers = document
        .layers
        .iter()
        .map(|layer| {
            let content = match &layer.kind {
                LayerKind::Tiles(data) => LayerContent::Tiles(decode_layer(
                    document.orientation,
                    layer,
                    data,
                    &gid_table,
                )?),
                LayerKind::Objects(objects) => {
                    LayerContent::Objects(check_objects(objects, &gid_table)?)
                }
            };
            debug!("Decoded layer '{}' (id {})", layer.name, layer.id);
            Ok(AssembledLayer {
                id: layer.id,
                name: layer.name.clone(),
                opacity: layer.opacity,
                visible: layer.visible,
                offset: layer.offset,
                width: layer.width,
                height: layer.height,
                properties: layer.properties.clone(),
                content,
            })
        })
        .collect::<Result<Vec<_>, TmxError>>()?;

    info!(
        "Assembled map {}: {} layers, {} tilesets, {} GID slots",
        map_path.display(),
        layers.len(),
        gid_table.tilesets().len(),
        gid_table.len()
    );

    Ok(AssembledMap {
        orientation: document.orientation,
        width: document.width,
        height: document.height,
        tile_width: document.tile_width,
        tile_height: document.tile_height,
        infinite: document.infinite,
        properties: document.properties.clone(),
        gid_table,
        layers,
    })
}

fn decode_layer(
    orientation: Orientation,
    layer: &LayerDocument,
    data: &TileData,
    gid_table: &GidTable,
) -> Result<Vec<PlacedChunk>, TmxError> {
    data.chunks
        .iter()
        .map(|chunk| {
            let (origin, size) = place_chunk(chunk, orientation, layer.width, layer.height)?;
            let mut gids = decode_gids(
                &chunk.payload,
                data.encoding.as_deref(),
                data.compression.as_deref(),
            )?;
            let expected = (chunk.width as usize).checked_mul(chunk.height as usize);
            if expected != Some(gids.len()) {
                return Err(TmxError::CorruptData(format!(
                    "chunk at ({}, {}) holds {} tiles, expected {}x{}",
                    chunk.x,
                    chunk.y,
                    gids.len(),
                    chunk.width,
                    chunk.height
                )));
            }
            check_gids(&mut gids, gid_table)?;

            let gids = reorder(&gids, chunk.width as usize, orientation)?;
            Ok(PlacedChunk { origin, size, gids })
        })
        .collect()
}

/// Origin and size of a chunk in the Y-up target grid.
///
/// Orthogonal rows are flipped against the layer height; isometric chunks are
/// also transposed, which swaps the axes and the chunk's width and height.
/// Every cell of the placed chunk must be addressable with an `i32`.
fn place_chunk(
    chunk: &ChunkDocument,
    orientation: Orientation,
    layer_width: u32,
    layer_height: u32,
) -> Result<(IVec2, UVec2), TmxError> {
    let out_of_range = || {
        TmxError::CorruptData(format!(
            "chunk at ({}, {}) sized {}x{} lies outside the addressable grid",
            chunk.x, chunk.y, chunk.width, chunk.height
        ))
    };
    let signed = |value: u32| i32::try_from(value).map_err(|_| out_of_range());
    // extent - size - at, counted from the far edge
    let mirrored = |extent: i32, size: i32, at: i32| {
        extent
            .checked_sub(size)
            .and_then(|value| value.checked_sub(at))
            .ok_or_else(out_of_range)
    };

    let (x, y) = (chunk.x, chunk.y);
    let (w, h) = (signed(chunk.width)?, signed(chunk.height)?);
    let (layer_w, layer_h) = (signed(layer_width)?, signed(layer_height)?);

    let (origin, span) = match orientation {
        Orientation::Orthogonal => (IVec2::new(x, mirrored(layer_h, h, y)?), IVec2::new(w, h)),
        Orientation::Isometric => (
            IVec2::new(mirrored(layer_h, h, y)?, mirrored(layer_w, w, x)?),
            IVec2::new(h, w),
        ),
        Orientation::Hexagonal => (IVec2::new(x, y), IVec2::new(w, h)),
    };
    if origin.x.checked_add(span.x).is_none() || origin.y.checked_add(span.y).is_none() {
        return Err(out_of_range());
    }
    Ok((origin, span.as_uvec2()))
}

/// Every masked GID must index the table. GIDs landing on a placeholder are cleared.
fn check_gids(gids: &mut [u32], gid_table: &GidTable) -> Result<(), TmxError> {
    let mut cleared = 0;
    for gid in gids.iter_mut() {
        let index = *gid & GID_INDEX_MASK;
        gid_table.resolve(index)?;
        if gid_table.is_placeholder(index) {
            *gid = 0;
            cleared += 1;
        }
    }
    if cleared > 0 {
        warn!("{cleared} tiles reference empty tileset slots and were left blank");
    }
    Ok(())
}

fn check_objects(objects: &[MapObject], gid_table: &GidTable) -> Result<Vec<MapObject>, TmxError> {
    objects
        .iter()
        .map(|object| {
            let mut object = object.clone();
            let index = object.gid & GID_INDEX_MASK;
            gid_table.resolve(index)?;
            if gid_table.is_placeholder(index) {
                warn!(
                    "Object {} references empty tileset slot {}; treating it as a shape",
                    object.id, index
                );
                object.gid = 0;
            }
            Ok(object)
        })
        .collect()
}
