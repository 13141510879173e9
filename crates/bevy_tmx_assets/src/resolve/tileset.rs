use std::path::Path;
use std::sync::Arc;

use bevy::{
    log::{debug, warn},
    math::{URect, UVec2, Vec2},
};

use crate::cache::ConversionCache;
use crate::error::TmxError;
use crate::format::{MapObject, ObjectShape, Property, TileDef, TilesetDocument, parse_tileset};
use crate::source::{LoadedImage, TextureKey, TmxAssetSource, resolve_path};

/// Which rectangle of which texture a tile shows.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSprite {
    pub texture: TextureKey,
    pub texture_size: UVec2,
    /// Pixel rectangle with the origin at the bottom-left of the texture.
    pub rect: URect,
    /// Normalised pivot, `(0.5, 0.5)` is the centre.
    pub pivot: Vec2,
}

impl TileSprite {
    pub fn size(&self) -> UVec2 {
        self.rect.size()
    }

    /// The same rectangle with the origin at the top-left, as Bevy atlases expect.
    pub fn rect_top_down(&self) -> URect {
        let min_y = self.texture_size.y.saturating_sub(self.rect.max.y);
        URect::new(
            self.rect.min.x,
            min_y,
            self.rect.max.x,
            min_y + self.rect.height(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFrame {
    pub tile_id: u32,
    pub sprite: TileSprite,
    pub duration_ms: u32,
}

/// A tile with everything looked up: sprite, collision, animation, metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTile {
    /// Local id within its tileset.
    pub id: u32,
    pub sprite: TileSprite,
    pub type_name: Option<String>,
    /// Closed polygons in sprite-local pixels, Y measured from the tile bottom.
    pub collision: Vec<Vec<Vec2>>,
    pub animation: Vec<ResolvedFrame>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TilesetKind {
    Atlas(LoadedImage),
    Collection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTileset {
    pub name: String,
    pub tile_size: UVec2,
    pub columns: u32,
    pub rows: u32,
    pub pivot: Vec2,
    pub kind: TilesetKind,
    /// Indexed by local id; `None` marks a placeholder (gap in a collection).
    pub tiles: Vec<Option<ResolvedTile>>,
    pub properties: Vec<Property>,
}

impl ResolvedTileset {
    pub fn tile_count(&self) -> u32 {
        u32::try_from(self.tiles.len()).unwrap_or(u32::MAX)
    }

    pub fn tile(&self, id: u32) -> Option<&ResolvedTile> {
        self.tiles.get(id as usize).and_then(Option::as_ref)
    }

    /// Distinct textures used by this tileset, in first-use order.
    pub fn textures(&self) -> Vec<&TextureKey> {
        let mut textures: Vec<&TextureKey> = Vec::new();
        for tile in self.tiles.iter().flatten() {
            if !textures.contains(&&tile.sprite.texture) {
                textures.push(&tile.sprite.texture);
            }
        }
        textures
    }
}

/// Load an external TSX referenced from `document`, at most once per run.
pub fn load_external_tileset(
    document: &Path,
    reference: &str,
    source: &dyn TmxAssetSource,
    cache: &mut ConversionCache,
) -> Result<Arc<ResolvedTileset>, TmxError> {
    let path = resolve_path(document, reference);
    if let Some(tileset) = cache.tileset(&path) {
        return Ok(tileset);
    }

    let text = source.read_text(&path)?;
    let definition = parse_tileset(&text)?;
    let tileset = Arc::new(resolve_tileset(&definition, &path, source, cache)?);
    cache.insert_tileset(path, tileset.clone());
    Ok(tileset)
}

/// Resolve a parsed tileset. Image paths are relative to `document`.
pub fn resolve_tileset(
    definition: &TilesetDocument,
    document: &Path,
    source: &dyn TmxAssetSource,
    cache: &mut ConversionCache,
) -> Result<ResolvedTileset, TmxError> {
    if definition.tile_width == 0 || definition.tile_height == 0 {
        return Err(TmxError::MalformedDocument(format!(
            "tileset '{}' has a zero tile size",
            definition.name
        )));
    }
    let tile_size = UVec2::new(definition.tile_width, definition.tile_height);
    let pivot = Vec2::splat(0.5) - definition.tile_offset / tile_size.as_vec2();

    let (kind, columns, rows, sprites) = match &definition.image {
        Some(image) => {
            let path = resolve_path(document, &image.source);
            let atlas = cache.image(source, &path, image.transparent_color.as_deref())?;
            let (columns, rows, sprites) = slice_atlas(definition, &atlas, pivot)?;
            (TilesetKind::Atlas(atlas), columns, rows, sprites)
        }
        None => {
            let sprites = load_collection(definition, document, source, cache, pivot)?;
            let count = u32::try_from(sprites.len()).unwrap_or(u32::MAX);
            (TilesetKind::Collection, count, 1, sprites)
        }
    };

    let count = u32::try_from(sprites.len()).unwrap_or(u32::MAX);
    if let Some(stale) = definition.tiles.iter().find(|tile| tile.id >= count) {
        warn!(
            "Tileset '{}' declares tile {} but its atlas only holds {} tiles; ignoring",
            definition.name, stale.id, count
        );
    }

    let tiles = sprites
        .iter()
        .enumerate()
        .map(|(index, sprite)| {
            let Some(sprite) = sprite else {
                return Ok(None);
            };
            let id = u32::try_from(index).unwrap_or(u32::MAX);
            let tile = match definition.tile(id) {
                Some(def) => resolve_tile(definition, def, sprite, &sprites)?,
                None => ResolvedTile {
                    id,
                    sprite: sprite.clone(),
                    type_name: None,
                    collision: Vec::new(),
                    animation: Vec::new(),
                    properties: Vec::new(),
                },
            };
            Ok(Some(tile))
        })
        .collect::<Result<Vec<_>, TmxError>>()?;

    debug!(
        "Resolved tileset '{}': {} tiles ({}x{})",
        definition.name, count, columns, rows
    );

    Ok(ResolvedTileset {
        name: definition.name.clone(),
        tile_size,
        columns,
        rows,
        pivot,
        kind,
        tiles,
        properties: definition.properties.clone(),
    })
}

/// Cut a single atlas image into its grid of cells.
///
/// The cell count recomputed from the image supersedes the declared one.
/// Rows are addressed bottom-up: tile 0 sits in the top row of the image,
/// which is the highest row in texture space.
fn slice_atlas(
    definition: &TilesetDocument,
    atlas: &LoadedImage,
    pivot: Vec2,
) -> Result<(u32, u32, Vec<Option<TileSprite>>), TmxError> {
    let oversized = || {
        TmxError::CorruptData(format!(
            "tileset '{}' describes more tiles than can be addressed",
            definition.name
        ))
    };
    let margin = definition.margin;
    let stride_x = definition
        .tile_width
        .checked_add(definition.spacing)
        .ok_or_else(oversized)?;
    let stride_y = definition
        .tile_height
        .checked_add(definition.spacing)
        .ok_or_else(oversized)?;
    let columns = atlas.width.saturating_sub(margin) / stride_x;
    let rows = atlas.height.saturating_sub(margin) / stride_y;
    let cells = columns.checked_mul(rows).ok_or_else(oversized)?;
    let texture_size = UVec2::new(atlas.width, atlas.height);

    let sprites = (0..cells)
        .map(|index| {
            let col = index % columns;
            let row = rows - 1 - index / columns;
            let min = UVec2::new(col * stride_x + margin, row * stride_y + margin);
            Some(TileSprite {
                texture: atlas.texture.clone(),
                texture_size,
                rect: URect::from_corners(
                    min,
                    min + UVec2::new(definition.tile_width, definition.tile_height),
                ),
                pivot,
            })
        })
        .collect();

    Ok((columns, rows, sprites))
}

/// One texture per tile; ids without an image stay empty.
fn load_collection(
    definition: &TilesetDocument,
    document: &Path,
    source: &dyn TmxAssetSource,
    cache: &mut ConversionCache,
    pivot: Vec2,
) -> Result<Vec<Option<TileSprite>>, TmxError> {
    let mut sprites = vec![None; definition.declared_extent() as usize];

    for tile in &definition.tiles {
        let Some(image) = &tile.image else {
            continue;
        };
        let path = resolve_path(document, &image.source);
        let loaded = cache.image(source, &path, image.transparent_color.as_deref())?;
        let size = UVec2::new(loaded.width, loaded.height);
        let slot = sprites.get_mut(tile.id as usize).ok_or_else(|| {
            TmxError::CorruptData(format!(
                "tile {} lies outside tileset '{}'",
                tile.id, definition.name
            ))
        })?;
        *slot = Some(TileSprite {
            texture: loaded.texture,
            texture_size: size,
            rect: URect::from_corners(UVec2::ZERO, size),
            pivot,
        });
    }

    Ok(sprites)
}

fn resolve_tile(
    definition: &TilesetDocument,
    def: &TileDef,
    sprite: &TileSprite,
    sprites: &[Option<TileSprite>],
) -> Result<ResolvedTile, TmxError> {
    let height = sprite.rect.height() as f32;
    let collision = def
        .collision
        .iter()
        .filter_map(|shape| collision_polygon(shape, height))
        .collect();

    let animation = def
        .animation
        .iter()
        .map(|frame| {
            let referenced = sprites
                .get(frame.tile_id as usize)
                .and_then(Option::as_ref)
                .ok_or_else(|| {
                    TmxError::CorruptData(format!(
                        "tile {} of tileset '{}' animates to tile {} which does not exist",
                        def.id, definition.name, frame.tile_id
                    ))
                })?;
            Ok(ResolvedFrame {
                tile_id: frame.tile_id,
                sprite: referenced.clone(),
                duration_ms: frame.duration_ms,
            })
        })
        .collect::<Result<Vec<_>, TmxError>>()?;

    Ok(ResolvedTile {
        id: def.id,
        sprite: sprite.clone(),
        type_name: def.type_name.clone(),
        collision,
        animation,
        properties: def.properties.clone(),
    })
}

/// Convert a collision shape to a polygon in the `(x, height - y)` frame.
fn collision_polygon(shape: &MapObject, height: f32) -> Option<Vec<Vec2>> {
    match &shape.shape {
        ObjectShape::Rectangle if shape.width > 0.0 && shape.height > 0.0 => {
            let (x, y, w, h) = (shape.x, shape.y, shape.width, shape.height);
            Some(vec![
                Vec2::new(x, height - y),
                Vec2::new(x, height - y - h),
                Vec2::new(x + w, height - y - h),
                Vec2::new(x + w, height - y),
            ])
        }
        ObjectShape::Polygon(points) => Some(
            points
                .iter()
                .map(|point| Vec2::new(shape.x + point.x, height - shape.y - point.y))
                .collect(),
        ),
        other => {
            debug!("Skipping collision shape {:?} on object {}", other, shape.id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::source::MemorySource;

    fn resolve(text: &str, source: &MemorySource) -> Result<ResolvedTileset, TmxError> {
        let definition = parse_tileset(text)?;
        resolve_tileset(
            &definition,
            Path::new("tilesets/test.tsx"),
            source,
            &mut ConversionCache::new(),
        )
    }

    #[test]
    fn test_atlas_grid() {
        let source = MemorySource::new().with_image("tilesets/atlas.png", 64, 32);
        let tileset = resolve(
            r#"<tileset name="atlas" tilewidth="16" tileheight="16" spacing="0" margin="0" tilecount="3">
                <image source="atlas.png" width="64" height="32"/>
            </tileset>"#,
            &source,
        )
        .unwrap();

        assert_eq!(tileset.columns, 4);
        assert_eq!(tileset.rows, 2);
        assert_eq!(tileset.tile_count(), 8);

        let tile = tileset.tile(4).unwrap();
        assert_eq!(tile.sprite.rect, URect::new(0, 0, 16, 16));
        assert_eq!(tile.sprite.rect_top_down(), URect::new(0, 16, 16, 32));

        let first = tileset.tile(0).unwrap();
        assert_eq!(first.sprite.rect.min, UVec2::new(0, 16));
        assert_eq!(first.sprite.rect_top_down().min, UVec2::ZERO);
        assert_eq!(first.sprite.pivot, Vec2::splat(0.5));
        assert_eq!(
            first.sprite.texture.path,
            PathBuf::from("tilesets/atlas.png")
        );
    }

    #[test]
    fn test_atlas_margin_and_spacing() {
        let source = MemorySource::new().with_image("tilesets/atlas.png", 37, 19);
        let tileset = resolve(
            r#"<tileset name="spaced" tilewidth="16" tileheight="16" spacing="2" margin="1">
                <image source="atlas.png"/>
            </tileset>"#,
            &source,
        )
        .unwrap();

        assert_eq!((tileset.columns, tileset.rows), (2, 1));
        assert_eq!(tileset.tile(1).unwrap().sprite.rect.min, UVec2::new(19, 1));
    }

    #[test]
    fn test_collection_with_gaps() {
        let source = MemorySource::new()
            .with_image("tilesets/a.png", 32, 32)
            .with_image("tilesets/b.png", 16, 48);
        let tileset = resolve(
            r#"<tileset name="props" tilewidth="32" tileheight="48" tilecount="2" columns="0">
                <tile id="0"><image source="a.png"/></tile>
                <tile id="3"><image source="b.png"/></tile>
            </tileset>"#,
            &source,
        )
        .unwrap();

        assert_eq!(tileset.kind, TilesetKind::Collection);
        assert_eq!(tileset.tile_count(), 4);
        assert_eq!((tileset.columns, tileset.rows), (4, 1));
        assert!(tileset.tile(1).is_none());
        assert!(tileset.tile(2).is_none());
        assert_eq!(
            tileset.tile(3).unwrap().sprite.rect,
            URect::new(0, 0, 16, 48)
        );
        assert_eq!(tileset.textures().len(), 2);
    }

    #[test]
    fn test_pivot_from_tile_offset() {
        let source = MemorySource::new().with_image("tilesets/atlas.png", 32, 32);
        let tileset = resolve(
            r#"<tileset name="o" tilewidth="16" tileheight="32">
                <tileoffset x="4" y="-8"/>
                <image source="atlas.png"/>
            </tileset>"#,
            &source,
        )
        .unwrap();
        assert_eq!(tileset.pivot, Vec2::new(0.25, 0.75));
    }

    #[test]
    fn test_collision_shapes_flip_y() {
        let source = MemorySource::new().with_image("tilesets/atlas.png", 16, 16);
        let tileset = resolve(
            r#"<tileset name="c" tilewidth="16" tileheight="16">
                <image source="atlas.png"/>
                <tile id="0">
                  <objectgroup>
                    <object id="1" x="2" y="4" width="8" height="6"/>
                    <object id="2" x="1" y="1"><polygon points="0,0 4,0 4,3"/></object>
                    <object id="3" x="0" y="0"><ellipse/></object>
                  </objectgroup>
                </tile>
            </tileset>"#,
            &source,
        )
        .unwrap();

        let collision = &tileset.tile(0).unwrap().collision;
        assert_eq!(collision.len(), 2);
        assert_eq!(
            collision[0],
            vec![
                Vec2::new(2.0, 12.0),
                Vec2::new(2.0, 6.0),
                Vec2::new(10.0, 6.0),
                Vec2::new(10.0, 12.0)
            ]
        );
        assert_eq!(
            collision[1],
            vec![
                Vec2::new(1.0, 15.0),
                Vec2::new(5.0, 15.0),
                Vec2::new(5.0, 12.0)
            ]
        );
    }

    #[test]
    fn test_animation_frames_take_referenced_sprite() {
        let source = MemorySource::new().with_image("tilesets/atlas.png", 32, 16);
        let tileset = resolve(
            r#"<tileset name="water" tilewidth="16" tileheight="16">
                <image source="atlas.png"/>
                <tile id="0"><animation>
                  <frame tileid="0" duration="100"/>
                  <frame tileid="1" duration="250"/>
                </animation></tile>
            </tileset>"#,
            &source,
        )
        .unwrap();

        let frames = &tileset.tile(0).unwrap().animation;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].duration_ms, 250);
        assert_eq!(frames[1].sprite.rect, URect::new(16, 0, 32, 16));
    }

    #[test]
    fn test_animation_out_of_range_is_corrupt() {
        let source = MemorySource::new().with_image("tilesets/atlas.png", 32, 16);
        let err = resolve(
            r#"<tileset name="water" tilewidth="16" tileheight="16">
                <image source="atlas.png"/>
                <tile id="0"><animation><frame tileid="9" duration="100"/></animation></tile>
            </tileset>"#,
            &source,
        )
        .unwrap_err();
        assert!(matches!(err, TmxError::CorruptData(_)));
    }

    #[test]
    fn test_animation_into_collection_gap_is_corrupt() {
        let source = MemorySource::new().with_image("tilesets/a.png", 8, 8);
        let err = resolve(
            r#"<tileset name="gap" tilewidth="8" tileheight="8" tilecount="3">
                <tile id="0"><image source="a.png"/>
                  <animation><frame tileid="2" duration="100"/></animation>
                </tile>
            </tileset>"#,
            &source,
        )
        .unwrap_err();
        assert!(matches!(err, TmxError::CorruptData(_)));
    }

    #[test]
    fn test_missing_image_is_missing_asset() {
        let err = resolve(
            r#"<tileset name="t" tilewidth="16" tileheight="16"><image source="nope.png"/></tileset>"#,
            &MemorySource::new(),
        )
        .unwrap_err();
        assert!(matches!(err, TmxError::MissingAsset(_)));
    }

    #[test]
    fn test_external_tileset_loaded_once() {
        let source = MemorySource::new()
            .with_text(
                "tilesets/shared.tsx",
                r#"<tileset name="shared" tilewidth="16" tileheight="16"><image source="shared.png"/></tileset>"#,
            )
            .with_image("tilesets/shared.png", 16, 16);
        let mut cache = ConversionCache::new();

        let first =
            load_external_tileset(Path::new("maps/a.tmx"), "../tilesets/shared.tsx", &source, &mut cache)
                .unwrap();
        let second =
            load_external_tileset(Path::new("maps/b.tmx"), "../tilesets/shared.tsx", &source, &mut cache)
                .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.read_count("tilesets/shared.tsx"), 1);
        assert_eq!(cache.tileset_count(), 1);
    }

    #[test]
    fn test_collection_tile_past_extent_is_corrupt() {
        let source = MemorySource::new().with_image("tilesets/a.png", 8, 8);
        let mut definition = parse_tileset(
            r#"<tileset name="big" tilewidth="8" tileheight="8" tilecount="1">
                <tile id="0"><image source="a.png"/></tile>
            </tileset>"#,
        )
        .unwrap();
        definition.tiles[0].id = u32::MAX;

        let err = resolve_tileset(
            &definition,
            Path::new("tilesets/test.tsx"),
            &source,
            &mut ConversionCache::new(),
        )
        .unwrap_err();
        assert!(matches!(err, TmxError::CorruptData(_)));
    }

    #[test]
    fn test_atlas_stride_overflow_is_corrupt() {
        let source = MemorySource::new().with_image("tilesets/atlas.png", 16, 16);
        let err = resolve(
            r#"<tileset name="wide" tilewidth="4294967295" tileheight="16" spacing="1">
                <image source="atlas.png"/>
            </tileset>"#,
            &source,
        )
        .unwrap_err();
        assert!(matches!(err, TmxError::CorruptData(_)));
    }
}
