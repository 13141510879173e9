//! Conversion of an assembled map into the scene description a host consumes.
//!
//! All positions are in cell units on a Y-up grid: one tile width is one
//! unit horizontally and cells are `tile_height / tile_width` units tall.

mod objects;
mod tiles;

use std::collections::BTreeSet;

use bevy::{
    log::info,
    math::{IVec2, Mat4, Quat, UVec2, Vec2, Vec3},
    platform::collections::HashMap,
};
use bevy_tmx_assets::{
    format::{ObjectShape, Orientation, Property},
    resolve::{AssembledMap, LayerContent, TileSprite},
};

use crate::animation::AnimationTimeline;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::flip::TilePose;
use crate::templates::{ComponentTemplates, ConversionWarning, TemplateCache};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellLayout {
    Rectangle,
    Isometric,
    Hexagon,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneGrid {
    pub layout: CellLayout,
    pub cell_size: Vec2,
    /// Map size in cells.
    pub size: UVec2,
}

/// One occupied cell of a tile layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedCell {
    pub cell: IVec2,
    /// GID with the flip bits masked off; key into [`MapScene::tiles`].
    pub index: u32,
    /// Present only for flipped or rotated tiles.
    pub pose: Option<TilePose>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayerScene {
    pub cells: Vec<PlacedCell>,
    /// Extra transform for the whole layer, used for hexagonal maps.
    pub render_transform: Option<Mat4>,
}

/// How an object or tile type name was matched to a host template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateBinding<T> {
    Template(T),
    /// Typed, but the host has no template for the type.
    Placeholder { type_name: String },
    Untyped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject<T> {
    pub id: u32,
    pub display_name: String,
    pub binding: TemplateBinding<T>,
    /// Object properties merged over those of its tile.
    pub properties: Vec<Property>,
    pub position: Vec2,
    pub rotation: Quat,
    pub size: Vec2,
    /// Masked GID for tile objects.
    pub tile_index: Option<u32>,
    pub sprite: Option<TileSprite>,
    pub shape: ObjectShape,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneLayerContent<T> {
    Tiles(TileLayerScene),
    Objects(Vec<SceneObject<T>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayer<T> {
    pub id: u32,
    pub name: String,
    pub visible: bool,
    /// Layer index, bottom-most first.
    pub sort_order: i32,
    /// Layer opacity, used as the colour alpha.
    pub alpha: f32,
    /// Layer offset in cell units.
    pub offset: Vec2,
    pub properties: Vec<Property>,
    pub content: SceneLayerContent<T>,
}

/// Everything the host needs to render one tile referenced by the map.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneTile<T> {
    pub sprite: TileSprite,
    pub collision: Vec<Vec<Vec2>>,
    pub animation: Option<AnimationTimeline>,
    pub type_name: Option<String>,
    pub template: Option<T>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapScene<T> {
    pub grid: SceneGrid,
    pub layers: Vec<SceneLayer<T>>,
    /// Every tile used by a cell or a tile object, by masked GID.
    pub tiles: HashMap<u32, SceneTile<T>>,
    pub properties: Vec<Property>,
    /// Recovered problems, e.g. type names without a template.
    pub warnings: Vec<ConversionWarning>,
}

/// Convert an assembled map into a [`MapScene`].
///
/// Template lookups are cached for this call only; a missing template is a
/// warning, never an error.
pub fn convert_map<T: ComponentTemplates>(
    map: &AssembledMap,
    templates: &T,
    config: &SceneConfig,
) -> Result<MapScene<T::Template>, SceneError> {
    let mut cache = TemplateCache::new(templates);
    let mut referenced = BTreeSet::new();
    let tile_size = map.tile_size().as_vec2();

    let grid = SceneGrid {
        layout: match map.orientation {
            Orientation::Orthogonal => CellLayout::Rectangle,
            Orientation::Isometric => CellLayout::Isometric,
            Orientation::Hexagonal => CellLayout::Hexagon,
        },
        cell_size: Vec2::new(1.0, tile_size.y / tile_size.x),
        size: UVec2::new(map.width, map.height),
    };

    let mut layers = Vec::with_capacity(map.layers.len());
    for (index, layer) in map.layers.iter().enumerate() {
        let content = match &layer.content {
            LayerContent::Tiles(chunks) => {
                let scene = tiles::convert_tile_layer(chunks, map, config, &mut referenced)?;
                SceneLayerContent::Tiles(scene)
            }
            LayerContent::Objects(objects) => SceneLayerContent::Objects(
                objects
                    .iter()
                    .map(|object| {
                        objects::convert_object(object, map, &mut cache, &mut referenced)
                    })
                    .collect::<Result<Vec<_>, SceneError>>()?,
            ),
        };

        layers.push(SceneLayer {
            id: layer.id,
            name: layer.name.clone(),
            visible: layer.visible,
            sort_order: index as i32,
            alpha: layer.opacity,
            offset: Vec2::new(layer.offset.x / tile_size.x, -layer.offset.y / tile_size.y),
            properties: layer.properties.clone(),
            content,
        });
    }

    let tiles = tiles::collect_scene_tiles(map, &referenced, &mut cache);
    let warnings = cache.into_warnings();

    info!(
        "Converted map: {} layers, {} distinct tiles, {} warnings",
        layers.len(),
        tiles.len(),
        warnings.len()
    );

    Ok(MapScene {
        grid,
        layers,
        tiles,
        properties: map.properties.clone(),
        warnings,
    })
}

/// Vertical mirror applied to hexagonal layers.
fn hexagonal_render_flip() -> Mat4 {
    Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0))
}
