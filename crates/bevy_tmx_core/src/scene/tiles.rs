use std::collections::BTreeSet;

use bevy::platform::collections::HashMap;
use bevy_tmx_assets::{
    format::Orientation,
    resolve::{AssembledMap, PlacedChunk},
};

use super::{PlacedCell, SceneTile, TileLayerScene, hexagonal_render_flip};
use crate::animation::AnimationTimeline;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::flip::decode_flip;
use crate::templates::{ComponentTemplates, TemplateCache};

/// Flatten the layer's chunks into occupied cells, recording each tile used.
pub(super) fn convert_tile_layer(
    chunks: &[PlacedChunk],
    map: &AssembledMap,
    config: &SceneConfig,
    referenced: &mut BTreeSet<u32>,
) -> Result<TileLayerScene, SceneError> {
    let mut cells = Vec::new();
    for chunk in chunks {
        for (cell, gid) in chunk.cells() {
            let flags = decode_flip(gid);
            if map.gid_table.resolve(gid)?.is_none() {
                continue;
            }
            referenced.insert(flags.index);
            cells.push(PlacedCell {
                cell,
                index: flags.index,
                pose: flags.is_flipped().then(|| flags.pose()),
            });
        }
    }

    let render_transform = (map.orientation == Orientation::Hexagonal
        && config.hexagonal_render_flip)
        .then(hexagonal_render_flip);

    Ok(TileLayerScene {
        cells,
        render_transform,
    })
}

pub(super) fn collect_scene_tiles<T: ComponentTemplates>(
    map: &AssembledMap,
    referenced: &BTreeSet<u32>,
    cache: &mut TemplateCache<T>,
) -> HashMap<u32, SceneTile<T::Template>> {
    let mut tiles = HashMap::default();
    for &index in referenced {
        let Some(tile) = map.gid_table.tile(index) else {
            continue;
        };
        let template = tile
            .type_name
            .as_deref()
            .and_then(|type_name| cache.lookup(type_name));
        tiles.insert(
            index,
            SceneTile {
                sprite: tile.sprite.clone(),
                collision: tile.collision.clone(),
                animation: AnimationTimeline::from_frames(&tile.animation),
                type_name: tile.type_name.clone(),
                template,
                properties: tile.properties.clone(),
            },
        );
    }
    tiles
}
