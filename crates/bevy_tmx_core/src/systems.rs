//! Reactive conversion of loaded maps.

use bevy::asset::RecursiveDependencyLoadState;
use bevy::prelude::*;
use bevy_tmx_assets::prelude::TmxMapAsset;

use crate::components::{RespawnTmxMap, TemplateRegistry, TmxMap, TmxMapError, TmxMapScene};
use crate::config::SceneConfig;
use crate::scene::convert_map;

/// Converts every `TmxMap` whose asset and textures finished loading.
///
/// Runs in `PreUpdate`. Maps are converted once and failures are recorded as
/// [`TmxMapError`]; add [`RespawnTmxMap`] to convert again, e.g. after the
/// template registry changed.
pub fn process_loaded_maps(
    asset_server: Res<AssetServer>,
    map_assets: Res<Assets<TmxMapAsset>>,
    registry: Res<TemplateRegistry>,
    config: Res<SceneConfig>,
    mut commands: Commands,
    map_query: Query<
        (Entity, &TmxMap),
        Or<((Without<TmxMapScene>, Without<TmxMapError>), With<RespawnTmxMap>)>,
    >,
) {
    for (map_entity, tmx_map) in map_query.iter() {
        let load_state = asset_server.get_recursive_dependency_load_state(&tmx_map.handle);
        match load_state {
            Some(RecursiveDependencyLoadState::Loaded) => {}
            Some(RecursiveDependencyLoadState::Failed(err)) => {
                error!("Map for entity {:?} failed to load: {}", map_entity, err);
                commands
                    .entity(map_entity)
                    .insert(TmxMapError(err.to_string()))
                    .remove::<RespawnTmxMap>();
                continue;
            }
            _ => continue,
        }

        let Some(map_asset) = map_assets.get(&tmx_map.handle) else {
            warn!("Map asset loaded but not found in Assets resource!");
            continue;
        };

        match convert_map(&map_asset.map, registry.as_ref(), &config) {
            Ok(scene) => {
                info!(
                    "Converted map for entity {:?} ({} layers)",
                    map_entity,
                    scene.layers.len()
                );
                commands
                    .entity(map_entity)
                    .insert(TmxMapScene(scene))
                    .remove::<(TmxMapError, RespawnTmxMap)>();
            }
            Err(err) => {
                error!("Failed to convert map for entity {:?}: {}", map_entity, err);
                commands
                    .entity(map_entity)
                    .insert(TmxMapError(err.to_string()))
                    .remove::<(TmxMapScene, RespawnTmxMap)>();
            }
        }
    }
}
