use std::collections::BTreeSet;
use std::f32::consts::PI;

use bevy::math::{Quat, Vec2, Vec3};
use bevy_tmx_assets::{format::MapObject, resolve::AssembledMap};

use super::{SceneObject, TemplateBinding};
use crate::error::SceneError;
use crate::flip::decode_flip;
use crate::properties::merge_properties;
use crate::templates::{ComponentTemplates, TemplateCache};

/// Place one object on the Y-up grid and bind it to its template.
///
/// Tile objects are anchored at their bottom-left corner. Their flip bits turn
/// the object half way round the X (vertical) or Y (horizontal) axis, and the
/// position is moved back along the turned axis so the sprite keeps its bounds.
pub(super) fn convert_object<T: ComponentTemplates>(
    object: &MapObject,
    map: &AssembledMap,
    cache: &mut TemplateCache<T>,
    referenced: &mut BTreeSet<u32>,
) -> Result<SceneObject<T::Template>, SceneError> {
    let flags = decode_flip(object.gid);
    let tile = map.gid_table.resolve(object.gid)?;
    if tile.is_some() {
        referenced.insert(flags.index);
    }

    let type_name = object
        .type_name
        .clone()
        .or_else(|| tile.and_then(|tile| tile.type_name.clone()));
    let binding = match type_name {
        Some(type_name) => match cache.lookup(&type_name) {
            Some(template) => TemplateBinding::Template(template),
            None => TemplateBinding::Placeholder { type_name },
        },
        None => TemplateBinding::Untyped,
    };

    let name = match (&object.name, &binding) {
        (Some(name), _) => name.as_str(),
        (None, TemplateBinding::Placeholder { type_name }) => type_name.as_str(),
        (None, _) => "",
    };
    let display_name = format!("{name} {}", object.id).trim().to_string();

    let properties = match tile {
        Some(tile) => merge_properties(&object.properties, &tile.properties),
        None => object.properties.clone(),
    };

    let tile_size = map.tile_size().as_vec2();
    let map_height = map.height as f32;
    let size = Vec2::new(object.width, object.height) / tile_size;
    let mut rotation = Quat::from_rotation_z(-object.rotation.to_radians());

    let position = match tile {
        Some(_) => {
            if flags.vertical {
                rotation *= Quat::from_rotation_x(PI);
            }
            if flags.horizontal {
                rotation *= Quat::from_rotation_y(PI);
            }
            let mut position = Vec2::new(
                object.x / tile_size.x,
                map_height - object.y / tile_size.y,
            );
            if flags.horizontal {
                position -= (rotation * Vec3::X).truncate() * size.x;
            }
            if flags.vertical {
                position -= (rotation * Vec3::Y).truncate() * size.y;
            }
            position
        }
        None => Vec2::new(
            object.x / tile_size.x,
            map_height - object.y / tile_size.y - size.y,
        ),
    };

    Ok(SceneObject {
        id: object.id,
        display_name,
        binding,
        properties,
        position,
        rotation,
        size,
        tile_index: tile.map(|_| flags.index),
        sprite: tile.map(|tile| tile.sprite.clone()),
        shape: object.shape.clone(),
        visible: object.visible,
    })
}
