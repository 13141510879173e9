//! Components and resources the core plugin works with.

use bevy::{platform::collections::HashMap, prelude::*};
use bevy_tmx_assets::prelude::TmxMapAsset;

use crate::scene::MapScene;
use crate::templates::ComponentTemplates;

/// Root component for a Tiled map.
///
/// Spawn an entity with this component; once the map and its textures are
/// loaded a [`TmxMapScene`] is inserted next to it.
///
/// ```rust,no_run
/// # use bevy::prelude::*;
/// # use bevy_tmx_core::prelude::TmxMap;
/// fn spawn_map(mut commands: Commands, asset_server: Res<AssetServer>) {
///     commands.spawn(TmxMap {
///         handle: asset_server.load("maps/level1.tmx"),
///     });
/// }
/// ```
#[derive(Component)]
pub struct TmxMap {
    pub handle: Handle<TmxMapAsset>,
}

/// The converted scene; templates are the asset paths from [`TemplateRegistry`].
#[derive(Component, Debug)]
pub struct TmxMapScene(pub MapScene<String>);

/// Why the map could not be loaded or converted.
///
/// Failed maps are skipped until [`RespawnTmxMap`] is added.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct TmxMapError(pub String);

/// Marker component to force a map to be converted again.
#[derive(Component)]
pub struct RespawnTmxMap;

/// Type name → prefab asset path, used as the component template lookup.
#[derive(Resource, Default, Clone, Debug)]
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
}

impl TemplateRegistry {
    pub fn register(&mut self, type_name: impl Into<String>, asset_path: impl Into<String>) {
        self.templates.insert(type_name.into(), asset_path.into());
    }

    pub fn with(mut self, type_name: impl Into<String>, asset_path: impl Into<String>) -> Self {
        self.register(type_name, asset_path);
        self
    }
}

impl ComponentTemplates for TemplateRegistry {
    type Template = String;

    fn lookup(&self, type_name: &str) -> Option<String> {
        self.templates.get(type_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let registry = TemplateRegistry::default().with("Door", "prefabs/door.scn.ron");
        assert_eq!(
            registry.lookup("Door").as_deref(),
            Some("prefabs/door.scn.ron")
        );
        assert_eq!(registry.lookup("door"), None);
    }
}
