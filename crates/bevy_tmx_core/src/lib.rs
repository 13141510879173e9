//! # `bevy_tmx_core`
//!
//! Layer 2 of `bevy_tmx`: turns an assembled map from `bevy_tmx_assets` into
//! a scene description. It decodes tile flip bits into poses, merges object
//! and tile properties, binds type names to host templates and resamples tile
//! animations to a fixed frame rate.
//!
//! **This crate does NOT render anything** - the host turns [`scene::MapScene`]
//! into sprites, colliders and animators.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use bevy_tmx_assets::{FileSystemSource, resolve::import_map};
//! use bevy_tmx_core::prelude::*;
//!
//! let map = import_map(Path::new("maps/level1.tmx"), &FileSystemSource::new("assets")).unwrap();
//! let scene = convert_map(&map, &NoTemplates, &SceneConfig::default()).unwrap();
//! for warning in &scene.warnings {
//!     eprintln!("{warning:?}");
//! }
//! ```

pub mod animation;
pub mod components;
pub mod config;
pub mod error;
pub mod flip;
pub mod plugin;
pub mod properties;
pub mod scene;
pub mod systems;
pub mod templates;

pub use config::SceneConfig;
pub use error::SceneError;
pub use plugin::TmxCorePlugin;

pub mod prelude {
    pub use crate::animation::AnimationTimeline;
    pub use crate::components::{
        RespawnTmxMap, TemplateRegistry, TmxMap, TmxMapError, TmxMapScene,
    };
    pub use crate::config::SceneConfig;
    pub use crate::error::SceneError;
    pub use crate::flip::{FlipFlags, TilePose, decode_flip};
    pub use crate::plugin::TmxCorePlugin;
    pub use crate::properties::{PropertyBindings, TypedSetter, merge_properties};
    pub use crate::scene::{
        CellLayout, MapScene, PlacedCell, SceneLayer, SceneLayerContent, SceneObject, SceneTile,
        TemplateBinding, convert_map,
    };
    pub use crate::templates::{ComponentTemplates, ConversionWarning, NoTemplates};
}
