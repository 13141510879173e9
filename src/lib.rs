//! # bevy_tmx
//!
//! Tiled TMX/TSX import pipeline for Bevy.
//!
//! This meta-crate combines the `bevy_tmx_*` sub-crates behind a single plugin.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_tmx::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(BevyTmxPlugin::default())
//!         .add_systems(Startup, spawn_map)
//!         .run();
//! }
//!
//! fn spawn_map(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.spawn(TmxMap {
//!         handle: asset_server.load("map.tmx"),
//!     });
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Layer 1** ([`assets`]): parsing, payload decoding, tileset resolution
//!   and GID table assembly for `.tmx` and `.tsx` files
//! - **Layer 2** ([`core`]): flip decoding, property merging, template binding
//!   and animation resampling into a [`core::scene::MapScene`]
//!
//! Rendering, physics and prefab instantiation stay with the host.

pub mod plugin;

// Re-export sub-crates for advanced usage
pub use bevy_tmx_assets as assets;
pub use bevy_tmx_core as core;

/// Unified prelude for bevy_tmx
pub mod prelude {
    pub use crate::assets::prelude::*;
    pub use crate::core::prelude::*;

    pub use crate::plugin::BevyTmxPlugin;
}
