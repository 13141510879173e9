use bevy_tmx_assets::TmxError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error(transparent)]
    Import(#[from] TmxError),

    /// A bound property whose text does not parse as its declared type.
    #[error("Property '{name}' of type {type_name} has invalid value '{value}'")]
    PropertyValue {
        name: String,
        type_name: String,
        value: String,
    },
}
