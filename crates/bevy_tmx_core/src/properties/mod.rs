//! Property merging and explicit property bindings.

pub mod bindings;
pub mod merge;

pub use bindings::{PropertyBindings, TypedSetter, normalize_property_name};
pub use merge::merge_properties;
