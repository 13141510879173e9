//! Explicit property-to-field bindings.
//!
//! A component declares which Tiled properties it accepts by registering a
//! typed setter per property name. Applying a property list is then a lookup
//! in that table: no reflection, and unknown properties are simply ignored.
//!
//! ```rust
//! use bevy_tmx_assets::format::Property;
//! use bevy_tmx_core::properties::PropertyBindings;
//!
//! #[derive(Default)]
//! struct Door {
//!     locked: bool,
//!     key_name: String,
//! }
//!
//! let bindings = PropertyBindings::<Door>::new()
//!     .bool("Locked", |door, value| door.locked = value)
//!     .string("Key Name", |door, value| door.key_name = value);
//!
//! let mut door = Door::default();
//! let bound = bindings
//!     .apply(
//!         &[
//!             Property::new("locked", "bool", "true"),
//!             Property::new("keyname", "string", "red"),
//!         ],
//!         &mut door,
//!     )
//!     .unwrap();
//! assert_eq!(bound, 2);
//! assert!(door.locked);
//! assert_eq!(door.key_name, "red");
//! ```

use bevy::{log::debug, platform::collections::HashMap};
use bevy_tmx_assets::format::Property;

use crate::error::SceneError;

/// Lower-case the name and drop spaces, so `"Max Speed"` binds to `maxspeed`.
pub fn normalize_property_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

type Setter<C, T> = Box<dyn Fn(&mut C, T) + Send + Sync>;

/// A setter together with the Tiled type it accepts.
pub enum TypedSetter<C> {
    String(Setter<C, String>),
    Int(Setter<C, i64>),
    Float(Setter<C, f64>),
    Bool(Setter<C, bool>),
}

impl<C> TypedSetter<C> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
        }
    }

    fn set(&self, target: &mut C, property: &Property) -> Result<(), SceneError> {
        let invalid = || SceneError::PropertyValue {
            name: property.name.clone(),
            type_name: property.type_name.clone(),
            value: property.value.clone(),
        };
        let raw = property.value.trim();

        match self {
            Self::String(set) => set(target, property.value.clone()),
            Self::Int(set) => set(target, raw.parse().map_err(|_| invalid())?),
            Self::Float(set) => set(target, raw.parse().map_err(|_| invalid())?),
            Self::Bool(set) => set(
                target,
                match raw {
                    "true" | "1" => true,
                    "false" | "0" => false,
                    _ => return Err(invalid()),
                },
            ),
        }
        Ok(())
    }
}

/// Property name → typed setter table for one component type.
pub struct PropertyBindings<C> {
    setters: HashMap<String, TypedSetter<C>>,
}

impl<C> Default for PropertyBindings<C> {
    fn default() -> Self {
        Self {
            setters: HashMap::default(),
        }
    }
}

impl<C> PropertyBindings<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, name: &str, setter: TypedSetter<C>) -> Self {
        self.setters.insert(normalize_property_name(name), setter);
        self
    }

    pub fn string(self, name: &str, set: impl Fn(&mut C, String) + Send + Sync + 'static) -> Self {
        self.bind(name, TypedSetter::String(Box::new(set)))
    }

    pub fn int(self, name: &str, set: impl Fn(&mut C, i64) + Send + Sync + 'static) -> Self {
        self.bind(name, TypedSetter::Int(Box::new(set)))
    }

    pub fn float(self, name: &str, set: impl Fn(&mut C, f64) + Send + Sync + 'static) -> Self {
        self.bind(name, TypedSetter::Float(Box::new(set)))
    }

    pub fn bool(self, name: &str, set: impl Fn(&mut C, bool) + Send + Sync + 'static) -> Self {
        self.bind(name, TypedSetter::Bool(Box::new(set)))
    }

    pub fn len(&self) -> usize {
        self.setters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }

    /// Apply every property whose normalised name and declared type match a
    /// registered setter. Returns how many were bound.
    pub fn apply(&self, properties: &[Property], target: &mut C) -> Result<usize, SceneError> {
        let mut bound = 0;
        for property in properties {
            let Some(setter) = self.setters.get(&normalize_property_name(&property.name)) else {
                continue;
            };
            if setter.type_name() != property.type_name {
                debug!(
                    "Property '{}' is {} but its binding expects {}",
                    property.name,
                    property.type_name,
                    setter.type_name()
                );
                continue;
            }
            setter.set(target, property)?;
            bound += 1;
        }
        Ok(bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq)]
    struct Enemy {
        name: String,
        health: i32,
        speed: f32,
        boss: bool,
    }

    fn bindings() -> PropertyBindings<Enemy> {
        PropertyBindings::<Enemy>::new()
            .string("name", |enemy, value| enemy.name = value)
            .int("Health", |enemy, value| enemy.health = value as i32)
            .float("Move Speed", |enemy, value| enemy.speed = value as f32)
            .bool("boss", |enemy, value| enemy.boss = value)
    }

    #[test]
    fn test_normalize_property_name() {
        assert_eq!(normalize_property_name("Move Speed"), "movespeed");
        assert_eq!(normalize_property_name("HP"), "hp");
    }

    #[test]
    fn test_apply_matching_names_and_types() {
        let mut enemy = Enemy::default();
        let bound = bindings()
            .apply(
                &[
                    Property::new("Name", "string", "slime"),
                    Property::new("health", "int", "12"),
                    Property::new("movespeed", "float", "1.5"),
                    Property::new("boss", "bool", "false"),
                    Property::new("loot", "string", "gold"),
                ],
                &mut enemy,
            )
            .unwrap();

        assert_eq!(bound, 4);
        assert_eq!(
            enemy,
            Enemy {
                name: "slime".into(),
                health: 12,
                speed: 1.5,
                boss: false,
            }
        );
    }

    #[test]
    fn test_type_mismatch_is_skipped() {
        let mut enemy = Enemy::default();
        let bound = bindings()
            .apply(&[Property::new("health", "string", "12")], &mut enemy)
            .unwrap();
        assert_eq!(bound, 0);
        assert_eq!(enemy.health, 0);
    }

    #[test]
    fn test_unparsable_value_is_an_error() {
        let mut enemy = Enemy::default();
        let err = bindings()
            .apply(&[Property::new("health", "int", "many")], &mut enemy)
            .unwrap_err();
        assert!(matches!(err, SceneError::PropertyValue { .. }));
    }
}
