//! Custom properties as authored in Tiled.

use bevy::log::warn;

use crate::error::TmxError;
use crate::format::xml::Element;

/// One `<property name type value/>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    /// Declared type, `"string"` when the attribute is absent.
    pub type_name: String,
    pub value: String,
}

/// A property value interpreted according to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// `#AARRGGBB` or `#RRGGBB` as written by Tiled.
    Color(String),
    File(String),
    /// Object reference by id, 0 when unset.
    Object(u32),
    /// Custom class or enum types are kept verbatim.
    Other { type_name: String, value: String },
}

impl Property {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    pub fn typed_value(&self) -> Result<PropertyValue, TmxError> {
        let invalid = || {
            TmxError::MalformedDocument(format!(
                "property '{}' of type {} has invalid value '{}'",
                self.name, self.type_name, self.value
            ))
        };
        let raw = self.value.trim();

        Ok(match self.type_name.as_str() {
            "string" => PropertyValue::String(self.value.clone()),
            "int" => PropertyValue::Int(raw.parse().map_err(|_| invalid())?),
            "float" => PropertyValue::Float(raw.parse().map_err(|_| invalid())?),
            "bool" => match raw {
                "true" | "1" => PropertyValue::Bool(true),
                "false" | "0" => PropertyValue::Bool(false),
                _ => return Err(invalid()),
            },
            "color" => PropertyValue::Color(raw.to_string()),
            "file" => PropertyValue::File(raw.to_string()),
            "object" => PropertyValue::Object(if raw.is_empty() {
                0
            } else {
                raw.parse().map_err(|_| invalid())?
            }),
            other => {
                warn!(
                    "Property '{}' has type '{}' which is kept as raw text",
                    self.name, other
                );
                PropertyValue::Other {
                    type_name: other.to_string(),
                    value: self.value.clone(),
                }
            }
        })
    }
}

/// Read the `<properties>` child of `element`, if any.
///
/// The value comes from the `value` attribute or, for multi-line strings,
/// from the element text.
pub fn read_properties(element: &Element) -> Result<Vec<Property>, TmxError> {
    let Some(properties) = element.child("properties") else {
        return Ok(Vec::new());
    };

    properties
        .children_named("property")
        .map(|property| {
            let name: String = property.required("name")?;
            let type_name = property.attr("type").unwrap_or("string").to_string();
            let value = match property.attributes.iter().find(|(key, _)| key == "value") {
                Some((_, value)) => value.clone(),
                None => property.text.clone(),
            };
            Ok(Property {
                name,
                type_name,
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::xml::parse;

    #[test]
    fn test_read_properties_defaults_type_to_string() {
        let root = parse(
            r#"<object><properties>
                <property name="speed" type="float" value="2.5"/>
                <property name="label" value="door"/>
                <property name="notes">line one
line two</property>
            </properties></object>"#,
        )
        .unwrap();

        let properties = read_properties(&root).unwrap();
        assert_eq!(properties.len(), 3);
        assert_eq!(properties[0], Property::new("speed", "float", "2.5"));
        assert_eq!(properties[1].type_name, "string");
        assert_eq!(properties[2].value, "line one\nline two");
    }

    #[test]
    fn test_empty_value_attribute_is_kept() {
        let root = parse(r#"<map><properties><property name="tag" value=""/></properties></map>"#)
            .unwrap();
        let properties = read_properties(&root).unwrap();
        assert_eq!(properties[0].value, "");
    }

    #[test]
    fn test_typed_values() {
        assert_eq!(
            Property::new("hp", "int", "12").typed_value().unwrap(),
            PropertyValue::Int(12)
        );
        assert_eq!(
            Property::new("solid", "bool", "true").typed_value().unwrap(),
            PropertyValue::Bool(true)
        );
        assert_eq!(
            Property::new("target", "object", "").typed_value().unwrap(),
            PropertyValue::Object(0)
        );
        assert!(matches!(
            Property::new("hp", "int", "lots").typed_value(),
            Err(TmxError::MalformedDocument(_))
        ));
    }
}
