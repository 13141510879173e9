//! Minimal element tree on top of `xml-rs`.
//!
//! The tree is pure syntax: names, attributes, concatenated text and children.
//! The accessors encode Tiled's defaulting rules so the document readers never
//! have to special-case a missing attribute.

use std::str::FromStr;

use xml::reader::{EventReader, XmlEvent};

use crate::error::TmxError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

/// Parse a whole XML document and return its root element.
pub fn parse(text: &str) -> Result<Element, TmxError> {
    let reader = EventReader::new(text.as_bytes());
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    for event in reader {
        match event? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                stack.push(Element {
                    name: name.local_name,
                    attributes: attributes
                        .into_iter()
                        .map(|attr| (attr.name.local_name, attr.value))
                        .collect(),
                    ..Default::default()
                });
            }
            XmlEvent::EndElement { name } => {
                let Some(element) = stack.pop() else {
                    return Err(TmxError::MalformedDocument(format!(
                        "unexpected closing tag </{}>",
                        name.local_name
                    )));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            XmlEvent::Characters(chars) | XmlEvent::CData(chars) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&chars);
                }
            }
            _ => {}
        }
    }

    root.ok_or_else(|| TmxError::MalformedDocument("document has no root element".into()))
}

impl Element {
    /// Raw attribute value. Empty values count as absent.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn attr_string(&self, name: &str) -> Option<String> {
        self.attr(name).map(str::to_string)
    }

    /// Parse an optional attribute. Present but unparsable is a malformed document.
    pub fn parse_attr<T: FromStr>(&self, name: &str) -> Result<Option<T>, TmxError> {
        self.attr(name)
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|_| {
                    TmxError::MalformedDocument(format!(
                        "<{}> attribute '{}' has invalid value '{}'",
                        self.name, name, raw
                    ))
                })
            })
            .transpose()
    }

    pub fn attr_or<T: FromStr>(&self, name: &str, default: T) -> Result<T, TmxError> {
        Ok(self.parse_attr(name)?.unwrap_or(default))
    }

    pub fn required<T: FromStr>(&self, name: &str) -> Result<T, TmxError> {
        self.parse_attr(name)?.ok_or_else(|| {
            TmxError::MalformedDocument(format!(
                "<{}> is missing required attribute '{}'",
                self.name, name
            ))
        })
    }

    /// Tiled writes booleans as `0`/`1`; `true`/`false` are accepted as well.
    pub fn flag(&self, name: &str, default: bool) -> Result<bool, TmxError> {
        match self.attr(name).map(str::trim) {
            None => Ok(default),
            Some("1") | Some("true") => Ok(true),
            Some("0") | Some("false") => Ok(false),
            Some(other) => Err(TmxError::MalformedDocument(format!(
                "<{}> attribute '{}' is not a boolean: '{}'",
                self.name, name, other
            ))),
        }
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn expect_name(&self, name: &str) -> Result<(), TmxError> {
        if self.name == name {
            Ok(())
        } else {
            Err(TmxError::MalformedDocument(format!(
                "expected <{}> root element, found <{}>",
                name, self.name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_elements() {
        let root = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <map width="2"><layer name="ground"><data>AAAA</data></layer></map>"#,
        )
        .unwrap();

        assert_eq!(root.name, "map");
        assert_eq!(root.attr("width"), Some("2"));
        let layer = root.child("layer").unwrap();
        assert_eq!(layer.attr("name"), Some("ground"));
        assert_eq!(layer.child("data").unwrap().text, "AAAA");
    }

    #[test]
    fn test_missing_and_empty_attributes_are_none() {
        let root = parse(r#"<tile id="3" type=""/>"#).unwrap();
        assert_eq!(root.attr("type"), None);
        assert_eq!(root.attr("class"), None);
        assert_eq!(root.attr_or("spacing", 0u32).unwrap(), 0);
        assert_eq!(root.required::<u32>("id").unwrap(), 3);
    }

    #[test]
    fn test_required_attribute_errors() {
        let root = parse(r#"<tileset tilewidth="abc"/>"#).unwrap();
        assert!(matches!(
            root.required::<u32>("tileheight"),
            Err(TmxError::MalformedDocument(_))
        ));
        assert!(matches!(
            root.required::<u32>("tilewidth"),
            Err(TmxError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_flag_defaults() {
        let root = parse(r#"<layer visible="0"/>"#).unwrap();
        assert!(!root.flag("visible", true).unwrap());
        assert!(root.flag("locked", true).unwrap());
    }

    #[test]
    fn test_invalid_xml_is_malformed() {
        let err = parse("<map><layer></map>").unwrap_err();
        assert!(matches!(err, TmxError::MalformedDocument(_)));
    }
}
