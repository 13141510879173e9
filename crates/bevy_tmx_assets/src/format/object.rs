//! `<object>` elements, shared by object layers and per-tile collision groups.

use bevy::math::Vec2;

use crate::error::TmxError;
use crate::format::properties::{Property, read_properties};
use crate::format::xml::Element;

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    Rectangle,
    Ellipse,
    Point,
    /// Points relative to the object position, Tiled's Y-down frame.
    Polygon(Vec<Vec2>),
    Polyline(Vec<Vec2>),
    Text(String),
}

/// An object as authored, positions in pixels with Y pointing down.
#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    pub id: u32,
    pub name: Option<String>,
    /// `type`, or `class` for maps saved by Tiled 1.9 and later.
    pub type_name: Option<String>,
    /// Raw GID including flip bits, 0 when the object is not a tile object.
    pub gid: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub visible: bool,
    pub shape: ObjectShape,
    pub properties: Vec<Property>,
}

pub fn read_object(element: &Element) -> Result<MapObject, TmxError> {
    if let Some(template) = element.attr("template") {
        return Err(TmxError::UnsupportedFeature(format!(
            "object templates are not supported (object references '{template}')"
        )));
    }

    let shape = if let Some(polygon) = element.child("polygon") {
        ObjectShape::Polygon(parse_points(polygon)?)
    } else if let Some(polyline) = element.child("polyline") {
        ObjectShape::Polyline(parse_points(polyline)?)
    } else if element.child("ellipse").is_some() {
        ObjectShape::Ellipse
    } else if element.child("point").is_some() {
        ObjectShape::Point
    } else if let Some(text) = element.child("text") {
        ObjectShape::Text(text.text.clone())
    } else {
        ObjectShape::Rectangle
    };

    Ok(MapObject {
        id: element.attr_or("id", 0)?,
        name: element.attr_string("name"),
        type_name: element
            .attr_string("type")
            .or_else(|| element.attr_string("class")),
        gid: element.attr_or("gid", 0)?,
        x: element.attr_or("x", 0.0)?,
        y: element.attr_or("y", 0.0)?,
        width: element.attr_or("width", 0.0)?,
        height: element.attr_or("height", 0.0)?,
        rotation: element.attr_or("rotation", 0.0)?,
        visible: element.flag("visible", true)?,
        shape,
        properties: read_properties(element)?,
    })
}

/// Parse a `points="x,y x,y ..."` attribute.
fn parse_points(element: &Element) -> Result<Vec<Vec2>, TmxError> {
    let raw = element.attr("points").unwrap_or_default();
    raw.split_whitespace()
        .map(|pair| {
            let malformed =
                || TmxError::MalformedDocument(format!("invalid polygon point '{pair}'"));
            let (x, y) = pair.split_once(',').ok_or_else(malformed)?;
            Ok(Vec2::new(
                x.parse().map_err(|_| malformed())?,
                y.parse().map_err(|_| malformed())?,
            ))
        })
        .collect()
}
