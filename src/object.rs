use crate::error::MapError;
use crate::geom::{Line, Point};
use crate::properties::Properties;
use macroquad::prelude::*;

/// A rectangular map object in the level's world space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    /// Unique within the level.
    pub id: u32,
    /// Object name.
    pub name: String,
    /// Tiled class or type.
    pub kind: String,
    /// Position x in pixels.
    pub x: f64,
    /// Position y in pixels.
    pub y: f64,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Object properties.
    pub properties: Properties,
}

/// A polyline (or closed polygon) object and its boundary segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolylineObject {
    /// Unique within the level.
    pub id: u32,
    /// Object name.
    pub name: String,
    /// Tiled class or type.
    pub kind: String,
    /// Position x in pixels.
    pub x: f64,
    /// Position y in pixels.
    pub y: f64,
    /// Points string as written in the map document, `"x,y x,y ..."`.
    pub points: String,
    /// Segments in world space, layer offset applied.
    pub line_bounds: Vec<Line>,
    /// Object properties.
    pub properties: Properties,
}

impl PolylineObject {
    /// Parses `points` into segments translated by the object position plus `offset`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        name: impl Into<String>,
        kind: impl Into<String>,
        x: f64,
        y: f64,
        points: impl Into<String>,
        closed: bool,
        offset: Point,
    ) -> Result<Self, MapError> {
        let points = points.into();
        let origin = vec2(x as f32, y as f32) + offset;
        let line_bounds = points_to_lines(&points, origin, closed)?;
        Ok(PolylineObject {
            id,
            name: name.into(),
            kind: kind.into(),
            x,
            y,
            points,
            line_bounds,
            properties: Properties::new(),
        })
    }
}

/// Objects of one layer, sharing a pixel offset.
#[derive(Debug, Clone, Default)]
pub struct ObjectLayer {
    /// Layer name.
    pub name: String,
    /// Layer offset x in pixels.
    pub offset_x: f32,
    /// Layer offset y in pixels.
    pub offset_y: f32,
    /// Rectangle, point and tile objects.
    pub objects: Vec<Object>,
    /// Polyline and polygon objects.
    pub poly_objects: Vec<PolylineObject>,
    /// Layer properties.
    pub properties: Properties,
}

impl ObjectLayer {
    /// Layer offset as a point.
    pub fn offset(&self) -> Point {
        vec2(self.offset_x, self.offset_y)
    }

    /// Rectangle-like object by id.
    pub fn object_by_id(&self, id: u32) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == id)
    }
}

/// Parses `"x,y x,y ..."` into points.
pub fn parse_points(points: &str) -> Result<Vec<Point>, MapError> {
    let invalid = || MapError::InvalidPoints {
        points: points.to_owned(),
    };

    points
        .split_whitespace()
        .map(|pair| -> Result<Point, MapError> {
            let (x, y) = pair.split_once(',').ok_or_else(invalid)?;
            let x = x.trim().parse::<f32>().map_err(|_| invalid())?;
            let y = y.trim().parse::<f32>().map_err(|_| invalid())?;
            Ok(vec2(x, y))
        })
        .collect()
}

/// Connects consecutive points into segments, translated by `origin`.
pub fn points_to_lines(points: &str, origin: Point, closed: bool) -> Result<Vec<Line>, MapError> {
    let pts: Vec<Point> = parse_points(points)?
        .into_iter()
        .map(|p| p + origin)
        .collect();

    let mut lines: Vec<Line> = pts.windows(2).map(|w| Line::new(w[0], w[1])).collect();
    if closed && pts.len() > 2 {
        lines.push(Line::new(pts[pts.len() - 1], pts[0]));
    }
    Ok(lines)
}
