// src/loader/json_loader.rs
use crate::error::MapError;
use crate::ir_map::*;
use crate::properties::{Properties, Property};
use log::{debug, warn};
use macroquad::prelude::*;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

// Tiled stores flip flags in bits 29-31 of every gid
/// Strips the flip flags from a global id.
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits (bit 28 is free)

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    offsetx: f32,
    #[serde(default)]
    offsety: f32,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" expected here
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    objects: Vec<JsonObject>,
    #[serde(default)]
    image: String,
    #[serde(default)]
    imagewidth: u32,
    #[serde(default)]
    imageheight: u32,
}

fn default_true() -> bool {
    true
}

fn default_orientation() -> String {
    "orthogonal".to_owned()
}

fn default_render_order() -> String {
    "right-down".to_owned()
}

fn default_next_object_id() -> u32 {
    1
}

/// Either an embedded tileset or a reference to an external `.json` one.
#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(flatten)]
    embedded: Option<JsonTileset>,
}

#[derive(Deserialize)]
struct JsonMap {
    #[serde(default = "default_orientation")]
    orientation: String,
    #[serde(default = "default_render_order")]
    renderorder: String,
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default = "default_next_object_id")]
    nextobjectid: u32,
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonTilesetRef>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonTileset {
    tilewidth: u32,
    tileheight: u32,
    image: String,
    imagewidth: u32,
    imageheight: u32,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    point: bool,
    #[serde(default)]
    polygon: Vec<JsonObjectPoint>,
    #[serde(default)]
    polyline: Vec<JsonObjectPoint>,
    #[serde(default)]
    gid: Option<u32>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonObjectPoint {
    x: f32,
    y: f32,
}

#[derive(Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

/// Flattens a typed JSON property into a (type tag, string) pair.
fn json_property_to_ir(prop: JsonProperty) -> Result<(String, Property), MapError> {
    let JsonProperty { name, kind, value } = prop;

    let kind = match kind.as_deref() {
        None => "string",
        Some(k @ ("string" | "bool" | "int" | "float" | "file" | "color" | "object" | "class")) => k,
        Some(other) => {
            return Err(MapError::UnsupportedPropertyType {
                name,
                kind: other.to_owned(),
            });
        }
    };

    let value = match value {
        JsonValue::String(s) => s,
        other => other.to_string(),
    };

    Ok((name, Property::new(kind, value)))
}

fn properties_from_json(props: Vec<JsonProperty>) -> Result<Properties, MapError> {
    props.into_iter().map(json_property_to_ir).collect()
}

fn points_string(points: &[JsonObjectPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn object_to_ir(obj: JsonObject) -> Result<IrObject, MapError> {
    let shape = if let Some(gid) = obj.gid {
        IrObjectShape::Tile {
            gid: gid & GID_MASK,
        }
    } else if obj.point {
        IrObjectShape::Point
    } else if !obj.polygon.is_empty() {
        IrObjectShape::Polygon(points_string(&obj.polygon))
    } else if !obj.polyline.is_empty() {
        IrObjectShape::Polyline(points_string(&obj.polyline))
    } else {
        IrObjectShape::Rectangle
    };

    let class_name = if !obj.class.is_empty() {
        obj.class
    } else {
        obj.kind
    };

    Ok(IrObject {
        id: obj.id,
        name: obj.name,
        class_name,
        x: obj.x,
        y: obj.y,
        width: obj.width,
        height: obj.height,
        shape,
        properties: properties_from_json(obj.properties)?,
    })
}

fn tileset_to_ir(first_gid: u32, ts: JsonTileset) -> Result<IrTilesheet, MapError> {
    Ok(IrTilesheet {
        first_gid,
        image: ts.image,
        image_w: ts.imagewidth,
        image_h: ts.imageheight,
        tile_w: ts.tilewidth,
        tile_h: ts.tileheight,
        properties: properties_from_json(ts.properties)?,
        tiles: ts
            .tiles
            .into_iter()
            .map(|tile| -> Result<IrTileMetadata, MapError> {
                Ok(IrTileMetadata {
                    id: tile.id,
                    properties: properties_from_json(tile.properties)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn read_file(path: &Path) -> Result<String, MapError> {
    std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decodes a Tiled JSON map. External tilesets resolve against `base_dir`.
pub fn decode_map_str_to_ir(txt: &str, origin: &Path, base_dir: &Path) -> Result<IrLevel, MapError> {
    let j: JsonMap = serde_json::from_str(txt).map_err(|source| MapError::Json {
        path: origin.to_path_buf(),
        source,
    })?;

    // Build IR tilesheets, keeping declaration order
    let mut tilesheets = Vec::with_capacity(j.tilesets.len());
    for ts in j.tilesets {
        let def = match (ts.source, ts.embedded) {
            (Some(source), _) => {
                if !source.ends_with(".json") {
                    return Err(MapError::InvalidMap(format!(
                        "External tileset must be JSON: {source}"
                    )));
                }
                let ts_path = base_dir.join(&source);
                let ext_txt = read_file(&ts_path)?;
                serde_json::from_str(&ext_txt).map_err(|source| MapError::Json {
                    path: ts_path,
                    source,
                })?
            }
            (None, Some(embedded)) => embedded,
            (None, None) => {
                return Err(MapError::InvalidMap(format!(
                    "tileset with first gid {} has neither source nor image",
                    ts.firstgid
                )));
            }
        };
        tilesheets.push(tileset_to_ir(ts.firstgid, def)?);
    }

    // Build IR layers
    let mut layers = Vec::with_capacity(j.layers.len());
    for l in j.layers {
        let kind = match l.kind.as_deref().unwrap_or("tilelayer") {
            "tilelayer" => IrLayerKind::Tiles {
                width: l.width,
                height: l.height,
                data: l.data.iter().map(|gid| gid & GID_MASK).collect(),
            },
            "objectgroup" => IrLayerKind::Objects {
                objects: l
                    .objects
                    .into_iter()
                    .map(object_to_ir)
                    .collect::<Result<Vec<_>, _>>()?,
            },
            "imagelayer" => IrLayerKind::Image {
                image: l.image,
                image_w: l.imagewidth,
                image_h: l.imageheight,
            },
            other => {
                warn!("layer '{}' has unsupported type '{}'", l.name, other);
                IrLayerKind::Unsupported
            }
        };
        layers.push(IrLayer {
            name: l.name,
            visible: l.visible,
            offset: vec2(l.offsetx, l.offsety),
            properties: properties_from_json(l.properties)?,
            kind,
        });
    }

    debug!(
        "decoded {} map {}x{} with {} tilesets and {} layers",
        j.orientation,
        j.width,
        j.height,
        tilesheets.len(),
        layers.len()
    );

    Ok(IrLevel {
        orientation: j.orientation,
        render_order: j.renderorder,
        width: j.width,
        height: j.height,
        tile_w: j.tilewidth,
        tile_h: j.tileheight,
        offset: Vec2::ZERO,
        next_object_id: j.nextobjectid,
        properties: properties_from_json(j.properties)?,
        tilesheets,
        layers,
    })
}

/// Reads and decodes a `.json` map file; returns the IR and the map's directory.
pub fn decode_map_file_to_ir(path: impl AsRef<Path>) -> Result<(IrLevel, PathBuf), MapError> {
    let p = path.as_ref();
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(p.display().to_string()));
    }

    let txt = read_file(p)?;
    let map_dir = p
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    let ir = decode_map_str_to_ir(&txt, p, &map_dir)?;
    Ok((ir, map_dir))
}
