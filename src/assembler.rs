//! Places every cell of a layer mapping on screen.

use crate::error::MapError;
use crate::layer::{PlacedTile, TileLayer};
use crate::level::Level;
use crate::properties::Properties;
use crate::tileset::Tileset;
use macroquad::prelude::*;
use std::sync::Arc;

/// A parsed tile layer: one global tile id per cell, row-major, `0` for blank.
#[derive(Debug, Clone, Default)]
pub struct LayerMapping {
    /// Layer name from the map document.
    pub name: String,
    /// Declared width in cells.
    pub width: u32,
    /// Declared height in cells.
    pub height: u32,
    /// Global tile ids, row-major.
    pub tile_mapping: Vec<u32>,
    /// Layer properties.
    pub properties: Properties,
}

impl LayerMapping {
    /// A mapping with no properties.
    pub fn new(name: impl Into<String>, width: u32, height: u32, tile_mapping: Vec<u32>) -> Self {
        LayerMapping {
            name: name.into(),
            width,
            height,
            tile_mapping,
            properties: Properties::new(),
        }
    }
}

/// Builds one positioned tile layer.
///
/// Cells are walked over the level's grid. Each non-blank cell is projected
/// through the level, offset included, then raised by the amount its image
/// is taller than the grid tile so that oversized tiles stand on their cell.
/// The layer takes the level's grid size. Nothing is returned for the
/// layer if any cell fails, or if the level's orientation is unsupported.
pub fn assemble_layer(
    level: &Level,
    mapping: &LayerMapping,
    tileset: &Tileset,
) -> Result<TileLayer, MapError> {
    let width = level.width() as usize;
    let height = level.height() as usize;
    let expected = width * height;
    if mapping.tile_mapping.len() < expected {
        return Err(MapError::InvalidLayerSize {
            layer: mapping.name.clone(),
            expected,
            actual: mapping.tile_mapping.len(),
        });
    }

    level.projection()?;

    let grid_tile_h = level.tile_height() as f32;
    let mut tiles = Vec::with_capacity(expected);

    for row in 0..height {
        for x in 0..width {
            let idx = x + row * width;
            let tile_id = match (mapping.tile_mapping[idx] as usize).checked_sub(1) {
                Some(id) => id,
                None => {
                    tiles.push(PlacedTile::blank());
                    continue;
                }
            };

            let atlas = tileset
                .get(tile_id)
                .ok_or_else(|| MapError::TileIndexOutOfRange {
                    layer: mapping.name.clone(),
                    tile_id,
                    tileset_len: tileset.len(),
                })?;

            let mut point = level.map_to_position(vec2(x as f32, row as f32))?;
            point.y -= atlas.height() - grid_tile_h;
            tiles.push(PlacedTile::placed(point, Arc::clone(atlas)));
        }
    }

    Ok(TileLayer {
        name: mapping.name.clone(),
        width: level.width(),
        height: level.height(),
        tiles,
        properties: mapping.properties.clone(),
    })
}

/// Builds every layer independently; one failing layer does not stop the rest.
pub fn assemble_layers(
    level: &Level,
    mappings: &[LayerMapping],
    tileset: &Tileset,
) -> Vec<Result<TileLayer, MapError>> {
    mappings
        .iter()
        .map(|mapping| assemble_layer(level, mapping, tileset))
        .collect()
}
