use crate::error::MapError;
use crate::geom::{Aabb, Point};
use crate::level::Level;
use crate::properties::Properties;
use crate::tileset::AtlasTile;
use macroquad::prelude::*;
use std::sync::Arc;

/// One cell of a layer. Blank cells have neither a point nor a tile.
#[derive(Debug, Clone, Default)]
pub struct PlacedTile {
    /// Top-left screen position of the image.
    pub point: Option<Point>,
    /// Shared atlas tile.
    pub tile: Option<Arc<AtlasTile>>,
    /// Cell properties, seeded from the atlas tile.
    pub properties: Properties,
}

impl PlacedTile {
    /// An empty cell.
    pub fn blank() -> Self {
        Self::default()
    }

    /// A placed tile starts with a copy of its atlas tile's properties.
    pub fn placed(point: Point, tile: Arc<AtlasTile>) -> Self {
        let properties = tile.properties().clone();
        PlacedTile {
            point: Some(point),
            tile: Some(tile),
            properties,
        }
    }

    /// Whether the cell holds no tile.
    pub fn is_blank(&self) -> bool {
        self.tile.is_none()
    }

    /// Whether the cell's `walkable` property is exactly `"true"`.
    pub fn is_walkable(&self) -> bool {
        self.properties.is_walkable()
    }

    /// Image width, zero when blank.
    pub fn width(&self) -> f32 {
        self.tile.as_ref().map_or(0.0, |t| t.width())
    }

    /// Image height, zero when blank.
    pub fn height(&self) -> f32 {
        self.tile.as_ref().map_or(0.0, |t| t.height())
    }

    /// Screen rectangle covered by the tile image.
    pub fn bounds(&self) -> Option<Aabb> {
        let point = self.point?;
        Some(Aabb::new(point, point + vec2(self.width(), self.height())))
    }
}

/// A positioned grid of tiles, row-major in draw order.
#[derive(Debug, Clone, Default)]
pub struct TileLayer {
    /// Layer name from the map document.
    pub name: String,
    /// Width in cells; the row stride of `tiles`.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
    /// One entry per cell, row-major.
    pub tiles: Vec<PlacedTile>,
    /// Layer properties.
    pub properties: Properties,
}

impl TileLayer {
    /// Cell at column `x`, row `y`.
    pub fn tile(&self, x: u32, y: u32) -> Option<&PlacedTile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = x as usize + y as usize * self.width as usize;
        self.tiles.get(idx)
    }

    /// Cell under a screen position, resolved through the level's projection.
    pub fn tile_at(&self, level: &Level, position: Point) -> Result<Option<&PlacedTile>, MapError> {
        let cell = level.position_to_map(position)?;
        if cell.x < 0.0 || cell.y < 0.0 {
            return Ok(None);
        }
        Ok(self.tile(cell.x as u32, cell.y as u32))
    }

    /// Non-blank cells in draw order.
    pub fn placed(&self) -> impl Iterator<Item = &PlacedTile> {
        self.tiles.iter().filter(|t| !t.is_blank())
    }
}

/// A layer made of free-standing images.
#[derive(Debug, Clone, Default)]
pub struct ImageLayer {
    /// Layer name from the map document.
    pub name: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Image path as written in the map document.
    pub source: String,
    /// Placed images, one per source image.
    pub images: Vec<PlacedTile>,
    /// Layer properties.
    pub properties: Properties,
}
