use crate::error::MapError;
use crate::geom::Aabb;
use crate::properties::Properties;
use log::{debug, warn};
use macroquad::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque reference to a texture owned by the asset side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// One sprite sheet and the grid it is cut along.
#[derive(Debug, Clone)]
pub struct TilesheetSource {
    /// Texture the sheet is drawn from.
    pub texture: TextureHandle,
    /// Full pixel size of the sheet image.
    pub image_width: u32,
    /// Sheet height in pixels.
    pub image_height: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Global id of the first tile, as declared.
    pub first_gid: u32,
    /// Sheet properties.
    pub properties: Properties,
    /// Properties keyed by the tile's local index within this sheet.
    pub tile_properties: HashMap<u32, Properties>,
}

impl TilesheetSource {
    /// A sheet starting at global id 1, without properties.
    pub fn new(
        texture: TextureHandle,
        image_width: u32,
        image_height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Self {
        TilesheetSource {
            texture,
            image_width,
            image_height,
            tile_width,
            tile_height,
            first_gid: 1,
            properties: Properties::new(),
            tile_properties: HashMap::new(),
        }
    }

    /// Grid columns and rows; partial trailing tiles are dropped.
    pub fn grid(&self) -> (u32, u32) {
        (
            self.image_width / self.tile_width,
            self.image_height / self.tile_height,
        )
    }
}

/// A tile image: a UV sub-rectangle of a shared texture.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasTile {
    texture: TextureHandle,
    width: f32,
    height: f32,
    uv: Aabb,
    properties: Properties,
}

impl AtlasTile {
    /// A tile covering `uv` of `texture`, drawn at `width` x `height` pixels.
    pub fn new(texture: TextureHandle, width: f32, height: f32, uv: Aabb) -> Self {
        AtlasTile {
            texture,
            width,
            height,
            uv,
            properties: Properties::new(),
        }
    }

    /// Tile covering a whole texture.
    pub fn whole(texture: TextureHandle, width: f32, height: f32) -> Self {
        Self::new(texture, width, height, Aabb::new(Vec2::ZERO, Vec2::ONE))
    }

    /// Attaches tile properties.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Texture the tile is cut from.
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Image width in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Normalized texture-space rectangle.
    pub fn uv(&self) -> Aabb {
        self.uv
    }

    /// `(u, v, u2, v2)` of the tile's viewport.
    pub fn view(&self) -> (f32, f32, f32, f32) {
        (self.uv.min.x, self.uv.min.y, self.uv.max.x, self.uv.max.y)
    }

    /// Pixel source rectangle inside a texture of the given size.
    pub fn source_rect(&self, texture_size: Vec2) -> Rect {
        Rect::new(
            self.uv.min.x * texture_size.x,
            self.uv.min.y * texture_size.y,
            self.uv.width() * texture_size.x,
            self.uv.height() * texture_size.y,
        )
    }

    /// Per-tile properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// Flat tile palette; index `i` is global tile id `i + 1`.
#[derive(Debug, Clone, Default)]
pub struct Tileset {
    tiles: Vec<Arc<AtlasTile>>,
}

impl Tileset {
    /// Slices every sheet, in order, into atlas tiles.
    pub fn build(sheets: &[TilesheetSource]) -> Result<Self, MapError> {
        let mut tiles = Vec::new();

        for (sheet_idx, sheet) in sheets.iter().enumerate() {
            if sheet.tile_width == 0 || sheet.tile_height == 0 {
                return Err(MapError::InvalidTileSize { sheet: sheet_idx });
            }

            let expected_gid = tiles.len() as u32 + 1;
            if sheet.first_gid != expected_gid {
                warn!(
                    "tilesheet {} declares first gid {}, tiles are numbered from {}",
                    sheet_idx, sheet.first_gid, expected_gid
                );
            }

            let (set_w, set_h) = sheet.grid();
            let total = set_w * set_h;
            debug!(
                "slicing tilesheet {} ({}x{} px) into {}x{} tiles",
                sheet_idx, sheet.image_width, sheet.image_height, set_w, set_h
            );

            let tw = sheet.tile_width as f32;
            let th = sheet.tile_height as f32;
            let inv_w = 1.0 / sheet.image_width as f32;
            let inv_h = 1.0 / sheet.image_height as f32;

            for i in 0..total {
                let x = (i % set_w) as f32 * tw;
                let y = (i / set_w) as f32 * th;
                let uv = Aabb::new(
                    vec2(x * inv_w, y * inv_h),
                    vec2((x + tw) * inv_w, (y + th) * inv_h),
                );
                let properties = sheet.tile_properties.get(&i).cloned().unwrap_or_default();
                tiles.push(Arc::new(
                    AtlasTile::new(sheet.texture, tw, th, uv).with_properties(properties),
                ));
            }
        }

        Ok(Tileset { tiles })
    }

    /// Tile at a zero-based index.
    pub fn get(&self, index: usize) -> Option<&Arc<AtlasTile>> {
        self.tiles.get(index)
    }

    /// Tile for a one-based global id; `0` is the blank id.
    pub fn by_gid(&self, gid: u32) -> Option<&Arc<AtlasTile>> {
        (gid as usize).checked_sub(1).and_then(|i| self.tiles.get(i))
    }

    /// Number of tiles across all sheets.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no sheet produced a tile.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in global id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AtlasTile>> {
        self.tiles.iter()
    }
}
