use crate::assembler::LayerMapping;
use crate::properties::Properties;
use crate::tileset::{TextureHandle, TilesheetSource};
use macroquad::prelude::*;

/// Canonical, format-agnostic level as handed over by a parser.
#[derive(Debug, Clone)]
pub struct IrLevel {
    /// Orientation tag, unparsed.
    pub orientation: String,
    /// Tiled render order.
    pub render_order: String,
    /// Grid size in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Grid tile width in pixels.
    pub tile_w: u32,
    /// Grid tile height in pixels.
    pub tile_h: u32,
    /// Level origin on screen.
    pub offset: Vec2,
    /// Next free object id.
    pub next_object_id: u32,
    /// Map properties.
    pub properties: Properties,
    /// Tilesheets in declaration order.
    pub tilesheets: Vec<IrTilesheet>,
    /// Layers in draw order.
    pub layers: Vec<IrLayer>,
}

/// One image atlas with a regular grid.
#[derive(Debug, Clone)]
pub struct IrTilesheet {
    /// First global id as declared by the map.
    pub first_gid: u32,
    /// Image path relative to the map.
    pub image: String,
    /// Image width in pixels.
    pub image_w: u32,
    /// Image height in pixels.
    pub image_h: u32,
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
    /// Tilesheet properties.
    pub properties: Properties,
    /// Per-tile metadata, sparse.
    pub tiles: Vec<IrTileMetadata>,
}

/// Properties attached to one tile of a sheet.
#[derive(Debug, Clone)]
pub struct IrTileMetadata {
    /// Local id within the sheet.
    pub id: u32,
    /// Tile properties.
    pub properties: Properties,
}

/// Payload of a layer.
#[derive(Debug, Clone)]
pub enum IrLayerKind {
    /// A grid of global tile ids.
    Tiles {
        /// Width in cells.
        width: u32,
        /// Height in cells.
        height: u32,
        /// Global ids, row-major, flip flags stripped.
        data: Vec<u32>,
    },
    /// A single image.
    Image {
        /// Image path relative to the map.
        image: String,
        /// Image width in pixels.
        image_w: u32,
        /// Image height in pixels.
        image_h: u32,
    },
    /// An object group.
    Objects {
        /// Objects in document order.
        objects: Vec<IrObject>,
    },
    /// A layer kind that is kept in order but not built.
    Unsupported,
}

/// One layer of the map document.
#[derive(Debug, Clone)]
pub struct IrLayer {
    /// Layer name.
    pub name: String,
    /// Hidden layers are not built.
    pub visible: bool,
    /// Pixel offset of the layer.
    pub offset: Vec2,
    /// Layer properties.
    pub properties: Properties,
    /// Layer payload.
    pub kind: IrLayerKind,
}

/// Geometry of a map object.
#[derive(Debug, Clone)]
pub enum IrObjectShape {
    /// Axis-aligned box.
    Rectangle,
    /// Single point.
    Point,
    /// Tile object referencing a global id.
    Tile {
        /// Global id, flip flags stripped.
        gid: u32,
    },
    /// `"x,y x,y ..."` relative to the object position.
    Polyline(String),
    /// Closed polygon, same points format as `Polyline`.
    Polygon(String),
}

/// One object of an object group.
#[derive(Debug, Clone)]
pub struct IrObject {
    /// Object id.
    pub id: u32,
    /// Object name.
    pub name: String,
    /// Tiled class, or the legacy `type`.
    pub class_name: String,
    /// Position x in pixels.
    pub x: f32,
    /// Position y in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Object geometry.
    pub shape: IrObjectShape,
    /// Object properties.
    pub properties: Properties,
}

impl IrLevel {
    /// An empty level with Tiled defaults.
    pub fn new(orientation: impl Into<String>, width: u32, height: u32, tile_w: u32, tile_h: u32) -> Self {
        IrLevel {
            orientation: orientation.into(),
            render_order: "right-down".to_owned(),
            width,
            height,
            tile_w,
            tile_h,
            offset: Vec2::ZERO,
            next_object_id: 1,
            properties: Properties::new(),
            tilesheets: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Image paths in texture handle order: tilesheets first, then image layers.
    pub fn texture_sources(&self) -> Vec<&str> {
        let sheets = self.tilesheets.iter().map(|t| t.image.as_str());
        let images = self.layers.iter().filter_map(|l| match &l.kind {
            IrLayerKind::Image { image, .. } => Some(image.as_str()),
            _ => None,
        });
        sheets.chain(images).collect()
    }

    /// Tilesheets with texture handles assigned in declaration order.
    pub fn tilesheet_sources(&self) -> Vec<TilesheetSource> {
        self.tilesheets
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut source = TilesheetSource::new(
                    TextureHandle(i as u32),
                    t.image_w,
                    t.image_h,
                    t.tile_w,
                    t.tile_h,
                );
                source.first_gid = t.first_gid;
                source.properties = t.properties.clone();
                source.tile_properties = t
                    .tiles
                    .iter()
                    .map(|tile| (tile.id, tile.properties.clone()))
                    .collect();
                source
            })
            .collect()
    }

    /// Visible tile layers as mappings, in draw order.
    pub fn layer_mappings(&self) -> Vec<LayerMapping> {
        self.layers
            .iter()
            .filter(|l| l.visible)
            .filter_map(|l| match &l.kind {
                IrLayerKind::Tiles {
                    width,
                    height,
                    data,
                } => {
                    let mut mapping = LayerMapping::new(l.name.clone(), *width, *height, data.clone());
                    mapping.properties = l.properties.clone();
                    Some(mapping)
                }
                _ => None,
            })
            .collect()
    }
}
