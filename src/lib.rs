#![warn(missing_docs)]

//! Tiled level placement for Macroquad.
//!
//! Projects map cells to screen points for orthogonal, isometric and
//! staggered levels, slices sprite sheets into atlas tiles and assembles
//! positioned tile layers ready to draw.

mod assembler;
mod error;
mod geom;
mod ir_map;
mod layer;
mod level;
mod loader {
    pub mod json_loader;
}
mod map;
mod object;
mod orientation;
mod properties;
pub mod render;
mod tileset;

pub use assembler::{assemble_layer, assemble_layers, LayerMapping};
pub use error::MapError;
pub use geom::{Aabb, Line, Point};
pub use ir_map::{
    IrLayer, IrLayerKind, IrLevel, IrObject, IrObjectShape, IrTileMetadata, IrTilesheet,
};
pub use layer::{ImageLayer, PlacedTile, TileLayer};
pub use level::Level;
pub use loader::json_loader::{decode_map_file_to_ir, decode_map_str_to_ir, GID_MASK};
pub use map::Map;
pub use object::{parse_points, points_to_lines, Object, ObjectLayer, PolylineObject};
pub use orientation::{Orientation, Projection};
pub use properties::{Properties, Property, WALKABLE};
pub use tileset::{AtlasTile, TextureHandle, Tileset, TilesheetSource};
