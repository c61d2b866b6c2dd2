use crate::assembler::{assemble_layers, LayerMapping};
use crate::error::MapError;
use crate::geom::{Aabb, Point};
use crate::ir_map::{IrLayerKind, IrLevel, IrObjectShape};
use crate::layer::{ImageLayer, PlacedTile, TileLayer};
use crate::object::{Object, ObjectLayer, PolylineObject};
use crate::orientation::Projection;
use crate::properties::Properties;
use crate::tileset::{AtlasTile, TextureHandle, Tileset};
use log::{debug, warn};
use macroquad::prelude::*;
use std::sync::{Arc, OnceLock};

/// A level with all of its layers and default Tiled attributes.
///
/// The grid size, the tile size and the orientation decide the projection.
/// The projection is resolved on the first coordinate query and kept for the
/// lifetime of the level; an unsupported orientation leaves it unresolved, so
/// every query fails until [`Level::set_orientation`] corrects it.
#[derive(Debug, Clone)]
pub struct Level {
    orientation: String,
    /// Tiled render order such as `right-down`.
    pub render_order: String,
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    /// Origin of the level on screen. Tiles already placed keep the offset
    /// they were assembled with.
    pub offset: Point,
    /// Next free object id.
    pub next_object_id: u32,
    /// Assembled tile layers in draw order.
    pub tile_layers: Vec<TileLayer>,
    /// Image layers in draw order.
    pub image_layers: Vec<ImageLayer>,
    /// Object layers in document order.
    pub object_layers: Vec<ObjectLayer>,
    /// Map properties.
    pub properties: Properties,
    projection: OnceLock<Projection>,
}

impl Level {
    /// A level with no layers at the origin.
    pub fn new(
        orientation: impl Into<String>,
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Self {
        Level {
            orientation: orientation.into(),
            render_order: "right-down".to_owned(),
            width,
            height,
            tile_width,
            tile_height,
            offset: Vec2::ZERO,
            next_object_id: 1,
            tile_layers: Vec::new(),
            image_layers: Vec::new(),
            object_layers: Vec::new(),
            properties: Properties::new(),
            projection: OnceLock::new(),
        }
    }

    /// Sets the screen origin.
    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// Orientation tag as given, supported or not.
    pub fn orientation(&self) -> &str {
        &self.orientation
    }

    /// Replaces the orientation and drops any resolved projection.
    pub fn set_orientation(&mut self, orientation: impl Into<String>) {
        self.orientation = orientation.into();
        self.projection = OnceLock::new();
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Grid tile width in pixels.
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Grid tile height in pixels.
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Resolves the projection on first use.
    pub fn projection(&self) -> Result<&Projection, MapError> {
        if let Some(projection) = self.projection.get() {
            return Ok(projection);
        }
        let resolved = Projection::resolve(
            &self.orientation,
            self.tile_width,
            self.tile_height,
            self.width,
            self.height,
        )?;
        debug!(
            "resolved {} projection for {}x{} level",
            resolved.orientation(),
            self.width,
            self.height
        );
        Ok(self.projection.get_or_init(|| resolved))
    }

    /// Whether a projection has been resolved and kept.
    pub fn is_projection_resolved(&self) -> bool {
        self.projection.get().is_some()
    }

    /// Map coordinate (sub-tile accurate) to a screen position.
    pub fn map_to_position(&self, cell: Point) -> Result<Point, MapError> {
        Ok(self.projection()?.map_to_point(cell) + self.offset)
    }

    /// Screen position to a map coordinate with sub-tile accuracy.
    pub fn position_to_map(&self, position: Point) -> Result<Point, MapError> {
        Ok(self.projection()?.point_to_map(position - self.offset))
    }

    /// Screen rectangle the whole map covers, offset included.
    pub fn bounds(&self) -> Result<Aabb, MapError> {
        let max = self.projection()?.max_bounds() + self.offset;
        Ok(Aabb::new(self.offset, max))
    }

    /// Assembles and stores tile layers.
    ///
    /// Layers that assemble are kept even when others fail; the first failure
    /// is returned.
    pub fn assemble_tile_layers(
        &mut self,
        mappings: &[LayerMapping],
        tileset: &Tileset,
    ) -> Result<(), MapError> {
        let mut first_err = None;
        for result in assemble_layers(self, mappings, tileset) {
            match result {
                Ok(layer) => self.tile_layers.push(layer),
                Err(err) => {
                    warn!("skipping tile layer: {err}");
                    first_err.get_or_insert(err);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Tile layer by name.
    pub fn tile_layer(&self, name: &str) -> Option<&TileLayer> {
        self.tile_layers.iter().find(|l| l.name == name)
    }

    /// Image layer by name.
    pub fn image_layer(&self, name: &str) -> Option<&ImageLayer> {
        self.image_layers.iter().find(|l| l.name == name)
    }

    /// Object layer by name.
    pub fn object_layer(&self, name: &str) -> Option<&ObjectLayer> {
        self.object_layers.iter().find(|l| l.name == name)
    }

    /// Builds the tileset and every layer of a decoded map.
    pub fn from_ir(ir: &IrLevel) -> Result<Self, MapError> {
        let mut level = Level::new(
            ir.orientation.clone(),
            ir.width,
            ir.height,
            ir.tile_w,
            ir.tile_h,
        )
        .with_offset(ir.offset);
        level.render_order = ir.render_order.clone();
        level.next_object_id = ir.next_object_id;
        level.properties = ir.properties.clone();

        let tileset = Tileset::build(&ir.tilesheet_sources())?;
        for layer in assemble_layers(&level, &ir.layer_mappings(), &tileset) {
            level.tile_layers.push(layer?);
        }

        let mut image_ordinal = 0;
        for layer in &ir.layers {
            match &layer.kind {
                IrLayerKind::Tiles { .. } => {}
                IrLayerKind::Image {
                    image,
                    image_w,
                    image_h,
                } => {
                    let handle = TextureHandle((ir.tilesheets.len() + image_ordinal) as u32);
                    image_ordinal += 1;
                    if !layer.visible {
                        continue;
                    }
                    let tile = AtlasTile::whole(handle, *image_w as f32, *image_h as f32);
                    level.image_layers.push(ImageLayer {
                        name: layer.name.clone(),
                        width: *image_w,
                        height: *image_h,
                        source: image.clone(),
                        images: vec![PlacedTile::placed(
                            level.offset + layer.offset,
                            Arc::new(tile),
                        )],
                        properties: layer.properties.clone(),
                    });
                }
                IrLayerKind::Objects { .. } if !layer.visible => {}
                IrLayerKind::Objects { objects } => {
                    let mut object_layer = ObjectLayer {
                        name: layer.name.clone(),
                        offset_x: layer.offset.x,
                        offset_y: layer.offset.y,
                        properties: layer.properties.clone(),
                        ..Default::default()
                    };
                    for obj in objects {
                        let (points, closed) = match &obj.shape {
                            IrObjectShape::Polyline(points) => (points, false),
                            IrObjectShape::Polygon(points) => (points, true),
                            _ => {
                                object_layer.objects.push(Object {
                                    id: obj.id,
                                    name: obj.name.clone(),
                                    kind: obj.class_name.clone(),
                                    x: obj.x as f64,
                                    y: obj.y as f64,
                                    width: obj.width as i32,
                                    height: obj.height as i32,
                                    properties: obj.properties.clone(),
                                });
                                continue;
                            }
                        };
                        let mut poly = PolylineObject::new(
                            obj.id,
                            obj.name.clone(),
                            obj.class_name.clone(),
                            obj.x as f64,
                            obj.y as f64,
                            points.clone(),
                            closed,
                            layer.offset,
                        )?;
                        poly.properties = obj.properties.clone();
                        object_layer.poly_objects.push(poly);
                    }
                    level.object_layers.push(object_layer);
                }
                IrLayerKind::Unsupported => {
                    warn!("skipping unsupported layer '{}'", layer.name);
                }
            }
        }

        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn projection_resolves_lazily_once() {
        let level = Level::new("orthogonal", 10, 5, 32, 32);
        assert!(!level.is_projection_resolved());
        let p = level.map_to_position(vec2(1.0, 1.0)).unwrap();
        assert_eq!(p, vec2(32.0, 32.0));
        assert!(level.is_projection_resolved());
        let first = level.projection().unwrap() as *const Projection;
        let second = level.projection().unwrap() as *const Projection;
        assert_eq!(first, second);
    }

    #[test]
    fn unsupported_orientation_leaves_projection_unset() {
        let mut level = Level::new("hexagonal", 4, 4, 32, 32);
        for _ in 0..2 {
            let err = level.map_to_position(vec2(1.0, 1.0)).unwrap_err();
            assert!(matches!(err, MapError::UnsupportedOrientation(ref o) if o == "hexagonal"));
            assert!(!level.is_projection_resolved());
        }
        assert!(level.position_to_map(Vec2::ZERO).is_err());
        assert!(level.bounds().is_err());

        level.set_orientation("orthogonal");
        assert_eq!(level.map_to_position(vec2(1.0, 2.0)).unwrap(), vec2(32.0, 64.0));
    }

    #[test]
    fn set_orientation_replaces_resolved_projection() {
        let mut level = Level::new("orthogonal", 4, 4, 64, 32);
        assert_eq!(level.map_to_position(vec2(1.0, 0.0)).unwrap(), vec2(64.0, 0.0));
        level.set_orientation("isometric");
        assert!(!level.is_projection_resolved());
        assert_eq!(level.map_to_position(vec2(1.0, 0.0)).unwrap(), vec2(32.0, 16.0));
    }

    #[test]
    fn offset_applies_both_ways() {
        let level = Level::new("orthogonal", 4, 4, 16, 16).with_offset(vec2(8.0, -4.0));
        let p = level.map_to_position(vec2(2.0, 3.0)).unwrap();
        assert_eq!(p, vec2(40.0, 44.0));
        let back = level.position_to_map(p).unwrap();
        assert_relative_eq!(back.x, 2.0);
        assert_relative_eq!(back.y, 3.0);
    }

    #[test]
    fn bounds_start_at_offset() {
        let level = Level::new("orthogonal", 10, 5, 32, 32).with_offset(vec2(5.0, 7.0));
        let b = level.bounds().unwrap();
        assert_eq!(b.min, vec2(5.0, 7.0));
        assert_eq!(b.max, vec2(325.0, 167.0));
    }

    #[test]
    fn assemble_keeps_good_layers_and_reports_first_error() {
        use crate::tileset::TilesheetSource;

        let mut level = Level::new("orthogonal", 1, 1, 32, 32);
        let ts = Tileset::build(&[TilesheetSource::new(TextureHandle(0), 32, 32, 32, 32)]).unwrap();
        let mappings = vec![
            LayerMapping::new("a", 1, 1, vec![1]),
            LayerMapping::new("b", 1, 1, vec![5]),
            LayerMapping::new("c", 1, 1, vec![0]),
        ];
        let err = level.assemble_tile_layers(&mappings, &ts).unwrap_err();
        assert!(matches!(err, MapError::TileIndexOutOfRange { tile_id: 4, .. }));
        let names: Vec<_> = level.tile_layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
        assert!(level.tile_layer("b").is_none());
    }

    #[test]
    fn tile_at_uses_projection() {
        use crate::tileset::TilesheetSource;

        let mut level = Level::new("orthogonal", 2, 2, 32, 32).with_offset(vec2(10.0, 10.0));
        let ts = Tileset::build(&[TilesheetSource::new(TextureHandle(0), 64, 32, 32, 32)]).unwrap();
        level
            .assemble_tile_layers(&[LayerMapping::new("g", 2, 2, vec![1, 0, 0, 2])], &ts)
            .unwrap();
        let layer = level.tile_layer("g").unwrap();

        let hit = layer.tile_at(&level, vec2(60.0, 60.0)).unwrap().unwrap();
        assert_eq!(hit.point, Some(vec2(42.0, 42.0)));
        assert!(layer.tile_at(&level, vec2(45.0, 20.0)).unwrap().unwrap().is_blank());
        assert!(layer.tile_at(&level, vec2(0.0, 0.0)).unwrap().is_none());
        assert!(layer.tile_at(&level, vec2(200.0, 20.0)).unwrap().is_none());
    }

    #[test]
    fn tile_at_indexes_by_level_width() {
        use crate::tileset::TilesheetSource;

        let mut level = Level::new("orthogonal", 2, 2, 32, 32);
        let ts = Tileset::build(&[TilesheetSource::new(TextureHandle(0), 64, 32, 32, 32)]).unwrap();
        // declared 4x1, laid out over the 2x2 grid
        level
            .assemble_tile_layers(&[LayerMapping::new("g", 4, 1, vec![0, 0, 0, 2])], &ts)
            .unwrap();
        let layer = level.tile_layer("g").unwrap();

        let hit = layer.tile_at(&level, vec2(40.0, 40.0)).unwrap().unwrap();
        assert_eq!(hit.point, Some(vec2(32.0, 32.0)));
        assert!(!hit.is_blank());
        assert!(layer.tile_at(&level, vec2(40.0, 80.0)).unwrap().is_none());
    }
}
