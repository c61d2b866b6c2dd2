//! View-rectangle culling of placed tiles.

use crate::geom::Aabb;
use crate::layer::{PlacedTile, TileLayer};
use macroquad::prelude::*;

/// Extra pixels kept around the view so tiles entering it are already drawn.
pub const CULL_MARGIN: f32 = 32.0;

/// View rectangle from two corners in any order, padded by `CULL_MARGIN`.
pub fn view_rect(view_min: Vec2, view_max: Vec2) -> Aabb {
    let pad = Vec2::splat(CULL_MARGIN);
    Aabb::new(view_min.min(view_max) - pad, view_min.max(view_max) + pad)
}

/// Non-blank tiles of a layer touching `view`, in draw order.
pub fn visible_tiles<'a>(layer: &'a TileLayer, view: Aabb) -> impl Iterator<Item = &'a PlacedTile> {
    layer
        .placed()
        .filter(move |t| t.bounds().map_or(false, |b| b.overlaps(&view)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{assemble_layer, LayerMapping};
    use crate::level::Level;
    use crate::tileset::{TextureHandle, Tileset, TilesheetSource};

    #[test]
    fn visible_tiles_keeps_draw_order() {
        let level = Level::new("orthogonal", 20, 20, 32, 32);
        let ts = Tileset::build(&[TilesheetSource::new(TextureHandle(0), 32, 32, 32, 32)]).unwrap();
        let layer = assemble_layer(&level, &LayerMapping::new("g", 20, 20, vec![1; 400]), &ts).unwrap();

        let view = view_rect(vec2(100.0, 100.0), vec2(0.0, 0.0));
        let tiles: Vec<_> = visible_tiles(&layer, view).collect();

        // -32..132 touches columns and rows 0..=4
        assert_eq!(tiles.len(), 25);
        assert!(tiles
            .windows(2)
            .all(|w| {
                let (a, b) = (w[0].point.unwrap(), w[1].point.unwrap());
                (a.y, a.x) < (b.y, b.x)
            }));
    }

    #[test]
    fn blank_cells_are_never_visible() {
        let level = Level::new("orthogonal", 2, 1, 32, 32);
        let ts = Tileset::build(&[TilesheetSource::new(TextureHandle(0), 32, 32, 32, 32)]).unwrap();
        let layer = assemble_layer(&level, &LayerMapping::new("g", 2, 1, vec![0, 1]), &ts).unwrap();
        let view = view_rect(Vec2::ZERO, vec2(64.0, 32.0));
        assert_eq!(visible_tiles(&layer, view).count(), 1);
    }
}
