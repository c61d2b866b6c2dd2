//! Macroquad drawing of assembled layers.

pub mod cull;

use crate::geom::Aabb;
use crate::layer::{PlacedTile, TileLayer};
use crate::level::Level;
use crate::tileset::TextureHandle;
use macroquad::prelude::*;

/// Looks up the texture behind a handle.
pub trait TextureSource {
    /// Texture for `handle`, if loaded.
    fn texture(&self, handle: TextureHandle) -> Option<&Texture2D>;
}

impl TextureSource for [Texture2D] {
    fn texture(&self, handle: TextureHandle) -> Option<&Texture2D> {
        self.get(handle.0 as usize)
    }
}

/// One textured quad at the tile's resolved point.
pub fn draw_placed_tile(tile: &PlacedTile, textures: &(impl TextureSource + ?Sized)) {
    let (Some(point), Some(atlas)) = (tile.point, tile.tile.as_ref()) else {
        return;
    };
    let Some(tex) = textures.texture(atlas.texture()) else {
        return;
    };

    draw_texture_ex(
        tex,
        point.x,
        point.y,
        WHITE,
        DrawTextureParams {
            source: Some(atlas.source_rect(tex.size())),
            dest_size: Some(vec2(atlas.width(), atlas.height())),
            ..Default::default()
        },
    );
}

/// Draws a layer's tiles, culled to `view` when given.
pub fn draw_tile_layer(
    layer: &TileLayer,
    textures: &(impl TextureSource + ?Sized),
    view: Option<Aabb>,
) {
    match view {
        Some(view) => cull::visible_tiles(layer, view).for_each(|t| draw_placed_tile(t, textures)),
        None => layer.placed().for_each(|t| draw_placed_tile(t, textures)),
    }
}

/// Image layers first, then tile layers, each in definition order.
pub fn draw_level(level: &Level, textures: &(impl TextureSource + ?Sized), view: Option<Aabb>) {
    for layer in &level.image_layers {
        for image in &layer.images {
            draw_placed_tile(image, textures);
        }
    }
    for layer in &level.tile_layers {
        draw_tile_layer(layer, textures, view);
    }
}
