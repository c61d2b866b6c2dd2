use crate::ir_map::IrLevel;
use crate::level::Level;
use crate::loader::json_loader::decode_map_file_to_ir;
use crate::render::{cull, draw_level, TextureSource};
use crate::tileset::TextureHandle;
use anyhow::Context;
use log::info;
use macroquad::prelude::*;
use std::path::Path;

/// A level together with the textures its handles point at.
pub struct Map {
    /// The assembled level.
    pub level: Level,
    textures: Vec<Texture2D>,
}

impl Map {
    /// Decodes a `.json` map and loads its textures.
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        let (ir, base) =
            decode_map_file_to_ir(path).with_context(|| format!("Decoding map file {}", path))?;
        Self::from_ir(ir, &base).await
    }

    /// Builds the level and loads one texture per handle, relative to `base_dir`.
    pub async fn from_ir(ir: IrLevel, base_dir: &Path) -> anyhow::Result<Self> {
        let level = Level::from_ir(&ir).context("Assembling level")?;

        let mut textures = Vec::new();
        for image in ir.texture_sources() {
            let img_path = base_dir.join(image);
            let img_str = img_path
                .to_str()
                .with_context(|| format!("Texture path is not UTF-8: {}", img_path.display()))?;
            let tex = load_texture(img_str)
                .await
                .with_context(|| format!("Loading texture {}", image))?;
            tex.set_filter(FilterMode::Nearest);
            textures.push(tex);
        }

        info!(
            "loaded {} level {}x{}: {} tile layers, {} textures",
            level.orientation(),
            level.width(),
            level.height(),
            level.tile_layers.len(),
            textures.len()
        );

        Ok(Self { level, textures })
    }

    /// Texture behind a handle.
    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture2D> {
        self.textures.as_slice().texture(handle)
    }

    /// Draws every layer without culling.
    pub fn draw(&self) {
        draw_level(&self.level, self.textures.as_slice(), None);
    }

    /// Draws only the tiles touching the view rectangle.
    pub fn draw_visible_rect(&self, view_min: Vec2, view_max: Vec2) {
        let view = cull::view_rect(view_min, view_max);
        draw_level(&self.level, self.textures.as_slice(), Some(view));
    }
}
