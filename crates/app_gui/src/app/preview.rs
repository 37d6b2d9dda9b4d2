//! Preview textures for the selected image.

use anyhow::{Context, Result};
use eframe::egui;
use posture_core::{PreviewFactory, SelectedImage};

/// Longest edge of the preview, in pixels.
pub const PREVIEW_SIZE: u32 = 320;

/// Uploads each selection as an egui texture. Dropping the handle frees it.
pub struct TexturePreviews {
    ctx: egui::Context,
    created: u64,
}

impl TexturePreviews {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx, created: 0 }
    }
}

impl PreviewFactory for TexturePreviews {
    type Preview = egui::TextureHandle;

    fn create(&mut self, image: &SelectedImage) -> Result<egui::TextureHandle> {
        let color = decode_preview(image.bytes(), PREVIEW_SIZE)?;
        self.created += 1;
        let name = format!("preview:{}:{}", self.created, image.name());
        Ok(self
            .ctx
            .load_texture(name, color, egui::TextureOptions::LINEAR))
    }
}

/// Decode image bytes and shrink them to fit in a `max` x `max` box.
pub fn decode_preview(bytes: &[u8], max: u32) -> Result<egui::ColorImage> {
    let img = image::load_from_memory(bytes).context("unsupported or corrupt image")?;
    let thumb = img.thumbnail(max, max).to_rgba8();
    let size = [thumb.width() as usize, thumb.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, thumb.as_raw()))
}
