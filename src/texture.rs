//! Spritesheet decoding and sprite encoding.

use crate::error::Result;
use image::{ImageEncoder, RgbaImage};
use std::path::Path;

/// Load a spritesheet from image bytes as RGBA8.
pub fn load_texture_from_bytes(data: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(data)?;
    Ok(img.to_rgba8())
}

/// Load a spritesheet from a file path as RGBA8.
pub fn load_texture<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let texture = load_texture_from_bytes(&data)?;
    tracing::debug!(
        "Loaded spritesheet {:?} ({}x{})",
        path,
        texture.width(),
        texture.height()
    );
    Ok(texture)
}

/// Encode a sprite as PNG bytes.
pub fn encode_png(sprite: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let cursor = std::io::Cursor::new(&mut bytes);
    let encoder = image::codecs::png::PngEncoder::new(cursor);

    encoder.write_image(
        sprite.as_raw(),
        sprite.width(),
        sprite.height(),
        image::ExtendedColorType::Rgba8,
    )?;

    Ok(bytes)
}
