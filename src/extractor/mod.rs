//! Sprite reconstruction.
//!
//! This module turns a frame descriptor plus the shared spritesheet into a
//! standalone sprite image: crop the packed region, undo the packer's
//! rotation, then optionally place it on its original canvas.

pub mod batch;
mod composite;

pub use batch::{BatchExtractor, BatchSummary, ProgressStep, SpriteSink};

use crate::atlas::{Atlas, Frame};
use crate::error::{Result, UnpackError};
use crate::types::{CanvasLayout, Size};
use image::{ColorType, Limits, RgbaImage};

/// How an extracted sprite is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Place the sprite on a transparent canvas of its source size.
    #[default]
    Padded,
    /// Return the cropped region without padding.
    Compressed,
}

/// Extracts sprites from one spritesheet using one atlas.
///
/// Both inputs are borrowed read-only, so an extractor can be shared
/// across threads.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    atlas: &'a Atlas,
    sheet: &'a RgbaImage,
}

impl<'a> Extractor<'a> {
    pub fn new(atlas: &'a Atlas, sheet: &'a RgbaImage) -> Self {
        Self { atlas, sheet }
    }

    pub fn atlas(&self) -> &'a Atlas {
        self.atlas
    }

    /// Extract the sprite with the exact name `name`.
    pub fn extract(&self, name: &str, mode: ExtractMode) -> Result<RgbaImage> {
        let frame = self.atlas.get(name)?;
        self.extract_frame(name, frame, mode)
    }

    /// Extract a sprite from an already resolved frame.
    pub fn extract_frame(&self, name: &str, frame: &Frame, mode: ExtractMode) -> Result<RgbaImage> {
        let rect = frame.texture_rect;
        let size = unpacked_size(frame);
        if size.is_degenerate() {
            return Err(UnpackError::DegenerateSprite {
                name: name.to_string(),
                width: size.width,
                height: size.height,
            });
        }

        let extent = rect.sheet_extent(frame.texture_rotated);
        let cropped = composite::crop_region(self.sheet, name, rect.x, rect.y, extent)?;
        let region = if frame.texture_rotated {
            composite::derotate(&cropped)
        } else {
            cropped
        };

        tracing::debug!(
            "Extracting {} at {} (rotated: {}, mode: {:?})",
            name,
            rect,
            frame.texture_rotated,
            mode
        );

        match mode {
            ExtractMode::Compressed => Ok(region),
            ExtractMode::Padded => {
                let layout =
                    CanvasLayout::compute(size, frame.sprite_source_size, frame.sprite_offset);
                Limits::default()
                    .reserve_buffer(layout.width, layout.height, ColorType::Rgba8)
                    .map_err(|_| UnpackError::MalformedRect {
                        name: name.to_string(),
                        reason: format!(
                            "source size {} needs a {}x{} canvas, which is too large",
                            frame.sprite_source_size, layout.width, layout.height
                        ),
                    })?;

                if layout.is_undersized() {
                    tracing::warn!(
                        "Sprite {} declares source size {} smaller than its {}x{} texture; keeping texture size",
                        name,
                        frame.sprite_source_size,
                        rect.w,
                        rect.h
                    );
                }
                if !layout.contains(region.width(), region.height()) {
                    tracing::warn!(
                        "Sprite {} offset {} pushes it past its {}x{} canvas; clipping",
                        name,
                        frame.sprite_offset,
                        layout.width,
                        layout.height
                    );
                }

                Ok(composite::pad(region, &layout))
            }
        }
    }
}

/// Size of the sprite once cropped and turned upright.
///
/// The rect stores the natural size even for rotated frames, so this is
/// the rect size regardless of rotation.
pub fn unpacked_size(frame: &Frame) -> Size {
    frame.texture_rect.size()
}

/// Extract a single sprite by name.
pub fn extract(
    atlas: &Atlas,
    sheet: &RgbaImage,
    name: &str,
    mode: ExtractMode,
) -> Result<RgbaImage> {
    Extractor::new(atlas, sheet).extract(name, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Metadata;
    use crate::types::{Offset, Rect, Size};
    use image::{imageops, Rgba};

    /// Every pixel is unique so misplaced copies are caught.
    fn test_sheet() -> RgbaImage {
        RgbaImage::from_fn(100, 100, |x, y| Rgba([x as u8, y as u8, (x ^ y) as u8, 255]))
    }

    fn atlas_with(name: &str, frame: Frame) -> Atlas {
        Atlas::new([(name.to_string(), frame)], Metadata::for_texture("sheet.png"))
    }

    #[test]
    fn test_unrotated_exact_size() {
        let sheet = test_sheet();
        let atlas = atlas_with("a.png", Frame::new(Rect::new(10, 20, 30, 40)));

        let sprite = extract(&atlas, &sheet, "a.png", ExtractMode::Padded).unwrap();
        assert_eq!(sprite.dimensions(), (30, 40));
        for (x, y, pixel) in sprite.enumerate_pixels() {
            assert_eq!(pixel, sheet.get_pixel(x + 10, y + 20));
        }
    }

    #[test]
    fn test_padded_matches_compressed_without_trim() {
        let sheet = test_sheet();
        let atlas = atlas_with("a.png", Frame::new(Rect::new(3, 7, 11, 5)));

        let padded = extract(&atlas, &sheet, "a.png", ExtractMode::Padded).unwrap();
        let compressed = extract(&atlas, &sheet, "a.png", ExtractMode::Compressed).unwrap();
        assert_eq!(padded, compressed);
    }

    #[test]
    fn test_rotated_frame_reads_swapped_region() {
        let sheet = test_sheet();
        let frame = Frame::new(Rect::new(10, 20, 30, 40)).rotated(true);
        let atlas = atlas_with("r.png", frame);

        let sprite = extract(&atlas, &sheet, "r.png", ExtractMode::Compressed).unwrap();
        assert_eq!(sprite.dimensions(), (30, 40));

        // Re-applying the packer's clockwise turn restores the raw 40x30 crop
        let repacked = imageops::rotate90(&sprite);
        let raw = imageops::crop_imm(&sheet, 10, 20, 40, 30).to_image();
        assert_eq!(repacked, raw);
    }

    #[test]
    fn test_padded_offset_placement() {
        let sheet = test_sheet();
        let frame = Frame::new(Rect::new(10, 20, 30, 40))
            .with_source_size(Size::new(50, 60))
            .with_offset(Offset::new(5, -3));
        let atlas = atlas_with("o.png", frame);

        let sprite = extract(&atlas, &sheet, "o.png", ExtractMode::Padded).unwrap();
        assert_eq!(sprite.dimensions(), (50, 60));

        // left = 15, top = 13
        assert_eq!(sprite.get_pixel(15, 13), sheet.get_pixel(10, 20));
        assert_eq!(sprite.get_pixel(44, 52), sheet.get_pixel(39, 59));
        assert_eq!(sprite.get_pixel(14, 13), &Rgba([0, 0, 0, 0]));
        assert_eq!(sprite.get_pixel(15, 12), &Rgba([0, 0, 0, 0]));
        assert_eq!(sprite.get_pixel(45, 53), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_compressed_ignores_source_size() {
        let sheet = test_sheet();
        let frame = Frame::new(Rect::new(0, 0, 8, 6))
            .with_source_size(Size::new(20, 20))
            .with_offset(Offset::new(2, 2));
        let atlas = atlas_with("c.png", frame);

        let sprite = extract(&atlas, &sheet, "c.png", ExtractMode::Compressed).unwrap();
        assert_eq!(sprite.dimensions(), (8, 6));
    }

    #[test]
    fn test_undersized_source_falls_back_per_axis() {
        let sheet = test_sheet();
        let frame = Frame::new(Rect::new(0, 0, 30, 40)).with_source_size(Size::new(20, 50));
        let atlas = atlas_with("u.png", frame);

        let sprite = extract(&atlas, &sheet, "u.png", ExtractMode::Padded).unwrap();
        assert_eq!(sprite.dimensions(), (30, 50));
        // No horizontal shift, vertical centering by 5
        assert_eq!(sprite.get_pixel(0, 5), sheet.get_pixel(0, 0));
        assert_eq!(sprite.get_pixel(0, 4), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_rotated_and_padded() {
        let sheet = test_sheet();
        let frame = Frame::new(Rect::new(50, 50, 4, 6))
            .rotated(true)
            .with_source_size(Size::new(8, 8));
        let atlas = atlas_with("rp.png", frame);

        let compressed = extract(&atlas, &sheet, "rp.png", ExtractMode::Compressed).unwrap();
        let padded = extract(&atlas, &sheet, "rp.png", ExtractMode::Padded).unwrap();
        assert_eq!(padded.dimensions(), (8, 8));
        for (x, y, pixel) in compressed.enumerate_pixels() {
            assert_eq!(padded.get_pixel(x + 2, y + 1), pixel);
        }
    }

    #[test]
    fn test_idempotent() {
        let sheet = test_sheet();
        let frame = Frame::new(Rect::new(1, 2, 9, 13))
            .rotated(true)
            .with_source_size(Size::new(15, 17))
            .with_offset(Offset::new(-1, 2));
        let atlas = atlas_with("i.png", frame);

        let first = extract(&atlas, &sheet, "i.png", ExtractMode::Padded).unwrap();
        let second = extract(&atlas, &sheet, "i.png", ExtractMode::Padded).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_unknown_sprite() {
        let sheet = test_sheet();
        let atlas = atlas_with("a.png", Frame::new(Rect::new(0, 0, 1, 1)));
        assert!(matches!(
            extract(&atlas, &sheet, "b.png", ExtractMode::Padded),
            Err(UnpackError::UnknownSprite(_))
        ));
    }

    #[test]
    fn test_malformed_rect() {
        let sheet = test_sheet();
        let extractor_atlas = atlas_with("m.png", Frame::new(Rect::new(90, 0, 20, 5)));
        assert!(matches!(
            extract(&extractor_atlas, &sheet, "m.png", ExtractMode::Padded),
            Err(UnpackError::MalformedRect { .. })
        ));

        // Rotation swaps the extent, so this only overflows vertically
        let rotated = atlas_with("m.png", Frame::new(Rect::new(0, 90, 20, 5)).rotated(true));
        assert!(matches!(
            extract(&rotated, &sheet, "m.png", ExtractMode::Compressed),
            Err(UnpackError::MalformedRect { .. })
        ));
    }

    #[test]
    fn test_unpacked_size_ignores_rotation() {
        let frame = Frame::new(Rect::new(10, 20, 30, 40));
        assert_eq!(unpacked_size(&frame), Size::new(30, 40));
        assert_eq!(unpacked_size(&frame.clone().rotated(true)), Size::new(30, 40));
        assert!(unpacked_size(&Frame::new(Rect::new(5, 5, 0, 7)).rotated(true)).is_degenerate());
    }

    #[test]
    fn test_oversized_source_is_malformed() {
        let sheet = test_sheet();
        let frame =
            Frame::new(Rect::new(0, 0, 2, 2)).with_source_size(Size::new(i32::MAX, i32::MAX));
        let atlas = atlas_with("huge.png", frame);

        assert!(matches!(
            extract(&atlas, &sheet, "huge.png", ExtractMode::Padded),
            Err(UnpackError::MalformedRect { name, .. }) if name == "huge.png"
        ));
        // Compressed output never allocates the canvas
        let sprite = extract(&atlas, &sheet, "huge.png", ExtractMode::Compressed).unwrap();
        assert_eq!(sprite.dimensions(), (2, 2));
    }

    #[test]
    fn test_degenerate_sprite() {
        let sheet = test_sheet();
        let atlas = atlas_with("d.png", Frame::new(Rect::new(0, 0, 0, 0)));
        let err = extract(&atlas, &sheet, "d.png", ExtractMode::Padded).unwrap_err();
        assert!(err.is_skippable());
    }
}
