//! Pixel operations behind sprite reconstruction.

use crate::error::{Result, UnpackError};
use crate::types::{CanvasLayout, Size};
use image::{imageops, RgbaImage};

/// Copy the `extent` sized region at (x, y) out of the sheet.
///
/// The region must lie entirely inside the sheet.
pub(crate) fn crop_region(
    sheet: &RgbaImage,
    name: &str,
    x: i32,
    y: i32,
    extent: Size,
) -> Result<RgbaImage> {
    let malformed = |reason: String| UnpackError::MalformedRect {
        name: name.to_string(),
        reason,
    };

    if x < 0 || y < 0 {
        return Err(malformed(format!("origin ({}, {}) is negative", x, y)));
    }
    if extent.is_degenerate() {
        return Err(malformed(format!(
            "region size {}x{} is not positive",
            extent.width, extent.height
        )));
    }

    let right = x as u64 + extent.width as u64;
    let bottom = y as u64 + extent.height as u64;
    if right > sheet.width() as u64 || bottom > sheet.height() as u64 {
        return Err(malformed(format!(
            "region ({}, {}) to ({}, {}) exceeds {}x{} spritesheet",
            x,
            y,
            right,
            bottom,
            sheet.width(),
            sheet.height()
        )));
    }

    Ok(imageops::crop_imm(
        sheet,
        x as u32,
        y as u32,
        extent.width as u32,
        extent.height as u32,
    )
    .to_image())
}

/// Undo the packer's rotation: 270 degrees clockwise.
pub(crate) fn derotate(region: &RgbaImage) -> RgbaImage {
    imageops::rotate270(region)
}

/// Place a region on a transparent canvas according to `layout`.
///
/// Pixels are copied, not blended. Anything outside the canvas is clipped.
pub(crate) fn pad(region: RgbaImage, layout: &CanvasLayout) -> RgbaImage {
    if layout.width == region.width()
        && layout.height == region.height()
        && layout.left == 0
        && layout.top == 0
    {
        return region;
    }

    let mut canvas = RgbaImage::new(layout.width, layout.height);
    imageops::replace(&mut canvas, &region, layout.left, layout.top);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Offset;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 7, 255]))
    }

    #[test]
    fn test_crop_region() {
        let sheet = gradient(8, 8);
        let region = crop_region(&sheet, "a", 2, 3, Size::new(4, 2)).unwrap();
        assert_eq!(region.dimensions(), (4, 2));
        assert_eq!(region.get_pixel(0, 0), &Rgba([2, 3, 7, 255]));
        assert_eq!(region.get_pixel(3, 1), &Rgba([5, 4, 7, 255]));
    }

    #[test]
    fn test_crop_rejects_out_of_bounds() {
        let sheet = gradient(8, 8);
        assert!(matches!(
            crop_region(&sheet, "a", 6, 0, Size::new(4, 2)),
            Err(UnpackError::MalformedRect { .. })
        ));
        assert!(matches!(
            crop_region(&sheet, "a", -1, 0, Size::new(2, 2)),
            Err(UnpackError::MalformedRect { .. })
        ));
        // Touching the far edge is fine
        assert!(crop_region(&sheet, "a", 4, 6, Size::new(4, 2)).is_ok());
    }

    #[test]
    fn test_derotate_direction() {
        // 2 wide, 1 tall: left pixel red, right pixel blue
        let mut region = RgbaImage::new(2, 1);
        region.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        region.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        let upright = derotate(&region);
        assert_eq!(upright.dimensions(), (1, 2));
        // Counter-clockwise quarter turn puts the right pixel on top
        assert_eq!(upright.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(upright.get_pixel(0, 1), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_pad_places_region() {
        let region = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
        let layout = CanvasLayout::compute(Size::new(2, 2), Size::new(6, 4), Offset::new(1, 1));
        let canvas = pad(region, &layout);

        assert_eq!(canvas.dimensions(), (6, 4));
        // left = 2 + 1, top = 1 - 1
        assert_eq!(canvas.get_pixel(3, 0), &Rgba([9, 9, 9, 255]));
        assert_eq!(canvas.get_pixel(4, 1), &Rgba([9, 9, 9, 255]));
        assert_eq!(canvas.get_pixel(2, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(canvas.get_pixel(3, 2), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_pad_clips_overflow() {
        let region = RgbaImage::from_pixel(2, 2, Rgba([1, 1, 1, 255]));
        let layout = CanvasLayout::compute(Size::new(2, 2), Size::new(3, 3), Offset::new(5, 0));
        let canvas = pad(region, &layout);
        assert_eq!(canvas.dimensions(), (3, 3));
        assert!(canvas.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_pad_does_not_blend_translucent_pixels() {
        let region = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 77]));
        let layout = CanvasLayout::compute(Size::new(1, 1), Size::new(3, 3), Offset::default());
        let canvas = pad(region, &layout);
        assert_eq!(canvas.get_pixel(1, 1), &Rgba([200, 100, 50, 77]));
    }
}
