//! Canvas placement for padded sprite reconstruction.

use super::{Offset, Size};

/// Round to the nearest integer, with halves rounded away from zero.
pub fn round_half_away(value: f64) -> i64 {
    value.round() as i64
}

/// Where a cropped sprite lands on its reconstructed canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasLayout {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Left edge of the cropped region on the canvas.
    pub left: i64,
    /// Top edge of the cropped region on the canvas.
    pub top: i64,
    /// Whether the source width was large enough to pad horizontally.
    pub padded_x: bool,
    /// Whether the source height was large enough to pad vertically.
    pub padded_y: bool,
}

impl CanvasLayout {
    /// Compute the layout of a `cropped` region on a `source` sized canvas.
    ///
    /// An axis whose declared source size is smaller than the cropped size
    /// falls back to the cropped size with no offset. The vertical offset is
    /// subtracted: packers record Y pointing up.
    pub fn compute(cropped: Size, source: Size, offset: Offset) -> Self {
        let padded_x = source.width >= cropped.width;
        let padded_y = source.height >= cropped.height;

        let (width, left) = if padded_x {
            (
                source.width,
                centered(source.width, cropped.width) + offset.x as i64,
            )
        } else {
            (cropped.width, 0)
        };

        let (height, top) = if padded_y {
            (
                source.height,
                centered(source.height, cropped.height) - offset.y as i64,
            )
        } else {
            (cropped.height, 0)
        };

        Self {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
            left,
            top,
            padded_x,
            padded_y,
        }
    }

    /// Check if either axis fell back to the cropped size.
    pub fn is_undersized(&self) -> bool {
        !self.padded_x || !self.padded_y
    }

    /// Check if a `width` x `height` region at (left, top) fits the canvas.
    pub fn contains(&self, width: u32, height: u32) -> bool {
        self.left >= 0
            && self.top >= 0
            && self.left + width as i64 <= self.width as i64
            && self.top + height as i64 <= self.height as i64
    }
}

fn centered(source: i32, cropped: i32) -> i64 {
    round_half_away((source as f64 - cropped as f64) / 2.0)
}
