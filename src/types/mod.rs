//! Geometry types shared by the atlas model and the extractor.
//!
//! Atlas documents store geometry as strings such as `{5,-3}` and
//! `{{10,20},{30,40}}`. Parsing strips every brace, splits on commas and
//! reads each component as a signed integer. Fractional components are
//! truncated toward zero.

mod transform;

pub use transform::{round_half_away, CanvasLayout};

use crate::error::{Result, UnpackError};
use std::fmt;
use std::str::FromStr;

/// A pixel rectangle inside a spritesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Stored size of the rect.
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Size of the region the rect actually occupies in the sheet.
    ///
    /// Rotated frames keep their natural size in the rect, so the sheet
    /// region has width and height swapped.
    pub fn sheet_extent(&self, rotated: bool) -> Size {
        if rotated {
            Size::new(self.h, self.w)
        } else {
            Size::new(self.w, self.h)
        }
    }

    /// Check if the rect has no area.
    pub fn is_degenerate(&self) -> bool {
        self.w < 1 || self.h < 1
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{},{}}},{{{},{}}}}}", self.x, self.y, self.w, self.h)
    }
}

impl FromStr for Rect {
    type Err = UnpackError;

    fn from_str(s: &str) -> Result<Self> {
        let [x, y, w, h] = parse_components::<4>(s)?;
        Ok(Self { x, y, w, h })
    }
}

/// Displacement of a trimmed sprite from the center of its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{}}}", self.x, self.y)
    }
}

impl FromStr for Offset {
    type Err = UnpackError;

    fn from_str(s: &str) -> Result<Self> {
        let [x, y] = parse_components::<2>(s)?;
        Ok(Self { x, y })
    }
}

/// Integer dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width < 1 || self.height < 1
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{}}}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = UnpackError;

    fn from_str(s: &str) -> Result<Self> {
        let [width, height] = parse_components::<2>(s)?;
        Ok(Self { width, height })
    }
}

/// Parse exactly `N` comma separated integers, ignoring braces.
fn parse_components<const N: usize>(s: &str) -> Result<[i32; N]> {
    let invalid = || UnpackError::InvalidGeometry(s.to_string());
    let cleaned: String = s.chars().filter(|c| *c != '{' && *c != '}').collect();

    let mut values = [0i32; N];
    let mut parts = cleaned.split(',');
    for slot in values.iter_mut() {
        let part = parts.next().ok_or_else(invalid)?;
        *slot = parse_component(part.trim()).ok_or_else(invalid)?;
    }

    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(values)
}

fn parse_component(part: &str) -> Option<i32> {
    if let Ok(value) = part.parse::<i32>() {
        return Some(value);
    }
    // Packers occasionally write sub-pixel offsets like "-0.5".
    let value = part.parse::<f64>().ok()?;
    if !value.is_finite() || value.abs() > i32::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i32)
}
