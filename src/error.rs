//! Error types for sprite reconstruction.

use thiserror::Error;

/// Result type alias using UnpackError.
pub type Result<T> = std::result::Result<T, UnpackError>;

/// Main error type for atlas loading and sprite extraction.
#[derive(Error, Debug)]
pub enum UnpackError {
    /// Failed to parse a property list document.
    #[error("Plist parse error: {0}")]
    Plist(#[from] plist::Error),

    /// Failed to parse or write JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode or encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested sprite name is not present in the atlas.
    #[error("Keyword does not exist in spritesheet: {0}")]
    UnknownSprite(String),

    /// Texture rect is inconsistent with the spritesheet bounds.
    #[error("Malformed texture rect for {name}: {reason}")]
    MalformedRect { name: String, reason: String },

    /// Frame unpacks to an empty region; batch extraction skips these.
    #[error("Degenerate sprite {name}: unpacked size {width}x{height}")]
    DegenerateSprite { name: String, width: i32, height: i32 },

    /// A `{a,b}` or `{{x,y},{w,h}}` string could not be parsed.
    #[error("Invalid geometry string: {0:?}")]
    InvalidGeometry(String),

    /// Atlas document is structurally invalid.
    #[error("Invalid atlas: {0}")]
    InvalidAtlas(String),

    /// Settings file could not be located or initialized.
    #[error("Settings error: {0}")]
    Settings(String),

    /// Output location cannot be used.
    #[error("Output error: {0}")]
    Output(String),
}

impl UnpackError {
    /// Whether this error only signals an empty frame that callers may skip.
    pub fn is_skippable(&self) -> bool {
        matches!(self, UnpackError::DegenerateSprite { .. })
    }
}
