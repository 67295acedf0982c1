//! Atlas model.
//!
//! An atlas maps sprite names to the frame descriptors a packer recorded,
//! plus metadata naming the spritesheet image. It is read-only once built.

pub mod loader;

use crate::error::{Result, UnpackError};
use crate::types::{Offset, Rect, Size};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Packing metadata for one sprite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame", into = "RawFrame")]
pub struct Frame {
    /// Alternate file names the sprite is also known by.
    pub aliases: Vec<String>,
    /// Displacement of the trimmed region from the canvas center.
    pub sprite_offset: Offset,
    /// Trimmed size recorded by the packer.
    pub sprite_size: Size,
    /// Size of the original untrimmed canvas.
    pub sprite_source_size: Size,
    /// Location and natural size of the sprite inside the sheet.
    pub texture_rect: Rect,
    /// Whether the sheet region is stored rotated by 90 degrees.
    pub texture_rotated: bool,
}

impl Frame {
    /// Create an unrotated frame with no offset and no trimming.
    pub fn new(texture_rect: Rect) -> Self {
        Self {
            aliases: Vec::new(),
            sprite_offset: Offset::default(),
            sprite_size: texture_rect.size(),
            sprite_source_size: texture_rect.size(),
            texture_rect,
            texture_rotated: false,
        }
    }

    pub fn rotated(mut self, rotated: bool) -> Self {
        self.texture_rotated = rotated;
        self
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.sprite_offset = offset;
        self
    }

    pub fn with_source_size(mut self, size: Size) -> Self {
        self.sprite_source_size = size;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Check if the sprite is known under `alias`.
    ///
    /// Aliases are compared as file names, so a missing `.png` suffix is
    /// added before comparing.
    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| {
            if a.ends_with(".png") {
                a == alias
            } else {
                alias.strip_suffix(".png") == Some(a.as_str())
            }
        })
    }
}

/// Document form of a frame: geometry is stored as strings.
///
/// Format 2 documents use `offset`, `sourceSize`, `frame` and `rotated`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFrame {
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(alias = "offset")]
    sprite_offset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sprite_size: Option<String>,
    #[serde(alias = "sourceSize")]
    sprite_source_size: String,
    #[serde(alias = "frame")]
    texture_rect: String,
    #[serde(default, alias = "rotated")]
    texture_rotated: bool,
}

impl TryFrom<RawFrame> for Frame {
    type Error = UnpackError;

    fn try_from(raw: RawFrame) -> Result<Self> {
        let texture_rect: Rect = raw.texture_rect.parse()?;
        let sprite_size = match raw.sprite_size {
            Some(size) => size.parse()?,
            None => texture_rect.size(),
        };

        Ok(Self {
            aliases: raw.aliases,
            sprite_offset: raw.sprite_offset.parse()?,
            sprite_size,
            sprite_source_size: raw.sprite_source_size.parse()?,
            texture_rect,
            texture_rotated: raw.texture_rotated,
        })
    }
}

impl From<Frame> for RawFrame {
    fn from(frame: Frame) -> Self {
        Self {
            aliases: frame.aliases,
            sprite_offset: frame.sprite_offset.to_string(),
            sprite_size: Some(frame.sprite_size.to_string()),
            sprite_source_size: frame.sprite_source_size.to_string(),
            texture_rect: frame.texture_rect.to_string(),
            texture_rotated: frame.texture_rotated,
        }
    }
}

/// Sheet level metadata. Only the texture name is used for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premultiply_alpha: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_texture_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smartupdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_file_name: Option<String>,
}

impl Metadata {
    /// Create metadata naming the backing spritesheet image.
    pub fn for_texture(name: impl Into<String>) -> Self {
        Self {
            real_texture_file_name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// A parsed texture atlas.
///
/// Frames keep the order they appear in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Atlas {
    frames: IndexMap<String, Frame>,
    #[serde(default)]
    metadata: Metadata,
}

impl Atlas {
    /// Build an atlas from frames and metadata.
    pub fn new(frames: impl IntoIterator<Item = (String, Frame)>, metadata: Metadata) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            metadata,
        }
    }

    /// Get a frame by its exact name.
    pub fn get(&self, name: &str) -> Result<&Frame> {
        self.frames
            .get(name)
            .ok_or_else(|| UnpackError::UnknownSprite(name.to_string()))
    }

    /// Resolve a keyword to a frame, by exact name first and then by alias.
    ///
    /// Returns the frame's primary name along with the frame.
    pub fn resolve(&self, keyword: &str) -> Result<(&str, &Frame)> {
        if let Some((name, frame)) = self.frames.get_key_value(keyword) {
            return Ok((name.as_str(), frame));
        }

        self.frames
            .iter()
            .find(|(_, frame)| frame.has_alias(keyword))
            .map(|(name, frame)| (name.as_str(), frame))
            .ok_or_else(|| UnpackError::UnknownSprite(keyword.to_string()))
    }

    /// Iterate over all frames in document order.
    pub fn frames(&self) -> impl Iterator<Item = (&str, &Frame)> {
        self.frames.iter().map(|(name, frame)| (name.as_str(), frame))
    }

    /// Get the number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Length of the longest frame name, for aligned progress output.
    pub fn longest_name_len(&self) -> usize {
        self.frames.keys().map(|name| name.chars().count()).max().unwrap_or(0)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// File name of the spritesheet image backing this atlas.
    ///
    /// Older documents only carry `textureFileName`, which is used when
    /// `realTextureFileName` is absent.
    pub fn texture_file_name(&self) -> Result<&str> {
        self.metadata
            .real_texture_file_name
            .as_deref()
            .or(self.metadata.texture_file_name.as_deref())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                UnpackError::InvalidAtlas("metadata does not name a texture file".to_string())
            })
    }
}
