//! # Sprite Unpacker
//!
//! A Rust library for reconstructing individual sprites from packed
//! spritesheets.
//!
//! ## Overview
//!
//! A spritesheet packs many images into one texture. Its companion atlas
//! (a Cocos2d / TexturePacker property list) records where each sprite
//! lives, whether it was rotated to save space, and the untrimmed canvas it
//! was cut from. This library reads the atlas, crops and de-rotates each
//! sprite, and places it back on a transparent canvas of its original size.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sprite_unpacker::{load_atlas, load_texture, extract, ExtractMode};
//!
//! let atlas = load_atlas("GJ_GameSheet-uhd.plist")?;
//! let sheet = load_texture(atlas.texture_file_name()?)?;
//!
//! let sprite = extract(&atlas, &sheet, "player_01_001.png", ExtractMode::Padded)?;
//! sprite.save("player_01_001.png")?;
//! ```
//!
//! ## Batch Extraction
//!
//! Implement [`SpriteSink`] to receive every sprite of an atlas along with
//! progress information:
//!
//! ```ignore
//! use sprite_unpacker::{BatchExtractor, ProgressStep, SpriteSink};
//!
//! struct Save;
//!
//! impl SpriteSink for Save {
//!     fn on_sprite(&mut self, step: &ProgressStep<'_>, sprite: RgbaImage) -> Result<()> {
//!         sprite_unpacker::output::write_sprite(Path::new(step.frame_name), &sprite)
//!     }
//! }
//!
//! let summary = BatchExtractor::new(&atlas, &sheet).run(&mut Save)?;
//! ```

pub mod error;
pub mod types;
pub mod atlas;
pub mod texture;
pub mod extractor;
pub mod settings;
pub mod output;

// Re-export main types for convenience
pub use error::{Result, UnpackError};
pub use types::{CanvasLayout, Offset, Rect, Size};
pub use atlas::{Atlas, Frame, Metadata};
pub use extractor::{
    extract, unpacked_size, BatchExtractor, BatchSummary, ExtractMode, Extractor, ProgressStep,
    SpriteSink,
};
pub use settings::Settings;
pub use texture::{encode_png, load_texture, load_texture_from_bytes};

/// Load an atlas from a file path (property list or JSON).
pub fn load_atlas<P: AsRef<std::path::Path>>(path: P) -> Result<Atlas> {
    atlas::loader::load_from_path(path)
}

/// Load an atlas from property list bytes.
pub fn load_atlas_from_bytes(data: &[u8]) -> Result<Atlas> {
    atlas::loader::load_from_bytes(data)
}
