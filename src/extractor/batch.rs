//! Batch extraction of every frame in an atlas.

use super::{unpacked_size, ExtractMode, Extractor};
use crate::atlas::{Atlas, Frame};
use crate::error::Result;
use crate::types::Rect;
use image::RgbaImage;

/// Progress information for one visited frame.
#[derive(Debug, Clone, Copy)]
pub struct ProgressStep<'a> {
    /// Primary name of the frame.
    pub frame_name: &'a str,
    /// The frame descriptor.
    pub frame: &'a Frame,
    /// Texture rect as recorded in the atlas.
    pub rect: Rect,
    /// 1-based position of the frame in enumeration order.
    pub index: usize,
    /// Number of frames in the atlas.
    pub total: usize,
}

/// Receives the results of a batch extraction.
///
/// Returning an error from either method stops the batch after the
/// current frame.
pub trait SpriteSink {
    /// Called with each extracted sprite.
    fn on_sprite(&mut self, step: &ProgressStep<'_>, sprite: RgbaImage) -> Result<()>;

    /// Called for frames skipped because they unpack to an empty region.
    fn on_skip(&mut self, step: &ProgressStep<'_>) -> Result<()> {
        let _ = step;
        Ok(())
    }
}

/// Counts from a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub extracted: usize,
    pub skipped: usize,
    pub total: usize,
}

/// Sequentially extracts every frame of an atlas.
pub struct BatchExtractor<'a> {
    extractor: Extractor<'a>,
    mode: ExtractMode,
}

impl<'a> BatchExtractor<'a> {
    /// Create a batch extractor producing padded sprites.
    pub fn new(atlas: &'a Atlas, sheet: &'a RgbaImage) -> Self {
        Self {
            extractor: Extractor::new(atlas, sheet),
            mode: ExtractMode::Padded,
        }
    }

    pub fn with_mode(mut self, mode: ExtractMode) -> Self {
        self.mode = mode;
        self
    }

    /// Extract every non-degenerate frame and hand it to `sink`.
    ///
    /// Frames whose [`unpacked_size`] is degenerate are reported through
    /// [`SpriteSink::on_skip`] without touching the sheet. Any extraction
    /// error aborts the batch.
    pub fn run<S: SpriteSink + ?Sized>(&self, sink: &mut S) -> Result<BatchSummary> {
        let atlas = self.extractor.atlas();
        let mut summary = BatchSummary {
            total: atlas.len(),
            ..BatchSummary::default()
        };

        for (i, (name, frame)) in atlas.frames().enumerate() {
            let step = ProgressStep {
                frame_name: name,
                frame,
                rect: frame.texture_rect,
                index: i + 1,
                total: summary.total,
            };

            let size = unpacked_size(frame);
            if size.is_degenerate() {
                tracing::debug!("Skipping {}: unpacks to {}", name, size);
                sink.on_skip(&step)?;
                summary.skipped += 1;
                continue;
            }

            let sprite = self.extractor.extract_frame(name, frame, self.mode)?;
            sink.on_sprite(&step, sprite)?;
            summary.extracted += 1;
        }

        Ok(summary)
    }
}
