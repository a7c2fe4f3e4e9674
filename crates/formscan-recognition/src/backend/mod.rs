//! Scanner backend traits and implementations.

pub mod prescanned;

use image::DynamicImage;

use crate::geometry::RectF;
use crate::text::Line;
use crate::Result;

/// Trait for content recognizers that scan an image and answer
/// per-region lookups afterwards.
///
/// This trait abstracts over the two recognition engines the alignment
/// search consumes: OCR and barcode decoding. Implementations are `Send`
/// so both engines can scan the same image on independent worker threads.
pub trait RegionScanner: Send {
    /// Scan the image, replacing any previous scan state.
    ///
    /// Region lookups answer against the most recent successful scan.
    fn scan(&mut self, image: &DynamicImage) -> Result<()>;

    /// Text recognized inside the given region, or `None` when the
    /// region holds no recognized content.
    fn text_in_region(&self, region: &RectF) -> Option<String>;

    /// Bounding rectangle of the content that `text_in_region` would
    /// return for the given region.
    fn feature_rect_in_region(&self, region: &RectF) -> Option<RectF>;
}

/// An OCR engine: a region scanner that additionally exposes its
/// recognized text as positioned lines.
pub trait TextScanner: RegionScanner {
    /// Recognized text lines in reading order, with inter-word gaps
    /// materialized as space characters.
    fn text_lines_with_spaces(&self) -> &[Line];
}

/// A barcode decoder. The base trait already covers its whole surface;
/// the marker keeps barcode and OCR engines from being swapped.
pub trait BarcodeScanner: RegionScanner {}
