//! Backends that replay content recognized ahead of time.
//!
//! A [`ScanDump`] captures the outcome of one completed scan session:
//! positioned OCR lines and decoded barcodes. The prescanned backends
//! serve region lookups from that captured state, which lets the
//! alignment engine, the CLI and the test suite run on caller-supplied
//! recognized content without a live recognition engine.

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::RectF;
use crate::text::Line;
use crate::{BarcodeScanner, RegionScanner, Result, TextScanner};

/// One decoded barcode with its bounding rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeFeature {
    /// Decoded barcode payload.
    pub text: String,
    /// Bounding rectangle of the barcode in image space.
    pub rect: RectF,
}

/// A persisted scan: everything the two recognizers produced for one image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanDump {
    /// Dimensions of the scanned image, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<(u32, u32)>,

    /// Recognized text lines in reading order.
    #[serde(default)]
    pub lines: Vec<Line>,

    /// Decoded barcodes.
    #[serde(default)]
    pub barcodes: Vec<BarcodeFeature>,
}

impl ScanDump {
    /// Load a scan dump from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dump: ScanDump = serde_json::from_str(&content)?;
        debug!(
            "Loaded scan dump: {} lines, {} barcodes",
            dump.lines.len(),
            dump.barcodes.len()
        );
        Ok(dump)
    }

    /// Save the scan dump to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Split the dump into its OCR and barcode backends.
    pub fn into_backends(self) -> (PrescannedOcr, PrescannedBarcode) {
        (
            PrescannedOcr::new(self.lines),
            PrescannedBarcode::new(self.barcodes),
        )
    }
}

/// OCR backend serving lookups from prescanned text lines.
#[derive(Debug, Clone, Default)]
pub struct PrescannedOcr {
    lines: Vec<Line>,
}

impl PrescannedOcr {
    /// Create a backend from recognized lines.
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}

impl RegionScanner for PrescannedOcr {
    /// Content was recognized ahead of time, so scanning succeeds
    /// without touching the image.
    fn scan(&mut self, _image: &DynamicImage) -> Result<()> {
        Ok(())
    }

    fn text_in_region(&self, region: &RectF) -> Option<String> {
        let mut parts = Vec::new();
        for line in &self.lines {
            let text: String = line
                .chars()
                .iter()
                .filter(|c| region.contains(&c.rect.center()))
                .map(|c| c.ch)
                .collect();
            let text = text.trim().to_string();
            if !text.is_empty() {
                parts.push(text);
            }
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }

    fn feature_rect_in_region(&self, region: &RectF) -> Option<RectF> {
        let rect = self
            .lines
            .iter()
            .flat_map(|line| line.chars())
            .filter(|c| !c.ch.is_whitespace() && region.contains(&c.rect.center()))
            .fold(RectF::default(), |acc, c| acc.united(&c.rect));

        if rect.is_empty() {
            None
        } else {
            Some(rect)
        }
    }
}

impl TextScanner for PrescannedOcr {
    fn text_lines_with_spaces(&self) -> &[Line] {
        &self.lines
    }
}

/// Barcode backend serving lookups from prescanned decode results.
#[derive(Debug, Clone, Default)]
pub struct PrescannedBarcode {
    features: Vec<BarcodeFeature>,
}

impl PrescannedBarcode {
    /// Create a backend from decoded barcodes.
    pub fn new(features: Vec<BarcodeFeature>) -> Self {
        Self { features }
    }

    fn feature_in_region(&self, region: &RectF) -> Option<&BarcodeFeature> {
        self.features.iter().find(|f| f.rect.intersects(region))
    }
}

impl RegionScanner for PrescannedBarcode {
    /// Content was recognized ahead of time, so scanning succeeds
    /// without touching the image.
    fn scan(&mut self, _image: &DynamicImage) -> Result<()> {
        Ok(())
    }

    fn text_in_region(&self, region: &RectF) -> Option<String> {
        self.feature_in_region(region).map(|f| f.text.clone())
    }

    fn feature_rect_in_region(&self, region: &RectF) -> Option<RectF> {
        self.feature_in_region(region).map(|f| f.rect)
    }
}

impl BarcodeScanner for PrescannedBarcode {}
