//! Recognizer orchestration: runs the barcode and OCR engines against
//! one image and exposes the per-region lookups the alignment search
//! needs.

use std::sync::Arc;
use std::thread;

use image::DynamicImage;
use tracing::debug;

use formscan_recognition::{BarcodeScanner, RectF, ScanError, TextScanner};

use crate::models::config::FormscanConfig;
use crate::models::document::{DocumentBox, ExtractedDocument};
use crate::models::template::{RecognizerKind, Template, TextFilter};

/// Orchestrates the two content recognizers and extracts documents from
/// templates. The engines are independent and read-only with respect to
/// each other, so [`Recognizer::start_recognition`] can run them on
/// parallel worker threads sharing only the input image.
pub struct Recognizer<O: TextScanner, B: BarcodeScanner> {
    ocr: O,
    barcode: B,
    config: FormscanConfig,
}

impl<O: TextScanner, B: BarcodeScanner> Recognizer<O, B> {
    /// Create a recognizer over an OCR and a barcode engine.
    pub fn new(ocr: O, barcode: B) -> Self {
        Self {
            ocr,
            barcode,
            config: FormscanConfig::default(),
        }
    }

    /// Set the engine configuration.
    pub fn with_config(mut self, config: FormscanConfig) -> Self {
        self.config = config;
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &FormscanConfig {
        &self.config
    }

    /// The OCR engine.
    pub fn ocr(&self) -> &O {
        &self.ocr
    }

    /// The barcode engine.
    pub fn barcode(&self) -> &B {
        &self.barcode
    }

    /// Run both scans synchronously, in sequence. Replaces any previous
    /// scan state; spans and candidate lists derived from an earlier
    /// scan are no longer valid afterwards.
    pub fn recognize(&mut self, image: &DynamicImage) -> Result<(), ScanError> {
        self.barcode.scan(image)?;
        self.ocr.scan(image)
    }

    /// Run both scans concurrently on worker threads. The returned
    /// handle completes once both engines finish, whichever finishes
    /// first. An in-flight scan cannot be cancelled; dropping the handle
    /// lets the workers run to completion on their own.
    pub fn start_recognition(self, image: DynamicImage) -> RecognitionHandle<O, B>
    where
        O: 'static,
        B: 'static,
    {
        let image = Arc::new(image);
        let Recognizer {
            mut ocr,
            mut barcode,
            config,
        } = self;

        let ocr_image = Arc::clone(&image);
        let ocr_worker = thread::spawn(move || {
            let result = ocr.scan(&ocr_image);
            (ocr, result)
        });
        let barcode_worker = thread::spawn(move || {
            let result = barcode.scan(&image);
            (barcode, result)
        });

        RecognitionHandle {
            ocr_worker,
            barcode_worker,
            config,
        }
    }

    /// Text recognized in the given region by the requested engine.
    /// Unknown engine kinds yield no result.
    pub fn text_in_region(&self, region: &RectF, kind: RecognizerKind) -> Option<String> {
        match kind {
            RecognizerKind::Barcode => self.barcode.text_in_region(region),
            RecognizerKind::Text => self.ocr.text_in_region(region),
            RecognizerKind::Unknown => None,
        }
    }

    /// Bounding rectangle of the content `text_in_region` would return.
    /// Unknown engine kinds yield no result.
    pub fn feature_rect_in_region(&self, region: &RectF, kind: RecognizerKind) -> Option<RectF> {
        match kind {
            RecognizerKind::Barcode => self.barcode.feature_rect_in_region(region),
            RecognizerKind::Text => self.ocr.feature_rect_in_region(region),
            RecognizerKind::Unknown => None,
        }
    }

    /// Post-process an extracted value with the given filter.
    pub fn filter(&self, value: &str, kind: TextFilter) -> String {
        kind.apply(value)
    }

    /// Extract a document from the current scan using the given
    /// template, with the template translated by `(x_offset, y_offset)`
    /// first. Boxes with empty expected text are skipped entirely;
    /// output order mirrors template order.
    pub fn extract_with_template<'t>(
        &self,
        template: &'t Template,
        x_offset: f32,
        y_offset: f32,
    ) -> ExtractedDocument<'t> {
        let mut boxes = Vec::new();
        for template_box in template.boxes() {
            if template_box.expected_text.is_empty() {
                continue;
            }

            let rect = template_box.rect.translated(x_offset, y_offset);
            let text = self
                .text_in_region(&rect, template_box.recognizer)
                .unwrap_or_default();
            let text = self.filter(&text, template_box.filter);

            boxes.push(DocumentBox {
                text,
                template_box,
            });
        }
        ExtractedDocument::new(boxes)
    }
}

/// Outcome of one concurrent recognition run, per engine. A failed
/// engine never masks the other: callers may still consult whichever
/// engine succeeded.
#[derive(Debug)]
pub struct ScanReport {
    /// OCR scan outcome.
    pub ocr: Result<(), ScanError>,
    /// Barcode scan outcome.
    pub barcode: Result<(), ScanError>,
}

impl ScanReport {
    /// True when both engines completed successfully.
    pub fn is_complete(&self) -> bool {
        self.ocr.is_ok() && self.barcode.is_ok()
    }

    /// Collapse the report into a single result, surfacing the first
    /// failure.
    pub fn into_result(self) -> Result<(), ScanError> {
        self.ocr?;
        self.barcode
    }
}

/// Join handle for a concurrent recognition run started with
/// [`Recognizer::start_recognition`].
pub struct RecognitionHandle<O: TextScanner, B: BarcodeScanner> {
    ocr_worker: thread::JoinHandle<(O, Result<(), ScanError>)>,
    barcode_worker: thread::JoinHandle<(B, Result<(), ScanError>)>,
    config: FormscanConfig,
}

impl<O: TextScanner, B: BarcodeScanner> RecognitionHandle<O, B> {
    /// Block until both engines finish, then hand the recognizer back
    /// together with the per-engine outcomes. Completion is signalled
    /// exactly once, after the last engine reports done. A worker that
    /// dies abnormally is an error; the engines themselves are never
    /// lost on an ordinary scan failure.
    pub fn wait(self) -> Result<(Recognizer<O, B>, ScanReport), ScanError> {
        let (ocr, ocr_result) = self
            .ocr_worker
            .join()
            .map_err(|_| ScanError::Worker("OCR scan worker panicked".to_string()))?;
        let (barcode, barcode_result) = self
            .barcode_worker
            .join()
            .map_err(|_| ScanError::Worker("barcode scan worker panicked".to_string()))?;

        debug!(
            "Recognition finished (ocr: {}, barcode: {})",
            if ocr_result.is_ok() { "ok" } else { "failed" },
            if barcode_result.is_ok() { "ok" } else { "failed" },
        );

        Ok((
            Recognizer {
                ocr,
                barcode,
                config: self.config,
            },
            ScanReport {
                ocr: ocr_result,
                barcode: barcode_result,
            },
        ))
    }
}
