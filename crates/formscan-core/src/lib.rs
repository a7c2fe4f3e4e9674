//! Core library for formscan template alignment and field extraction.
//!
//! This crate provides:
//! - template and extracted-document models with JSON persistence
//! - approximate string matching (trigram similarity, substitution-aware
//!   distance with an OCR confusion model)
//! - the template alignment engine: exhaustive offset search and the
//!   faster anchor-based search over recognized text spans
//! - the `Recognizer` orchestrating barcode and OCR backends

pub mod align;
pub mod error;
pub mod matching;
pub mod models;
pub mod recognizer;

pub use align::TemplateMatch;
pub use error::{FormscanError, Result, TemplateError};
pub use models::config::{AlignmentConfig, FormscanConfig, MatchingConfig};
pub use models::document::{DocumentBox, ExtractedDocument, FieldValue};
pub use models::template::{
    BoxKind, RecognizerKind, Template, TemplateBox, TemplateSet, TextFilter,
};
pub use recognizer::{RecognitionHandle, Recognizer, ScanReport};

/// Re-export recognition types.
pub use formscan_recognition::{
    BarcodeFeature, BarcodeScanner, Character, Line, PointF, PrescannedBarcode, PrescannedOcr,
    RectF, RegionScanner, ScanDump, ScanError, TextScanner,
};
