//! Recognition backend abstraction layer for formscan.
//!
//! This crate provides the seam between the alignment engine and the
//! content recognizers that feed it:
//! - geometry primitives shared across the workspace
//! - the positioned-text model produced by OCR (characters with boxes,
//!   grouped into lines)
//! - the `RegionScanner` / `TextScanner` / `BarcodeScanner` traits every
//!   recognizer implements
//! - a "prescanned" backend pair that replays content recognized ahead of
//!   time, used by the CLI and the test suite

mod backend;
mod error;
mod geometry;
mod text;

pub use backend::prescanned::{BarcodeFeature, PrescannedBarcode, PrescannedOcr, ScanDump};
pub use backend::{BarcodeScanner, RegionScanner, TextScanner};
pub use error::ScanError;
pub use geometry::{PointF, RectF};
pub use text::{Character, Line};

/// Result type for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
