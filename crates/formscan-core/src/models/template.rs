//! Template model: named regions with expected content, authored against
//! a reference document layout.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use formscan_recognition::RectF;

use crate::error::TemplateError;

/// Role of a template box in the alignment search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxKind {
    /// Plain extraction field.
    #[default]
    Text,
    /// Field used to locate the template's offset against a document.
    Matcher,
}

/// Which recognition engine serves a template box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerKind {
    /// Barcode decoder.
    Barcode,
    /// OCR engine.
    #[default]
    Text,
    /// Unrecognized kind from a newer template file; yields no result.
    #[serde(other)]
    Unknown,
}

/// Post-processing filter applied to extracted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFilter {
    /// Keep digits only.
    Numeric,
    /// Keep letters only.
    Alphabetic,
    /// Keep letters and digits.
    Alphanumeric,
    /// Pass the value through unchanged.
    #[default]
    None,
    /// Unrecognized filter from a newer template file; passes through
    /// unchanged with a warning.
    #[serde(other)]
    Unknown,
}

impl TextFilter {
    /// Apply the filter to an extracted value.
    pub fn apply(&self, value: &str) -> String {
        match self {
            TextFilter::Numeric => value.chars().filter(|c| c.is_ascii_digit()).collect(),
            TextFilter::Alphabetic => value.chars().filter(|c| c.is_alphabetic()).collect(),
            TextFilter::Alphanumeric => value
                .chars()
                .filter(|c| c.is_ascii_digit() || c.is_alphabetic())
                .collect(),
            TextFilter::None => value.to_string(),
            TextFilter::Unknown => {
                warn!("unknown text filter, passing value through unchanged");
                value.to_string()
            }
        }
    }
}

/// A named field definition within a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateBox {
    /// Field name.
    pub name: String,

    /// Region of the field in reference coordinates.
    pub rect: RectF,

    /// Tight bounding rectangle of the expected text, recorded when the
    /// template was authored. Matcher anchoring uses it when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_rect: Option<RectF>,

    /// Role of the box in the alignment search.
    #[serde(default)]
    pub kind: BoxKind,

    /// Recognition engine serving this box.
    #[serde(default)]
    pub recognizer: RecognizerKind,

    /// Filter applied to the extracted value.
    #[serde(default)]
    pub filter: TextFilter,

    /// Text expected at this position on the reference document. Boxes
    /// with empty expected text are skipped by extraction.
    #[serde(default)]
    pub expected_text: String,
}

impl TemplateBox {
    /// The rectangle matcher anchoring measures offsets against.
    pub fn anchor_rect(&self) -> RectF {
        self.feature_rect.unwrap_or(self.rect)
    }

    /// True for matcher-type boxes.
    pub fn is_matcher(&self) -> bool {
        self.kind == BoxKind::Matcher
    }
}

/// An ordered collection of template boxes sharing one reference
/// coordinate space. Immutable during the alignment search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Template name.
    pub name: String,

    /// Field definitions, in extraction order.
    #[serde(default)]
    boxes: Vec<TemplateBox>,
}

impl Template {
    /// Create a template from its boxes.
    pub fn new(name: impl Into<String>, boxes: Vec<TemplateBox>) -> Self {
        Self {
            name: name.into(),
            boxes,
        }
    }

    /// The template's boxes in extraction order.
    pub fn boxes(&self) -> &[TemplateBox] {
        &self.boxes
    }

    /// Matcher-type boxes in template order.
    pub fn matcher_boxes(&self) -> impl Iterator<Item = &TemplateBox> {
        self.boxes.iter().filter(|b| b.is_matcher())
    }

    /// True when the template has at least one matcher box and can be
    /// used for offset search.
    pub fn has_matchers(&self) -> bool {
        self.boxes.iter().any(|b| b.is_matcher())
    }

    /// Load a template from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path)?;
        let template: Template =
            serde_json::from_str(&content).map_err(|e| TemplateError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        debug!(
            "Loaded template '{}' with {} boxes",
            template.name,
            template.boxes.len()
        );
        Ok(template)
    }

    /// Save the template to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), TemplateError> {
        let content = serde_json::to_string_pretty(self).map_err(|e| TemplateError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// A set of candidate templates, typically loaded from a directory of
/// JSON files.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<Template>,
}

impl TemplateSet {
    /// Create a set from templates.
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Load every `*.json` template in a directory, in file-name order.
    pub fn from_dir(dir: &Path) -> Result<Self, TemplateError> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut templates = Vec::with_capacity(paths.len());
        for path in &paths {
            templates.push(Template::from_file(path)?);
        }

        debug!("Loaded {} templates from {}", templates.len(), dir.display());
        Ok(Self { templates })
    }

    /// The templates in load order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Number of templates in the set.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when the set holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filter_numeric() {
        assert_eq!(TextFilter::Numeric.apply("AB12-34"), "1234");
    }

    #[test]
    fn test_filter_alphabetic() {
        assert_eq!(TextFilter::Alphabetic.apply("AB12-34"), "AB");
    }

    #[test]
    fn test_filter_alphanumeric() {
        assert_eq!(TextFilter::Alphanumeric.apply("AB12-34"), "AB1234");
    }

    #[test]
    fn test_filter_none_and_unknown_pass_through() {
        assert_eq!(TextFilter::None.apply("AB12-34"), "AB12-34");
        assert_eq!(TextFilter::Unknown.apply("AB12-34"), "AB12-34");
    }

    #[test]
    fn test_unknown_filter_kind_deserializes() {
        let parsed: TextFilter = serde_json::from_str("\"soundex\"").unwrap();
        assert_eq!(parsed, TextFilter::Unknown);
    }

    #[test]
    fn test_template_from_json() {
        let json = r#"{
            "name": "invoice-acme",
            "boxes": [
                {
                    "name": "title",
                    "rect": { "x": 10.0, "y": 5.0, "width": 40.0, "height": 8.0 },
                    "kind": "matcher",
                    "expected_text": "INVOICE"
                },
                {
                    "name": "total",
                    "rect": { "x": 120.0, "y": 200.0, "width": 30.0, "height": 8.0 },
                    "filter": "numeric",
                    "expected_text": "0,00"
                }
            ]
        }"#;

        let template: Template = serde_json::from_str(json).unwrap();
        assert_eq!(template.name, "invoice-acme");
        assert_eq!(template.boxes().len(), 2);
        assert!(template.boxes()[0].is_matcher());
        assert_eq!(template.boxes()[0].recognizer, RecognizerKind::Text);
        assert_eq!(template.boxes()[1].filter, TextFilter::Numeric);
        assert!(template.has_matchers());
    }

    #[test]
    fn test_anchor_rect_falls_back_to_rect() {
        let rect = RectF::new(1.0, 2.0, 3.0, 4.0);
        let feature = RectF::new(1.5, 2.5, 2.0, 3.0);

        let mut tbox = TemplateBox {
            name: "title".to_string(),
            rect,
            feature_rect: None,
            kind: BoxKind::Matcher,
            recognizer: RecognizerKind::Text,
            filter: TextFilter::None,
            expected_text: "INVOICE".to_string(),
        };
        assert_eq!(tbox.anchor_rect(), rect);

        tbox.feature_rect = Some(feature);
        assert_eq!(tbox.anchor_rect(), feature);
    }
}
