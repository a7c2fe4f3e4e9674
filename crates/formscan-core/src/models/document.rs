//! Extracted-document model: the values a template pulled out of one scan.

use serde::Serialize;

use crate::models::template::TemplateBox;

/// One extracted field value with a back-reference to its definition.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBox<'t> {
    /// Extracted text, after filtering.
    pub text: String,
    /// The template box this value was extracted for.
    pub template_box: &'t TemplateBox,
}

/// An ordered collection of extracted fields, one per template box with
/// non-empty expected text, in template order. Produced fresh by every
/// extraction call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDocument<'t> {
    boxes: Vec<DocumentBox<'t>>,
}

impl<'t> ExtractedDocument<'t> {
    /// Create a document from its boxes.
    pub fn new(boxes: Vec<DocumentBox<'t>>) -> Self {
        Self { boxes }
    }

    /// The extracted fields in template order.
    pub fn boxes(&self) -> &[DocumentBox<'t>] {
        &self.boxes
    }

    /// Number of extracted fields.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// True when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Extracted value for the named field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.boxes
            .iter()
            .find(|b| b.template_box.name == name)
            .map(|b| b.text.as_str())
    }

    /// Owned name/value pairs, for serialization at the output boundary.
    pub fn to_fields(&self) -> Vec<FieldValue> {
        self.boxes
            .iter()
            .map(|b| FieldValue {
                name: b.template_box.name.clone(),
                value: b.text.clone(),
            })
            .collect()
    }
}

/// A serializable name/value pair for one extracted field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValue {
    /// Field name from the template.
    pub name: String,
    /// Extracted value.
    pub value: String,
}
