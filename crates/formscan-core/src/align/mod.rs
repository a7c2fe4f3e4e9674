//! Template alignment: finding the best-fitting template and the
//! positional offset between template and document.
//!
//! Two algorithms determine a template's offset against the recognized
//! document, both exposed as methods on
//! [`Recognizer`](crate::recognizer::Recognizer): an exhaustive grid
//! search over small offsets and a faster anchor-based search over
//! candidate text spans. The exhaustive search is the correctness
//! baseline for the anchor-based one.

mod anchor;
mod offset;

use tracing::trace;

use crate::matching;
use crate::models::document::ExtractedDocument;
use crate::models::template::Template;

/// The best `(template, offset, document)` triple found by a search.
#[derive(Debug, Clone)]
pub struct TemplateMatch<'t> {
    /// The winning template.
    pub template: &'t Template,
    /// Horizontal offset to apply to the template.
    pub x_offset: f32,
    /// Vertical offset to apply to the template.
    pub y_offset: f32,
    /// Document extracted at the winning offset.
    pub document: ExtractedDocument<'t>,
    /// Mean trigram similarity over the template's matcher boxes.
    pub score: f64,
}

/// Mean trigram similarity between each matcher box's extracted text
/// and its expected text. `None` for documents without matcher boxes:
/// such a template is not a valid alignment candidate.
pub(crate) fn matcher_score(document: &ExtractedDocument<'_>) -> Option<f64> {
    let mut score = 0.0;
    let mut matcher_boxes = 0u32;

    for document_box in document.boxes() {
        let template_box = document_box.template_box;
        if !template_box.is_matcher() {
            trace!("skipping '{}': not a matcher box", template_box.name);
            continue;
        }
        matcher_boxes += 1;
        score += matching::similarity(&document_box.text, &template_box.expected_text);
    }

    if matcher_boxes == 0 {
        None
    } else {
        Some(score / f64::from(matcher_boxes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentBox;
    use crate::models::template::{BoxKind, RecognizerKind, TemplateBox, TextFilter};
    use formscan_recognition::RectF;

    fn matcher_box(expected: &str) -> TemplateBox {
        TemplateBox {
            name: expected.to_lowercase(),
            rect: RectF::new(0.0, 0.0, 10.0, 10.0),
            feature_rect: None,
            kind: BoxKind::Matcher,
            recognizer: RecognizerKind::Text,
            filter: TextFilter::None,
            expected_text: expected.to_string(),
        }
    }

    #[test]
    fn test_matcher_score_averages_matcher_boxes() {
        let exact = matcher_box("INVOICE");
        let wrong = matcher_box("RECEIPT");
        let document = ExtractedDocument::new(vec![
            DocumentBox {
                text: "INVOICE".to_string(),
                template_box: &exact,
            },
            DocumentBox {
                text: "GARBAGE".to_string(),
                template_box: &wrong,
            },
        ]);

        assert_eq!(matcher_score(&document), Some(0.5));
    }

    #[test]
    fn test_matcher_score_without_matchers_is_none() {
        let mut plain = matcher_box("INVOICE");
        plain.kind = BoxKind::Text;
        let document = ExtractedDocument::new(vec![DocumentBox {
            text: "INVOICE".to_string(),
            template_box: &plain,
        }]);

        assert_eq!(matcher_score(&document), None);
    }
}
