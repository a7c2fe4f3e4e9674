//! Exhaustive offset search: tries every grid offset within the
//! configured bound for every candidate template.

use tracing::debug;

use formscan_recognition::{BarcodeScanner, TextScanner};

use crate::align::{matcher_score, TemplateMatch};
use crate::models::template::Template;
use crate::recognizer::Recognizer;

impl<O: TextScanner, B: BarcodeScanner> Recognizer<O, B> {
    /// Find the best template for the current scan by evaluating every
    /// `(x, y)` offset in `[-bound, +bound]²` in raster order, keeping
    /// the highest-scoring `(template, offset, document)` triple. Only
    /// strict improvements replace the incumbent, so ties keep the
    /// earlier result and a template never wins with a zero score.
    ///
    /// Cost is `O(templates × grid × boxes)`; the anchor-based search
    /// avoids the grid but this one is the correctness baseline.
    pub fn find_matching_template_by_offset<'t>(
        &self,
        templates: &'t [Template],
    ) -> Option<TemplateMatch<'t>> {
        let bound = self.config().alignment.offset_bound;
        let mut best: Option<TemplateMatch<'t>> = None;

        for template in templates {
            if !template.has_matchers() {
                debug!("skipping template '{}': no matcher boxes", template.name);
                continue;
            }

            for x_offset in -bound..=bound {
                for y_offset in -bound..=bound {
                    let document =
                        self.extract_with_template(template, x_offset as f32, y_offset as f32);
                    let Some(score) = matcher_score(&document) else {
                        continue;
                    };

                    debug!(
                        "template '{}' scored {:.3} at offset ({}, {})",
                        template.name, score, x_offset, y_offset
                    );

                    if best.as_ref().map_or(score > 0.0, |b| score > b.score) {
                        best = Some(TemplateMatch {
                            template,
                            x_offset: x_offset as f32,
                            y_offset: y_offset as f32,
                            document,
                            score,
                        });
                    }
                }
            }
        }

        best
    }
}
