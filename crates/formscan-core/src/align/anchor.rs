//! Anchor-based offset search: locates matcher-box text directly in the
//! recognized lines instead of sweeping an offset grid.

use tracing::debug;

use formscan_recognition::{BarcodeScanner, PointF, TextScanner};

use crate::align::{matcher_score, TemplateMatch};
use crate::matching::{
    distance, extract_all_ranges, RangeCombinations, ScoredRange, SubstitutionModel,
};
use crate::models::template::{Template, TemplateBox};
use crate::recognizer::Recognizer;

impl<O: TextScanner, B: BarcodeScanner> Recognizer<O, B> {
    /// Find the best template for the current scan by first locating
    /// each template's offset through its matcher boxes, then scoring a
    /// single extraction at that offset. Faster than the exhaustive
    /// grid; templates whose offset search does not converge are
    /// skipped without aborting the overall search.
    pub fn find_matching_template_by_text<'t>(
        &self,
        templates: &'t [Template],
    ) -> Option<TemplateMatch<'t>> {
        let mut best: Option<TemplateMatch<'t>> = None;

        for template in templates {
            let Some(offset) = self.find_template_offset(template) else {
                continue;
            };

            let document = self.extract_with_template(template, offset.x, offset.y);
            let Some(score) = matcher_score(&document) else {
                continue;
            };

            debug!(
                "template '{}' scored {:.3} at offset ({}, {})",
                template.name, score, offset.x, offset.y
            );

            if best.as_ref().map_or(score > 0.0, |b| score > b.score) {
                best = Some(TemplateMatch {
                    template,
                    x_offset: offset.x,
                    y_offset: offset.y,
                    document,
                    score,
                });
            }
        }

        best
    }

    /// The offset to apply to the template so it best fits the current
    /// scan, or `None` when the template has no matcher boxes or no
    /// geometrically consistent candidate combination is found within
    /// the combination budget.
    ///
    /// For every matcher box, all spans of the expected text's length
    /// are scored against it with the substitution distance and sorted
    /// best-first; a lazy enumerator then walks span combinations near
    /// the per-box optima until one passes the geometric consistency
    /// check against the first box's offset.
    pub fn find_template_offset(&self, template: &Template) -> Option<PointF> {
        let matchers: Vec<&TemplateBox> = template.matcher_boxes().collect();
        if matchers.is_empty() {
            debug!(
                "template '{}' has no matcher boxes, cannot search offset",
                template.name
            );
            return None;
        }

        let lines = self.ocr().text_lines_with_spaces();
        let model = SubstitutionModel::from_config(&self.config().matching);

        let mut candidates: Vec<Vec<ScoredRange<'_>>> = Vec::with_capacity(matchers.len());
        for matcher in &matchers {
            let expected = &matcher.expected_text;
            let mut scored: Vec<ScoredRange<'_>> =
                extract_all_ranges(lines, expected.chars().count())
                    .into_iter()
                    .map(|range| ScoredRange {
                        distance: distance(&range.text(), expected, &model),
                        range,
                    })
                    .collect();
            scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));

            let Some(first) = scored.first() else {
                debug!("no candidate spans for template box '{}'", expected);
                return None;
            };
            debug!(
                "best match for template box '{}' is '{}' (distance {:.2})",
                expected,
                first.range.text(),
                first.distance
            );

            candidates.push(scored);
        }

        let tolerance = self.config().alignment.tolerance;
        let budget = self.config().alignment.combination_budget;

        for ranges in RangeCombinations::new(&candidates).take(budget) {
            // The translation extract_with_template must apply to land
            // the first matcher box on its candidate span.
            let diff = ranges[0].range.rect().center() - matchers[0].anchor_rect().center();

            let consistent = ranges
                .iter()
                .zip(matchers.iter())
                .skip(1)
                .all(|(scored, matcher)| {
                    let d = scored.range.rect().center() - matcher.anchor_rect().center();
                    offsets_consistent(diff, d, tolerance)
                });

            if consistent {
                return Some(diff);
            }
        }

        debug!(
            "offset search for template '{}' exhausted its combination budget",
            template.name
        );
        None
    }
}

/// Whether a box's own offset `d` is consistent with the anchor box's
/// offset `diff`.
///
/// Note: this compares offset magnitudes, rejecting when `|d|` comes
/// within `tolerance` of `|diff|` on either axis, rather than bounding
/// the difference `|d - diff|`. The smaller the anchor offset, the more
/// combinations it rejects; in particular a zero anchor offset rejects
/// everything. Changing this to a fixed-tolerance difference check would
/// alter which combinations are accepted; see the divergence tests.
fn offsets_consistent(diff: PointF, d: PointF, tolerance: f32) -> bool {
    if d.x.abs() + tolerance > diff.x.abs() {
        return false;
    }
    if d.y.abs() + tolerance > diff.y.abs() {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::{BoxKind, RecognizerKind, TextFilter};
    use formscan_recognition::{Character, Line, PrescannedBarcode, PrescannedOcr, RectF};
    use pretty_assertions::assert_eq;

    fn line_at(text: &str, x: f32, y: f32) -> Line {
        let chars = text
            .chars()
            .enumerate()
            .map(|(i, ch)| Character::new(ch, RectF::new(x + i as f32 * 10.0, y, 10.0, 12.0)))
            .collect();
        Line::new(chars)
    }

    fn matcher_box(name: &str, rect: RectF, feature_rect: RectF, expected: &str) -> TemplateBox {
        TemplateBox {
            name: name.to_string(),
            rect,
            feature_rect: Some(feature_rect),
            kind: BoxKind::Matcher,
            recognizer: RecognizerKind::Text,
            filter: TextFilter::None,
            expected_text: expected.to_string(),
        }
    }

    fn recognizer_over(lines: Vec<Line>) -> Recognizer<PrescannedOcr, PrescannedBarcode> {
        Recognizer::new(PrescannedOcr::new(lines), PrescannedBarcode::default())
    }

    #[test]
    fn test_single_confused_matcher_aligns_at_zero() {
        // "INVOICE" misread as "INV0ICE"; the substitution distance
        // still ranks that span first, and a lone matcher box passes
        // the consistency check trivially.
        let recognizer = recognizer_over(vec![
            line_at("INV0ICE", 50.0, 20.0),
            line_at("XXXXXXX", 50.0, 60.0),
        ]);
        let template = Template::new(
            "invoice",
            vec![matcher_box(
                "title",
                RectF::new(50.0, 20.0, 70.0, 12.0),
                RectF::new(50.0, 20.0, 70.0, 12.0),
                "INVOICE",
            )],
        );

        let offset = recognizer.find_template_offset(&template).unwrap();
        assert_eq!(offset, PointF::new(0.0, 0.0));
    }

    #[test]
    fn test_multi_box_offset_accepted_when_consistent() {
        // Anchor box offset (40, 40); second box offset (30, 30) stays
        // clear of the anchor magnitude by more than the tolerance.
        let recognizer = recognizer_over(vec![
            line_at("AAAA", 70.0, 84.0),
            line_at("BBBB", 160.0, 74.0),
        ]);
        let template = Template::new(
            "form",
            vec![
                matcher_box(
                    "a",
                    RectF::new(45.0, 44.0, 10.0, 12.0),
                    RectF::new(45.0, 44.0, 10.0, 12.0),
                    "AAAA",
                ),
                matcher_box(
                    "b",
                    RectF::new(145.0, 44.0, 10.0, 12.0),
                    RectF::new(145.0, 44.0, 10.0, 12.0),
                    "BBBB",
                ),
            ],
        );

        let offset = recognizer.find_template_offset(&template).unwrap();
        assert_eq!(offset, PointF::new(40.0, 40.0));
    }

    #[test]
    fn test_uniformly_shifted_boxes_do_not_converge() {
        // Both boxes shifted by the same (10, 10): each box's offset
        // magnitude is within tolerance of the anchor's, so every
        // combination is rejected and the search reports no offset.
        let recognizer = recognizer_over(vec![
            line_at("AAAA", 60.0, 60.0),
            line_at("BBBB", 160.0, 60.0),
        ]);
        let template = Template::new(
            "form",
            vec![
                matcher_box(
                    "a",
                    RectF::new(50.0, 50.0, 40.0, 12.0),
                    RectF::new(50.0, 50.0, 40.0, 12.0),
                    "AAAA",
                ),
                matcher_box(
                    "b",
                    RectF::new(150.0, 50.0, 40.0, 12.0),
                    RectF::new(150.0, 50.0, 40.0, 12.0),
                    "BBBB",
                ),
            ],
        );

        assert!(recognizer.find_template_offset(&template).is_none());
    }

    #[test]
    fn test_template_without_matchers_has_no_offset() {
        let mut plain = matcher_box(
            "title",
            RectF::new(0.0, 0.0, 10.0, 10.0),
            RectF::new(0.0, 0.0, 10.0, 10.0),
            "INVOICE",
        );
        plain.kind = BoxKind::Text;
        let template = Template::new("plain", vec![plain]);

        let recognizer = recognizer_over(vec![line_at("INVOICE", 0.0, 0.0)]);
        assert!(recognizer.find_template_offset(&template).is_none());
    }

    #[test]
    fn test_search_agrees_with_exhaustive_baseline() {
        // The cross-validation property: where the anchor search
        // converges, both algorithms pick the same template and offset.
        let lines = vec![
            line_at("INVOICE", 103.0, 42.0),
            line_at("TOTAL 1230,00", 103.0, 302.0),
        ];
        let template = Template::new(
            "invoice",
            vec![matcher_box(
                "title",
                RectF::new(100.0, 40.0, 65.0, 6.0),
                RectF::new(100.0, 40.0, 70.0, 12.0),
                "INVOICE",
            )],
        );
        let templates = vec![template];

        let recognizer = recognizer_over(lines);
        let by_offset = recognizer
            .find_matching_template_by_offset(&templates)
            .unwrap();
        let by_text = recognizer
            .find_matching_template_by_text(&templates)
            .unwrap();

        assert_eq!(by_offset.template.name, by_text.template.name);
        assert_eq!(
            (by_offset.x_offset, by_offset.y_offset),
            (by_text.x_offset, by_text.y_offset)
        );
    }

    #[test]
    fn test_non_converging_template_does_not_abort_search() {
        let lines = vec![
            line_at("AAAA", 60.0, 60.0),
            line_at("BBBB", 160.0, 60.0),
        ];

        // First template never converges (uniform small shift rejects
        // every combination), second one does; the search must carry on
        // to the second.
        let stuck = Template::new(
            "stuck",
            vec![
                matcher_box(
                    "a",
                    RectF::new(50.0, 50.0, 40.0, 12.0),
                    RectF::new(50.0, 50.0, 40.0, 12.0),
                    "AAAA",
                ),
                matcher_box(
                    "b",
                    RectF::new(150.0, 50.0, 40.0, 12.0),
                    RectF::new(150.0, 50.0, 40.0, 12.0),
                    "BBBB",
                ),
            ],
        );
        let labels = Template::new(
            "labels",
            vec![matcher_box(
                "b",
                RectF::new(150.0, 50.0, 40.0, 12.0),
                RectF::new(150.0, 50.0, 40.0, 12.0),
                "BBBB",
            )],
        );
        let templates = vec![stuck, labels];

        let found = recognizer_over(lines)
            .find_matching_template_by_text(&templates)
            .unwrap();
        assert_eq!(found.template.name, "labels");
        assert_eq!((found.x_offset, found.y_offset), (10.0, 10.0));
    }

    mod consistency_divergence {
        //! The consistency check rejects when a box's offset magnitude
        //! comes within the tolerance of the anchor's, instead of
        //! bounding how far the two offsets lie apart. These tests pin
        //! that behavior down so a well-meaning rewrite to a
        //! fixed-tolerance difference check fails visibly.

        use super::super::offsets_consistent;
        use formscan_recognition::PointF;

        #[test]
        fn test_accepts_smaller_magnitude_within_anchor() {
            let diff = PointF::new(40.0, 40.0);
            let d = PointF::new(30.0, 30.0);
            assert!(offsets_consistent(diff, d, 5.0));
        }

        #[test]
        fn test_rejects_magnitude_near_anchor() {
            let diff = PointF::new(40.0, 40.0);
            let d = PointF::new(38.0, 30.0);
            assert!(!offsets_consistent(diff, d, 5.0));
        }

        #[test]
        fn test_identical_offsets_are_rejected() {
            // A fixed-tolerance difference check would accept this
            // immediately; the magnitude comparison rejects it.
            let diff = PointF::new(10.0, 10.0);
            assert!(!offsets_consistent(diff, diff, 5.0));
        }

        #[test]
        fn test_zero_anchor_offset_rejects_everything() {
            // The smaller the anchor offset, the stricter the check; a
            // perfectly aligned anchor box admits no second box at all.
            let diff = PointF::new(0.0, 0.0);
            assert!(!offsets_consistent(diff, PointF::new(0.0, 0.0), 5.0));
            assert!(!offsets_consistent(diff, PointF::new(1.0, 1.0), 5.0));
        }

        #[test]
        fn test_sign_of_offsets_is_ignored() {
            let diff = PointF::new(-40.0, 40.0);
            let d = PointF::new(30.0, -30.0);
            assert!(offsets_consistent(diff, d, 5.0));
        }
    }
}
