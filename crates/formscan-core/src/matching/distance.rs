//! Substitution-aware distance between recognized and expected text.
//!
//! OCR confuses glyphs that look alike, so a position-wise comparison
//! charges a reduced cost for known confusion pairs and case folds
//! instead of treating every mismatch alike.

use std::collections::HashSet;

use crate::models::config::MatchingConfig;

/// Character pairs OCR engines routinely swap.
const CONFUSION_PAIRS: &[(char, char)] = &[
    ('O', '0'),
    ('o', '0'),
    ('D', '0'),
    ('Q', '0'),
    ('I', '1'),
    ('l', '1'),
    ('i', '1'),
    ('I', 'l'),
    ('Z', '2'),
    ('z', '2'),
    ('E', '3'),
    ('A', '4'),
    ('S', '5'),
    ('s', '5'),
    ('G', '6'),
    ('b', '6'),
    ('T', '7'),
    ('B', '8'),
    ('g', '9'),
    ('q', '9'),
    ('m', 'n'),
    ('u', 'v'),
    ('U', 'V'),
    ('c', 'e'),
];

/// The substitution alphabet used by [`distance`]. Constructed once per
/// search run and passed to every distance call.
#[derive(Debug, Clone)]
pub struct SubstitutionModel {
    confusions: HashSet<(char, char)>,
    case_fold_cost: f32,
    confusion_cost: f32,
}

impl SubstitutionModel {
    /// Create a model with explicit costs and the built-in confusion set.
    pub fn new(case_fold_cost: f32, confusion_cost: f32) -> Self {
        let mut confusions = HashSet::with_capacity(CONFUSION_PAIRS.len() * 2);
        for &(a, b) in CONFUSION_PAIRS {
            confusions.insert((a, b));
            confusions.insert((b, a));
        }
        Self {
            confusions,
            case_fold_cost,
            confusion_cost,
        }
    }

    /// Create a model from the matching configuration.
    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.case_fold_cost, config.confusion_cost)
    }

    /// Cost of reading `found` where `expected` was expected.
    pub fn cost(&self, found: char, expected: char) -> f32 {
        if found == expected {
            0.0
        } else if found.eq_ignore_ascii_case(&expected) {
            self.case_fold_cost
        } else if self.confusions.contains(&(found, expected)) {
            self.confusion_cost
        } else {
            1.0
        }
    }
}

impl Default for SubstitutionModel {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}

/// Position-wise distance between recognized text and expected text.
/// Lower is better; zero means an exact match. Unpaired characters from
/// a length mismatch cost one each.
pub fn distance(found: &str, expected: &str, model: &SubstitutionModel) -> f32 {
    let mut found_chars = found.chars();
    let mut expected_chars = expected.chars();
    let mut total = 0.0;

    loop {
        match (found_chars.next(), expected_chars.next()) {
            (Some(f), Some(e)) => total += model.cost(f, e),
            (Some(_), None) | (None, Some(_)) => total += 1.0,
            (None, None) => break,
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_is_zero() {
        let model = SubstitutionModel::default();
        assert_eq!(distance("INVOICE", "INVOICE", &model), 0.0);
    }

    #[test]
    fn test_confusion_pair_costs_less_than_mismatch() {
        let model = SubstitutionModel::default();
        let confused = distance("INV0ICE", "INVOICE", &model);
        let mismatched = distance("INVXICE", "INVOICE", &model);
        assert_eq!(confused, 0.5);
        assert_eq!(mismatched, 1.0);
        assert!(confused < mismatched);
    }

    #[test]
    fn test_confusion_is_symmetric() {
        let model = SubstitutionModel::default();
        assert_eq!(
            distance("INV0ICE", "INVOICE", &model),
            distance("INVOICE", "INV0ICE", &model)
        );
    }

    #[test]
    fn test_case_fold_cost() {
        let model = SubstitutionModel::default();
        assert_eq!(distance("invoice", "INVOICE", &model), 7.0 * 0.25);
    }

    #[test]
    fn test_length_mismatch_charges_unpaired() {
        let model = SubstitutionModel::default();
        assert_eq!(distance("INV", "INVOICE", &model), 4.0);
        assert_eq!(distance("INVOICEXX", "INVOICE", &model), 2.0);
    }

    #[test]
    fn test_distance_orders_candidates() {
        let model = SubstitutionModel::default();
        let exact = distance("TOTAL", "TOTAL", &model);
        let confused = distance("T0TAL", "TOTAL", &model);
        let wrong = distance("WRONG", "TOTAL", &model);
        assert!(exact < confused);
        assert!(confused < wrong);
    }
}
