//! Approximate string matching for template alignment.

mod combinations;
mod distance;
mod range;
mod trigram;

pub use combinations::RangeCombinations;
pub use distance::{distance, SubstitutionModel};
pub use range::{extract_all_ranges, Range, ScoredRange};
pub use trigram::similarity;
