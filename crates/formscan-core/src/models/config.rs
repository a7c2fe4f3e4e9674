//! Configuration structures for the alignment engine.

use serde::{Deserialize, Serialize};

/// Main configuration for the formscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormscanConfig {
    /// Alignment search configuration.
    pub alignment: AlignmentConfig,

    /// String matching configuration.
    pub matching: MatchingConfig,
}

/// Alignment search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// How far the exhaustive search translates a template in each
    /// direction, in coordinate-space units. The default of 5 gives a
    /// grid of 121 positions per template.
    pub offset_bound: i32,

    /// Tolerance of the anchor search's geometric consistency check,
    /// in coordinate-space units.
    pub tolerance: f32,

    /// How many candidate combinations the anchor search tries before
    /// giving up on a template.
    pub combination_budget: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            offset_bound: 5,
            tolerance: 5.0,
            combination_budget: 10,
        }
    }
}

/// String matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Substitution cost for characters that match ignoring case.
    pub case_fold_cost: f32,

    /// Substitution cost for known OCR confusion pairs.
    pub confusion_cost: f32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            case_fold_cost: 0.25,
            confusion_cost: 0.5,
        }
    }
}

impl FormscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
