//! CLI subcommands.

pub mod batch;
pub mod extract;
pub mod identify;
pub mod templates;

use std::path::Path;

use serde::Serialize;

use formscan_core::models::document::FieldValue;
use formscan_core::{FormscanConfig, TemplateMatch};

/// Load the engine configuration, falling back to defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<FormscanConfig> {
    Ok(match config_path {
        Some(path) => FormscanConfig::from_file(Path::new(path))?,
        None => FormscanConfig::default(),
    })
}

/// Output format for command results.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

/// Serializable result of a template match.
#[derive(Debug, Serialize)]
pub(crate) struct MatchOutput {
    /// Name of the winning template.
    pub template: String,
    /// Offset applied to the template.
    pub x_offset: f32,
    /// Offset applied to the template.
    pub y_offset: f32,
    /// Mean matcher similarity at the winning offset.
    pub score: f64,
    /// Extracted fields in template order.
    pub fields: Vec<FieldValue>,
}

impl MatchOutput {
    pub(crate) fn from_match(found: &TemplateMatch<'_>) -> Self {
        Self {
            template: found.template.name.clone(),
            x_offset: found.x_offset,
            y_offset: found.y_offset,
            score: found.score,
            fields: found.document.to_fields(),
        }
    }

    pub(crate) fn format_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Template: {}\n", self.template));
        output.push_str(&format!(
            "Offset: ({}, {})\n",
            self.x_offset, self.y_offset
        ));
        output.push_str(&format!("Score: {:.3}\n", self.score));
        output.push('\n');
        for field in &self.fields {
            output.push_str(&format!("{}: {}\n", field.name, field.value));
        }
        output
    }
}
