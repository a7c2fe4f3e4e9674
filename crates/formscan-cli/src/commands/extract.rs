//! Extract command - pull fields from one scan with a known template.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use formscan_core::models::document::FieldValue;
use formscan_core::{Recognizer, ScanDump, Template};

use super::{load_config, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Scan dump file (JSON)
    #[arg(required = true)]
    scan: PathBuf,

    /// Template file (JSON)
    #[arg(short, long)]
    template: PathBuf,

    /// Horizontal offset to apply to the template
    #[arg(long, default_value_t = 0.0)]
    x_offset: f32,

    /// Vertical offset to apply to the template
    #[arg(long, default_value_t = 0.0)]
    y_offset: f32,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

/// Serializable result of a fixed-offset extraction.
#[derive(Debug, Serialize)]
struct ExtractionOutput {
    template: String,
    x_offset: f32,
    y_offset: f32,
    fields: Vec<FieldValue>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let template = Template::from_file(&args.template)?;
    let (ocr, barcode) = ScanDump::from_file(&args.scan)?.into_backends();
    let recognizer = Recognizer::new(ocr, barcode).with_config(config);

    info!(
        "Extracting '{}' from {} at offset ({}, {})",
        template.name,
        args.scan.display(),
        args.x_offset,
        args.y_offset
    );

    let document = recognizer.extract_with_template(&template, args.x_offset, args.y_offset);

    let result = ExtractionOutput {
        template: template.name.clone(),
        x_offset: args.x_offset,
        y_offset: args.y_offset,
        fields: document.to_fields(),
    };

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => {
            let mut text = format!("Template: {}\n\n", result.template);
            for field in &result.fields {
                text.push_str(&format!("{}: {}\n", field.name, field.value));
            }
            text
        }
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
