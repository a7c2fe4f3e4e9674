//! Identify command - find the best-fitting template for a scan.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use formscan_core::{Recognizer, ScanDump, TemplateSet};

use super::{load_config, MatchOutput, OutputFormat};

/// Which alignment search to run.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Algorithm {
    /// Exhaustive grid search over small offsets
    Offset,
    /// Anchor-based search over recognized text spans
    Text,
}

/// Arguments for the identify command.
#[derive(Args)]
pub struct IdentifyArgs {
    /// Scan dump file (JSON)
    #[arg(required = true)]
    scan: PathBuf,

    /// Directory of template files
    #[arg(short, long)]
    templates: PathBuf,

    /// Alignment search to use
    #[arg(short, long, value_enum, default_value = "text")]
    algorithm: Algorithm,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: IdentifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let set = TemplateSet::from_dir(&args.templates)?;
    if set.is_empty() {
        anyhow::bail!("no templates found in {}", args.templates.display());
    }

    let (ocr, barcode) = ScanDump::from_file(&args.scan)?.into_backends();
    let recognizer = Recognizer::new(ocr, barcode).with_config(config);

    info!(
        "Identifying {} against {} templates",
        args.scan.display(),
        set.len()
    );

    let found = match args.algorithm {
        Algorithm::Offset => recognizer.find_matching_template_by_offset(set.templates()),
        Algorithm::Text => recognizer.find_matching_template_by_text(set.templates()),
    };

    let Some(found) = found else {
        anyhow::bail!("no template matched {}", args.scan.display());
    };

    let result = MatchOutput::from_match(&found);

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => result.format_text(),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Matched '{}' (score {:.3}), output written to {}",
            style("✓").green(),
            result.template,
            result.score,
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
