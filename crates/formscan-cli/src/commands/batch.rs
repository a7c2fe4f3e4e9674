//! Batch command - identify and extract many scans concurrently.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use formscan_core::{FormscanConfig, Recognizer, ScanDump, TemplateSet};

use super::identify::Algorithm;
use super::{load_config, MatchOutput};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of scan dump files
    #[arg(required = true)]
    scans: String,

    /// Directory of template files
    #[arg(short, long)]
    templates: PathBuf,

    /// Directory for per-scan result files
    #[arg(short, long)]
    out_dir: PathBuf,

    /// Alignment search to use
    #[arg(short, long, value_enum, default_value = "text")]
    algorithm: Algorithm,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = Arc::new(load_config(config_path)?);

    let set = Arc::new(TemplateSet::from_dir(&args.templates)?);
    if set.is_empty() {
        anyhow::bail!("no templates found in {}", args.templates.display());
    }

    let paths: Vec<PathBuf> = glob::glob(&args.scans)?
        .filter_map(|entry| entry.ok())
        .collect();
    if paths.is_empty() {
        anyhow::bail!("no scans match '{}'", args.scans);
    }

    fs::create_dir_all(&args.out_dir)?;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut workers = Vec::with_capacity(paths.len());
    for path in paths {
        let set = Arc::clone(&set);
        let config = Arc::clone(&config);
        let algorithm = args.algorithm;

        workers.push(tokio::task::spawn_blocking(move || {
            let result = identify_one(&path, &set, &config, algorithm);
            (path, result)
        }));
    }

    let total = workers.len();
    let mut matched = 0usize;
    let mut failed = 0usize;

    for worker in workers {
        let (path, result) = worker.await?;
        pb.set_message(path.display().to_string());

        match result {
            Ok(Some(output)) => {
                let out_path = result_path(&args.out_dir, &path);
                fs::write(&out_path, serde_json::to_string_pretty(&output)?)?;
                debug!("{} -> {}", path.display(), out_path.display());
                matched += 1;
            }
            Ok(None) => {
                warn!("no template matched {}", path.display());
            }
            Err(e) => {
                warn!("failed to process {}: {}", path.display(), e);
                failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    println!(
        "{} {} scans processed: {} matched, {} unmatched, {} failed",
        style("✓").green(),
        total,
        matched,
        total - matched - failed,
        failed
    );

    Ok(())
}

fn identify_one(
    path: &PathBuf,
    set: &TemplateSet,
    config: &FormscanConfig,
    algorithm: Algorithm,
) -> anyhow::Result<Option<MatchOutput>> {
    let (ocr, barcode) = ScanDump::from_file(path)?.into_backends();
    let recognizer = Recognizer::new(ocr, barcode).with_config(config.clone());

    let found = match algorithm {
        Algorithm::Offset => recognizer.find_matching_template_by_offset(set.templates()),
        Algorithm::Text => recognizer.find_matching_template_by_text(set.templates()),
    };

    Ok(found.as_ref().map(MatchOutput::from_match))
}

fn result_path(out_dir: &std::path::Path, scan_path: &std::path::Path) -> PathBuf {
    let stem = scan_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scan");
    out_dir.join(format!("{stem}.json"))
}
