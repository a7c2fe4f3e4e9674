//! Templates command - inspect a directory of templates.

use std::path::PathBuf;

use clap::Args;
use console::style;

use formscan_core::{Template, TemplateSet};

/// Arguments for the templates command.
#[derive(Args)]
pub struct TemplatesArgs {
    /// Directory of template files
    #[arg(short, long)]
    dir: PathBuf,

    /// Report templates that cannot be used for alignment
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: TemplatesArgs) -> anyhow::Result<()> {
    let set = TemplateSet::from_dir(&args.dir)?;

    if set.is_empty() {
        println!("No templates found in {}", args.dir.display());
        return Ok(());
    }

    for template in set.templates() {
        let matchers = template.matcher_boxes().count();
        println!(
            "{}  {} boxes, {} matchers",
            style(&template.name).bold(),
            template.boxes().len(),
            matchers
        );

        if args.validate {
            for issue in validate(template) {
                println!("  {} {}", style("!").yellow(), issue);
            }
        }
    }

    Ok(())
}

fn validate(template: &Template) -> Vec<String> {
    let mut issues = Vec::new();

    if template.boxes().is_empty() {
        issues.push("template has no boxes".to_string());
    } else if !template.has_matchers() {
        issues.push("no matcher boxes: cannot be used for offset search".to_string());
    }

    for tbox in template.boxes() {
        if tbox.is_matcher() && tbox.expected_text.is_empty() {
            issues.push(format!("matcher box '{}' has empty expected text", tbox.name));
        }
        if tbox.rect.is_empty() {
            issues.push(format!("box '{}' has an empty rectangle", tbox.name));
        }
    }

    issues
}
