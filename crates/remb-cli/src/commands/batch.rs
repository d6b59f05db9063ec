//! Batch command - extract reimbursement lines from many statements.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use remb_core::statement::rules::format_euro_amount;
use remb_core::{ExtractionResult, SchemaVariant, StatementExtractor, TracingObserver};

use super::output::{format_table, OutputFormat};
use super::{is_supported, load_config, read_pages};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Statement layout (default: from configuration)
    #[arg(long)]
    variant: Option<SchemaVariant>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileOutcome {
    path: PathBuf,
    result: Result<ExtractionResult, String>,
    processing_time_ms: u64,
}

impl FileOutcome {
    fn status(&self) -> &'static str {
        match &self.result {
            Ok(result) if result.is_empty() => "empty",
            Ok(_) => "success",
            Err(_) => "error",
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let variant = args.variant.unwrap_or(config.extraction.variant);
    let max_pages = config.pdf.max_pages;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Each file gets its own extractor and table; `buffered` keeps input order.
    let outcomes: Vec<_> = stream::iter(files)
        .map(|path| {
            let pb = overall_pb.clone();
            tokio::task::spawn_blocking(move || {
                let outcome = process_file(path, variant, max_pages);
                pb.inc(1);
                outcome
            })
        })
        .buffered(args.jobs.max(1))
        .collect()
        .await;

    overall_pb.finish_with_message("Complete");

    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        let outcome = outcome?;
        if let Err(error_msg) = &outcome.result {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", outcome.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", outcome.path.display(), error_msg);
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }
        results.push(outcome);
    }

    if let Some(output_dir) = &args.output_dir {
        for outcome in &results {
            let Ok(result) = &outcome.result else { continue };
            if result.is_empty() {
                continue;
            }
            let output_path = output_path(output_dir, &outcome.path, args.format);
            let content = format_table(&result.table, &result.stats, args.format)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, variant, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let count = |status: &str| results.iter().filter(|r| r.status() == status).count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} without data, {} failed",
        style(count("success")).green(),
        style(count("empty")).yellow(),
        style(count("error")).red()
    );

    let empty: Vec<_> = results.iter().filter(|r| r.status() == "empty").collect();
    for outcome in &empty {
        eprintln!("No reimbursement data found in {}.", outcome.path.display());
    }

    let failed: Vec<_> = results.iter().filter(|r| r.result.is_err()).collect();
    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            if let Err(error_msg) = &outcome.result {
                println!("  - {}: {}", outcome.path.display(), error_msg);
            }
        }
    }

    Ok(())
}

fn process_file(path: PathBuf, variant: SchemaVariant, max_pages: usize) -> FileOutcome {
    let file_start = Instant::now();

    let result = read_pages(&path, max_pages)
        .map(|pages| {
            StatementExtractor::new(variant).extract_pages_with(pages, &mut TracingObserver)
        })
        .map_err(|e| e.to_string());

    FileOutcome {
        path,
        result,
        processing_time_ms: file_start.elapsed().as_millis() as u64,
    }
}

fn output_path(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let output_name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("statement");

    output_dir.join(format!("{}.{}", output_name, format.extension()))
}

fn write_summary(
    path: &Path,
    variant: SchemaVariant,
    results: &[FileOutcome],
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "variant",
        "records",
        "pages",
        "total_reimbursed",
        "processing_time_ms",
        "error",
    ])?;

    for outcome in results {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match &outcome.result {
            Ok(result) => {
                let total: Decimal = result.table.iter().map(|r| r.reimbursed_total()).sum();
                wtr.write_record([
                    filename,
                    outcome.status(),
                    variant.name(),
                    &result.table.len().to_string(),
                    &result.stats.pages.to_string(),
                    &format_euro_amount(total),
                    &outcome.processing_time_ms.to_string(),
                    "",
                ])?;
            }
            Err(error_msg) => {
                wtr.write_record([
                    filename,
                    outcome.status(),
                    variant.name(),
                    "",
                    "",
                    "",
                    &outcome.processing_time_ms.to_string(),
                    error_msg,
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
