//! Extract command - read reimbursement lines from a single statement.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use remb_core::statement::SkippedLine;
use remb_core::{
    CollectingObserver, ExtractionObserver, ExtractionResult, SchemaVariant, StatementExtractor,
    TracingObserver,
};

use super::output::{format_table, OutputFormat};
use super::{load_config, read_pages};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input statement (PDF, or text with form-feed page breaks)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file or directory (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from configuration)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Statement layout (default: from configuration)
    #[arg(long)]
    variant: Option<SchemaVariant>,

    /// Report lines that looked like entries but were rejected
    #[arg(long)]
    explain: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let variant = args.variant.unwrap_or(config.extraction.variant);
    let format = match args.format {
        Some(format) => format,
        None => OutputFormat::from_config(&config.output.format)?,
    };

    info!("Extracting {} lines from {}", variant, args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading pages...");
    pb.set_position(10);
    let pages = read_pages(&args.input, config.pdf.max_pages)?;
    debug!("Read {} pages", pages.len());

    pb.set_message("Classifying lines...");
    pb.set_position(60);
    let extractor = StatementExtractor::new(variant);
    let mut collector = CollectingObserver::new();
    let mut tracer = TracingObserver;
    let observer: &mut dyn ExtractionObserver = if args.explain {
        &mut collector
    } else {
        &mut tracer
    };
    let result = extractor.extract_pages_with(pages, observer);

    pb.finish_and_clear();

    if args.explain {
        print_explanation(&result, collector.skipped());
    }

    if result.is_empty() {
        eprintln!("No reimbursement data found in {}.", args.input.display());
        return Ok(());
    }

    let output = format_table(&result.table, &result.stats, format)?;

    if let Some(output_path) = &args.output {
        let output_path = if output_path.is_dir() {
            output_path.join(&config.output.file_name)
        } else {
            output_path.clone()
        };
        fs::write(&output_path, &output)?;
        println!(
            "{} {} records written to {}",
            style("✓").green(),
            result.table.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_explanation(result: &ExtractionResult, skipped: &[SkippedLine]) {
    let stats = &result.stats;
    eprintln!(
        "{} {} pages ({} without text), {} lines, {} candidates, {} matched",
        style("ℹ").blue(),
        stats.pages,
        stats.pages_without_text,
        stats.lines,
        stats.candidate_lines,
        stats.matched
    );

    if skipped.is_empty() {
        return;
    }

    eprintln!("{}", style("Rejected lines:").yellow());
    for line in skipped {
        eprintln!(
            "  page {} line {}: {}\n    {}",
            line.page, line.number, line.mismatch, line.text
        );
    }
}
