//! Output formats for extracted tables.

use std::fmt::Write as _;

use rust_decimal::Decimal;

use remb_core::statement::rules::{format_euro_amount, DATE_FORMAT};
use remb_core::{ExtractionStats, ReimbursementTable};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV with one column per field
    Csv,
    /// JSON array of records
    Json,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }

    /// Parse a format name as written in the configuration file.
    pub fn from_config(name: &str) -> anyhow::Result<Self> {
        <Self as clap::ValueEnum>::from_str(name, true)
            .map_err(|_| anyhow::anyhow!("Unknown output format in configuration: {}", name))
    }
}

pub fn format_table(
    table: &ReimbursementTable,
    stats: &ExtractionStats,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => format_csv(table),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(table.records())?),
        OutputFormat::Text => Ok(format_text(table, stats)),
    }
}

/// CSV with the layout's column list as header and dot decimals.
pub fn format_csv(table: &ReimbursementTable) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(table: &ReimbursementTable, stats: &ExtractionStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Layout: {}", table.variant());
    let _ = writeln!(output, "Records: {}", table.len());

    let dates: Vec<_> = table.iter().filter_map(|r| r.calendar_date()).collect();
    if let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) {
        let _ = writeln!(
            output,
            "Period: {} - {}",
            first.format(DATE_FORMAT),
            last.format(DATE_FORMAT)
        );
    }

    let total: Decimal = table.iter().map(|r| r.reimbursed_total()).sum();
    let _ = writeln!(output, "Total reimbursed: {} €", format_euro_amount(total));
    output.push('\n');

    let _ = writeln!(
        output,
        "Pages: {} ({} without text)",
        stats.pages, stats.pages_without_text
    );
    let _ = writeln!(
        output,
        "Lines: {} scanned, {} candidates, {} matched",
        stats.lines, stats.candidate_lines, stats.matched
    );

    output
}
