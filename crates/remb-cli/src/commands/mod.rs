//! Subcommands of the `remb` binary.

pub mod batch;
pub mod config;
pub mod extract;
pub mod output;

use std::fs;
use std::path::Path;

use tracing::debug;

use remb_core::pdf::{PdfExtractor, PdfProcessor};
use remb_core::statement::split_pages;
use remb_core::RembConfig;

/// Load the configuration from `config_path`, else from the default
/// location when a file exists there, else the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RembConfig> {
    if let Some(path) = config_path {
        return Ok(RembConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(RembConfig::from_file(&default_path)?)
    } else {
        Ok(RembConfig::default())
    }
}

/// Whether `path` has an extension `read_pages` understands.
pub fn is_supported(path: &Path) -> bool {
    matches!(extension(path).as_str(), "pdf" | "txt" | "text")
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Read the page texts of a statement, in order.
///
/// PDFs are read page by page (`max_pages` = 0 reads all). Text files hold
/// pre-extracted text with pages separated by form feeds.
pub fn read_pages(path: &Path, max_pages: usize) -> anyhow::Result<Vec<Option<String>>> {
    match extension(path).as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let mut extractor = PdfExtractor::new();
            extractor.load(&data)?;
            debug!("PDF has {} pages", extractor.page_count());

            let content = extractor.extract_all(max_pages)?;
            Ok(content.page_texts().map(|t| t.map(str::to_string)).collect())
        }
        "txt" | "text" => {
            let text = fs::read_to_string(path)?;
            let pages = split_pages(&text).map(|p| p.map(str::to_string));
            Ok(match max_pages {
                0 => pages.collect(),
                n => pages.take(n).collect(),
            })
        }
        other => anyhow::bail!("Unsupported file format: {}", other),
    }
}
