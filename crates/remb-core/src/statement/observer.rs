//! Observers receiving per-line outcomes during extraction.

use tracing::{debug, trace};

use crate::models::record::ReimbursementRecord;

use super::extractor::RawLine;
use super::rules::LineMismatch;

/// Receives what happened to each page and line.
///
/// The classifier never calls this; [`StatementExtractor`](super::StatementExtractor)
/// forwards outcomes after each line.
pub trait ExtractionObserver {
    /// A page was reached. `has_text` is false for pages without text.
    fn on_page(&mut self, _page: u32, _has_text: bool) {}

    /// A line produced a record.
    fn on_record(&mut self, _line: &RawLine<'_>, _record: &ReimbursementRecord) {}

    /// A non-blank line produced no record.
    fn on_mismatch(&mut self, _line: &RawLine<'_>, _mismatch: &LineMismatch) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExtractionObserver for NoopObserver {}

/// Observer that logs outcomes through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn on_page(&mut self, page: u32, has_text: bool) {
        if !has_text {
            debug!("Page {} has no text, skipping", page);
        }
    }

    fn on_record(&mut self, line: &RawLine<'_>, record: &ReimbursementRecord) {
        debug!(
            "Page {} line {}: {} record dated {}",
            line.page,
            line.number,
            record.variant(),
            record.date()
        );
    }

    fn on_mismatch(&mut self, line: &RawLine<'_>, mismatch: &LineMismatch) {
        if mismatch.is_candidate() {
            debug!("Page {} line {} rejected: {}", line.page, line.number, mismatch);
        } else {
            trace!("Page {} line {} ignored: {}", line.page, line.number, mismatch);
        }
    }
}

/// A rejected line kept by [`CollectingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub page: u32,
    pub number: u32,
    pub text: String,
    pub mismatch: LineMismatch,
}

/// Observer that keeps rejected candidate lines in memory.
///
/// Lines rejected on their leading field are ordinary statement text and
/// are not kept.
#[derive(Debug, Default, Clone)]
pub struct CollectingObserver {
    skipped: Vec<SkippedLine>,
    blank_pages: Vec<u32>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate lines that failed a field, in input order.
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    /// Pages that had no text.
    pub fn blank_pages(&self) -> &[u32] {
        &self.blank_pages
    }
}

impl ExtractionObserver for CollectingObserver {
    fn on_page(&mut self, page: u32, has_text: bool) {
        if !has_text {
            self.blank_pages.push(page);
        }
    }

    fn on_mismatch(&mut self, line: &RawLine<'_>, mismatch: &LineMismatch) {
        if mismatch.is_candidate() {
            self.skipped.push(SkippedLine {
                page: line.page,
                number: line.number,
                text: line.text.trim().to_string(),
                mismatch: mismatch.clone(),
            });
        }
    }
}
