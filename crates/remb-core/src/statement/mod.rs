//! Reimbursement line extraction.

mod classifier;
mod extractor;
mod observer;
pub mod rules;

pub use classifier::VariantClassifier;
pub use extractor::{
    split_pages, ExtractionResult, ExtractionStats, RawLine, StatementExtractor, PAGE_BREAK,
};
pub use observer::{
    CollectingObserver, ExtractionObserver, NoopObserver, SkippedLine, TracingObserver,
};

use crate::models::record::{ReimbursementRecord, SchemaVariant};
use rules::LineMismatch;

/// Trait for line classifiers.
pub trait LineClassifier {
    /// Layout this classifier matches.
    fn variant(&self) -> SchemaVariant;

    /// Match one line, reporting the failing field on mismatch.
    fn diagnose(&self, line: &str) -> Result<ReimbursementRecord, LineMismatch>;

    /// Match one line.
    fn classify(&self, line: &str) -> Option<ReimbursementRecord> {
        self.diagnose(line).ok()
    }
}
