//! Core library for reimbursement statement extraction.
//!
//! This crate provides:
//! - Line classification against three statement layouts (simple, standard, detailed)
//! - Typed token rules for dates, labels, procedure codes, euro amounts and rates
//! - Append-only record tables with a fixed column schema per layout
//! - PDF page-text extraction feeding the classifier page by page

pub mod error;
pub mod models;
pub mod pdf;
pub mod statement;

pub use error::{ExtractionError, PdfError, RembError, Result};
pub use models::config::RembConfig;
pub use models::record::{
    DetailedRecord, ReimbursementRecord, SchemaVariant, SimpleRecord, StandardRecord,
};
pub use models::table::{ReimbursementTable, TableBuilder};
pub use pdf::{PdfContent, PdfExtractor, PdfPage, PdfProcessor};
pub use statement::{
    CollectingObserver, ExtractionObserver, ExtractionResult, ExtractionStats, LineClassifier,
    NoopObserver, RawLine, StatementExtractor, TracingObserver, VariantClassifier,
};
pub use statement::rules::{FieldKind, LineMismatch, MismatchReason};
