//! Error types for the remb-core library.

use thiserror::Error;

use crate::models::record::SchemaVariant;

/// Main error type for the remb library.
#[derive(Error, Debug)]
pub enum RembError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Record extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to opening a document and reading its pages.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to building a reimbursement table.
///
/// Lines that fail to match are not errors; see
/// [`LineMismatch`](crate::statement::rules::LineMismatch).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The run produced no records.
    #[error("no reimbursement data found")]
    NoData,

    /// A record of another layout was pushed into a table.
    #[error("record layout {found} does not match table layout {expected}")]
    VariantMismatch {
        expected: SchemaVariant,
        found: SchemaVariant,
    },
}

/// Result type for the remb library.
pub type Result<T> = std::result::Result<T, RembError>;
