//! Single-pass extraction over page text.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::ExtractionError;
use crate::models::record::SchemaVariant;
use crate::models::table::{ReimbursementTable, TableBuilder};
use crate::pdf::PdfContent;

use super::classifier::VariantClassifier;
use super::observer::{ExtractionObserver, NoopObserver};
use super::LineClassifier;

/// Page separator in pre-extracted text (`pdftotext` convention).
pub const PAGE_BREAK: char = '\x0c';

/// One line of page text with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// Page number (1-indexed).
    pub page: u32,
    /// Line number within the page (1-indexed).
    pub number: u32,
    pub text: &'a str,
}

/// Counters describing a run. Derived from the input only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Pages seen, with or without text.
    pub pages: u32,
    /// Pages that yielded no text.
    pub pages_without_text: u32,
    /// Non-blank lines scanned.
    pub lines: usize,
    /// Lines that passed the leading field (marker or date).
    pub candidate_lines: usize,
    /// Lines that produced a record.
    pub matched: usize,
}

/// Result of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Records in page-then-line order.
    pub table: ReimbursementTable,
    pub stats: ExtractionStats,
}

impl ExtractionResult {
    /// True when no line qualified.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The table, or [`ExtractionError::NoData`] when it is empty.
    pub fn into_table(self) -> Result<ReimbursementTable, ExtractionError> {
        if self.table.is_empty() {
            Err(ExtractionError::NoData)
        } else {
            Ok(self.table)
        }
    }
}

/// Runs the classifier of one layout over a document's pages.
#[derive(Debug, Clone, Copy)]
pub struct StatementExtractor {
    classifier: VariantClassifier,
}

impl StatementExtractor {
    pub fn new(variant: SchemaVariant) -> Self {
        Self {
            classifier: VariantClassifier::new(variant),
        }
    }

    pub fn variant(&self) -> SchemaVariant {
        self.classifier.variant()
    }

    /// Extract from pre-extracted text with pages separated by form feeds.
    pub fn extract_text(&self, text: &str) -> ExtractionResult {
        self.extract_pages(split_pages(text))
    }

    /// Extract from the pages of an opened PDF.
    pub fn extract_document(&self, content: &PdfContent) -> ExtractionResult {
        self.extract_pages(content.page_texts())
    }

    /// Extract from pages in order; `None` stands for a page without text.
    pub fn extract_pages<I, S>(&self, pages: I) -> ExtractionResult
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        self.extract_pages_with(pages, &mut NoopObserver)
    }

    /// Like [`extract_pages`](Self::extract_pages), reporting each page and
    /// line to `observer`.
    pub fn extract_pages_with<I, S>(
        &self,
        pages: I,
        observer: &mut dyn ExtractionObserver,
    ) -> ExtractionResult
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut builder = TableBuilder::new(self.variant());
        let mut stats = ExtractionStats::default();

        for (page_index, page) in pages.into_iter().enumerate() {
            let page_number = page_index as u32 + 1;
            stats.pages += 1;

            let text = page
                .as_ref()
                .map(AsRef::<str>::as_ref)
                .filter(|t| !t.trim().is_empty());

            let Some(text) = text else {
                stats.pages_without_text += 1;
                observer.on_page(page_number, false);
                continue;
            };
            observer.on_page(page_number, true);

            for (line_index, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                stats.lines += 1;

                let raw = RawLine {
                    page: page_number,
                    number: line_index as u32 + 1,
                    text: line,
                };

                match self.classifier.diagnose(line) {
                    Ok(record) => {
                        stats.candidate_lines += 1;
                        stats.matched += 1;
                        observer.on_record(&raw, &record);
                        if let Err(err) = builder.push(record) {
                            warn!("Dropping line {} of page {}: {}", raw.number, raw.page, err);
                        }
                    }
                    Err(mismatch) => {
                        if mismatch.is_candidate() {
                            stats.candidate_lines += 1;
                        }
                        observer.on_mismatch(&raw, &mismatch);
                    }
                }
            }
        }

        info!(
            "Extracted {} {} records from {} lines on {} pages",
            stats.matched,
            self.variant(),
            stats.lines,
            stats.pages
        );

        ExtractionResult {
            table: builder.finish(),
            stats,
        }
    }
}

/// Split pre-extracted text into pages on form feeds.
///
/// A trailing form feed does not open an extra page.
pub fn split_pages(text: &str) -> impl Iterator<Item = Option<&str>> {
    let text = text.strip_suffix(PAGE_BREAK).unwrap_or(text);
    text.split(PAGE_BREAK).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::ReimbursementRecord;
    use crate::statement::observer::CollectingObserver;
    use crate::statement::rules::FieldKind;
    use pretty_assertions::assert_eq;

    const STANDARD_STATEMENT: &str = "\
Relevé de vos remboursements
Date Acte Base Montant Taux Remboursé
01/02/2023 CONSULTATION MEDECIN 25,00 25,00 70% 17,50
03/02/2023 PHARMACIE 12,40 12,40 65% 8,06
\x0cPage 2
05/02/2023 RADIOLOGIE 40,00 40,00 70 28,00
07/02/2023 KINÉSITHÉRAPIE 16,13 16,13 60% 9,68
\x0c";

    fn descriptions(result: &ExtractionResult) -> Vec<String> {
        result
            .table
            .iter()
            .map(|r| match r {
                ReimbursementRecord::Standard(s) => s.label.clone(),
                other => panic!("unexpected {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_page_then_line_order() {
        let result = StatementExtractor::new(SchemaVariant::Standard).extract_text(STANDARD_STATEMENT);

        assert_eq!(
            descriptions(&result),
            vec!["CONSULTATION MEDECIN", "PHARMACIE", "KINÉSITHÉRAPIE"]
        );
        assert_eq!(
            result.stats,
            ExtractionStats {
                pages: 2,
                pages_without_text: 0,
                lines: 7,
                candidate_lines: 4,
                matched: 3,
            }
        );
    }

    #[test]
    fn test_observer_sees_rejected_candidates() {
        let mut observer = CollectingObserver::new();
        let extractor = StatementExtractor::new(SchemaVariant::Standard);
        extractor.extract_pages_with(split_pages(STANDARD_STATEMENT), &mut observer);

        let skipped = observer.skipped();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].page, 2);
        assert_eq!(skipped[0].number, 2);
        assert_eq!(skipped[0].mismatch.field, FieldKind::Percentage);
    }

    #[test]
    fn test_pages_without_text_are_skipped() {
        let pages = vec![
            None,
            Some("01/02/2023 REMBOURSEMENT SOINS 17,50€".to_string()),
            Some("   \n".to_string()),
            Some("02/02/2023 REMBOURSEMENT PHARMACIE 3,20".to_string()),
        ];
        let mut observer = CollectingObserver::new();
        let result = StatementExtractor::new(SchemaVariant::Simple)
            .extract_pages_with(pages, &mut observer);

        assert_eq!(result.table.len(), 2);
        assert_eq!(result.stats.pages, 4);
        assert_eq!(result.stats.pages_without_text, 2);
        assert_eq!(observer.blank_pages(), &[1, 3]);
    }

    #[test]
    fn test_empty_result_is_a_signal() {
        let extractor = StatementExtractor::new(SchemaVariant::Detailed);

        let result = extractor.extract_text("Aucun paiement ce mois-ci\nMerci");
        assert!(result.is_empty());
        assert_eq!(result.into_table(), Err(ExtractionError::NoData));

        let result = extractor.extract_pages(Vec::<Option<&str>>::new());
        assert!(result.is_empty());
        assert_eq!(result.stats.pages, 0);

        let result = extractor.extract_pages([None::<&str>, None]);
        assert_eq!(result.stats.pages_without_text, 2);
        assert!(result.into_table().is_err());
    }

    #[test]
    fn test_runs_are_idempotent() {
        let extractor = StatementExtractor::new(SchemaVariant::Standard);
        let first = extractor.extract_text(STANDARD_STATEMENT);
        let second = extractor.extract_text(STANDARD_STATEMENT);
        assert_eq!(first, second);
    }

    #[test]
    fn test_crlf_lines() {
        let text = "01/02/2023 REMBOURSEMENT SOINS 17,50\r\n02/02/2023 REMBOURSEMENT SOINS 2,00\r\n";
        let result = StatementExtractor::new(SchemaVariant::Simple).extract_text(text);
        assert_eq!(result.table.len(), 2);
        assert_eq!(result.table.rows()[1], vec!["02/02/2023", "REMBOURSEMENT SOINS", "2.00"]);
    }

    #[test]
    fn test_split_pages() {
        let pages: Vec<_> = split_pages("a\x0cb\x0c").collect();
        assert_eq!(pages, vec![Some("a"), Some("b")]);

        let pages: Vec<_> = split_pages("a\x0c\x0cc").collect();
        assert_eq!(pages, vec![Some("a"), Some(""), Some("c")]);
    }
}
