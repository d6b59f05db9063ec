//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Text content of a PDF, page by page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfContent {
    /// Pages in document order.
    pub pages: Vec<PdfPage>,
}

/// Content from a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text, `None` when the page has none.
    pub text: Option<String>,
}

impl PdfContent {
    /// Page texts in order, ready for
    /// [`StatementExtractor::extract_pages`](crate::statement::StatementExtractor::extract_pages).
    pub fn page_texts(&self) -> impl Iterator<Item = Option<&str>> {
        self.pages.iter().map(|p| p.text.as_deref())
    }

    /// Whether no page yielded text (scanned or empty document).
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.text.is_none())
    }
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Extract the text of every page, up to `max_pages` (0 = all).
    ///
    /// Falls back to whole-document extraction, as a single page, when
    /// per-page extraction finds nothing.
    pub fn extract_all(&self, max_pages: usize) -> Result<PdfContent> {
        let page_count = self.page_count();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let limit = match max_pages {
            0 => page_count,
            n => page_count.min(n as u32),
        };

        let mut pages = Vec::with_capacity(limit as usize);
        for number in 1..=limit {
            let text = match self.extract_page_text(number) {
                Ok(text) => Some(text).filter(|t| !t.trim().is_empty()),
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", number, e);
                    None
                }
            };
            pages.push(PdfPage { number, text });
        }

        let content = PdfContent { pages };
        if content.is_blank() {
            debug!("Per-page extraction found no text, trying whole document");
            return Ok(whole_document_fallback(content, self.extract_text()));
        }

        debug!(
            "PDF text: {} of {} pages with text",
            content.pages.iter().filter(|p| p.text.is_some()).count(),
            content.pages.len()
        );
        Ok(content)
    }
}

/// Replace blank per-page content with the whole-document text, if any.
///
/// A failed fallback leaves the blank pages in place: a document without
/// extractable text is an empty result, not an error.
fn whole_document_fallback(blank: PdfContent, whole: Result<String>) -> PdfContent {
    match whole {
        Ok(text) if !text.trim().is_empty() => PdfContent {
            pages: vec![PdfPage {
                number: 1,
                text: Some(text),
            }],
        },
        Ok(_) => blank,
        Err(e) => {
            warn!("Whole-document text extraction failed: {}", e);
            blank
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.raw_data.is_empty() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))?;

        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::models::record::SchemaVariant;
    use crate::statement::StatementExtractor;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(matches!(extractor.extract_all(0), Err(PdfError::NoPages)));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_page_texts_keep_blank_pages() {
        let content = PdfContent {
            pages: vec![
                PdfPage { number: 1, text: None },
                PdfPage { number: 2, text: Some("01/02/2023 REMBOURSEMENT SOINS 1,00".to_string()) },
            ],
        };

        let texts: Vec<_> = content.page_texts().collect();
        assert_eq!(texts, vec![None, Some("01/02/2023 REMBOURSEMENT SOINS 1,00")]);
        assert!(!content.is_blank());
    }

    #[test]
    fn test_invalid_page() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_page_text(1), Err(PdfError::Parse(_))));
    }

    fn single_line_page(line: &str) -> Content {
        Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![40.into(), 780.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ],
        }
    }

    /// A PDF with one page per entry; `None` gives a page with no text operators.
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let content = match page {
                Some(line) => single_line_page(line),
                None => Content { operations: vec![] },
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    fn load(data: &[u8]) -> PdfExtractor {
        let mut extractor = PdfExtractor::new();
        extractor.load(data).unwrap();
        extractor
    }

    #[test]
    fn test_extract_all_per_page() {
        let data = build_pdf(&[
            Some("01/02/2023 REMBOURSEMENT SOINS 17,50"),
            Some("   "),
            Some("03/02/2023 REMBOURSEMENT PHARMACIE 8,06"),
        ]);
        let extractor = load(&data);
        assert_eq!(extractor.page_count(), 3);

        let content = extractor.extract_all(0).unwrap();
        let numbers: Vec<u32> = content.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(content.pages[0].text.as_deref().unwrap().contains("REMBOURSEMENT SOINS"));
        assert_eq!(content.pages[1].text, None);
        assert!(content.pages[2].text.as_deref().unwrap().contains("PHARMACIE"));
    }

    #[test]
    fn test_extract_all_respects_max_pages() {
        let data = build_pdf(&[Some("PAGE UN"), Some("PAGE DEUX"), Some("PAGE TROIS")]);
        let content = load(&data).extract_all(2).unwrap();

        assert_eq!(content.pages.len(), 2);
        assert!(content.pages[1].text.as_deref().unwrap().contains("DEUX"));
    }

    #[test]
    fn test_pdf_pages_feed_extraction() {
        let data = build_pdf(&[
            Some("01/02/2023 REMBOURSEMENT SOINS 17,50"),
            None,
            Some("03/02/2023 REMBOURSEMENT PHARMACIE 8,06"),
        ]);
        let content = load(&data).extract_all(0).unwrap();
        let result = StatementExtractor::new(SchemaVariant::Simple).extract_document(&content);

        assert_eq!(result.stats.pages, 3);
        assert_eq!(result.stats.pages_without_text, 1);
        assert_eq!(
            result.table.rows(),
            vec![
                vec!["01/02/2023", "REMBOURSEMENT SOINS", "17.50"],
                vec!["03/02/2023", "REMBOURSEMENT PHARMACIE", "8.06"],
            ]
        );
    }

    #[test]
    fn test_blank_document_is_an_empty_result() {
        let data = build_pdf(&[None, None]);
        let content = load(&data).extract_all(0).unwrap();
        assert!(content.is_blank());

        let result = StatementExtractor::new(SchemaVariant::Detailed).extract_document(&content);
        assert_eq!(result.into_table(), Err(ExtractionError::NoData));
    }

    #[test]
    fn test_failed_fallback_keeps_blank_pages() {
        let blank = PdfContent {
            pages: vec![PdfPage { number: 1, text: None }, PdfPage { number: 2, text: None }],
        };

        let kept = whole_document_fallback(
            blank.clone(),
            Err(PdfError::TextExtraction("unsupported font".to_string())),
        );
        assert_eq!(kept, blank);

        let kept = whole_document_fallback(blank.clone(), Ok(" \n".to_string()));
        assert_eq!(kept, blank);

        let whole = whole_document_fallback(blank, Ok("01/02/2023 REMBOURSEMENT 1,00".to_string()));
        assert_eq!(whole.pages.len(), 1);
        assert_eq!(whole.pages[0].text.as_deref(), Some("01/02/2023 REMBOURSEMENT 1,00"));
    }
}
