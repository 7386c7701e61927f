use std::time::Instant;
use lopdf::Document;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF is encrypted and cannot be read")]
    Encrypted,

    #[error("Text extraction returned empty string.")]
    EmptyText,

    #[error("Text extraction aborted: {0}")]
    Aborted(String),
}

/// Turns raw PDF bytes into plain text, pages in ascending order.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, pdf_data: &[u8]) -> Result<String, ExtractionError>;
}

/// Page-by-page extraction with lopdf, falling back to pdf-extract for
/// documents whose content streams lopdf cannot decode.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(&self, doc: &Document) -> Result<String, lopdf::Error> {
        let pages = doc.get_pages();
        let mut text = String::new();

        // BTreeMap keys: page numbers in ascending order
        for (page_number, _) in pages {
            let page_text = doc.extract_text(&[page_number])?;
            append_page(&mut text, &page_text);
        }

        Ok(text)
    }

    fn extract_with_fallback(&self, pdf_data: &[u8]) -> Result<String, ExtractionError> {
        match pdf_extract::extract_text_from_mem(pdf_data) {
            Ok(raw) => Ok(join_form_feed_pages(&raw)),
            Err(e) => Err(ExtractionError::Parse(e.to_string())),
        }
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, pdf_data: &[u8]) -> Result<String, ExtractionError> {
        let start = Instant::now();

        tracing::info!("Starting PDF text extraction ({} bytes)", pdf_data.len());

        let doc = Document::load_mem(pdf_data).map_err(|e| {
            tracing::warn!("PDF structure could not be loaded: {}", e);
            ExtractionError::Parse(e.to_string())
        })?;

        if doc.is_encrypted() {
            tracing::warn!("Refusing to extract text from encrypted PDF");
            return Err(ExtractionError::Encrypted);
        }

        let page_count = doc.get_pages().len();

        let text = match self.extract_pages(&doc) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Page extraction failed: {}, trying pdf-extract fallback", e);
                self.extract_with_fallback(pdf_data)?
            }
        };

        if text.trim().is_empty() {
            tracing::warn!(pages = page_count, "No text extracted from PDF");
            return Err(ExtractionError::EmptyText);
        }

        tracing::info!(
            "PDF text extraction completed in {}ms: {} pages, {} characters",
            start.elapsed().as_millis(),
            page_count,
            text.chars().count()
        );

        Ok(text)
    }
}

/// Appends one page's text followed by exactly one newline.
fn append_page(text: &mut String, page_text: &str) {
    text.push_str(page_text.trim_end_matches(['\n', '\r']));
    text.push('\n');
}

/// pdf-extract ends every page with a form feed. Blank pages still produce an
/// empty line.
fn join_form_feed_pages(raw: &str) -> String {
    let pages = raw.strip_suffix('\u{c}').unwrap_or(raw);
    let mut text = String::new();
    for page_text in pages.split('\u{c}') {
        append_page(&mut text, page_text);
    }
    text
}
