//! PDF text extraction

use sha2::{Digest, Sha256};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

/// Glyph names some PDF fonts leak into extracted text
const GLYPH_NAMES: &[(&str, &str)] = &[
    ("uni2010", "-"),
    ("uni2011", "-"),
    ("uni2012", "-"),
    ("uni2013", "-"),
    ("uni2014", "--"),
    ("uni2018", "'"),
    ("uni2019", "'"),
    ("uni201C", "\""),
    ("uni201D", "\""),
    ("uni2022", "* "),
    ("uni2026", "..."),
    ("uni00A0", " "),
    ("uni2212", "-"),
    ("uni00D7", "\u{00D7}"),
    ("uni00F7", "\u{00F7}"),
];

/// Typographic characters mapped to plain equivalents
const CHAR_REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "--"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2022}', "* "),
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\0', ""),
];

/// Clean up extracted PDF text: glyph names, ligatures, blank lines
pub fn clean_extracted_text(text: &str) -> String {
    let mut result = text.to_string();

    for (glyph, replacement) in GLYPH_NAMES {
        for pattern in [format!("({})", glyph), format!("<{}>", glyph), glyph.to_string()] {
            if result.contains(&pattern) {
                result = result.replace(&pattern, replacement);
            }
        }
    }

    for (ch, replacement) in CHAR_REPLACEMENTS {
        if result.contains(*ch) {
            result = result.replace(*ch, replacement);
        }
    }

    result
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Which extractor produced the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    PdfExtract,
    Lopdf,
}

/// Text extracted from an uploaded PDF
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Cleaned text content
    pub content: String,
    /// SHA-256 of the content (hex)
    pub content_hash: String,
    /// Page count, when the PDF structure could be read
    pub total_pages: Option<u32>,
    pub method: ExtractionMethod,
}

/// PDF parser with a bounded primary extraction
#[derive(Debug, Clone)]
pub struct PdfParser {
    timeout: Duration,
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl PdfParser {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Accept `.pdf` files or anything starting with the `%PDF` marker
    pub fn is_pdf(filename: &str, data: &[u8]) -> bool {
        let has_extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        has_extension || data.starts_with(b"%PDF")
    }

    /// Extract and clean the text of a PDF
    pub fn parse(&self, filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        if !Self::is_pdf(filename, data) {
            return Err(Error::UnsupportedFileType(format!(
                "{} - only PDF files are accepted",
                filename
            )));
        }
        if data.is_empty() {
            return Err(Error::file_parse(filename, "File is empty"));
        }

        let (raw, method) = self.extract_with_fallback(filename, data)?;
        let content = clean_extracted_text(&raw);

        if content.is_empty() {
            return Err(Error::file_parse(
                filename,
                "No text content could be extracted from PDF (it may be scanned or image-only)",
            ));
        }

        let total_pages = lopdf::Document::load_mem(data)
            .ok()
            .map(|doc| doc.get_pages().len() as u32);

        tracing::info!(
            "Extracted {} chars from '{}' ({:?}, {} pages)",
            content.len(),
            filename,
            method,
            total_pages.map(|p| p.to_string()).unwrap_or_else(|| "?".into())
        );

        Ok(ParsedDocument {
            content_hash: hash_content(&content),
            content,
            total_pages,
            method,
        })
    }

    fn extract_with_fallback(&self, filename: &str, data: &[u8]) -> Result<(String, ExtractionMethod)> {
        match self.extract_pdf_with_timeout(data) {
            Ok(text) if !text.trim().is_empty() => Ok((text, ExtractionMethod::PdfExtract)),
            Ok(_) => {
                tracing::warn!("pdf-extract returned no text for '{}', trying lopdf", filename);
                Self::extract_with_lopdf(filename, data).map(|t| (t, ExtractionMethod::Lopdf))
            }
            Err(e) => {
                tracing::warn!("pdf-extract failed for '{}': {}, trying lopdf", filename, e);
                Self::extract_with_lopdf(filename, data).map(|t| (t, ExtractionMethod::Lopdf))
            }
        }
    }

    /// Run pdf-extract on a worker thread so malformed fonts can't hang or crash the request
    fn extract_pdf_with_timeout(&self, data: &[u8]) -> std::result::Result<String, String> {
        let data_vec = data.to_vec();
        self.run_isolated(move || {
            pdf_extract::extract_text_from_mem(&data_vec).map_err(|e| e.to_string())
        })
    }

    /// Run an extractor on its own thread, bounded by the parser timeout.
    /// A panic in the extractor surfaces as an error; this relies on the
    /// binary being built with `panic = "unwind"`.
    fn run_isolated<F>(&self, extract: F) -> std::result::Result<String, String>
    where
        F: FnOnce() -> std::result::Result<String, String> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let _ = tx.send(extract());
        });

        match rx.recv_timeout(self.timeout) {
            Ok(result) => {
                let _ = handle.join();
                result
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!("PDF extraction timed out after {:?}", self.timeout);
                Err(format!("timed out after {:?}", self.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed");
                Err("extraction thread crashed".to_string())
            }
        }
    }

    fn extract_with_lopdf(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(Error::file_parse(filename, "PDF has no pages"));
        }

        let mut text = String::new();
        for page in page_numbers {
            match doc.extract_text(&[page]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => tracing::debug!("Could not extract page {}: {}", page, e),
            }
        }

        Ok(text)
    }
}

/// Hash content for identifying a processed paper
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::build_pdf;

    #[test]
    fn test_is_pdf() {
        assert!(PdfParser::is_pdf("paper.pdf", b""));
        assert!(PdfParser::is_pdf("PAPER.PDF", b""));
        assert!(PdfParser::is_pdf("upload.bin", b"%PDF-1.7\n"));
        assert!(!PdfParser::is_pdf("notes.txt", b"hello"));
        assert!(!PdfParser::is_pdf("pdf", b"hello"));
    }

    #[test]
    fn test_rejects_non_pdf() {
        let result = PdfParser::default().parse("notes.docx", b"PK\x03\x04");
        assert!(matches!(result, Err(Error::UnsupportedFileType(_))));
    }

    #[test]
    fn test_corrupt_pdf_is_parse_error() {
        let result = PdfParser::new(Duration::from_secs(5)).parse("broken.pdf", b"%PDF-1.4\nthis is not a pdf");
        assert!(matches!(result, Err(Error::FileParse { .. })));
    }

    #[test]
    fn test_empty_file_is_parse_error() {
        let result = PdfParser::default().parse("empty.pdf", b"");
        assert!(matches!(result, Err(Error::FileParse { .. })));
    }

    #[test]
    fn test_extracts_generated_pdf() {
        let pdf = build_pdf(&["Transformers replace recurrence", "with self attention"]);
        let parsed = PdfParser::new(Duration::from_secs(10)).parse("paper.pdf", &pdf).unwrap();

        assert!(parsed.content.contains("Transformers"));
        assert!(parsed.content.contains("attention"));
        assert_eq!(parsed.total_pages, Some(1));
        assert_eq!(parsed.content_hash.len(), 64);
    }

    #[test]
    fn test_clean_extracted_text() {
        let raw = "  \u{FB01}rst line\u{2014}dash  \n\n\n(uni2019)quoted\0\n   ";
        assert_eq!(clean_extracted_text(raw), "first line--dash\n'quoted");
    }

    #[test]
    fn test_extractor_panic_is_contained() {
        let parser = PdfParser::new(Duration::from_secs(5));
        let result = parser.run_isolated(|| panic!("unsupported font encoding"));
        assert_eq!(result, Err("extraction thread crashed".to_string()));

        // The parser keeps working afterwards
        assert_eq!(parser.run_isolated(|| Ok("text".to_string())), Ok("text".to_string()));
    }

    #[test]
    fn test_slow_extractor_times_out() {
        let parser = PdfParser::new(Duration::from_millis(50));
        let result = parser.run_isolated(|| {
            thread::sleep(Duration::from_millis(500));
            Ok(String::new())
        });
        assert!(result.unwrap_err().starts_with("timed out"));
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_ne!(hash_content("abc"), hash_content("abd"));
    }
}
