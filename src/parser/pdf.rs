use super::Parser;
use crate::ParseError;

use anyhow::anyhow;
use std::panic;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Extracts per-page text with the `pdf-extract` library.
///
/// Encrypted, corrupted and image-only documents all end up as a [`ParseError`];
/// panics inside the library are caught and reported the same way.
#[derive(Debug, Default)]
pub struct PdfParser;

impl Parser for PdfParser {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ParseError> {
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(ParseError::NotAPdf);
        }

        let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|_| ParseError::OtherError(anyhow!("PDF extraction crashed")))?
            .map_err(|e| ParseError::OtherError(anyhow!("{e}")))?;

        if pages.iter().all(|page| page.trim().is_empty()) {
            return Err(ParseError::NoText);
        }

        log::info!("Extracted text from {} PDF pages", pages.len());
        Ok(pages)
    }
}

/// MIME type for an uploaded file, judged by its extension.
pub fn mime_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => crate::PDF_MIME_TYPE,
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}
