pub mod pdf;

use crate::ParseError;
use itertools::Itertools;

/// Turns a document buffer into plain text, one entry per page in page order.
pub trait Parser: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ParseError>;
}

/// Joins pages with a blank line between them. The result is not trimmed.
pub fn join_pages(pages: &[String]) -> String {
    pages.iter().join("\n\n")
}

/// Extracts a document and returns its trimmed text, ready to be used as input.
pub fn extract_text(parser: &impl Parser, bytes: &[u8]) -> Result<String, ParseError> {
    let pages = parser.extract_pages(bytes)?;
    Ok(join_pages(&pages).trim().to_owned())
}
