//! Content extraction module
//!
//! This module turns fetched bytes into text, a title and outbound links,
//! and recognizes contact entities in that text:
//! - Content-type dispatch between HTML, PDF and unsupported bodies
//! - HTML parsing with scraper, PDF text extraction with pdf-extract
//! - Email and phone recognition with context snippets

mod content;
mod entities;
mod html;
mod pdf;
mod snippet;

pub use crate::url::domain_allowed;
pub use content::ContentKind;
pub use entities::{
    email_domain, find_emails, find_phones, normalize_email, EntityMatch, MAX_PHONE_DIGITS,
    MIN_PHONE_DIGITS,
};
pub use html::{clamp_title, parse_html, MAX_TITLE_CHARS, UNTITLED};
pub use pdf::{parse_pdf, PDF_TITLE};
pub use snippet::{collapse_whitespace, snippet, SNIPPET_RADIUS};

use crate::output::SourceType;
use thiserror::Error;
use url::Url;

/// Extraction failures for a single page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Extraction worker failed: {0}")]
    Worker(String),
}

/// Text, title and links pulled from one fetched resource
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    pub title: String,
    pub text: String,
    /// Absolute URLs in document order; always empty for PDFs
    pub links: Vec<Url>,
    pub source_type: SourceType,
}

/// Extracts a fetched body according to its content kind
///
/// # Returns
///
/// * `Ok(Some(page))` - HTML, or PDF with `include_pdfs` set
/// * `Ok(None)` - Unsupported content, or a PDF while PDFs are disabled
/// * `Err(ExtractError)` - The body could not be parsed
pub fn extract(
    body: &[u8],
    content_type: &str,
    url: &Url,
    include_pdfs: bool,
) -> Result<Option<ExtractedPage>, ExtractError> {
    match ContentKind::classify(content_type, url) {
        ContentKind::Html => Ok(Some(parse_html(&String::from_utf8_lossy(body), url))),
        ContentKind::Pdf if include_pdfs => parse_pdf(body).map(Some),
        ContentKind::Pdf | ContentKind::Unsupported => Ok(None),
    }
}

/// Runs [`extract`] on the blocking thread pool
///
/// HTML and PDF parsing are CPU-bound and may take a while on large
/// documents.
pub async fn extract_blocking(
    body: Vec<u8>,
    content_type: String,
    url: Url,
    include_pdfs: bool,
) -> Result<Option<ExtractedPage>, ExtractError> {
    tokio::task::spawn_blocking(move || extract(&body, &content_type, &url, include_pdfs))
        .await
        .map_err(|e| ExtractError::Worker(e.to_string()))?
}
