use crate::extract::{ExtractError, ExtractedPage};
use crate::output::SourceType;
use std::panic;

/// Title placeholder for PDF documents
pub const PDF_TITLE: &str = "(PDF)";

/// Extracts concatenated page text from a PDF
///
/// PDFs yield no outbound links. Malformed documents become
/// [`ExtractError::Pdf`]; a panic inside the parser is caught and reported
/// the same way.
pub fn parse_pdf(bytes: &[u8]) -> Result<ExtractedPage, ExtractError> {
    let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractError::Pdf("parser panicked".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    Ok(ExtractedPage {
        title: PDF_TITLE.to_string(),
        text,
        links: Vec::new(),
        source_type: SourceType::Pdf,
    })
}
