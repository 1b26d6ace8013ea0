//! PDF text extraction

use std::path::Path;

use crate::error::{Error, Result};

/// Plain text extracted from a PDF file
#[derive(Debug, Clone)]
pub struct ParsedPdf {
    /// Source filename (no directory components)
    pub filename: String,
    /// Extracted text
    pub text: String,
}

/// Extract text from a PDF on the local filesystem
pub fn parse_pdf(path: &Path) -> Result<ParsedPdf> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let text = pdf_extract::extract_text(path)
        .map_err(|e| Error::pdf_parse(&filename, e.to_string()))?;

    if text.trim().is_empty() {
        return Err(Error::pdf_parse(&filename, "no extractable text"));
    }

    Ok(ParsedPdf { filename, text })
}
