use std::{io::Write, path::Path};

use pdf_oxide::PdfDocument;

use crate::error::{ConvertError, Result};

/// File extensions the extractor reads
pub const SUPPORTED_FORMATS: &[&str] = &["pdf", "txt"];

/// Plain text pulled out of an uploaded document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Lowercased extension the text was read as
    pub file_type: String,
    pub text: String,
}

/// Lowercased text after the last `.`, or the whole name when there is none
pub fn file_type(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map_or(filename, |(_, ext)| ext)
        .to_lowercase()
}

/// Read the text of a `.txt` or `.pdf` upload
pub async fn extract(data: &[u8], filename: &str) -> Result<Extracted> {
    let file_type = file_type(filename);

    let text = match file_type.as_str() {
        "txt" => String::from_utf8(data.to_vec())
            .map_err(|e| ConvertError::Extraction(format!("text file is not valid UTF-8: {e}")))?,
        "pdf" => read_pdf(data).await?,
        _ => return Err(ConvertError::UnsupportedFormat(file_type.clone())),
    };

    tracing::debug!(filename, file_type = %file_type, chars = text.chars().count(), "document text extracted");

    Ok(Extracted { file_type, text })
}

async fn read_pdf(data: &[u8]) -> Result<String> {
    let mut temp_file = tempfile::NamedTempFile::new()
        .map_err(|e| ConvertError::InternalError(Some(format!("failed to create temp file: {e}"))))?;

    temp_file
        .write_all(data)
        .map_err(|e| ConvertError::InternalError(Some(format!("failed to write temp file: {e}"))))?;

    // The temp file lives until the blocking task hands it back
    tokio::task::spawn_blocking(move || {
        let text = extract_pages(temp_file.path());
        drop(temp_file);
        text
    })
    .await
    .map_err(|e| ConvertError::InternalError(Some(format!("PDF reader task failed: {e}"))))?
}

/// Concatenate the text of every page that has any; a PDF with no text at
/// all (a scan, say) is an error
fn extract_pages(path: &Path) -> Result<String> {
    let mut doc =
        PdfDocument::open(path).map_err(|e| ConvertError::Extraction(format!("failed to parse PDF: {e}")))?;

    let page_count = doc
        .page_count()
        .map_err(|e| ConvertError::Extraction(format!("failed to read page count: {e}")))?;

    let mut text = String::new();

    for page_index in 0..page_count {
        let page = doc.extract_text(page_index).unwrap_or_default();
        if !page.trim().is_empty() {
            text.push_str(&page);
        }
    }

    tracing::info!(page_count, "PDF text extraction complete");

    if text.trim().is_empty() {
        return Err(ConvertError::Extraction("no text found in PDF".to_string()));
    }

    Ok(text)
}
