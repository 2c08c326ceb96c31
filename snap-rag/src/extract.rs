//! Text extraction from the source manual.

use std::path::Path;

use crate::types::RagError;

/// Reads the PDF at `path` and returns its full text, one page after the
/// other, joined with a newline.
///
/// A missing or unreadable file maps to [`RagError::Io`]; a file whose pages
/// cannot be decoded maps to [`RagError::Parse`]. Runs once during the
/// startup build phase, so the blocking read is acceptable here.
pub fn extract_document_text(path: impl AsRef<Path>) -> Result<String, RagError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| RagError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .map_err(|err| RagError::Parse(err.to_string()))?;
    Ok(pages.join("\n"))
}
