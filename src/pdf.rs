//! PDF text layer extraction using lopdf.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::ExtractError;

/// Text of every page in order, one trailing newline per page. A page whose
/// text cannot be decoded contributes nothing rather than failing the file.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let doc = Document::load(path).map_err(|e| ExtractError::CorruptPdf(e.to_string()))?;

    let mut text = String::new();
    let pages = doc.get_pages();
    debug!("PDF has {} pages", pages.len());

    for (page_num, _) in pages {
        match doc.extract_text(&[page_num]) {
            Ok(content) => text.push_str(&content),
            Err(e) => warn!("No text on page {}: {}", page_num, e),
        }
        text.push('\n');
    }

    Ok(text)
}
