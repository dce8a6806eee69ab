use anyhow::{anyhow, Result};
use pdf_extract::extract_text_by_pages;
use std::path::Path;

/// One `[START PAGE n]` block per page with text. Blank pages keep their number.
pub fn extract(path: &Path) -> Result<Vec<String>> {
    // pdf-extract panics on some malformed fonts and streams.
    let pages = std::panic::catch_unwind(|| extract_text_by_pages(path))
        .map_err(|_| anyhow!("PDF extractor panicked on {}", path.display()))??;
    Ok(mark_pages(pages))
}

fn mark_pages(pages: Vec<String>) -> Vec<String> {
    pages.into_iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(i, text)| format!("[START PAGE {n}]\n{text}\n[END PAGE {n}]", n = i + 1))
        .collect()
}
