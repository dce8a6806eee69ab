pub mod pdf;
pub mod docx;
pub mod xlsx;
pub mod pptx;

use std::path::Path;
use anyhow::{Context, Result};
use log::error;

/// Extensions accepted by the upload directory.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".xlsx", ".xls", ".pptx", ".txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Spreadsheet,
    Presentation,
    Text,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        match extension_of(path).as_deref() {
            Some(".pdf") => DocumentKind::Pdf,
            Some(".docx") => DocumentKind::Docx,
            Some(".xlsx") | Some(".xls") => DocumentKind::Spreadsheet,
            Some(".pptx") => DocumentKind::Presentation,
            _ => DocumentKind::Text,
        }
    }
}

/// Lowercase extension including the leading dot, e.g. `.pdf`.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

pub fn is_supported(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Extracts the text of `filename` inside `upload_dir`, wrapping every logical
/// unit (page, paragraph, sheet, slide) in start/end citation markers.
///
/// Never fails: a file that cannot be read is replaced by a short error line so
/// the rest of the report can still be generated.
pub fn parse_document(upload_dir: &Path, filename: &str) -> String {
    let path = upload_dir.join(filename);
    match extract_parts(&path) {
        Ok(parts) => parts.join("\n"),
        Err(err) => {
            error!("Error parsing {}: {:#}", filename, err);
            format!("Error parsing file: {}", filename)
        }
    }
}

fn extract_parts(path: &Path) -> Result<Vec<String>> {
    match DocumentKind::from_path(path) {
        DocumentKind::Pdf => pdf::extract(path),
        DocumentKind::Docx => docx::extract(path),
        DocumentKind::Spreadsheet => xlsx::extract(path),
        DocumentKind::Presentation => pptx::extract(path),
        DocumentKind::Text => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(vec![content])
        }
    }
}
