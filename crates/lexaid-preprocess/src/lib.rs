//! Attachment preprocessing: turns PDF, DOCX and plain-text files into text.

use anyhow::{Context, Result};
use docx_rs::{read_docx, DocumentChild};
use std::fs;
use std::path::Path;

use lexaid_core::corpus::read_file_content;
use lexaid_core::error::Error;
use lexaid_core::traits::AttachmentPreprocessor;
use lexaid_core::types::Provenance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Text,
    Image,
    Other,
}

pub fn file_kind(path: &Path) -> FileKind {
    let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => FileKind::Pdf,
        Some("docx") => FileKind::Docx,
        Some("txt" | "text" | "md" | "markdown") => FileKind::Text,
        Some("png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" | "webp") => FileKind::Image,
        _ => FileKind::Other,
    }
}

/// Extension-driven preprocessor.
///
/// Uploaded files must be PDF, DOCX or text and must yield some text. Corpus
/// files of any other kind are read as (lossy) UTF-8 text.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilePreprocessor;

impl FilePreprocessor {
    pub fn new() -> Self { Self }

    fn unsupported(path: &Path, reason: &str) -> anyhow::Error {
        Error::UnsupportedAttachment { path: path.to_path_buf(), reason: reason.to_string() }.into()
    }
}

impl AttachmentPreprocessor for FilePreprocessor {
    fn extract_text(&self, path: &Path, provenance: Provenance) -> Result<String> {
        if !path.is_file() {
            return Err(Error::NotFound(path.display().to_string()).into());
        }
        let text = match (file_kind(path), provenance) {
            (FileKind::Pdf, _) => pdf_extract::extract_text(path)
                .map_err(|e| anyhow::anyhow!("extracting text from PDF {}: {}", path.display(), e))?,
            (FileKind::Docx, _) => docx_text(path)?,
            (FileKind::Text, Provenance::Uploaded) => {
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
            }
            (FileKind::Image, Provenance::Uploaded) => {
                return Err(Self::unsupported(path, "image attachments need OCR, which is not available"));
            }
            (FileKind::Other, Provenance::Uploaded) => {
                return Err(Self::unsupported(path, "supported formats are PDF, DOCX and plain text"));
            }
            (FileKind::Text | FileKind::Image | FileKind::Other, Provenance::Corpus) => read_file_content(path)?,
        };
        if provenance == Provenance::Uploaded && text.trim().is_empty() {
            return Err(Self::unsupported(path, "no text content found"));
        }
        tracing::debug!(file = %path.display(), chars = text.len(), "extracted text");
        Ok(text)
    }
}

fn docx_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let docx = read_docx(&bytes).map_err(|e| anyhow::anyhow!("parsing DOCX {}: {}", path.display(), e))?;
    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(p) = child {
            text.push_str(&p.raw_text());
            text.push('\n');
        }
    }
    Ok(text)
}
