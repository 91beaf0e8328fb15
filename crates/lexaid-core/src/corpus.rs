use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::traits::{AttachmentPreprocessor, DocumentReader};
use crate::types::{Document, Provenance};

/// A flat directory of documents, one file per document.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
}

impl Corpus {
    /// Opens `root`, creating it empty when missing so a fresh install runs with zero documents.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.exists() {
            fs::create_dir_all(root).with_context(|| format!("creating corpus directory {}", root.display()))?;
            tracing::info!(dir = %root.display(), "created missing corpus directory");
        }
        Ok(Self { root: root.to_path_buf() })
    }

    pub fn root(&self) -> &Path { &self.root }

    /// Regular files directly under the root, sorted by name.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();
        files.sort();
        files
    }

    pub fn read_document(&self, path: &Path, reader: &dyn DocumentReader) -> Result<Document> {
        let text = reader.read(path)?;
        Ok(Document { id: document_id(path), source_location: path.to_string_lossy().to_string(), text })
    }
}

/// Document identity: the file name within the corpus directory.
pub fn document_id(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Reads a file as text, falling back to lossy UTF-8 decoding for stray bytes.
pub fn read_file_content(file_path: &Path) -> Result<String> {
    match fs::read_to_string(file_path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
    }
}

/// Strict UTF-8 reader; a file that is not valid UTF-8 is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextReader;

impl DocumentReader for PlainTextReader {
    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

/// Reads corpus files through an attachment preprocessor (PDF, DOCX, text).
#[derive(Clone)]
pub struct PreprocessedReader {
    preprocessor: Arc<dyn AttachmentPreprocessor>,
}

impl PreprocessedReader {
    pub fn new(preprocessor: Arc<dyn AttachmentPreprocessor>) -> Self { Self { preprocessor } }
}

impl DocumentReader for PreprocessedReader {
    fn read(&self, path: &Path) -> Result<String> { self.preprocessor.extract_text(path, Provenance::Corpus) }
}
