use std::path::Path;

use crate::types::{GenerationRequest, Provenance};

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector"))
    }
}

/// Synchronous prompt-in/text-out generation. Calls block until the model finishes.
pub trait Generator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String>;
}

/// Converts a file into plain text, or fails on unreadable/unsupported input.
pub trait AttachmentPreprocessor: Send + Sync {
    fn extract_text(&self, path: &Path, provenance: Provenance) -> anyhow::Result<String>;
}

/// How a retrieval store obtains the text of one corpus file.
pub trait DocumentReader: Send + Sync {
    fn read(&self, path: &Path) -> anyhow::Result<String>;
}

/// A task handler the orchestrator routes sub-queries to.
pub trait Agent {
    fn handle(&mut self, text: &str) -> anyhow::Result<String>;
}
