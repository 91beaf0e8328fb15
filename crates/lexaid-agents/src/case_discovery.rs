use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lexaid_core::config::{expand_path, Settings};
use lexaid_core::corpus::PreprocessedReader;
use lexaid_core::traits::{Agent, AttachmentPreprocessor, Embedder, Generator};
use lexaid_core::types::{GenerationRequest, RetrievalResult};
use lexaid_vector::{BuildReport, RetrievalStore};

use crate::{prompt, store_config};

#[derive(Debug, Clone, Serialize)]
pub struct CaseDiscoveryOutput {
    pub retrieval_results: Vec<RetrievalResult>,
    pub summary: String,
}

/// Retrieves similar case documents and summarizes them against the query.
pub struct CaseDiscoveryAgent {
    store: RetrievalStore,
    corpus_dir: PathBuf,
    top_k: usize,
    generator: Arc<dyn Generator>,
}

impl CaseDiscoveryAgent {
    pub fn new(store: RetrievalStore, corpus_dir: &Path, top_k: usize, generator: Arc<dyn Generator>) -> Self {
        Self { store, corpus_dir: corpus_dir.to_path_buf(), top_k, generator }
    }

    /// Corpus files are read through `preprocessor`, so PDF and DOCX case files are indexed too.
    pub fn from_settings(
        settings: &Settings,
        embedder: Arc<dyn Embedder>,
        preprocessor: Arc<dyn AttachmentPreprocessor>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self> {
        let config = store_config(settings, &settings.retrieval.case_discovery_index);
        let store = RetrievalStore::open(config, embedder, Arc::new(PreprocessedReader::new(preprocessor)))?;
        let corpus_dir = expand_path(&settings.data.corpus_dir);
        Ok(Self::new(store, &corpus_dir, settings.retrieval.case_discovery_top_k, generator))
    }

    pub fn store(&self) -> &RetrievalStore { &self.store }

    pub fn build_index(&mut self) -> Result<BuildReport> { self.store.build(&self.corpus_dir) }

    pub fn retrieve_and_generate(&self, query: &str) -> Result<CaseDiscoveryOutput> {
        let retrieval_results = self.store.search(query, self.top_k)?;
        let summary = self.generate_summary(&retrieval_results, query);
        Ok(CaseDiscoveryOutput { retrieval_results, summary })
    }

    /// Generator failures come back as text, not as an error.
    pub fn generate_summary(&self, results: &[RetrievalResult], query: &str) -> String {
        let prompt = prompt::truncate(&prompt::case_discovery(results, query));
        tracing::debug!(documents = results.len(), prompt_chars = prompt.chars().count(), "case discovery prompt");
        match self.generator.generate(&GenerationRequest::new(prompt, prompt::MAX_LENGTH)) {
            Ok(summary) => summary,
            Err(e) => format!("Error generating summary: {:#}", e),
        }
    }
}

impl Agent for CaseDiscoveryAgent {
    fn handle(&mut self, query: &str) -> Result<String> {
        self.build_index()?;
        Ok(self.retrieve_and_generate(query)?.summary)
    }
}
