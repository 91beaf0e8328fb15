use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lexaid_core::config::{expand_path, Settings};
use lexaid_core::corpus::PlainTextReader;
use lexaid_core::traits::{Agent, Embedder, Generator};
use lexaid_core::types::{GenerationRequest, RetrievalResult};
use lexaid_vector::{BuildReport, RetrievalStore};

use crate::{prompt, store_config};

#[derive(Debug, Clone, Serialize)]
pub struct LegalAidOutput {
    pub relevant_docs: Vec<RetrievalResult>,
    pub answer: String,
}

/// Answers general legal questions, grounding the answer in retrieved documents when there are any.
pub struct LegalAidAgent {
    store: RetrievalStore,
    corpus_dir: PathBuf,
    top_k: usize,
    generator: Arc<dyn Generator>,
}

impl LegalAidAgent {
    pub fn new(store: RetrievalStore, corpus_dir: &Path, top_k: usize, generator: Arc<dyn Generator>) -> Self {
        Self { store, corpus_dir: corpus_dir.to_path_buf(), top_k, generator }
    }

    pub fn from_settings(settings: &Settings, embedder: Arc<dyn Embedder>, generator: Arc<dyn Generator>) -> Result<Self> {
        let config = store_config(settings, &settings.retrieval.legal_aid_index);
        let store = RetrievalStore::open(config, embedder, Arc::new(PlainTextReader))?;
        let corpus_dir = expand_path(&settings.data.corpus_dir);
        Ok(Self::new(store, &corpus_dir, settings.retrieval.legal_aid_top_k, generator))
    }

    pub fn store(&self) -> &RetrievalStore { &self.store }

    pub fn build_index(&mut self) -> Result<BuildReport> { self.store.build(&self.corpus_dir) }

    pub fn find_relevant_documents(&self, query: &str) -> Result<Vec<RetrievalResult>> {
        self.store.search(query, self.top_k)
    }

    pub fn provide_aid(&self, query: &str) -> Result<LegalAidOutput> {
        let relevant_docs = self.find_relevant_documents(query)?;
        let prompt = prompt::truncate(&prompt::legal_aid(&relevant_docs, query));
        tracing::debug!(documents = relevant_docs.len(), prompt_chars = prompt.chars().count(), "legal aid prompt");
        let answer = match self.generator.generate(&GenerationRequest::new(prompt, prompt::MAX_LENGTH)) {
            Ok(answer) => answer,
            Err(e) => format!("Error generating answer: {:#}", e),
        };
        Ok(LegalAidOutput { relevant_docs, answer })
    }
}

impl Agent for LegalAidAgent {
    fn handle(&mut self, query: &str) -> Result<String> {
        self.build_index()?;
        Ok(self.provide_aid(query)?.answer)
    }
}
