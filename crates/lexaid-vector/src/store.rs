use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lexaid_core::corpus::Corpus;
use lexaid_core::traits::{DocumentReader, Embedder};
use lexaid_core::types::{DuplicatePolicy, RetrievalResult};

use crate::index::FlatIndex;
use crate::persist::{load_or_create, write_index, CatalogEntry};

/// Metadata for one index position.
///
/// `text` is `None` for entries restored from disk whose corpus file has not
/// been re-read (or has changed) since; such entries never appear in results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub id: String,
    pub content_hash: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub index_path: PathBuf,
    pub dimension: usize,
    pub duplicate_policy: DuplicatePolicy,
}

/// Outcome of one [`RetrievalStore::build`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub added: usize,
    pub duplicates: usize,
    pub failed: usize,
    pub persisted: bool,
}

enum Ingested { Added, Duplicate }

/// A vector index plus the parallel metadata list, built from a corpus directory.
///
/// `metadata[i]` describes `index` position `i`; every mutation appends to both
/// or to neither. Only one store (in one process) may build a given index path
/// at a time, see [`crate::persist`].
pub struct RetrievalStore {
    config: StoreConfig,
    embedder: Arc<dyn Embedder>,
    reader: Arc<dyn DocumentReader>,
    index: FlatIndex,
    metadata: Vec<DocumentMeta>,
}

impl RetrievalStore {
    /// Loads the index at `config.index_path` (or starts empty) and restores its catalog.
    pub fn open(config: StoreConfig, embedder: Arc<dyn Embedder>, reader: Arc<dyn DocumentReader>) -> Result<Self> {
        let (index, catalog) = load_or_create(&config.index_path, config.dimension)?;
        let metadata = catalog
            .into_iter()
            .map(|c| DocumentMeta { id: c.document_id, content_hash: c.content_hash, text: None })
            .collect();
        Ok(Self { config, embedder, reader, index, metadata })
    }

    pub fn index(&self) -> &FlatIndex { &self.index }

    pub fn metadata(&self) -> &[DocumentMeta] { &self.metadata }

    pub fn index_path(&self) -> &Path { &self.config.index_path }

    /// Scans `corpus_dir` and appends every readable file, then persists if anything was added.
    ///
    /// Under [`DuplicatePolicy::Accumulate`] files already represented are added
    /// again on every call.
    pub fn build(&mut self, corpus_dir: &Path) -> Result<BuildReport> {
        let corpus = Corpus::open(corpus_dir)?;
        let mut report = BuildReport::default();
        for path in corpus.files() {
            match self.ingest(&corpus, &path) {
                Ok(Ingested::Added) => report.added += 1,
                Ok(Ingested::Duplicate) => report.duplicates += 1,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "skipping document");
                    report.failed += 1;
                }
            }
        }
        if report.added > 0 {
            self.persist()?;
            report.persisted = true;
        }
        tracing::info!(
            corpus = %corpus_dir.display(), added = report.added, duplicates = report.duplicates,
            failed = report.failed, total = self.index.len(), "build finished"
        );
        Ok(report)
    }

    fn ingest(&mut self, corpus: &Corpus, path: &Path) -> Result<Ingested> {
        let doc = corpus.read_document(path, self.reader.as_ref())?;
        let content_hash = content_hash(&doc.text);

        let mut known = false;
        for meta in self.metadata.iter_mut().filter(|m| m.id == doc.id && m.content_hash == content_hash) {
            known = true;
            if meta.text.is_none() { meta.text = Some(doc.text.clone()); }
        }
        if known && self.config.duplicate_policy == DuplicatePolicy::Deduplicate {
            return Ok(Ingested::Duplicate);
        }

        let vector = self.embedder.embed(&doc.text)?;
        self.index.add(&vector)?;
        self.metadata.push(DocumentMeta { id: doc.id, content_hash, text: Some(doc.text) });
        Ok(Ingested::Added)
    }

    pub fn persist(&self) -> Result<()> {
        let catalog: Vec<CatalogEntry> = self
            .metadata
            .iter()
            .map(|m| CatalogEntry { document_id: m.id.clone(), content_hash: m.content_hash.clone() })
            .collect();
        write_index(&self.config.index_path, &self.index, &catalog)?;
        tracing::info!(path = %self.config.index_path.display(), vectors = self.index.len(), "vector index saved");
        Ok(())
    }

    /// The `top_k` closest documents to `query`, best first; empty when nothing is indexed.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalResult>> {
        if self.metadata.is_empty() || self.index.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        let query_vec = self.embedder.embed(query)?;
        // Rank every position so entries without text never take a top-k slot.
        let hits = self.index.search(&query_vec, self.index.len())?;
        let results: Vec<RetrievalResult> = hits
            .into_iter()
            .filter_map(|hit| {
                let meta = self.metadata.get(hit.position)?;
                let text = meta.text.as_ref()?;
                Some(RetrievalResult { document_id: meta.id.clone(), text: text.clone(), score: -hit.distance })
            })
            .take(top_k)
            .collect();
        tracing::debug!(top_k, hits = results.len(), "search finished");
        Ok(results)
    }
}

pub fn content_hash(text: &str) -> String { blake3::hash(text.as_bytes()).to_hex().to_string() }
