use anyhow::Context;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use lexaid_agents::prompt::{MAX_LENGTH, MAX_PROMPT_CHARS};
use lexaid_agents::{CaseDiscoveryAgent, LegalAidAgent, LegalDraftingAgent};
use lexaid_core::corpus::PlainTextReader;
use lexaid_core::traits::{Agent, Generator};
use lexaid_core::types::{DuplicatePolicy, GenerationRequest};
use lexaid_embed::HashEmbedder;
use lexaid_vector::{RetrievalStore, StoreConfig};

const DIM: usize = 64;

/// Records every request and answers with a fixed reply, or fails when `reply` is `None`.
struct RecordingGenerator {
    reply: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl RecordingGenerator {
    fn replying(reply: &str) -> Arc<Self> { Arc::new(Self { reply: Some(reply.into()), requests: Mutex::new(Vec::new()) }) }

    fn failing() -> Arc<Self> { Arc::new(Self { reply: None, requests: Mutex::new(Vec::new()) }) }

    fn last(&self) -> GenerationRequest { self.requests.lock().unwrap().last().cloned().expect("a request was made") }
}

impl Generator for RecordingGenerator {
    fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone().ok_or_else(|| anyhow::anyhow!("model unavailable"))
    }
}

/// Fails the way a network client does: a context layer over the root cause.
struct UnreachableGenerator;

impl Generator for UnreachableGenerator {
    fn generate(&self, _request: &GenerationRequest) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("connection refused")).context("calling generation service at http://localhost:11434")
    }
}

fn store(index_path: &Path) -> RetrievalStore {
    let config = StoreConfig { index_path: index_path.to_path_buf(), dimension: DIM, duplicate_policy: DuplicatePolicy::Accumulate };
    RetrievalStore::open(config, Arc::new(HashEmbedder::new(DIM)), Arc::new(PlainTextReader)).unwrap()
}

fn seed_abc(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("A.txt"), "The landlord bears liability for structural defects").unwrap();
    fs::write(dir.join("B.txt"), "Consideration is required for a binding contract").unwrap();
    fs::write(dir.join("C.txt"), "Appeals must be filed within ninety days").unwrap();
}

#[test]
fn drafting_prompt_carries_instructions_and_output_is_unmodified() {
    let generator = RecordingGenerator::replying("  MUTUAL NON-DISCLOSURE AGREEMENT\n");
    let mut agent = LegalDraftingAgent::new(generator.clone());

    let out = agent.handle("draft an NDA").unwrap();
    assert_eq!(out, "  MUTUAL NON-DISCLOSURE AGREEMENT\n");

    let request = generator.last();
    assert!(request.prompt.contains("Instructions:"));
    assert!(request.prompt.contains("draft an NDA"));
    assert_eq!(request.max_length, 1024);
}

#[test]
fn clause_mode_uses_clause_template_and_full_budget() {
    let generator = RecordingGenerator::replying("Each party shall keep ...");
    let agent = LegalDraftingAgent::new(generator.clone());

    let out = agent.draft("two year term", "", Some("confidentiality"));
    assert_eq!(out, "Each party shall keep ...");
    let request = generator.last();
    assert!(request.prompt.starts_with("Draft a confidentiality clause"));
    assert_eq!(request.max_length, MAX_LENGTH);
}

#[test]
fn drafting_failures_become_inline_text() {
    let agent = LegalDraftingAgent::new(RecordingGenerator::failing());
    assert_eq!(agent.draft_document("x", "ctx"), "Error generating draft: model unavailable");
    assert_eq!(agent.generate_clauses("x", "indemnity"), "Error generating clause: model unavailable");
}

#[test]
fn case_discovery_with_empty_corpus_falls_back_to_general_knowledge() {
    let tmp = TempDir::new().unwrap();
    let corpus = tmp.path().join("casedocs");
    let generator = RecordingGenerator::replying("general answer");
    let mut agent = CaseDiscoveryAgent::new(store(&tmp.path().join("case.idx")), &corpus, 5, generator.clone());

    assert_eq!(agent.handle("Is a verbal lease enforceable?").unwrap(), "general answer");
    assert!(corpus.is_dir());
    let prompt = generator.last().prompt;
    assert!(prompt.starts_with("You are a legal research assistant. No relevant case documents were retrieved."));
    assert!(prompt.ends_with("\n\nIs a verbal lease enforceable?"));
}

#[test]
fn case_discovery_summarizes_retrieved_documents() {
    let tmp = TempDir::new().unwrap();
    let corpus = tmp.path().join("casedocs");
    seed_abc(&corpus);
    let generator = RecordingGenerator::replying("summary");
    let mut agent = CaseDiscoveryAgent::new(store(&tmp.path().join("case.idx")), &corpus, 2, generator.clone());

    agent.build_index().unwrap();
    let output = agent.retrieve_and_generate("liability").unwrap();
    assert_eq!(output.retrieval_results.len(), 2);
    assert_eq!(output.summary, "summary");

    let request = generator.last();
    assert!(request.prompt.ends_with("\n\nliability"));
    assert!(request.prompt.contains(&output.retrieval_results[0].text));
    assert_eq!(request.max_length, MAX_LENGTH);
}

#[test]
fn case_discovery_generation_failure_is_inline() {
    let tmp = TempDir::new().unwrap();
    let mut agent =
        CaseDiscoveryAgent::new(store(&tmp.path().join("case.idx")), &tmp.path().join("docs"), 5, RecordingGenerator::failing());
    assert_eq!(agent.handle("anything").unwrap(), "Error generating summary: model unavailable");
}

#[test]
fn legal_aid_prompt_is_truncated() {
    let tmp = TempDir::new().unwrap();
    let corpus = tmp.path().join("docs");
    fs::create_dir_all(&corpus).unwrap();
    fs::write(corpus.join("long.txt"), "tenancy ".repeat(2000)).unwrap();
    let generator = RecordingGenerator::replying("answer");
    let mut agent = LegalAidAgent::new(store(&tmp.path().join("aid.idx")), &corpus, 3, generator.clone());

    assert_eq!(agent.handle("What is a tenancy?").unwrap(), "answer");
    let prompt = generator.last().prompt;
    assert_eq!(prompt.chars().count(), MAX_PROMPT_CHARS);
    assert!(prompt.contains("Question: What is a tenancy?\n\nContext:\n"));
}

#[test]
fn legal_aid_keeps_documents_when_generation_fails() {
    let tmp = TempDir::new().unwrap();
    let corpus = tmp.path().join("docs");
    seed_abc(&corpus);
    let mut agent = LegalAidAgent::new(store(&tmp.path().join("aid.idx")), &corpus, 3, RecordingGenerator::failing());

    agent.build_index().unwrap();
    let output = agent.provide_aid("Do I need consideration?").unwrap();
    assert_eq!(output.relevant_docs.len(), 3);
    assert_eq!(output.answer, "Error generating answer: model unavailable");
}

#[test]
fn inline_errors_keep_the_whole_cause_chain() {
    let drafting = LegalDraftingAgent::new(Arc::new(UnreachableGenerator));
    assert_eq!(
        drafting.draft_document("x", ""),
        "Error generating draft: calling generation service at http://localhost:11434: connection refused"
    );

    let tmp = TempDir::new().unwrap();
    let aid = LegalAidAgent::new(store(&tmp.path().join("aid.idx")), &tmp.path().join("docs"), 3, Arc::new(UnreachableGenerator));
    assert!(aid.provide_aid("q").unwrap().answer.ends_with(": connection refused"));
}
