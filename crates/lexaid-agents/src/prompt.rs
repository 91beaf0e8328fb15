//! Prompt templates for the three agents.

use lexaid_core::types::RetrievalResult;

/// Retrieval prompts are cut to this many characters before generation.
pub const MAX_PROMPT_CHARS: usize = 4096;
/// Generation budget for retrieval answers and clauses.
pub const MAX_LENGTH: usize = 4096;
/// Generation budget for whole-document drafts.
pub const DRAFT_MAX_LENGTH: usize = 1024;

/// First `MAX_PROMPT_CHARS` characters of `prompt`, cut on a char boundary.
pub fn truncate(prompt: &str) -> String {
    match prompt.char_indices().nth(MAX_PROMPT_CHARS) {
        Some((byte, _)) => prompt[..byte].to_string(),
        None => prompt.to_string(),
    }
}

fn joined_texts(results: &[RetrievalResult]) -> String {
    results.iter().map(|r| r.text.as_str()).collect::<Vec<_>>().join("\n\n")
}

pub fn case_discovery(results: &[RetrievalResult], query: &str) -> String {
    if results.is_empty() {
        return format!(
            "You are a legal research assistant. No relevant case documents were retrieved. \
             Based only on your general legal knowledge, answer the following query:\n\n{}",
            query
        );
    }
    format!("{}\n\n{}", joined_texts(results), query)
}

pub fn legal_aid(results: &[RetrievalResult], query: &str) -> String {
    if results.is_empty() {
        return format!(
            "You are a legal assistant. Answer the following question as best as you can \
             based only on your general legal knowledge:\n\nQuestion: {}",
            query
        );
    }
    format!(
        "Answer the following question using the context from the retrieved legal documents.\n\n\
         Question: {}\n\nContext:\n{}",
        query,
        joined_texts(results)
    )
}

pub fn clause(instructions: &str, clause_type: &str) -> String {
    format!("Draft a {} clause based on the following instructions:\n{}\n\nClause:", clause_type, instructions)
}

pub fn document(instructions: &str, context: &str) -> String {
    format!("Context: {}\n\nInstructions: {}\n\nDraft:", context, instructions)
}
