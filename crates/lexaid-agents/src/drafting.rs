use anyhow::Result;
use std::sync::Arc;

use lexaid_core::traits::{Agent, Generator};
use lexaid_core::types::GenerationRequest;

use crate::prompt;

/// Drafts documents or single clauses from instructions. No retrieval.
pub struct LegalDraftingAgent {
    generator: Arc<dyn Generator>,
}

impl LegalDraftingAgent {
    pub fn new(generator: Arc<dyn Generator>) -> Self { Self { generator } }

    /// Clause mode when `clause_type` is given, document mode otherwise.
    pub fn draft(&self, instructions: &str, context: &str, clause_type: Option<&str>) -> String {
        match clause_type {
            Some(kind) => self.generate_clauses(instructions, kind),
            None => self.draft_document(instructions, context),
        }
    }

    pub fn draft_document(&self, instructions: &str, context: &str) -> String {
        let request = GenerationRequest::new(prompt::document(instructions, context), prompt::DRAFT_MAX_LENGTH);
        match self.generator.generate(&request) {
            Ok(draft) => draft,
            Err(e) => format!("Error generating draft: {:#}", e),
        }
    }

    pub fn generate_clauses(&self, instructions: &str, clause_type: &str) -> String {
        let request = GenerationRequest::new(prompt::clause(instructions, clause_type), prompt::MAX_LENGTH);
        match self.generator.generate(&request) {
            Ok(clause) => clause,
            Err(e) => format!("Error generating clause: {:#}", e),
        }
    }
}

impl Agent for LegalDraftingAgent {
    fn handle(&mut self, instructions: &str) -> Result<String> { Ok(self.draft(instructions, "", None)) }
}
