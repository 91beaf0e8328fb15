use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use lexaid_agents::{CaseDiscoveryAgent, LegalAidAgent, LegalDraftingAgent};
use lexaid_core::config::Settings;
use lexaid_core::traits::{Agent, AttachmentPreprocessor, Generator};
use lexaid_core::types::{DecomposedIntent, TaskKind};
use lexaid_embed::embedder_from_settings;
use lexaid_preprocess::FilePreprocessor;

use crate::decompose::{Decomposer, KeywordDecomposer};

pub const NO_VALID_QUERIES: &str = "No valid queries could be extracted from the input.";

/// Routes each decomposed sub-query to its agent and concatenates the answers.
pub struct Orchestrator {
    decomposer: Box<dyn Decomposer>,
    case_discovery: Box<dyn Agent>,
    legal_aid: Box<dyn Agent>,
    drafting: Box<dyn Agent>,
}

impl Orchestrator {
    pub fn new(
        decomposer: Box<dyn Decomposer>,
        case_discovery: Box<dyn Agent>,
        legal_aid: Box<dyn Agent>,
        drafting: Box<dyn Agent>,
    ) -> Self {
        Self { decomposer, case_discovery, legal_aid, drafting }
    }

    /// Wires the keyword decomposer and the three agents from settings around one shared generator.
    pub fn from_settings(settings: &Settings, generator: Arc<dyn Generator>) -> Result<Self> {
        let embedder = embedder_from_settings(&settings.embedding, settings.retrieval.dimension)?;
        let preprocessor: Arc<dyn AttachmentPreprocessor> = Arc::new(FilePreprocessor::new());
        let case_discovery =
            CaseDiscoveryAgent::from_settings(settings, embedder.clone(), preprocessor.clone(), generator.clone())?;
        let legal_aid = LegalAidAgent::from_settings(settings, embedder, generator.clone())?;
        let drafting = LegalDraftingAgent::new(generator);
        Ok(Self::new(
            Box::new(KeywordDecomposer::new(preprocessor)),
            Box::new(case_discovery),
            Box::new(legal_aid),
            Box::new(drafting),
        ))
    }

    fn agent_for(&mut self, task: TaskKind) -> &mut dyn Agent {
        match task {
            TaskKind::CaseDiscovery | TaskKind::DocumentSummarization => self.case_discovery.as_mut(),
            TaskKind::LegalDrafting => self.drafting.as_mut(),
            TaskKind::QueryResolution => self.legal_aid.as_mut(),
        }
    }

    /// Answers a request. Every failure is folded into the returned text.
    pub fn handle(&mut self, text_query: Option<&str>, attachment: Option<&Path>) -> String {
        let sub_queries = match self.decomposer.decompose(text_query, attachment) {
            DecomposedIntent::Error(e) => {
                tracing::warn!(error = %e, "decomposition failed");
                return format!("Error processing input: {}", e);
            }
            DecomposedIntent::SubQueries(sub_queries) => sub_queries,
        };
        if sub_queries.is_empty() {
            return NO_VALID_QUERIES.to_string();
        }

        let mut results = Vec::with_capacity(sub_queries.len());
        for sub_query in &sub_queries {
            let task: TaskKind = match sub_query.task.parse() {
                Ok(task) => task,
                Err(_) => {
                    tracing::warn!(task = %sub_query.task, "no agent for task");
                    results.push(format!("Unknown task: {}", sub_query.task));
                    continue;
                }
            };
            tracing::info!(%task, "dispatching sub-query");
            match self.agent_for(task).handle(&sub_query.text) {
                Ok(answer) => results.push(answer),
                Err(e) => {
                    tracing::error!(%task, error = %e, "sub-query failed");
                    results.push(format!("Error processing subquery '{}': {:#}", sub_query.text, e));
                }
            }
        }
        results.concat()
    }
}
