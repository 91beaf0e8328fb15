//! Domain types shared by the decomposer, the agents and the retrieval store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type DocumentId = String;

/// A corpus document.
///
/// - `id`: file name within the corpus directory, unique per corpus
/// - `source_location`: full path the text was read from
/// - `text`: the whole file content as plain text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub source_location: String,
    pub text: String,
}

/// One labeled unit of work produced by a decomposer.
///
/// `task` stays a free string on the wire; the orchestrator parses it into
/// [`TaskKind`] and reports unknown labels per sub-query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subquery {
    pub task: String,
    pub text: String,
}

impl Subquery {
    pub fn new(task: TaskKind, text: impl Into<String>) -> Self {
        Self { task: task.label().to_string(), text: text.into() }
    }
}

/// The closed set of task labels the orchestrator can route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    CaseDiscovery,
    DocumentSummarization,
    LegalDrafting,
    QueryResolution,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::CaseDiscovery,
        TaskKind::DocumentSummarization,
        TaskKind::LegalDrafting,
        TaskKind::QueryResolution,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskKind::CaseDiscovery => "case discovery",
            TaskKind::DocumentSummarization => "document summarization",
            TaskKind::LegalDrafting => "legal drafting",
            TaskKind::QueryResolution => "query resolution",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// Returned when a label is not one of [`TaskKind::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTask(pub String);

impl FromStr for TaskKind {
    type Err = UnknownTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskKind::ALL
            .into_iter()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| UnknownTask(s.to_string()))
    }
}

/// Result of decomposing a request: sub-queries or an error, never both.
///
/// Serializes as `{"sub_queries": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecomposedIntent {
    SubQueries(Vec<Subquery>),
    Error(String),
}

impl DecomposedIntent {
    pub fn error(message: impl Into<String>) -> Self { Self::Error(message.into()) }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> { serde_json::to_string_pretty(self) }
}

/// A ranked retrieval hit. `score` is the negated L2 distance, so higher is closer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub document_id: DocumentId,
    pub text: String,
    pub score: f32,
}

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.9;

/// Prompt plus sampling parameters. Only `prompt` and `max_length` vary between agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_length: usize,
    pub temperature: f32,
    pub top_p: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, max_length: usize) -> Self {
        Self { prompt: prompt.into(), max_length, temperature: DEFAULT_TEMPERATURE, top_p: DEFAULT_TOP_P }
    }
}

/// Where a file handed to the attachment preprocessor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// Supplied by the user alongside a query.
    Uploaded,
    /// A document inside the corpus directory.
    Corpus,
}

/// What a retrieval store does with a corpus file it has already indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Append every file on every build, even if already represented.
    #[default]
    Accumulate,
    /// Skip files whose name and content hash are already represented.
    Deduplicate,
}
