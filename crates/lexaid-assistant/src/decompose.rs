//! Request decomposition: free text plus an optional attachment in, labeled sub-queries out.

use std::path::Path;
use std::sync::Arc;

use lexaid_core::traits::AttachmentPreprocessor;
use lexaid_core::types::{DecomposedIntent, Provenance, Subquery, TaskKind};

pub const EMPTY_INPUT: &str = "empty input";
pub const NOTHING_CLASSIFIABLE: &str = "no classifiable content in input";
pub const DEFAULT_SUMMARY_INSTRUCTION: &str = "Summarize the following document:";

/// Splits a request into sub-queries. Failures are reported as [`DecomposedIntent::Error`].
pub trait Decomposer {
    fn decompose(&self, text_query: Option<&str>, attachment: Option<&Path>) -> DecomposedIntent;
}

const DRAFTING_CUES: &[&str] =
    &["draft", "prepare a", "compose", "write a", "clause", "agreement", "contract", "nda", "legal notice", "petition"];
const SUMMARY_CUES: &[&str] = &["summarize", "summarise", "summary", "synopsis", "brief me"];
const CASE_CUES: &[&str] = &["case", "cases", "precedent", "judgment", "judgement", "ruling", "verdict", "court held"];

/// Keyword-cue decomposer. Deterministic; needs no model.
pub struct KeywordDecomposer {
    preprocessor: Arc<dyn AttachmentPreprocessor>,
}

impl KeywordDecomposer {
    pub fn new(preprocessor: Arc<dyn AttachmentPreprocessor>) -> Self { Self { preprocessor } }
}

impl Decomposer for KeywordDecomposer {
    fn decompose(&self, text_query: Option<&str>, attachment: Option<&Path>) -> DecomposedIntent {
        let query = text_query.map(str::trim).filter(|q| !q.is_empty());
        if query.is_none() && attachment.is_none() {
            return DecomposedIntent::error(EMPTY_INPUT);
        }

        let attachment_text = match attachment {
            Some(path) => match self.preprocessor.extract_text(path, Provenance::Uploaded) {
                Ok(text) => Some(text),
                Err(e) => return DecomposedIntent::error(format!("could not read attachment {}: {}", path.display(), e)),
            },
            None => None,
        };

        let mut labeled: Vec<(TaskKind, String)> = segments(query.unwrap_or("")).into_iter().map(|s| (classify(&s), s)).collect();

        let mut sub_queries = Vec::new();
        if let Some(text) = attachment_text {
            let instructions: Vec<String> = labeled
                .iter()
                .filter(|(kind, _)| *kind == TaskKind::DocumentSummarization)
                .map(|(_, s)| s.clone())
                .collect();
            labeled.retain(|(kind, _)| *kind != TaskKind::DocumentSummarization);
            let instruction = if instructions.is_empty() { DEFAULT_SUMMARY_INSTRUCTION.to_string() } else { instructions.join(" ") };
            sub_queries.push(Subquery::new(TaskKind::DocumentSummarization, format!("{}\n\n{}", instruction, text.trim())));
        }
        sub_queries.extend(merge_runs(labeled).into_iter().map(|(kind, text)| Subquery::new(kind, text)));

        if sub_queries.is_empty() {
            return DecomposedIntent::error(NOTHING_CLASSIFIABLE);
        }
        tracing::debug!(count = sub_queries.len(), "decomposed request");
        DecomposedIntent::SubQueries(sub_queries)
    }
}

/// Sentence-ish segments: split at `. ? ! ;` and line breaks, trimmed, empties dropped.
pub fn segments(text: &str) -> Vec<String> {
    text.split(|c: char| matches!(c, '.' | '?' | '!' | ';' | '\n' | '\r'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Task label for one segment; drafting cues win over summary cues, which win over case cues.
pub fn classify(segment: &str) -> TaskKind {
    let lower = segment.to_lowercase();
    let words: Vec<&str> = lower.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect();
    if has_cue(&words, DRAFTING_CUES) {
        TaskKind::LegalDrafting
    } else if has_cue(&words, SUMMARY_CUES) {
        TaskKind::DocumentSummarization
    } else if has_cue(&words, CASE_CUES) {
        TaskKind::CaseDiscovery
    } else {
        TaskKind::QueryResolution
    }
}

fn has_cue(words: &[&str], cues: &[&str]) -> bool {
    cues.iter().any(|cue| {
        let cue_words: Vec<&str> = cue.split_whitespace().collect();
        words.windows(cue_words.len()).any(|w| w == cue_words.as_slice())
    })
}

fn merge_runs(labeled: Vec<(TaskKind, String)>) -> Vec<(TaskKind, String)> {
    let mut merged: Vec<(TaskKind, String)> = Vec::new();
    for (kind, text) in labeled {
        match merged.last_mut() {
            Some((last, acc)) if *last == kind => {
                acc.push(' ');
                acc.push_str(&text);
            }
            _ => merged.push((kind, text)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_match_whole_words_only() {
        assert_eq!(classify("Is this a showcase of anything"), TaskKind::QueryResolution);
        assert_eq!(classify("Find a CASE on adverse possession"), TaskKind::CaseDiscovery);
        assert_eq!(classify("what the court held in Donoghue"), TaskKind::CaseDiscovery);
        assert_eq!(classify("send a legal notice to my tenant"), TaskKind::LegalDrafting);
        assert_eq!(classify("the notice period is short"), TaskKind::QueryResolution);
    }

    #[test]
    fn drafting_wins_over_other_cues() {
        assert_eq!(classify("summarize the contract"), TaskKind::LegalDrafting);
        assert_eq!(classify("give me a summary of the ruling"), TaskKind::DocumentSummarization);
    }

    #[test]
    fn runs_of_the_same_label_merge() {
        let merged = merge_runs(vec![
            (TaskKind::QueryResolution, "a".into()),
            (TaskKind::QueryResolution, "b".into()),
            (TaskKind::CaseDiscovery, "c".into()),
            (TaskKind::QueryResolution, "d".into()),
        ]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], (TaskKind::QueryResolution, "a b".to_string()));
    }
}
