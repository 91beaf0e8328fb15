use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use lexaid_assistant::decompose::{DEFAULT_SUMMARY_INSTRUCTION, EMPTY_INPUT, NOTHING_CLASSIFIABLE};
use lexaid_assistant::{Decomposer, KeywordDecomposer};
use lexaid_core::types::{DecomposedIntent, Subquery, TaskKind};
use lexaid_preprocess::FilePreprocessor;

fn decomposer() -> KeywordDecomposer { KeywordDecomposer::new(Arc::new(FilePreprocessor::new())) }

fn sub_queries(intent: DecomposedIntent) -> Vec<Subquery> {
    match intent {
        DecomposedIntent::SubQueries(qs) => qs,
        DecomposedIntent::Error(e) => panic!("unexpected decomposition error: {}", e),
    }
}

#[test]
fn mixed_request_splits_into_labeled_sub_queries() {
    let qs = sub_queries(decomposer().decompose(
        Some("Find cases on wrongful termination. What notice period applies? Draft a resignation letter."),
        None,
    ));
    assert_eq!(
        qs,
        vec![
            Subquery::new(TaskKind::CaseDiscovery, "Find cases on wrongful termination"),
            Subquery::new(TaskKind::QueryResolution, "What notice period applies"),
            Subquery::new(TaskKind::LegalDrafting, "Draft a resignation letter"),
        ]
    );
}

#[test]
fn consecutive_segments_with_one_intent_merge() {
    let qs = sub_queries(decomposer().decompose(Some("Can my landlord evict me? Do I get my deposit back?"), None));
    assert_eq!(qs, vec![Subquery::new(TaskKind::QueryResolution, "Can my landlord evict me Do I get my deposit back")]);
}

#[test]
fn attachment_leads_with_a_summary_request() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("lease.txt");
    fs::write(&path, "The tenant shall pay rent monthly.\n").unwrap();

    let qs = sub_queries(decomposer().decompose(Some("Summarize this for me. Is the rent clause fair?"), Some(&path)));
    assert_eq!(qs.len(), 2);
    assert_eq!(qs[0].task, "document summarization");
    assert_eq!(qs[0].text, "Summarize this for me\n\nThe tenant shall pay rent monthly.");
    assert_eq!(qs[1].task, "legal drafting", "`clause` is a drafting cue");

    let only = sub_queries(decomposer().decompose(None, Some(&path)));
    assert_eq!(only, vec![Subquery::new(
        TaskKind::DocumentSummarization,
        format!("{}\n\nThe tenant shall pay rent monthly.", DEFAULT_SUMMARY_INSTRUCTION)
    )]);
}

#[test]
fn failures_are_errors_not_panics() {
    let d = decomposer();
    assert_eq!(d.decompose(None, None), DecomposedIntent::error(EMPTY_INPUT));
    assert_eq!(d.decompose(Some("   "), None), DecomposedIntent::error(EMPTY_INPUT));
    assert_eq!(d.decompose(Some("?!."), None), DecomposedIntent::error(NOTHING_CLASSIFIABLE));

    let tmp = TempDir::new().unwrap();
    let image = tmp.path().join("scan.png");
    fs::write(&image, [0u8; 4]).unwrap();
    match d.decompose(Some("what does this say"), Some(&image)) {
        DecomposedIntent::Error(e) => assert!(e.contains("scan.png")),
        other => panic!("expected an error, got {:?}", other),
    }
}

#[test]
fn every_label_is_routable_and_wire_shape_is_stable() {
    let qs = sub_queries(decomposer().decompose(Some("Show me the precedent. Write a petition. What is bail?"), None));
    assert!(qs.iter().all(|q| q.task.parse::<TaskKind>().is_ok()));

    let json: serde_json::Value = serde_json::to_value(DecomposedIntent::SubQueries(qs)).unwrap();
    assert_eq!(json["sub_queries"][0]["task"], "case discovery");
    assert_eq!(json["sub_queries"][1]["text"], "Write a petition");
}
