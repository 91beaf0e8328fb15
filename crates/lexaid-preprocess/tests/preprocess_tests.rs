use std::fs;
use tempfile::TempDir;

use lexaid_core::traits::AttachmentPreprocessor;
use lexaid_core::types::Provenance;
use lexaid_preprocess::{file_kind, FileKind, FilePreprocessor};

#[test]
fn uploaded_text_file_is_read_verbatim() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("lease.txt");
    fs::write(&path, "The lease term is twelve months.").unwrap();

    let text = FilePreprocessor::new().extract_text(&path, Provenance::Uploaded).unwrap();
    assert_eq!(text, "The lease term is twelve months.");
}

#[test]
fn uploaded_images_and_unknown_types_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let image = tmp.path().join("scan.PNG");
    fs::write(&image, [0x89u8, b'P', b'N', b'G']).unwrap();
    let other = tmp.path().join("data.xyz");
    fs::write(&other, "whatever").unwrap();

    let pre = FilePreprocessor::new();
    let err = pre.extract_text(&image, Provenance::Uploaded).unwrap_err();
    assert!(err.to_string().contains("OCR"));
    assert!(pre.extract_text(&other, Provenance::Uploaded).is_err());
}

#[test]
fn corpus_files_of_any_kind_fall_back_to_lossy_text() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("judgment");
    fs::write(&path, [b'h', b'e', b'l', b'd', 0xff]).unwrap();

    let text = FilePreprocessor::new().extract_text(&path, Provenance::Corpus).unwrap();
    assert!(text.starts_with("held"));
}

#[test]
fn empty_uploads_and_missing_files_fail() {
    let tmp = TempDir::new().unwrap();
    let empty = tmp.path().join("empty.txt");
    fs::write(&empty, "   \n").unwrap();

    let pre = FilePreprocessor::new();
    assert!(pre.extract_text(&empty, Provenance::Uploaded).is_err());
    assert!(pre.extract_text(&tmp.path().join("missing.pdf"), Provenance::Uploaded).is_err());
}

#[test]
fn file_kinds_follow_extension_case_insensitively() {
    assert_eq!(file_kind("a.PDF".as_ref()), FileKind::Pdf);
    assert_eq!(file_kind("a.docx".as_ref()), FileKind::Docx);
    assert_eq!(file_kind("a.md".as_ref()), FileKind::Text);
    assert_eq!(file_kind("a.jpeg".as_ref()), FileKind::Image);
    assert_eq!(file_kind("a".as_ref()), FileKind::Other);
}
