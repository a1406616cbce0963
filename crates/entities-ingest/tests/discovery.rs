//! Tests for entity tree discovery and loading.

use std::fs;
use std::path::Path;

use entities_ingest::{
    IngestError, discover_entity_files, load_combined_document, load_entity_tree,
    load_vocabularies, load_vocabulary_document,
};
use entities_model::{SourceKind, VocabularyField};

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, contents).expect("write file");
}

#[test]
fn discovers_records_by_kind_and_skips_other_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    write(root, "valid_values.json", "{}");
    write(root, "specialist/uk/b.json", r#"{"name": "B"}"#);
    write(root, "specialist/a.yaml", "name: A\n");
    write(root, "specialists/c.json", r#"{"name": "C"}"#);
    write(root, "software/tool.yml", "name: Tool\n");
    write(root, "software/notes.txt", "not a record");
    write(root, "software/.draft.json", r#"{"name": "Draft"}"#);
    write(root, "drafts/x.json", r#"{"name": "X"}"#);

    let discovered = discover_entity_files(root).expect("discover");

    let specialists = discovered.get(&SourceKind::Specialist).expect("specialists");
    assert_eq!(specialists.len(), 3);
    let software = discovered.get(&SourceKind::Software).expect("software");
    assert_eq!(software.len(), 1);
    assert!(software[0].ends_with("software/tool.yml"));
}

#[test]
fn loads_one_record_per_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    write(root, "specialist/a.json", r#"{"Name": "A Clinic"}"#);
    write(root, "specialist/b.json", r#"{"Name": "B Clinic"}"#);
    write(root, "software/tool.yaml", "Name: Tool\n");

    let set = load_entity_tree(root).expect("load tree");

    assert_eq!(set.len(), 3);
    let specialists = set.get(SourceKind::Specialist);
    assert_eq!(specialists.len(), 2);
    assert_eq!(specialists[0].value["Name"], "A Clinic");
    assert_eq!(specialists[0].position, None);
    assert_eq!(set.get(SourceKind::Software)[0].value["Name"], "Tool");
}

#[test]
fn unparseable_file_is_fatal_and_named() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    write(root, "specialist/good.json", r#"{"name": "Good"}"#);
    write(root, "specialist/bad.json", "{\"name\": ");

    let error = load_entity_tree(root).expect_err("should fail");

    assert!(matches!(error, IngestError::Parse { .. }));
    assert!(error.to_string().contains("bad.json"));
}

#[test]
fn non_mapping_record_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    write(root, "software/list.json", "[1, 2]");

    let error = load_entity_tree(root).expect_err("should fail");

    assert!(matches!(error, IngestError::NotARecord { .. }));
}

#[test]
fn missing_directory_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = discover_entity_files(&dir.path().join("missing")).expect_err("should fail");
    assert!(matches!(error, IngestError::DirectoryNotFound { .. }));
}

#[test]
fn combined_document_infers_kind_from_stem() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("specialists.yaml");
    fs::write(
        &path,
        "- name: First Clinic\n- name: Second Clinic\n  referral types: direct\n",
    )
    .expect("write combined");

    let (kind, records) = load_combined_document(&path, None).expect("load combined");

    assert_eq!(kind, SourceKind::Specialist);
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].position, Some(1));
    assert_eq!(records[1].value["referral types"], "direct");
    assert!(records[1].origin().ends_with("specialists.yaml#1"));
}

#[test]
fn combined_document_must_be_a_sequence() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("software.json");
    fs::write(&path, r#"{"name": "not a list"}"#).expect("write combined");

    let error = load_combined_document(&path, None).expect_err("should fail");
    assert!(matches!(error, IngestError::NotASequence { .. }));

    let unknown = dir.path().join("gadgets.json");
    fs::write(&unknown, "[]").expect("write combined");
    let error = load_combined_document(&unknown, None).expect_err("should fail");
    assert!(matches!(error, IngestError::UnknownKind { .. }));

    let (kind, records) =
        load_combined_document(&unknown, Some(SourceKind::Software)).expect("explicit kind");
    assert_eq!(kind, SourceKind::Software);
    assert!(records.is_empty());
}

#[test]
fn loads_vocabulary_document() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("valid_values.json");
    fs::write(
        &path,
        r#"{
            "specialist_type": {"physician": "a medical doctor"},
            "referral_types": {"direct": "self referral", "secondary": "via a doctor"},
            "procedure_type": {"researched": "read the website"}
        }"#,
    )
    .expect("write vocabulary");

    let vocabularies = load_vocabularies(&path).expect("load vocabularies");

    assert_eq!(vocabularies.referral_types.len(), 2);
    assert!(vocabularies.is_valid(VocabularyField::SpecialistType, "physician"));
}

#[test]
fn vocabulary_document_keeps_every_table_in_authored_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("valid_values.json");
    fs::write(
        &path,
        r#"{
            "specialist_type": {"researcher": "r", "physician": "p"},
            "referral_types": {},
            "procedure_type": {},
            "outcome": {"cured": "c"}
        }"#,
    )
    .expect("write vocabulary");

    let loaded = load_vocabulary_document(&path).expect("load vocabulary");

    let tables: Vec<&str> = loaded
        .document
        .as_object()
        .expect("mapping")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        tables,
        vec!["specialist_type", "referral_types", "procedure_type", "outcome"]
    );
    let terms: Vec<&str> = loaded.document["specialist_type"]
        .as_object()
        .expect("mapping")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(terms, vec!["researcher", "physician"]);
    assert_eq!(loaded.document["outcome"]["cured"], "c");
    assert!(
        loaded
            .vocabularies
            .is_valid(VocabularyField::SpecialistType, "physician")
    );
}
