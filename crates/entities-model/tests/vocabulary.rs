#![allow(missing_docs)]

use entities_model::{Vocabularies, Vocabulary, VocabularyField};

fn referral_vocabulary() -> Vocabulary {
    Vocabulary::new()
        .with_term("direct", "accepts referrals directly from members of the public")
        .with_term("secondary", "accepts referrals from any doctor")
        .with_term("tertiary", "accepts referrals from other sleep specialists")
}

#[test]
fn test_vocabulary_membership_is_exact() {
    let vocabulary = referral_vocabulary();

    assert!(vocabulary.is_valid("direct"));
    assert!(vocabulary.is_valid("tertiary"));

    // No case folding or synonyms
    assert!(!vocabulary.is_valid("Direct"));
    assert!(!vocabulary.is_valid("primary"));
    assert!(!vocabulary.is_valid(""));
}

#[test]
fn test_vocabularies_deserialize_from_document() {
    let json = r#"{
        "specialist_type": {"physician": "a medical doctor"},
        "referral_types": {"direct": "self referral"},
        "procedure_type": {"researched": "read the website"}
    }"#;
    let vocabularies: Vocabularies = serde_json::from_str(json).expect("parse vocabularies");

    assert!(vocabularies.is_valid(VocabularyField::SpecialistType, "physician"));
    assert!(vocabularies.is_valid(VocabularyField::ReferralType, "direct"));
    assert!(vocabularies.is_valid(VocabularyField::ProcedureType, "researched"));
    assert!(!vocabularies.is_valid(VocabularyField::ProcedureType, "confirmed"));
    assert_eq!(
        vocabularies.referral_types.description("direct"),
        Some("self referral")
    );
}

#[test]
fn test_vocabularies_accept_legacy_field_names() {
    let json = r#"{
        "specialist type": {"researcher": "an academic"},
        "referral type": {"secondary": "via a doctor"}
    }"#;
    let vocabularies: Vocabularies = serde_json::from_str(json).expect("parse vocabularies");

    assert!(vocabularies.is_valid(VocabularyField::SpecialistType, "researcher"));
    assert!(vocabularies.is_valid(VocabularyField::ReferralType, "secondary"));
    assert!(vocabularies.procedure_type.is_empty());
}

#[test]
fn test_vocabularies_serialize_canonical_field_names() {
    let mut vocabularies = Vocabularies::default();
    vocabularies.referral_types = referral_vocabulary();

    let json = serde_json::to_value(&vocabularies).expect("serialize vocabularies");

    assert_eq!(json["referral_types"].as_object().map(|m| m.len()), Some(3));
    assert!(json["specialist_type"].as_object().is_some_and(|m| m.is_empty()));
}
