//! Controlled vocabularies for enumerated record fields.
//!
//! A vocabulary is a closed set of permitted values, each with a short
//! description shown by the display layer. The vocabulary document maps a
//! field name to its vocabulary:
//!
//! ```text
//! {
//!   "specialist_type": { "physician": "a medical doctor ...", ... },
//!   "referral_types":  { "direct": "...", "secondary": "...", ... },
//!   "procedure_type":  { "researched": "...", "confirmed": "..." }
//! }
//! ```
//!
//! Unlike clinical codelists there is no extensibility and no synonym
//! table: a value either appears verbatim or it is invalid.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Enumerated record field checked against a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VocabularyField {
    SpecialistType,
    ReferralType,
    ProcedureType,
}

impl VocabularyField {
    pub const ALL: [VocabularyField; 3] = [
        VocabularyField::SpecialistType,
        VocabularyField::ReferralType,
        VocabularyField::ProcedureType,
    ];

    /// Record key holding this field (after key normalization).
    pub fn record_key(self) -> &'static str {
        match self {
            VocabularyField::SpecialistType => "specialist_type",
            VocabularyField::ReferralType => "referral_types",
            VocabularyField::ProcedureType => "procedure_type",
        }
    }

    /// Human-readable label used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            VocabularyField::SpecialistType => "specialist type",
            VocabularyField::ReferralType => "referral type",
            VocabularyField::ProcedureType => "procedure type",
        }
    }
}

impl fmt::Display for VocabularyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Permitted values of one field, keyed by value, with descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    terms: BTreeMap<String, String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style term insertion.
    #[must_use]
    pub fn with_term(mut self, value: impl Into<String>, description: impl Into<String>) -> Self {
        self.add_term(value, description);
        self
    }

    pub fn add_term(&mut self, value: impl Into<String>, description: impl Into<String>) {
        self.terms.insert(value.into(), description.into());
    }

    /// Exact, case-sensitive membership test.
    pub fn is_valid(&self, value: &str) -> bool {
        self.terms.contains_key(value)
    }

    pub fn description(&self, value: &str) -> Option<&str> {
        self.terms.get(value).map(String::as_str)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// The full set of vocabularies, serialized verbatim into the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabularies {
    #[serde(default, alias = "specialist type")]
    pub specialist_type: Vocabulary,
    #[serde(default, alias = "referral_type", alias = "referral type")]
    pub referral_types: Vocabulary,
    #[serde(default, alias = "procedure type")]
    pub procedure_type: Vocabulary,
}

impl Vocabularies {
    pub fn get(&self, field: VocabularyField) -> &Vocabulary {
        match field {
            VocabularyField::SpecialistType => &self.specialist_type,
            VocabularyField::ReferralType => &self.referral_types,
            VocabularyField::ProcedureType => &self.procedure_type,
        }
    }

    pub fn is_valid(&self, field: VocabularyField, value: &str) -> bool {
        self.get(field).is_valid(value)
    }
}
