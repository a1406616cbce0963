//! Entity source kinds.
//!
//! Every record belongs to exactly one kind, and the output document holds
//! one record list per kind. The kind also decides which enrichment rules
//! apply: only specialists carry locations and vocabulary-checked fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Kind of entity a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A specialist clinic or practitioner.
    Specialist,
    /// A software tool.
    Software,
}

impl SourceKind {
    /// All kinds, in output order.
    pub const ALL: [SourceKind; 2] = [SourceKind::Specialist, SourceKind::Software];

    /// Key used for this kind in the output document and entity tree.
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Specialist => "specialist",
            SourceKind::Software => "software",
        }
    }

    /// Matches a directory or file stem, accepting the plural spelling.
    pub fn from_stem(stem: &str) -> Option<Self> {
        match stem.trim().to_ascii_lowercase().as_str() {
            "specialist" | "specialists" => Some(SourceKind::Specialist),
            "software" | "softwares" => Some(SourceKind::Software),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_stem(s).ok_or_else(|| ModelError::UnknownSourceKind(s.to_string()))
    }
}
