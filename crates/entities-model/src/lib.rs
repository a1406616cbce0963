pub mod encoded;
pub mod error;
pub mod source;
pub mod vocabulary;

pub use encoded::EncodedValue;
pub use error::{ModelError, Result};
pub use source::SourceKind;
pub use vocabulary::{Vocabularies, Vocabulary, VocabularyField};

/// Format identifier written at the top of every output document.
pub const OUTPUT_FORMAT: &str = "https://sleepdiary.github.io/resources/entities#version-002";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_accepts_plural_stems() {
        assert_eq!(SourceKind::from_stem("specialists"), Some(SourceKind::Specialist));
        assert_eq!(SourceKind::from_stem("Software"), Some(SourceKind::Software));
        assert_eq!(SourceKind::from_stem("clinics"), None);
        assert!("widgets".parse::<SourceKind>().is_err());
    }

    #[test]
    fn encoded_value_serializes_as_key_value_pair() {
        let encoded = EncodedValue::new("0021", "3 weeks");
        let json = serde_json::to_value(&encoded).expect("serialize encoded value");
        assert_eq!(json, serde_json::json!({"key": "0021", "value": "3 weeks"}));
    }
}
