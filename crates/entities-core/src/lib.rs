//! Validation and enrichment of entity records.
//!
//! [`compile_record`] turns one authored record into its output shape:
//! normalized keys, a sortable name key, vocabulary checks, referral-type
//! resolution, location and document display names, encoded calendar
//! fields, and pruned empty contact fields. Thumbnails the record refers to
//! are announced to an [`entities_thumbs::ThumbnailSink`] along the way.

pub mod context;
pub mod documents;
pub mod error;
pub mod output;
pub mod record;
pub mod sort;
pub mod specialist;
pub mod value;

pub use context::EnrichContext;
pub use documents::DocumentKind;
pub use error::RecordError;
pub use output::{OutputDocument, RecordList};
pub use record::{RECORD_OPTIONAL_FIELDS, compile_record, enrich_record};
pub use sort::{record_sort_key, sort_records};
pub use specialist::LOCATION_OPTIONAL_FIELDS;
pub use value::is_truthy;
