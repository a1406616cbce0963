//! Pure normalization helpers shared by the enrichment pipeline.

pub mod codec;
pub mod keys;
pub mod sort_key;

pub use codec::{
    FormatError, duration_days, encode_date, encode_duration, encode_time, encode_time_value,
};
pub use keys::{KeyCollision, key_collisions, normalize_key, normalize_keys};
pub use sort_key::{compare_sort_keys, derive_sort_key, strip_leading_article};
