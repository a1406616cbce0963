//! Per-record validation and enrichment.

use serde_json::{Map, Value};
use tracing::debug;

use entities_model::{EncodedValue, SourceKind};
use entities_normalize::{KeyCollision, derive_sort_key, encode_date, key_collisions, normalize_keys};

use crate::context::EnrichContext;
use crate::documents::enrich_documents;
use crate::error::{Problems, RecordError};
use crate::specialist::{enrich_specialist, prune_locations};
use crate::value::{encoded, prune_falsy, type_name};

/// Record-level contact fields removed when falsy.
pub const RECORD_OPTIONAL_FIELDS: [&str; 9] = [
    "registration_tel",
    "registration_fax",
    "registration_url",
    "registration_other",
    "booking_tel",
    "booking_fax",
    "booking_url",
    "booking_other",
    "outcome_other",
];

/// Normalizes the keys of an authored record, then enriches it.
///
/// Keys that collide after normalization are reported as problems of the
/// record instead of being resolved silently.
pub fn compile_record(
    raw: Value,
    index: usize,
    ctx: &EnrichContext<'_>,
) -> Result<Value, RecordError> {
    let mut problems = Problems::default();
    problems.extend(key_collisions(&raw).iter().map(collision_message));
    enrich_with(normalize_keys(raw), index, ctx, problems)
}

/// Enriches a record whose keys are already normalized.
pub fn enrich_record(
    record: Value,
    index: usize,
    ctx: &EnrichContext<'_>,
) -> Result<Value, RecordError> {
    enrich_with(record, index, ctx, Problems::default())
}

fn collision_message(collision: &KeyCollision) -> String {
    let originals = collision
        .originals
        .iter()
        .map(|key| format!("'{key}'"))
        .collect::<Vec<_>>()
        .join(", ");
    if collision.path.is_empty() {
        format!("keys {originals} all normalize to '{}'", collision.key)
    } else {
        format!(
            "keys {originals} in {} all normalize to '{}'",
            collision.path, collision.key
        )
    }
}

fn enrich_with(
    record: Value,
    index: usize,
    ctx: &EnrichContext<'_>,
    mut problems: Problems,
) -> Result<Value, RecordError> {
    let mut record = match record {
        Value::Object(record) => record,
        other => {
            problems.push(format!("record must be a mapping, found {}", type_name(&other)));
            return Err(RecordError::new(
                ctx.kind,
                index,
                problems.into_messages(),
                &other,
            ));
        }
    };

    let name = record_name(&record, &mut problems);
    record.insert(
        "name".to_string(),
        encoded(EncodedValue::new(derive_sort_key(&name), name.clone())),
    );
    encode_last_updated(&mut record, &mut problems);

    if ctx.kind == SourceKind::Specialist {
        enrich_specialist(&mut record, &name, ctx.vocabularies, &mut problems);
    }

    if let Err(error) = enrich_documents(&mut record, &name, ctx.thumbnails, &mut problems) {
        problems.push(error.to_string());
        return Err(RecordError::new(
            ctx.kind,
            index,
            problems.into_messages(),
            &Value::Object(record),
        ));
    }

    prune_falsy(&mut record, &RECORD_OPTIONAL_FIELDS);
    prune_locations(&mut record);

    let record = Value::Object(record);
    if problems.is_empty() {
        debug!(kind = %ctx.kind, index, name = %name, "record enriched");
        Ok(record)
    } else {
        Err(RecordError::new(
            ctx.kind,
            index,
            problems.into_messages(),
            &record,
        ))
    }
}

fn record_name(record: &Map<String, Value>, problems: &mut Problems) -> String {
    match record.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            problems.push("missing name");
            String::new()
        }
        Some(other) => {
            problems.push(format!("name must be a string, found {}", type_name(other)));
            String::new()
        }
    }
}

fn encode_last_updated(record: &mut Map<String, Value>, problems: &mut Problems) {
    let Some(last_updated) = record.get("last_updated").cloned() else {
        return;
    };
    match last_updated {
        Value::Null => {
            record.shift_remove("last_updated");
        }
        Value::String(text) => match encode_date(&text) {
            Ok(date) => {
                record.insert("last_updated".to_string(), encoded(date));
            }
            Err(error) => problems.push(format!("last updated: {error}")),
        },
        other => problems.push(format!(
            "last updated must be a date, found {}",
            type_name(&other)
        )),
    }
}
