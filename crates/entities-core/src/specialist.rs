//! Checks and derived fields that only apply to specialist records.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use entities_model::{Vocabularies, VocabularyField};
use entities_normalize::strip_leading_article;

use crate::error::Problems;
use crate::value::{field_is_truthy, prune_falsy, truthy_str, type_name};

const REFERRAL_TYPES: &str = "referral_types";

/// Location contact fields removed when falsy.
pub const LOCATION_OPTIONAL_FIELDS: [&str; 5] = ["name", "gps", "tel", "fax", "url"];

/// Validates vocabulary fields, resolves referral types, and derives the
/// display fields of every location.
pub(crate) fn enrich_specialist(
    record: &mut Map<String, Value>,
    record_name: &str,
    vocabularies: &Vocabularies,
    problems: &mut Problems,
) {
    check_term(record, VocabularyField::SpecialistType, vocabularies, problems);

    let mut locations = take_locations(record, problems);
    resolve_referral_types(record, &mut locations, vocabularies, problems);
    check_term(record, VocabularyField::ProcedureType, vocabularies, problems);

    for (index, location) in locations.iter_mut().flatten().enumerate() {
        match location.as_object_mut() {
            Some(location) => enrich_location(location, index, record_name, problems),
            None => problems.push(format!("location {index} is not a mapping")),
        }
    }
    if let Some(locations) = locations {
        record.insert("locations".to_string(), Value::Array(locations));
    }
}

/// Removes falsy contact fields from every location of the record.
pub(crate) fn prune_locations(record: &mut Map<String, Value>) {
    let Some(Value::Array(locations)) = record.get_mut("locations") else {
        return;
    };
    for location in locations.iter_mut().filter_map(Value::as_object_mut) {
        prune_falsy(location, &LOCATION_OPTIONAL_FIELDS);
    }
}

fn check_term(
    record: &Map<String, Value>,
    field: VocabularyField,
    vocabularies: &Vocabularies,
    problems: &mut Problems,
) {
    match record.get(field.record_key()) {
        Some(Value::String(term)) if vocabularies.is_valid(field, term) => {}
        Some(Value::String(term)) => problems.push(format!("unknown {field} '{term}'")),
        Some(other) => problems.push(format!(
            "{field} must be a string, found {}",
            type_name(other)
        )),
        None => problems.push(format!("missing {field}")),
    }
}

fn take_locations(record: &mut Map<String, Value>, problems: &mut Problems) -> Option<Vec<Value>> {
    match record.shift_remove("locations") {
        Some(Value::Array(locations)) => Some(locations),
        Some(Value::Null) | None => None,
        Some(other) => {
            problems.push(format!(
                "locations must be a sequence, found {}",
                type_name(&other)
            ));
            record.insert("locations".to_string(), other);
            None
        }
    }
}

/// A single value stands for a one-element list.
fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        single => vec![single],
    }
}

/// Either pushes the record's referral types down to locations without
/// their own, or builds the record's list as the first-seen union of the
/// location lists. Every resulting type is then checked.
fn resolve_referral_types(
    record: &mut Map<String, Value>,
    locations: &mut Option<Vec<Value>>,
    vocabularies: &Vocabularies,
    problems: &mut Problems,
) {
    let locations = locations.as_deref_mut().unwrap_or_default();
    let mut checked = Vec::new();

    let record_types = if let Some(shared) = record.shift_remove(REFERRAL_TYPES) {
        let shared = into_list(shared);
        for location in locations.iter_mut().filter_map(Value::as_object_mut) {
            if field_is_truthy(location, REFERRAL_TYPES) {
                let own = location
                    .shift_remove(REFERRAL_TYPES)
                    .map(into_list)
                    .unwrap_or_default();
                checked.extend(own.iter().cloned());
                location.insert(REFERRAL_TYPES.to_string(), Value::Array(own));
            } else {
                location.insert(REFERRAL_TYPES.to_string(), Value::Array(shared.clone()));
            }
        }
        shared
    } else {
        let mut union: Vec<Value> = Vec::new();
        for (index, location) in locations.iter_mut().enumerate() {
            let Some(location) = location.as_object_mut() else {
                continue;
            };
            if !field_is_truthy(location, REFERRAL_TYPES) {
                problems.push(format!(
                    "missing referral_types for {}",
                    location_label(location, index)
                ));
                continue;
            }
            let own = location
                .shift_remove(REFERRAL_TYPES)
                .map(into_list)
                .unwrap_or_default();
            for referral_type in &own {
                if !union.contains(referral_type) {
                    union.push(referral_type.clone());
                }
            }
            location.insert(REFERRAL_TYPES.to_string(), Value::Array(own));
        }
        union
    };
    checked.extend(record_types.iter().cloned());
    record.insert(REFERRAL_TYPES.to_string(), Value::Array(record_types));

    let mut reported = BTreeSet::new();
    for referral_type in &checked {
        let message = match referral_type.as_str() {
            Some(term) if vocabularies.is_valid(VocabularyField::ReferralType, term) => continue,
            Some(term) => format!("unknown referral type '{term}'"),
            None => format!(
                "referral type must be a string, found {}",
                type_name(referral_type)
            ),
        };
        if reported.insert(message.clone()) {
            problems.push(message);
        }
    }
}

fn location_label(location: &Map<String, Value>, index: usize) -> String {
    match truthy_str(location, "address") {
        Some(address) => format!("location {index} ({})", address.trim_end()),
        None => format!("location {index}"),
    }
}

fn enrich_location(
    location: &mut Map<String, Value>,
    index: usize,
    record_name: &str,
    problems: &mut Problems,
) {
    match location.get("address") {
        Some(Value::String(address)) => {
            let trimmed = address.trim_end().to_string();
            location.insert("address".to_string(), Value::String(trimmed));
        }
        _ => problems.push(format!("location {index} has no address")),
    }

    let name = truthy_str(location, "name").map(str::to_string);
    let (display_name, short_name) = match &name {
        Some(name) => (format!("{record_name}: {name}"), name.clone()),
        None => (record_name.to_string(), record_name.to_string()),
    };
    location.insert(
        "display_name".to_string(),
        Value::String(strip_leading_article(&display_name)),
    );
    location.insert(
        "short_name".to_string(),
        Value::String(strip_leading_article(&short_name)),
    );
    location.insert("has_name".to_string(), Value::Bool(name.is_some()));

    if !field_is_truthy(location, "gps") {
        return;
    }
    match location.get("gps") {
        Some(Value::String(gps)) => match parse_gps(gps) {
            Some((map_url, components)) => {
                location.insert("map_url".to_string(), Value::String(map_url));
                location.insert("gps".to_string(), components);
            }
            None => problems.push(format!(
                "location {index} has malformed gps '{gps}', expected 'lat, lon'"
            )),
        },
        Some(other) => problems.push(format!(
            "location {index} gps must be a string, found {}",
            type_name(other)
        )),
        None => {}
    }
}

/// `"51.5, -0.12"` to a map link and its `[lat, lon]` components.
fn parse_gps(gps: &str) -> Option<(String, Value)> {
    let components: Vec<&str> = gps.split(',').map(str::trim).collect();
    if components.len() != 2 || components.iter().any(|part| part.is_empty()) {
        return None;
    }
    let compact: String = gps.chars().filter(|ch| !ch.is_whitespace()).collect();
    let map_url = format!("https://maps.google.com/maps/@{compact},19z");
    let components = components
        .into_iter()
        .map(|part| Value::String(part.to_string()))
        .collect();
    Some((map_url, Value::Array(components)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gps_becomes_map_link_and_pair() {
        let (url, pair) = parse_gps(" 51.5074 , -0.1278 ").expect("valid gps");
        assert_eq!(url, "https://maps.google.com/maps/@51.5074,-0.1278,19z");
        assert_eq!(pair, serde_json::json!(["51.5074", "-0.1278"]));
        assert!(parse_gps("51.5074").is_none());
        assert!(parse_gps("1,2,3").is_none());
    }

    #[test]
    fn single_values_become_lists() {
        assert_eq!(into_list(Value::from("nhs")), vec![Value::from("nhs")]);
        assert_eq!(
            into_list(serde_json::json!(["a", "b"])),
            vec![Value::from("a"), Value::from("b")]
        );
    }
}
