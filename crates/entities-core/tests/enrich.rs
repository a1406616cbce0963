use serde_json::{Value, json};

use entities_core::{EnrichContext, RecordError, compile_record, enrich_record};
use entities_model::{SourceKind, Vocabularies, Vocabulary};
use entities_thumbs::{DiscardThumbnails, RecordingSink, THUMBNAIL_WIDTH};

fn vocabularies() -> Vocabularies {
    Vocabularies {
        specialist_type: Vocabulary::new().with_term("sleep", "Sleep clinic"),
        referral_types: Vocabulary::new()
            .with_term("nhs", "NHS referral")
            .with_term("private", "Private referral"),
        procedure_type: Vocabulary::new().with_term("inpatient", "Overnight stay"),
    }
}

fn enrich(kind: SourceKind, record: Value) -> Result<Value, RecordError> {
    let vocabularies = vocabularies();
    let ctx = EnrichContext::new(kind, &vocabularies, &DiscardThumbnails);
    enrich_record(record, 0, &ctx)
}

fn specialist(locations: Value) -> Value {
    json!({
        "name": "The Sleep Clinic",
        "specialist_type": "sleep",
        "procedure_type": "inpatient",
        "locations": locations,
    })
}

#[test]
fn pushes_record_referral_types_down_to_locations() {
    let mut record = specialist(json!([
        {"address": "1 High St  \n", "name": "North", "gps": "51.5, -0.1", "tel": ""},
        {"address": "2 Low St", "referral_types": ["private"]},
    ]));
    record["referral_types"] = json!("nhs");

    let enriched = enrich(SourceKind::Specialist, record).expect("valid record");

    assert_eq!(enriched["name"], json!({"key": "sleep clinic", "value": "The Sleep Clinic"}));
    assert_eq!(enriched["referral_types"], json!(["nhs"]));
    assert_eq!(
        enriched["locations"][0],
        json!({
            "address": "1 High St",
            "name": "North",
            "display_name": "Sleep Clinic: North",
            "short_name": "North",
            "has_name": true,
            "gps": ["51.5", "-0.1"],
            "map_url": "https://maps.google.com/maps/@51.5,-0.1,19z",
            "referral_types": ["nhs"],
        })
    );
    assert_eq!(
        enriched["locations"][1],
        json!({
            "address": "2 Low St",
            "display_name": "Sleep Clinic",
            "short_name": "Sleep Clinic",
            "has_name": false,
            "referral_types": ["private"],
        })
    );
}

#[test]
fn unions_location_referral_types_in_first_seen_order() {
    let record = specialist(json!([
        {"address": "a", "referral_types": ["private", "nhs"]},
        {"address": "b", "referral_types": "nhs"},
    ]));

    let enriched = enrich(SourceKind::Specialist, record).expect("valid record");

    assert_eq!(enriched["referral_types"], json!(["private", "nhs"]));
    assert_eq!(enriched["locations"][1]["referral_types"], json!(["nhs"]));
}

#[test]
fn location_without_referral_types_is_an_error_in_union_mode() {
    let record = specialist(json!([
        {"address": "a", "referral_types": ["nhs"]},
        {"address": "b "},
    ]));

    let error = enrich(SourceKind::Specialist, record).expect_err("missing referral types");

    assert_eq!(error.kind, SourceKind::Specialist);
    assert_eq!(error.messages, vec!["missing referral_types for location 1 (b)"]);
    assert!(error.dump.contains("\"sleep clinic\""));
}

#[test]
fn reports_every_unknown_vocabulary_term() {
    let record = json!({
        "name": "Clinic",
        "specialist_type": "dentist",
        "referral_types": ["nhs", "walk-in"],
        "locations": [{"address": "a", "referral_types": "self"}],
    });

    let error = enrich(SourceKind::Specialist, record).expect_err("invalid terms");

    assert_eq!(
        error.messages,
        vec![
            "unknown specialist type 'dentist'",
            "unknown referral type 'self'",
            "unknown referral type 'walk-in'",
            "missing procedure type",
        ]
    );
}

#[test]
fn unnamed_form_among_several_is_an_error() {
    let record = json!({
        "name": "Sleep Tool",
        "forms": [
            {"name": "Daily", "gallery": []},
            {"gallery": []},
        ],
    });

    let error = enrich(SourceKind::Software, record).expect_err("ambiguous forms");

    assert_eq!(
        error.messages,
        vec!["please provide names for all forms in Sleep Tool"]
    );
}

#[test]
fn one_unnamed_form_and_one_unnamed_report_are_fine() {
    let record = json!({
        "name": "Sleep Tool",
        "forms": [{"gallery": []}],
        "reports": [{"gallery": []}],
    });

    let enriched = enrich(SourceKind::Software, record).expect("valid record");

    assert_eq!(enriched["forms"][0]["doc_type"], "form");
    assert_eq!(enriched["reports"][0]["doc_type"], "report");
    assert_eq!(enriched["reports"][0]["start_page"], 1);
    assert_eq!(enriched["reports"][0]["has_name"], false);
}

#[test]
fn encodes_calendar_layout_fields() {
    let record = json!({
        "name": "Sleep Tool",
        "forms": [{
            "layout": "calendar",
            "page_duration": "2 weeks",
            "start_time": "noon",
            "gallery": [],
        }],
    });

    let enriched = enrich(SourceKind::Software, record).expect("valid record");

    let form = &enriched["forms"][0];
    assert_eq!(form["page_duration"], json!({"key": "0014", "value": "2 weeks"}));
    assert_eq!(form["start_time"], json!({"key": "12", "value": "noon"}));
}

#[test]
fn calendar_codec_failure_stops_the_record() {
    let record = json!({
        "name": "Sleep Tool",
        "forms": [
            {
                "name": "Weekly",
                "layout": "calendar",
                "page_duration": "fortnight",
                "start_time": "9am",
                "gallery": [],
            },
            {"name": "Daily", "gallery": []},
        ],
    });

    let error = enrich(SourceKind::Software, record).expect_err("bad duration");

    assert_eq!(
        error.messages,
        vec!["could not convert 'fortnight' to duration"]
    );
}

#[test]
fn gallery_images_get_urls_names_and_thumbnails() {
    let vocabularies = vocabularies();
    let sink = RecordingSink::new();
    let ctx = EnrichContext::new(SourceKind::Software, &vocabularies, &sink);
    let record = json!({
        "name": "The Tool",
        "forms": [{
            "start_page": 3,
            "gallery": [
                {
                    "url": "/resources/forms/My Diary.pdf",
                    "thumb": "/resources/thumbs/forms/my-diary.png",
                    "name": "The Week view",
                },
                {
                    "url": "https://example.com/diary.pdf#page=1",
                    "thumb": "/resources/thumbs/forms/my-diary.png",
                },
            ],
        }],
    });

    let enriched = enrich_record(record, 0, &ctx).expect("valid record");

    let form = &enriched["forms"][0];
    assert_eq!(form["display_name"], "Tool,\npage 3");
    assert_eq!(form["short_name"], "Tool");
    assert_eq!(form["url"], "/resources/forms/My%20Diary.pdf#page=3");
    assert_eq!(form["thumb"], "/resources/thumbs/forms/my-diary.png");
    assert_eq!(
        form["gallery"][0],
        json!({
            "url": "/resources/forms/My%20Diary.pdf#page=3",
            "thumb": "/resources/thumbs/forms/my-diary.png",
            "display_name": "The Week view",
            "short_name": "Week view",
            "has_name": true,
        })
    );
    assert_eq!(form["gallery"][1]["url"], "https://example.com/diary.pdf#page=1");
    assert_eq!(form["gallery"][1]["display_name"], "Tool,\npage 3");
    assert_eq!(form["gallery"][1]["has_name"], false);

    let requests = sink.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].reference, "/resources/thumbs/forms/my-diary.png");
    assert_eq!(requests[0].source_url, "https://example.com/diary.pdf#page=1");
    assert_eq!(requests[0].page, 3);
    assert_eq!(requests[0].width, THUMBNAIL_WIDTH);
}

#[test]
fn image_names_are_prefixed_when_the_record_has_several_galleries() {
    let record = json!({
        "name": "Tool",
        "forms": [{"name": "Diary", "gallery": [{"url": "/resources/a.pdf", "name": "Front"}]}],
        "reports": [{"name": "Summary", "gallery": []}],
    });

    let enriched = enrich(SourceKind::Software, record).expect("valid record");

    let image = &enriched["forms"][0]["gallery"][0];
    assert_eq!(image["display_name"], "Diary: Front");
    assert_eq!(image["short_name"], "Front");
    assert_eq!(enriched["forms"][0]["display_name"], "Tool: Diary");
}

#[test]
fn form_thumbnail_is_requested_with_form_url() {
    let vocabularies = vocabularies();
    let sink = RecordingSink::new();
    let ctx = EnrichContext::new(SourceKind::Software, &vocabularies, &sink);
    let record = json!({
        "name": "Tool",
        "forms": [{
            "url": "/resources/forms/tool.pdf",
            "thumb": "/resources/thumbs/forms/tool.png",
            "gallery": [],
        }],
    });

    enrich_record(record, 0, &ctx).expect("valid record");

    let requests = sink.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].source_url, "/resources/forms/tool.pdf");
    assert_eq!(requests[0].page, 1);
}

#[test]
fn prunes_empty_optional_fields() {
    let record = json!({
        "name": "Tool",
        "registration_tel": "",
        "registration_url": null,
        "booking_url": "https://example.com/book",
        "outcome_other": "",
        "notes": "",
    });

    let enriched = enrich(SourceKind::Software, record).expect("valid record");

    let fields = enriched.as_object().expect("mapping");
    assert!(!fields.contains_key("registration_tel"));
    assert!(!fields.contains_key("registration_url"));
    assert!(!fields.contains_key("outcome_other"));
    assert_eq!(fields["booking_url"], "https://example.com/book");
    assert_eq!(fields["notes"], "");
}

#[test]
fn encodes_last_updated() {
    let record = json!({"name": "Tool", "last_updated": "2021-03-04"});

    let enriched = enrich(SourceKind::Software, record).expect("valid record");

    assert_eq!(
        enriched["last_updated"],
        json!({"key": "001614816000000", "value": "2021-03-04"})
    );
}

#[test]
fn malformed_last_updated_is_an_error() {
    let record = json!({"name": "Tool", "last_updated": "last tuesday"});

    let error = enrich(SourceKind::Software, record).expect_err("bad date");

    assert_eq!(
        error.messages,
        vec!["last updated: could not convert 'last tuesday' to date"]
    );
}

#[test]
fn colliding_keys_are_reported() {
    let vocabularies = vocabularies();
    let ctx = EnrichContext::new(SourceKind::Software, &vocabularies, &DiscardThumbnails);
    let raw = json!({"Name": "Tool", "name": "Other", "Booking URL": "x"});

    let error = compile_record(raw, 4, &ctx).expect_err("collision");

    assert_eq!(error.index, 4);
    assert_eq!(error.messages, vec!["keys 'Name', 'name' all normalize to 'name'"]);
}

#[test]
fn compile_record_normalizes_keys_first() {
    let vocabularies = vocabularies();
    let ctx = EnrichContext::new(SourceKind::Software, &vocabularies, &DiscardThumbnails);
    let raw = json!({"Name": "Tool", "Booking URL": "https://example.com", "Registration-Tel": ""});

    let enriched = compile_record(raw, 0, &ctx).expect("valid record");

    assert_eq!(enriched["booking_url"], "https://example.com");
    assert!(enriched.get("registrationtel").is_some());
}

#[test]
fn record_error_display_names_kind_index_and_origin() {
    let error = enrich(SourceKind::Software, json!({"forms": []}))
        .expect_err("missing name")
        .with_origin("software.yaml#2");

    assert_eq!(
        error.to_string(),
        "software entry 0 (software.yaml#2): missing name"
    );
}
