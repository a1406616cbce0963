//! Forms, reports, and their page galleries.

use serde_json::{Map, Value};
use tracing::debug;

use entities_normalize::{FormatError, encode_duration, encode_time_value, strip_leading_article};
use entities_thumbs::{ThumbnailRequest, ThumbnailSink};

use crate::error::Problems;
use crate::value::{encoded, field_is_truthy, is_truthy, truthy_str, type_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Form,
    Report,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::Form, DocumentKind::Report];

    /// Record key holding documents of this kind.
    pub fn collection(self) -> &'static str {
        match self {
            DocumentKind::Form => "forms",
            DocumentKind::Report => "reports",
        }
    }

    /// Value written to each document's `doc_type`.
    pub fn doc_type(self) -> &'static str {
        match self {
            DocumentKind::Form => "form",
            DocumentKind::Report => "report",
        }
    }
}

/// Per-document facts derived from the owning record.
struct DocumentScope<'a> {
    record_name: &'a str,
    kind: DocumentKind,
    index: usize,
    /// Number of documents of the same kind in the record.
    siblings: usize,
    /// More than one form or report in the record overall.
    multiple_galleries: bool,
}

impl DocumentScope<'_> {
    fn label(&self) -> String {
        format!("{} {}", self.kind.doc_type(), self.index)
    }
}

/// Enriches every form and report of a record.
///
/// Validation problems are collected; a calendar field that cannot be
/// encoded stops enrichment of the record and is returned as the error.
pub(crate) fn enrich_documents(
    record: &mut Map<String, Value>,
    record_name: &str,
    thumbnails: &dyn ThumbnailSink,
    problems: &mut Problems,
) -> Result<(), FormatError> {
    let total: usize = DocumentKind::ALL
        .iter()
        .filter_map(|kind| record.get(kind.collection()).and_then(Value::as_array))
        .map(Vec::len)
        .sum();
    let multiple_galleries = total > 1;

    for kind in DocumentKind::ALL {
        let documents = match record.get_mut(kind.collection()) {
            None | Some(Value::Null) => continue,
            Some(Value::Array(documents)) => documents,
            Some(other) => {
                problems.push(format!(
                    "{} must be a sequence, found {}",
                    kind.collection(),
                    type_name(other)
                ));
                continue;
            }
        };
        let siblings = documents.len();
        for (index, document) in documents.iter_mut().enumerate() {
            let scope = DocumentScope {
                record_name,
                kind,
                index,
                siblings,
                multiple_galleries,
            };
            match document.as_object_mut() {
                Some(document) => enrich_document(document, &scope, thumbnails, problems)?,
                None => problems.push(format!("{} is not a mapping", scope.label())),
            }
        }
    }
    Ok(())
}

fn enrich_document(
    document: &mut Map<String, Value>,
    scope: &DocumentScope<'_>,
    thumbnails: &dyn ThumbnailSink,
    problems: &mut Problems,
) -> Result<(), FormatError> {
    let record_name = scope.record_name;
    document.insert(
        "doc_type".to_string(),
        Value::String(scope.kind.doc_type().to_string()),
    );

    let name = truthy_str(document, "name").map(str::to_string);
    let (display_name, short_name) = match &name {
        Some(name) => (format!("{record_name}: {name}"), name.clone()),
        None => {
            if scope.siblings > 1 {
                problems.push(format!(
                    "please provide names for all {} in {record_name}",
                    scope.kind.collection()
                ));
            }
            (record_name.to_string(), record_name.to_string())
        }
    };
    let mut display_name = strip_leading_article(&display_name);
    let short_name = strip_leading_article(&short_name);
    document.shift_remove("name");

    let start_page = start_page(document, scope, problems);
    if start_page != 1 {
        display_name.push_str(&format!(",\npage {start_page}"));
    }
    document.insert("start_page".to_string(), Value::from(start_page));
    document.insert(
        "display_name".to_string(),
        Value::String(display_name.clone()),
    );
    document.insert("short_name".to_string(), Value::String(short_name.clone()));
    document.insert("has_name".to_string(), Value::Bool(name.is_some()));

    if document.get("layout").and_then(Value::as_str) == Some("calendar") {
        encode_calendar(document)?;
    }

    let mut thumbs = ThumbnailList::default();
    if let Some(thumb) = truthy_str(document, "thumb") {
        match truthy_str(document, "url") {
            Some(url) => thumbs.insert(thumb, url),
            None => debug!(thumb, "{} has a thumbnail but no url", scope.label()),
        }
    }

    match document.shift_remove("gallery") {
        None | Some(Value::Null) => {}
        Some(Value::Array(mut gallery)) => {
            for (position, image) in gallery.iter_mut().enumerate() {
                let Some(image) = image.as_object_mut() else {
                    problems.push(format!(
                        "{} gallery image {position} is not a mapping",
                        scope.label()
                    ));
                    continue;
                };
                let names = ImageNames {
                    display_name: &display_name,
                    short_name: &short_name,
                    multiple_galleries: scope.multiple_galleries,
                };
                if !enrich_image(image, document, start_page, &names, &mut thumbs) {
                    problems.push(format!(
                        "{} gallery image {position} has no url",
                        scope.label()
                    ));
                }
            }
            document.insert("gallery".to_string(), Value::Array(gallery));
        }
        Some(other) => {
            problems.push(format!(
                "{} gallery must be a sequence, found {}",
                scope.label(),
                type_name(&other)
            ));
            document.insert("gallery".to_string(), other);
        }
    }

    for (reference, source_url) in thumbs.entries {
        thumbnails.request(ThumbnailRequest::new(reference, source_url, start_page));
    }
    Ok(())
}

/// One-based first page, defaulting to 1 when absent or falsy.
fn start_page(
    document: &Map<String, Value>,
    scope: &DocumentScope<'_>,
    problems: &mut Problems,
) -> u32 {
    let Some(value) = document.get("start_page").filter(|value| is_truthy(value)) else {
        return 1;
    };
    let page = match value {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    };
    match page.filter(|page| *page > 0) {
        Some(page) => page,
        None => {
            problems.push(format!(
                "{} start_page must be a positive integer, found {value}",
                scope.label()
            ));
            1
        }
    }
}

fn field_text(document: &Map<String, Value>, key: &str) -> String {
    match document.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn encode_calendar(document: &mut Map<String, Value>) -> Result<(), FormatError> {
    let page_duration = encode_duration(&field_text(document, "page_duration"))?;
    let start_time = encode_time_value(&field_text(document, "start_time"))?;
    document.insert("page_duration".to_string(), encoded(page_duration));
    document.insert("start_time".to_string(), encoded(start_time));
    Ok(())
}

/// Thumbnail reference to source URL, in first-seen order. A repeated
/// reference keeps its position and takes the latest URL.
#[derive(Debug, Default)]
struct ThumbnailList {
    entries: Vec<(String, String)>,
}

impl ThumbnailList {
    fn insert(&mut self, reference: &str, source_url: &str) {
        match self.entries.iter_mut().find(|(existing, _)| existing == reference) {
            Some(entry) => entry.1 = source_url.to_string(),
            None => self
                .entries
                .push((reference.to_string(), source_url.to_string())),
        }
    }
}

struct ImageNames<'a> {
    display_name: &'a str,
    short_name: &'a str,
    multiple_galleries: bool,
}

/// Returns `false` when the image has no url.
fn enrich_image(
    image: &mut Map<String, Value>,
    document: &mut Map<String, Value>,
    start_page: u32,
    names: &ImageNames<'_>,
    thumbs: &mut ThumbnailList,
) -> bool {
    let Some(mut url) = image.get("url").and_then(Value::as_str).map(str::to_string) else {
        return false;
    };
    if start_page != 1 && !url.contains('#') {
        url.push_str(&format!("#page={start_page}"));
    }
    if let Some(thumb) = truthy_str(image, "thumb") {
        thumbs.insert(thumb, &url);
    }
    let url = Value::String(url.replace(' ', "%20"));
    image.insert("url".to_string(), url.clone());
    if !field_is_truthy(document, "url") {
        document.insert("url".to_string(), url);
    }
    if !field_is_truthy(document, "thumb")
        && let Some(thumb) = image.get("thumb").filter(|thumb| is_truthy(thumb))
    {
        document.insert("thumb".to_string(), thumb.clone());
    }

    let name = truthy_str(image, "name").map(str::to_string);
    let (display_name, short_name) = match &name {
        Some(name) if names.multiple_galleries => {
            (format!("{}: {name}", names.short_name), name.clone())
        }
        Some(name) => (name.clone(), name.clone()),
        None => (names.display_name.to_string(), names.short_name.to_string()),
    };
    image.insert("display_name".to_string(), Value::String(display_name));
    image.insert(
        "short_name".to_string(),
        Value::String(strip_leading_article(&short_name)),
    );
    image.insert("has_name".to_string(), Value::Bool(name.is_some()));
    image.shift_remove("name");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_thumbnail_keeps_position_and_latest_url() {
        let mut thumbs = ThumbnailList::default();
        thumbs.insert("/resources/thumbs/a.png", "/resources/a.pdf");
        thumbs.insert("/resources/thumbs/b.png", "/resources/b.pdf");
        thumbs.insert("/resources/thumbs/a.png", "/resources/a.pdf#page=2");
        assert_eq!(
            thumbs.entries,
            vec![
                (
                    "/resources/thumbs/a.png".to_string(),
                    "/resources/a.pdf#page=2".to_string()
                ),
                (
                    "/resources/thumbs/b.png".to_string(),
                    "/resources/b.pdf".to_string()
                ),
            ]
        );
    }
}
