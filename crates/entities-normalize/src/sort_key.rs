//! Sort keys for display names.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static NAME_PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:mr|mrs|miss|ms|dr|the)(?-u:\b)").expect("valid name preamble regex")
});

static LEADING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^the +").expect("valid leading article regex"));

/// Derives the sort key for a display name.
///
/// Strips one leading honorific or article (`Mr`, `Mrs`, `Miss`, `Ms`,
/// `Dr`, `The`) on an ASCII word boundary, lower-cases the rest, then drops
/// any leading run of periods and spaces. `"Dr. Jane Smith"` sorts as
/// `"jane smith"`, while `"Drama Therapy"` keeps its first word. Non-ASCII
/// letters do not extend a word, so `"Drée"` loses its `Dr`.
pub fn derive_sort_key(name: &str) -> String {
    let stripped = NAME_PREAMBLE.replace(name, "");
    stripped
        .to_lowercase()
        .trim_start_matches(['.', ' '])
        .to_string()
}

/// Removes a leading `"the "` (any case, any number of spaces).
pub fn strip_leading_article(name: &str) -> String {
    LEADING_ARTICLE.replace(name, "").into_owned()
}

/// Alphanumeric characters only, lower-cased, accents kept.
fn collation_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Like [`collation_key`], with accents folded onto their base letters:
/// `"Émile"` keys as `"emile"`.
fn base_letter_key(value: &str) -> String {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch) && ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locale-style comparison of two sort keys.
///
/// Letters compare by base letter first, so accented names sit among their
/// unaccented neighbours; accents only break ties. Punctuation and
/// whitespace are ignored, so keys that differ only there compare equal
/// and a stable sort keeps their source order.
pub fn compare_sort_keys(left: &str, right: &str) -> Ordering {
    base_letter_key(left)
        .cmp(&base_letter_key(right))
        .then_with(|| collation_key(left).cmp(&collation_key(right)))
}
