//! Front-matter validation and the content-hash update rule.
//!
//! Every committed content file carries a `contentHash`: the SHA-256 of its
//! body, excluding the front-matter block. The hash is the change detector —
//! when the body is edited, the stored hash goes stale, and the update pass
//! recomputes it together with `lastUpdated`. A file whose stored hash
//! doesn't match its body was edited without regenerating metadata; the
//! validator catches that before commit.
//!
//! A file moves through these states:
//!
//! ```text
//! Created (scaffold, hash = H0)
//!   → Edited   (body changed on disk)
//!   → Stale    (stored hash != H(body))    ← legitimate transient state
//!   → Updated  (update pass: hash + lastUpdated recomputed)
//!   → Committed
//! ```
//!
//! "Stale" only becomes an error when the validation gate runs.
//!
//! Validation itself never mutates. It reports, per file: missing required
//! fields, dates that aren't ISO-8601 with an explicit offset, `categories`/
//! `tags` that aren't lists, and hash mismatches.

use crate::frontmatter::Document;
use crate::hash::sha256_hex;
use chrono::{FixedOffset, Local, Utc};
use regex::Regex;
use serde_yaml_ng::{Mapping, Value};
use std::sync::LazyLock;

/// Blog front-matter fields, in canonical order.
pub const BLOG_REQUIRED_FIELDS: &[&str] = &[
    "title",
    "date",
    "description",
    "excerpt",
    "categories",
    "tags",
    "lastUpdated",
    "contentHash",
];

/// Page front-matter fields, in canonical order.
pub const PAGE_REQUIRED_FIELDS: &[&str] = &["title", "description", "lastUpdated", "contentHash"];

/// What kind of content file is being processed. Determines the required
/// field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Blog,
    Page,
}

impl ContentKind {
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            ContentKind::Blog => BLOG_REQUIRED_FIELDS,
            ContentKind::Page => PAGE_REQUIRED_FIELDS,
        }
    }
}

// YYYY-MM-DDTHH:MM:SS±HH:MM, optionally with .mmm milliseconds
static ISO_WITH_TZ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?[+-]\d{2}:\d{2}$").unwrap()
});

/// Whether a date string is ISO-8601 with an explicit timezone offset.
pub fn is_iso_with_timezone(date: &str) -> bool {
    ISO_WITH_TZ.is_match(date)
}

/// Normalize a date to ISO-8601 with an explicit offset.
///
/// Bare dates gain midnight in the given offset; anything already carrying a
/// time and an offset (or `Z`) passes through unchanged.
pub fn convert_date_to_iso(date: &str, offset: &str) -> String {
    if date.contains('T') && (date.contains('+') || date.contains('Z')) {
        return date.to_string();
    }
    format!("{date}T00:00:00{offset}")
}

/// Current date-time formatted as `YYYY-MM-DDTHH:MM:SS±HH:MM`.
///
/// With `offset = Some(..)` the wall-clock time is expressed in that fixed
/// offset; otherwise local time and the local offset are used.
pub fn current_datetime_iso(offset: Option<FixedOffset>) -> String {
    match offset {
        Some(tz) => Utc::now().with_timezone(&tz).format("%Y-%m-%dT%H:%M:%S%:z"),
        None => Local::now().format("%Y-%m-%dT%H:%M:%S%:z"),
    }
    .to_string()
}

/// Validate a parsed document. Read-only; returns one message per problem.
pub fn validate(doc: &Document, kind: ContentKind) -> Vec<String> {
    let mut errors = Vec::new();

    for field in kind.required_fields() {
        if !has_value(&doc.matter, field) {
            errors.push(format!("missing required field '{field}'"));
        }
    }

    for field in ["date", "lastUpdated"] {
        if kind == ContentKind::Page && field == "date" {
            continue;
        }
        if let Some(value) = doc.get_str(field) {
            if !is_iso_with_timezone(value) {
                errors.push(format!(
                    "'{field}' is not ISO-8601 with a timezone offset: {value}"
                ));
            }
        }
    }

    if kind == ContentKind::Blog {
        for field in ["categories", "tags"] {
            if let Some(value) = doc.get(field) {
                if !value.is_sequence() {
                    errors.push(format!("'{field}' must be a list"));
                }
            }
        }
    }

    if let Some(stored) = doc.get_str("contentHash") {
        let actual = sha256_hex(&doc.body);
        if stored != actual {
            errors.push(
                "contentHash does not match the body — run `mdx-keeper update` before committing"
                    .to_string(),
            );
        }
    }

    errors
}

/// Apply the update rule to a document.
///
/// If the body's hash differs from the stored `contentHash`, set
/// `contentHash` and `lastUpdated` and reorder the front matter into
/// canonical form. Returns `true` when the document changed; an unchanged
/// body is a no-op, so running the pass twice writes nothing the second
/// time.
pub fn update(doc: &mut Document, kind: ContentKind, timestamp: &str) -> bool {
    let actual = sha256_hex(&doc.body);
    if doc.get_str("contentHash") == Some(actual.as_str()) {
        return false;
    }
    doc.matter
        .insert(Value::from("contentHash"), Value::from(actual));
    doc.matter
        .insert(Value::from("lastUpdated"), Value::from(timestamp));
    doc.matter = reorder_fields(&doc.matter, kind.required_fields());
    true
}

/// Reorder front-matter keys: the canonical fields first, in their canonical
/// order, then any extra keys in their original relative order.
///
/// Purely cosmetic — it keeps regenerated files diffing deterministically.
pub fn reorder_fields(matter: &Mapping, canonical: &[&str]) -> Mapping {
    let mut ordered = Mapping::new();
    for field in canonical {
        if let Some(value) = matter.get(*field) {
            ordered.insert(Value::from(*field), value.clone());
        }
    }
    for (key, value) in matter {
        if !ordered.contains_key(key) {
            ordered.insert(key.clone(), value.clone());
        }
    }
    ordered
}

#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    FrontMatter(#[from] crate::frontmatter::FrontMatterError),
}

/// Run the update rule against a file on disk.
///
/// Writes back only when the document changed; returns whether it did.
pub fn update_file(
    path: &std::path::Path,
    kind: ContentKind,
    timestamp: &str,
) -> Result<bool, MetadataError> {
    let text = std::fs::read_to_string(path)?;
    let mut doc = Document::parse(&text)?;
    if !update(&mut doc, kind, timestamp) {
        return Ok(false);
    }
    std::fs::write(path, doc.to_text()?)?;
    Ok(true)
}

/// A field counts as present when it exists and is non-empty.
///
/// Matches the original truthiness check: an empty string is as missing as
/// an absent key.
fn has_value(matter: &Mapping, field: &str) -> bool {
    match matter.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
