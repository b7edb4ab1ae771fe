//! Normalized book records.
//!
//! Raw catalog entries are loose: any field may be missing, dates come in
//! several shapes, and counts may not be integers. Everything in this module
//! turns that into a `BookRecord` whose fields are always present.

use std::collections::HashSet;

use serde_json::Value;

/// Title used when the source has none. Records carrying it are dropped.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Author used when the source lists none
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Genre used when the source lists no categories
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Separator for joined author and category lists
pub const LIST_SEPARATOR: &str = ", ";

/// One book in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub title: String,

    /// Comma-joined author names
    pub authors: String,

    /// Comma-joined category labels
    pub genre: String,

    /// Four-digit year, `0` when unknown
    pub publication_year: u32,

    pub ratings_count: u64,
}

impl BookRecord {
    pub fn new(
        title: impl Into<String>,
        authors: impl Into<String>,
        genre: impl Into<String>,
        publication_year: u32,
        ratings_count: u64,
    ) -> Self {
        Self {
            title: title.into(),
            authors: authors.into(),
            genre: genre.into(),
            publication_year,
            ratings_count,
        }
    }

    /// Identity used for deduplication
    pub fn key(&self) -> (&str, &str) {
        (&self.title, &self.authors)
    }

    /// Whether the title is the missing-title placeholder
    pub fn has_placeholder_title(&self) -> bool {
        self.title == UNKNOWN_TITLE
    }

    /// First category label, used to populate genre selectors
    pub fn primary_genre(&self) -> &str {
        self.genre
            .split(LIST_SEPARATOR)
            .next()
            .unwrap_or(&self.genre)
    }

    /// Case-insensitive substring match on the genre field.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn genre_contains(&self, needle: &str) -> bool {
        self.genre.to_lowercase().contains(needle)
    }
}

/// Extract a publication year from a free-form date string.
///
/// Takes everything before the first `-`. If that is all ASCII digits it is
/// the year; anything else ("circa 1990", "", "19xx") is unknown and yields 0.
pub fn publication_year(published: &str) -> u32 {
    let head = published.split('-').next().unwrap_or("");
    if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    head.parse().unwrap_or(0)
}

/// Coerce a JSON value into a non-negative count.
///
/// Integers pass through, floats are truncated, numeric strings are parsed.
/// Negative, null or non-numeric values become 0.
pub fn coerce_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                v
            } else if let Some(f) = n.as_f64() {
                if f.is_finite() && f > 0.0 {
                    f as u64
                } else {
                    0
                }
            } else {
                0
            }
        }
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Join a list of labels, falling back to `placeholder` when it is empty
pub fn join_or(values: &[String], placeholder: &str) -> String {
    if values.is_empty() {
        placeholder.to_string()
    } else {
        values.join(LIST_SEPARATOR)
    }
}

/// Drop placeholder titles and repeated `(title, authors)` pairs.
///
/// The first occurrence of each pair wins; relative order is preserved.
pub fn normalize(records: impl IntoIterator<Item = BookRecord>) -> Vec<BookRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut kept = Vec::new();

    for record in records {
        if record.has_placeholder_title() {
            tracing::debug!(authors = %record.authors, "Dropping record without a title");
            continue;
        }
        if !seen.insert((record.title.clone(), record.authors.clone())) {
            tracing::debug!(title = %record.title, "Dropping duplicate record");
            continue;
        }
        kept.push(record);
    }

    kept
}
