//! Conversion between delimited tag strings and tag sets.
//!
//! Stored `terrains` / `climates` values are read as comma-separated sets and
//! written back sorted, deduplicated and joined with `", "`, so the same
//! logical set always serializes to the same string.
//!
//! Ingested values are joined with `-` instead (see [`join_ingested`]). The
//! comma parser does not split those, so an ingested `"desert-rocky"` is a
//! single tag until it is rewritten through a full update.

use std::collections::BTreeSet;

use serde_json::Value;

const INGEST_DELIMITER: &str = "-";

/// Splits a comma-separated field into trimmed, non-empty tags.
#[must_use]
pub fn parse_tags(field: &str) -> BTreeSet<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins tags sorted and deduplicated with `", "`.
#[must_use]
pub fn join_tags<I, S>(tags: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tags.into_iter()
        .map(Into::into)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Applies `(current ∪ add) − remove` to a stored tag string.
/// A tag listed in both `add` and `remove` ends up removed.
#[must_use]
pub fn merge_tags(current: &str, add: &[String], remove: &[String]) -> String {
    let mut tags = parse_tags(current);

    tags.extend(
        add.iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string),
    );
    for tag in remove {
        tags.remove(tag.trim());
    }

    join_tags(tags)
}

/// Joins an upstream tag list with `-`. Anything other than a list of strings
/// becomes an empty string; non-string items inside a list are dropped.
#[must_use]
pub fn join_ingested(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(INGEST_DELIMITER),
        _ => String::new(),
    }
}
