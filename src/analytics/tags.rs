//! Tag decoding and histogram aggregation.
//!
//! Blog tags have been written over time as JSON arrays, as JSON strings
//! wrapping an array, and as plain comma-separated text. Everything that
//! reads tags goes through [`parse_tags`] so all three decode the same way.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Number of tags shown on the dashboard chart.
pub const TOP_TAGS: usize = 5;

/// One bar of the tag histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub value: usize,
}

impl TagCount {
    fn placeholder() -> Self {
        Self {
            name: "No Data".to_string(),
            value: 1,
        }
    }
}

/// Decode a stored tag column into its individual tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let tags = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => strings_of(items),
        Ok(Value::String(inner)) => parse_tag_string(&inner),
        Ok(_) => Vec::new(),
        Err(_) => parse_tag_string(raw),
    };

    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// A string is either an encoded array or comma-separated tags.
fn parse_tag_string(s: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Array(items)) => strings_of(items),
        _ => s.split(',').map(|t| t.trim().to_string()).collect(),
    }
}

fn strings_of(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Trim and title-case a tag for counting.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(title_case(trimmed))
}

/// Upper-case the first letter of every word and lower-case the rest.
/// A word starts after any non-alphabetic character.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;

    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }

    out
}

/// Count normalized tags across raw tag columns.
///
/// Sorted by count (highest first), ties keep the order in which tags were
/// first seen. Never empty: with no tags at all a single placeholder bar
/// is returned so the chart has something to draw. A `limit` of zero is
/// treated as one.
pub fn tag_histogram<I, S>(rows: I, limit: usize) -> Vec<TagCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // name -> (first seen, count)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

    for row in rows {
        for tag in parse_tags(row.as_ref()) {
            let Some(name) = normalize_tag(&tag) else {
                continue;
            };
            let next = counts.len();
            counts.entry(name).or_insert((next, 0)).1 += 1;
        }
    }

    let mut sorted: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(name, (seen, count))| (name, seen, count))
        .collect();
    sorted.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));
    sorted.truncate(limit.max(1));

    if sorted.is_empty() {
        return vec![TagCount::placeholder()];
    }

    sorted
        .into_iter()
        .map(|(name, _, value)| TagCount { name, value })
        .collect()
}
