//! Keyword relevance scoring over flattened profile entries.
//!
//! An entry's relevance is the fraction of qualifying keywords (length >= 2)
//! that hit its flattened text: a whole-word hit counts 1.0, a substring hit
//! 0.5. The result is always in [0, 1].

use regex::Regex;
use serde_json::Value;

/// Keywords shorter than this are ignored and do not count toward the denominator.
const MIN_KEYWORD_LEN: usize = 2;

const WHOLE_WORD_POINTS: f32 = 1.0;
const SUBSTRING_POINTS: f32 = 0.5;

/// A scored match produced by a search. Transient; never persisted.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched entry, rendered as JSON.
    pub data: Value,
    /// Keyword overlap score in [0, 1].
    pub relevance: f32,
    /// Category key the entry came from.
    pub category: String,
    /// Originating field name for nested sequence elements.
    pub field: Option<String>,
}

/// Options for a cross-category search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Keep at most this many results after sorting.
    pub limit: Option<usize>,
}

/// Flattens a JSON value into a single lowercase text blob: strings pass
/// through, numbers and booleans stringify, sequences and mappings
/// concatenate their values with spaces. Field names are ignored.
pub(crate) fn flatten_text(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&s.to_lowercase());
        }
        Value::Number(n) => {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&n.to_string());
        }
        Value::Bool(b) => {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(if *b { "true" } else { "false" });
        }
        Value::Array(items) => {
            for item in items {
                flatten_text(item, out);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                flatten_text(item, out);
            }
        }
        Value::Null => {}
    }
}

/// Whole-word containment check. Word-boundary matching avoids false
/// positives like "art" hitting "startup".
pub(crate) fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let pattern = format!(r"\b{}\b", regex::escape(word));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(_) => text.contains(word),
    }
}

/// Scores one entry against a keyword set. Returns 0.0 when no keyword qualifies.
pub(crate) fn score_entry(entry: &Value, keywords: &[String]) -> f32 {
    let mut blob = String::new();
    flatten_text(entry, &mut blob);

    let mut considered = 0usize;
    let mut points = 0.0f32;
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if keyword.len() < MIN_KEYWORD_LEN {
            continue;
        }
        considered += 1;
        if contains_word(&blob, &keyword) {
            points += WHOLE_WORD_POINTS;
        } else if blob.contains(&keyword) {
            points += SUBSTRING_POINTS;
        }
    }

    if considered == 0 {
        return 0.0;
    }
    points / considered as f32
}

/// Scores every entry of one category document, including elements of
/// sequence-valued fields inside object entries (tagged with the field name).
/// Entries with no keyword hit are excluded.
pub(crate) fn score_category(category: &str, doc: &Value, keywords: &[String]) -> Vec<SearchResult> {
    let mut out = Vec::new();
    match doc {
        Value::Array(entries) => {
            for entry in entries {
                push_scored(&mut out, category, None, entry, keywords);
                score_nested_fields(&mut out, category, entry, keywords);
            }
        }
        Value::Object(_) => {
            push_scored(&mut out, category, None, doc, keywords);
            score_nested_fields(&mut out, category, doc, keywords);
        }
        _ => {}
    }
    out
}

fn score_nested_fields(
    out: &mut Vec<SearchResult>,
    category: &str,
    entry: &Value,
    keywords: &[String],
) {
    if let Value::Object(map) = entry {
        for (field, value) in map {
            if let Value::Array(items) = value {
                for item in items {
                    push_scored(out, category, Some(field.as_str()), item, keywords);
                }
            }
        }
    }
}

fn push_scored(
    out: &mut Vec<SearchResult>,
    category: &str,
    field: Option<&str>,
    entry: &Value,
    keywords: &[String],
) {
    let relevance = score_entry(entry, keywords);
    if relevance > 0.0 {
        out.push(SearchResult {
            data: entry.clone(),
            relevance,
            category: category.to_string(),
            field: field.map(|f| f.to_string()),
        });
    }
}
