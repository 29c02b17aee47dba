// ── Provider tag-cell decoding ──
//
// Cloud exports disagree on how a row's tags are serialized: AWS emits a
// JSON array of `{Key, Value}` objects, Azure a JSON object, and humans
// hand-edit `key=value` lists. One decoder handles all three; malformed
// content degrades to an empty set (the caller logs it) instead of
// failing the row.

use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Deserialize)]
struct KeyValueEntry {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Value", default)]
    value: String,
}

/// Decode an AWS-style tag cell: a JSON array of `{Key, Value}` objects,
/// a JSON object, or a `key=value` list separated by `;` or `,`.
pub fn parse_tag_cell(raw: &str) -> Result<IndexMap<String, String>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(IndexMap::new());
    }

    if trimmed.starts_with('[') {
        let entries: Vec<KeyValueEntry> =
            serde_json::from_str(trimmed).map_err(|e| format!("invalid tag array: {e}"))?;
        return Ok(entries.into_iter().map(|e| (e.key, e.value)).collect());
    }

    if trimmed.starts_with('{') {
        let object: IndexMap<String, serde_json::Value> =
            serde_json::from_str(trimmed).map_err(|e| format!("invalid tag object: {e}"))?;
        return Ok(object
            .into_iter()
            .map(|(k, v)| (k, scalar_to_string(&v)))
            .collect());
    }

    parse_kv_pairs(trimmed)
}

/// Decode `key=value` pairs separated by `;` or `,`. Entries without `=`
/// make the whole cell malformed.
pub fn parse_kv_pairs(raw: &str) -> Result<IndexMap<String, String>, String> {
    let mut tags = IndexMap::new();
    for pair in raw.split([';', ',']) {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let Some((key, value)) = pair.split_once('=') else {
            return Err(format!("expected key=value, got {pair:?}"));
        };
        tags.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(tags)
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
