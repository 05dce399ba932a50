//! Frequency-table normalisation.
//!
//! `/stats` sends `[[label, count], ...]` already rank-sorted (Python
//! `Counter.most_common()`); older payloads and some fixtures send a plain
//! `{label: count}` object instead, which is sorted by descending count.
//! Pair rows keep the backend's rank order. A label repeated in the pair
//! shape keeps its first row, so every table is keyed uniquely.

use serde_json::Value;
use spacebio_common::{FrequencyEntry, FrequencyTable};
use tracing::debug;

use crate::numeric::{count_or_zero, string_opt};

pub fn normalize_frequency_table(raw: &Value) -> FrequencyTable {
    match raw {
        Value::Array(items) => FrequencyTable::from_ranked(items.iter().filter_map(pair_entry).collect()),
        Value::Object(map) => FrequencyTable::from_unranked(
            map.iter()
                .map(|(label, count)| FrequencyEntry { label: label.clone(), count: count_or_zero(count) })
                .collect(),
        ),
        Value::Null => FrequencyTable::default(),
        other => {
            debug!(kind = json_kind(other), "Unexpected frequency table shape");
            FrequencyTable::default()
        }
    }
}

/// `[label, count]` or `{label|name, count}`. Rows without a label are dropped.
fn pair_entry(item: &Value) -> Option<FrequencyEntry> {
    let (label, count) = match item {
        Value::Array(pair) => (pair.first()?, pair.get(1).unwrap_or(&Value::Null)),
        Value::Object(_) => {
            let label = if item["label"].is_null() { &item["name"] } else { &item["label"] };
            (label, &item["count"])
        }
        _ => return None,
    };
    Some(FrequencyEntry { label: string_opt(label)?, count: count_or_zero(count) })
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
