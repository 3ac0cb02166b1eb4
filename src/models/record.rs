use crate::error::{AppError, Result};
use crate::models::KeyRule;
use serde_json::Value;
use tracing::debug;

/// One commit and the data accumulated on it by expanders
pub type Record = serde_json::Map<String, Value>;

/// Non empty string stored under `key`
pub fn string_field<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Resolve a dotted path (`fields.status.name`, `fields.labels.0`) in a payload
///
/// Numeric segments index arrays. Returns `None` as soon as a segment can't be
/// followed.
pub fn extract_field<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    path.split('.').try_fold(payload, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Copy every resolvable rule of `keys` from `payload` into `record`
///
/// Existing values under a destination key are overwritten. Rules whose field
/// is missing from the payload are skipped. Returns the number of keys set.
pub fn merge_fields(record: &mut Record, payload: &Value, keys: &[KeyRule]) -> usize {
    let mut merged = 0;

    for rule in keys {
        match extract_field(payload, &rule.field) {
            Some(value) => {
                record.insert(rule.dest_key.clone(), value.clone());
                merged += 1;
            }
            None => {
                debug!(
                    field = %rule.field,
                    dest_key = %rule.dest_key,
                    "Field missing from payload"
                );
            }
        }
    }

    merged
}

/// Parse a JSON array of objects into records
pub fn records_from_json(input: &str) -> Result<Vec<Record>> {
    let values: Vec<Value> = serde_json::from_str(input)?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(record) => Ok(record),
            other => Err(AppError::Serialization(format!(
                "record {} must be an object, got {}",
                index, other
            ))),
        })
        .collect()
}
