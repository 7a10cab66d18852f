//! Canonical field-casing normalization.
//!
//! The wire format is inconsistent about key casing: the same record may
//! arrive with `departmentId` or `department_id` depending on which server
//! version produced it. Every read and write boundary funnels through
//! [`canonicalize`], so the accommodation lives in exactly one place instead
//! of being repeated per endpoint.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Rewrite every snake_case key in `value` to its camelCase spelling,
/// recursing through nested objects and arrays.
///
/// When both spellings are present, the camelCase entry wins and the
/// snake_case one is dropped. Already-canonical input is a fixed point.
pub fn canonicalize(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let snake_keys: Vec<String> = map
                .keys()
                .filter(|k| k.contains('_'))
                .cloned()
                .collect();
            for key in snake_keys {
                let camel = camel_case(&key);
                if camel == key {
                    continue;
                }
                if let Some(v) = map.remove(&key) {
                    map.entry(camel).or_insert(v);
                }
            }
            for v in map.values_mut() {
                canonicalize(v);
            }
        }
        Value::Array(items) => {
            for v in items {
                canonicalize(v);
            }
        }
        _ => {}
    }
}

/// Serialize `input` and canonicalize the result, for outbound payloads.
pub fn canonical_value<T: Serialize>(input: &T) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(input)?;
    canonicalize(&mut value);
    Ok(value)
}

/// Canonicalize `value` and decode it into a typed record, for inbound
/// payloads.
pub fn from_canonical<T: DeserializeOwned>(mut value: Value) -> serde_json::Result<T> {
    canonicalize(&mut value);
    serde_json::from_value(value)
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
