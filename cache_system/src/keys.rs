//! Canonical key material
//!
//! List keys embed a filter object. Two filters that mean the same thing
//! must produce the same text, whatever order their members were inserted
//! in and whether unset members were written as `null` or left out.

use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

/// Serialize `filter` to canonical JSON
///
/// Object members are sorted by key at every depth and `null` members are
/// dropped. Arrays keep their order. Anything that does not serialize (or
/// serializes to `null`) becomes `{}`, the key of the unfiltered list.
///
/// ```
/// use cache_system::canonical_json;
/// use serde_json::json;
///
/// let a = canonical_json(&json!({"limit": null, "city": "Rome"}));
/// let b = canonical_json(&json!({"city": "Rome"}));
/// assert_eq!(a, b);
/// assert_eq!(a, r#"{"city":"Rome"}"#);
/// ```
pub fn canonical_json<T: Serialize + ?Sized>(filter: &T) -> String {
    match serde_json::to_value(filter) {
        Ok(Value::Null) | Err(_) => "{}".to_string(),
        Ok(value) => canonical_value(&value),
    }
}

/// Canonical text of an already-built JSON value
pub fn canonical_value(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut members: Vec<(&String, &Value)> =
                map.iter().filter(|(_, v)| !v.is_null()).collect();
            members.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, member)) in members.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(member, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::String(s) => write_string(s, out),
        scalar => {
            let _ = write!(out, "{}", scalar);
        }
    }
}

fn write_string(s: &str, out: &mut String) {
    // serde_json's string escaping, so keys match what JSON.stringify-style writers emit
    let _ = write!(out, "{}", Value::String(s.to_string()));
}

/// `prefix` followed by the canonical form of `filter`
pub fn list_key<T: Serialize + ?Sized>(prefix: &str, filter: &T) -> String {
    format!("{}{}", prefix, canonical_json(filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Default)]
    struct TourFilter {
        #[serde(skip_serializing_if = "Option::is_none")]
        city: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    }

    #[derive(Serialize)]
    struct LooseFilter {
        limit: Option<u32>,
        city: Option<String>,
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut a = serde_json::Map::new();
        a.insert("type".into(), json!("museum"));
        a.insert("city".into(), json!("Rome"));
        let mut b = serde_json::Map::new();
        b.insert("city".into(), json!("Rome"));
        b.insert("type".into(), json!("museum"));

        assert_eq!(
            canonical_json(&Value::Object(a)),
            canonical_json(&Value::Object(b))
        );
    }

    #[test]
    fn test_unset_members_are_dropped() {
        let skipped = TourFilter {
            city: Some("Rome".into()),
            limit: None,
        };
        let explicit_null = LooseFilter {
            limit: None,
            city: Some("Rome".into()),
        };

        assert_eq!(canonical_json(&skipped), r#"{"city":"Rome"}"#);
        assert_eq!(canonical_json(&explicit_null), r#"{"city":"Rome"}"#);
    }

    #[test]
    fn test_nested_objects_are_sorted() {
        let value = json!({"z": {"b": 1, "a": [3, {"y": true, "x": null}]}, "a": "s"});
        assert_eq!(
            canonical_json(&value),
            r#"{"a":"s","z":{"a":[3,{"y":true}],"b":1}}"#
        );
    }

    #[test]
    fn test_empty_and_null_filters() {
        assert_eq!(canonical_json(&TourFilter::default()), "{}");
        assert_eq!(canonical_json(&()), "{}");
        assert_eq!(canonical_json(&json!({})), "{}");
    }

    #[test]
    fn test_strings_are_escaped() {
        let value = json!({"name": "a\"b"});
        assert_eq!(canonical_json(&value), r#"{"name":"a\"b"}"#);
    }

    #[test]
    fn test_distinct_filters_do_not_collide() {
        assert_ne!(
            list_key("tours:", &json!({"city": "Rome"})),
            list_key("tours:", &json!({"city": "Roma"}))
        );
        assert_ne!(
            list_key("tours:", &json!({"limit": 1})),
            list_key("tours:", &json!({"limit": "1"}))
        );
    }
}
