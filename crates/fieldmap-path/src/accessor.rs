use serde_json::{Map, Value};
use tracing::debug;

use crate::segment::{Segment, segments};

/// Largest array index a write will pad up to. Larger indexes drop the write.
pub const MAX_ARRAY_INDEX: usize = 65_535;

/// Resolve `path` against `document`.
///
/// Returns `None` as soon as an intermediate value is missing, `null`, or not
/// a container. Arrays may also be indexed with a numeric plain segment
/// (`items.0`).
#[must_use]
pub fn get<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path).try_fold(document, lookup)
}

fn lookup<'a>(current: &'a Value, segment: Segment<'_>) -> Option<&'a Value> {
    match segment {
        Segment::Key(key) => child(current, key),
        Segment::Indexed { name, index } => child(current, name)?.as_array()?.get(index),
    }
}

fn child<'a>(current: &'a Value, key: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    }
}

/// Write `value` at `path`, creating intermediate containers as needed.
///
/// Intermediate indexed segments create arrays padded with `{}`; intermediate
/// plain segments create objects. An indexed final segment pads with `null`.
/// Scalars found where a container is needed are replaced; a container of the
/// wrong kind drops the write. `None` removes a final key (an absent value) or
/// stores `null` in a final array slot.
///
/// Returns whether the value was written.
pub fn set(document: &mut Value, path: &str, value: Option<Value>) -> bool {
    let mut parts: Vec<Segment<'_>> = segments(path).collect();
    let Some(last) = parts.pop() else {
        return false;
    };

    let mut current = document;
    for segment in parts {
        let Some(next) = descend(current, segment) else {
            debug!(path, segment = segment.name(), "dropping write at intermediate segment");
            return false;
        };
        current = next;
    }

    let written = write_tail(current, last, value);
    if !written {
        debug!(path, segment = last.name(), "dropping write at final segment");
    }
    written
}

/// Delete the object key `path` ends in, returning its value.
///
/// Never creates containers. A path ending in an indexed segment leaves the
/// array untouched.
pub fn remove(document: &mut Value, path: &str) -> Option<Value> {
    let mut parts: Vec<Segment<'_>> = segments(path).collect();
    let Segment::Key(key) = parts.pop()? else {
        return None;
    };
    let parent = parts.into_iter().try_fold(document, lookup_mut)?;
    parent.as_object_mut()?.shift_remove(key)
}

fn lookup_mut<'a>(current: &'a mut Value, segment: Segment<'_>) -> Option<&'a mut Value> {
    match segment {
        Segment::Key(key) => child_mut(current, key),
        Segment::Indexed { name, index } => child_mut(current, name)?.as_array_mut()?.get_mut(index),
    }
}

fn child_mut<'a>(current: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match current {
        Value::Object(map) => map.get_mut(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get_mut(index)),
        _ => None,
    }
}

fn descend<'v>(current: &'v mut Value, segment: Segment<'_>) -> Option<&'v mut Value> {
    let map = object_slot(current)?;
    match segment {
        Segment::Key(key) => Some(map.entry(key).or_insert(Value::Null)),
        Segment::Indexed { name, index } => {
            if index > MAX_ARRAY_INDEX {
                return None;
            }
            let items = array_slot(map.entry(name).or_insert(Value::Null))?;
            if items.len() <= index {
                items.resize_with(index + 1, || Value::Object(Map::new()));
            }
            items.get_mut(index)
        }
    }
}

fn write_tail(current: &mut Value, segment: Segment<'_>, value: Option<Value>) -> bool {
    let Some(map) = object_slot(current) else {
        return false;
    };
    match segment {
        Segment::Key(key) => {
            match value {
                Some(value) => {
                    map.insert(key.to_string(), value);
                }
                None => {
                    map.shift_remove(key);
                }
            }
            true
        }
        Segment::Indexed { name, index } => {
            if index > MAX_ARRAY_INDEX {
                return false;
            }
            let Some(items) = array_slot(map.entry(name).or_insert(Value::Null)) else {
                return false;
            };
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            items[index] = value.unwrap_or(Value::Null);
            true
        }
    }
}

/// View `slot` as an object, replacing a scalar with `{}`. Arrays are left alone.
fn object_slot(slot: &mut Value) -> Option<&mut Map<String, Value>> {
    if slot.is_array() {
        return None;
    }
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
}

/// View `slot` as an array, replacing a scalar with `[]`. Objects are left alone.
fn array_slot(slot: &mut Value) -> Option<&mut Vec<Value>> {
    if slot.is_object() {
        return None;
    }
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    slot.as_array_mut()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn get_reads_nested_and_indexed_values() {
        let doc = json!({"order": {"items": [{"sku": "A1"}, {"sku": "B2"}]}});
        assert_eq!(get(&doc, "order.items[1].sku"), Some(&json!("B2")));
        assert_eq!(get(&doc, "order.items.0.sku"), Some(&json!("A1")));
    }

    #[test]
    fn get_short_circuits_on_missing_chain() {
        let doc = json!({"a": null, "b": 5, "c": []});
        assert_eq!(get(&doc, "a"), Some(&Value::Null));
        assert_eq!(get(&doc, "a.b.c"), None);
        assert_eq!(get(&doc, "b.x"), None);
        assert_eq!(get(&doc, "c[3]"), None);
        assert_eq!(get(&doc, "missing[0].x"), None);
    }

    #[test]
    fn chained_indexes_address_a_literal_key() {
        let doc = json!({"grid": [[0, 1], [2, 3, 4]], "grid[1][2]": "literal"});
        assert_eq!(get(&doc, "grid[1][2]"), Some(&json!("literal")));
    }

    #[test]
    fn set_creates_objects_and_arrays() {
        let mut doc = json!({});
        assert!(set(&mut doc, "x.y", Some(json!(1))));
        assert!(set(&mut doc, "list[2].name", Some(json!("n"))));
        assert_eq!(
            doc,
            json!({"x": {"y": 1}, "list": [{}, {}, {"name": "n"}]})
        );
    }

    #[test]
    fn set_pads_tail_arrays_with_null() {
        let mut doc = json!({});
        set(&mut doc, "tags[2]", Some(json!("c")));
        assert_eq!(doc, json!({"tags": [null, null, "c"]}));
    }

    #[test]
    fn set_reuses_existing_containers() {
        let mut doc = json!({});
        set(&mut doc, "a.b", Some(json!(1)));
        set(&mut doc, "c", Some(json!(2)));
        set(&mut doc, "a.d", Some(json!(3)));
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"a":{"b":1,"d":3},"c":2}"#);
    }

    #[test]
    fn set_replaces_scalars_and_drops_kind_mismatch() {
        let mut doc = json!({"a": 0, "b": [1]});
        assert!(set(&mut doc, "a.x", Some(json!(true))));
        assert!(!set(&mut doc, "b.x", Some(json!(true))));
        assert_eq!(doc, json!({"a": {"x": true}, "b": [1]}));

        let mut doc = json!({"obj": {"k": 1}});
        assert!(!set(&mut doc, "obj[0]", Some(json!(1))));
        assert_eq!(doc, json!({"obj": {"k": 1}}));
    }

    #[test]
    fn absent_value_removes_key_or_stores_null() {
        let mut doc = json!({"a": 1, "b": 2});
        set(&mut doc, "a", None);
        set(&mut doc, "list[1]", None);
        assert_eq!(doc, json!({"b": 2, "list": [null, null]}));
    }

    #[test]
    fn remove_deletes_keys_without_creating_paths() {
        let mut doc = json!({"a": {"b": 1, "c": 2}, "list": [{"k": 1}], "n": 3});
        assert_eq!(remove(&mut doc, "a.b"), Some(json!(1)));
        assert_eq!(remove(&mut doc, "list[0].k"), Some(json!(1)));
        assert_eq!(remove(&mut doc, "list[0]"), None);
        assert_eq!(remove(&mut doc, "n.x"), None);
        assert_eq!(remove(&mut doc, "missing.x"), None);
        assert_eq!(doc, json!({"a": {"c": 2}, "list": [{}], "n": 3}));
    }

    #[test]
    fn huge_index_is_dropped() {
        let mut doc = json!({});
        assert!(!set(&mut doc, "a[1000000].b", Some(json!(1))));
        assert!(!set(&mut doc, "a[1000000]", Some(json!(1))));
    }

    #[test]
    fn last_write_wins() {
        let mut doc = json!({});
        set(&mut doc, "x", Some(json!(1)));
        set(&mut doc, "x", Some(json!(2)));
        assert_eq!(doc, json!({"x": 2}));
    }
}
