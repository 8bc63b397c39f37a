//! Dot-notation access into nested `serde_json::Value` trees.
//!
//! A `*` segment fans out over every element of an array or every value
//! of an object.

use serde_json::{Map, Value};

/// Get an item from a nested value using "dot" notation.
///
/// An empty key returns the whole target. Wildcard segments collect the
/// remaining path from every child into an array, using `null` for
/// children that lack it; a second wildcard further down collapses the
/// nested arrays one level.
pub fn data_get(target: &Value, key: &str) -> Option<Value> {
    if key.is_empty() {
        return Some(target.clone());
    }

    let segments: Vec<&str> = key.split('.').collect();
    get_segments(target, &segments)
}

fn get_segments(target: &Value, segments: &[&str]) -> Option<Value> {
    let Some((segment, rest)) = segments.split_first() else {
        return Some(target.clone());
    };

    if *segment == "*" {
        let children: Vec<&Value> = match target {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) => map.values().collect(),
            _ => return None,
        };

        let plucked = children
            .into_iter()
            .map(|child| get_segments(child, rest).unwrap_or(Value::Null));

        if rest.contains(&"*") {
            let collapsed = plucked
                .filter_map(|value| match value {
                    Value::Array(items) => Some(items),
                    _ => None,
                })
                .flatten()
                .collect();
            return Some(Value::Array(collapsed));
        }

        return Some(Value::Array(plucked.collect()));
    }

    let next = match target {
        Value::Object(map) => map.get(*segment)?,
        Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
        _ => return None,
    };

    get_segments(next, rest)
}

/// Set an item on a nested value using "dot" notation.
///
/// Missing intermediate levels are created as objects; scalars in the way
/// are replaced. An array addressed by a key that is neither an existing
/// index nor the next one becomes an object keyed by its former indexes.
/// With `overwrite` false an existing leaf is left alone.
pub fn data_set(target: &mut Value, key: &str, value: Value, overwrite: bool) {
    let segments: Vec<&str> = key.split('.').collect();
    set_segments(target, &segments, value, overwrite);
}

fn set_segments(target: &mut Value, segments: &[&str], value: Value, overwrite: bool) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };

    if *segment == "*" {
        if !(target.is_array() || target.is_object()) {
            *target = Value::Array(Vec::new());
        }

        let children: Vec<&mut Value> = match target {
            Value::Array(items) => items.iter_mut().collect(),
            Value::Object(map) => map.values_mut().collect(),
            _ => Vec::new(),
        };

        if !rest.is_empty() {
            for child in children {
                set_segments(child, rest, value.clone(), overwrite);
            }
        } else if overwrite {
            for child in children {
                *child = value.clone();
            }
        }
        return;
    }

    if let Value::Array(items) = target {
        if let Ok(index) = segment.parse::<usize>() {
            if index < items.len() {
                if rest.is_empty() {
                    if overwrite {
                        items[index] = value;
                    }
                } else {
                    set_segments(&mut items[index], rest, value, overwrite);
                }
                return;
            }
            if index == items.len() {
                let mut child = Value::Null;
                if rest.is_empty() {
                    child = value;
                } else {
                    set_segments(&mut child, rest, value, overwrite);
                }
                items.push(child);
                return;
            }
        }
    }

    if let Value::Array(items) = target {
        let indexed = std::mem::take(items)
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect();
        *target = Value::Object(indexed);
    }

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    if let Value::Object(map) = target {
        if rest.is_empty() {
            if overwrite || !map.contains_key(*segment) {
                map.insert(segment.to_string(), value);
            }
        } else {
            let child = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            set_segments(child, rest, value, overwrite);
        }
    }
}
