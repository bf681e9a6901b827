//! Reading, writing and removing nodes by key-path
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use super::error::MappingError;
use super::walk::is_container;
use crate::path::{array_index, KeyPath};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

/// How many `null`s a single write may pad an array with
pub const MAX_INDEX_GAP: usize = 1 << 16;

/// Look up the node at `path`
pub fn get<'v>(root: &'v Value, path: &KeyPath) -> Option<&'v Value> {
    path.iter().try_fold(root, |node, key| match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => array_index(key).and_then(|index| items.get(index)),
        _ => None,
    })
}

fn get_mut<'v>(root: &'v mut Value, keys: &[String]) -> Option<&'v mut Value> {
    keys.iter().try_fold(root, |node, key| match node {
        Value::Object(map) => map.get_mut(key),
        Value::Array(items) => array_index(key).and_then(move |index| items.get_mut(index)),
        _ => None,
    })
}

/// Empty container to create in front of `next_key`
fn container_for(next_key: &str) -> Value {
    if array_index(next_key).is_some() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn node_kind(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        _ => "leaf",
    }
}

/// Writes leaves into a tree and, for in-place transforms, removes them.
///
/// Removing an array element leaves a vacated slot instead of shifting its
/// siblings, so key-paths taken before the walk stay valid until
/// [`TreeWriter::finish`] compacts the slots nobody refilled. A slot below an
/// index written during the walk is kept as `null`, so every written value
/// ends up at the key-path it was written to.
pub struct TreeWriter<'a> {
    root: &'a mut Value,
    vacated: HashSet<Vec<String>>,
    /// Highest index written into each array, keyed by the array's path
    written: HashMap<Vec<String>, usize>,
}

impl<'a> TreeWriter<'a> {
    pub fn new(root: &'a mut Value) -> Self {
        Self {
            root,
            vacated: HashSet::new(),
            written: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Value {
        self.root
    }

    /// Whether `path` was removed and not written since
    pub fn is_vacated(&self, path: &KeyPath) -> bool {
        self.vacated.contains(path.keys())
    }

    /// Write `value` at `path`, creating intermediate containers as needed
    pub fn write(&mut self, path: &KeyPath, value: Value) -> Result<(), MappingError> {
        let (last, parents) = path.split_last().ok_or(MappingError::EmptyPath)?;
        let keys = path.keys();

        let mut array_steps = Vec::new();
        let mut node: &mut Value = &mut *self.root;
        for (depth, key) in parents.iter().enumerate() {
            let next_key = parents.get(depth + 1).unwrap_or(last);
            let at = &keys[..=depth];
            let revived = self.vacated.contains(at);
            if node.is_array() {
                array_steps.push(depth);
            }
            node = descend(node, key, next_key, revived, at)?;
        }
        if node.is_array() {
            array_steps.push(parents.len());
        }
        let replaced_container = insert(node, last, value, path)?;

        for depth in array_steps {
            if let Some(index) = array_index(&keys[depth]) {
                self.record_written(&keys[..depth], index);
            }
        }

        // Refilled slots and slots under a replaced subtree are no longer vacated.
        for depth in 1..=keys.len() {
            self.vacated.remove(&keys[..depth]);
        }
        if replaced_container {
            self.vacated.retain(|slot| !slot.starts_with(keys));
            self.written.retain(|array, _| !array.starts_with(keys));
        }
        Ok(())
    }

    fn record_written(&mut self, array: &[String], index: usize) {
        match self.written.get_mut(array) {
            Some(highest) => *highest = (*highest).max(index),
            None => {
                self.written.insert(array.to_vec(), index);
            }
        }
    }

    /// Remove the node at `path`, returning it
    pub fn remove(&mut self, path: &KeyPath) -> Option<Value> {
        let (last, parents) = path.split_last()?;
        let parent = get_mut(self.root, parents)?;

        match parent {
            Value::Object(map) => map.shift_remove(last),
            Value::Array(items) => {
                let index = array_index(last)?;
                let slot = items.get_mut(index)?;
                let removed = std::mem::replace(slot, Value::Null);
                self.vacated.insert(path.keys().to_vec());
                Some(removed)
            }
            _ => None,
        }
    }

    /// Drop vacated array slots, nested arrays before the arrays holding them
    pub fn finish(self) {
        let TreeWriter {
            root,
            vacated,
            written,
        } = self;
        if vacated.is_empty() {
            return;
        }

        let mut by_array: BTreeMap<&[String], HashSet<usize>> = BTreeMap::new();
        for slot in &vacated {
            let Some((last, array)) = slot.split_last() else {
                continue;
            };
            let Some(index) = array_index(last) else {
                continue;
            };
            if written.get(array).is_some_and(|&highest| highest > index) {
                continue;
            }
            by_array.entry(array).or_default().insert(index);
        }

        // Descendant paths sort after their ancestors.
        for (array, doomed) in by_array.into_iter().rev() {
            if let Some(Value::Array(items)) = get_mut(root, array) {
                let mut position = 0;
                items.retain(|_| {
                    let keep = !doomed.contains(&position);
                    position += 1;
                    keep
                });
            }
        }
    }
}

/// Pad `items` with `null` up to `index`, refusing oversized gaps
fn pad_to(items: &mut Vec<Value>, index: usize, array_path: &[String]) -> Result<(), MappingError> {
    if index - items.len() > MAX_INDEX_GAP {
        return Err(MappingError::IndexTooFar {
            index,
            path: array_path.iter().map(String::as_str).collect(),
        });
    }
    items.resize(index, Value::Null);
    Ok(())
}

/// Step from `node` into its child `key`, creating it when missing
fn descend<'v>(
    node: &'v mut Value,
    key: &str,
    next_key: &str,
    revived: bool,
    at: &[String],
) -> Result<&'v mut Value, MappingError> {
    let parent_path = &at[..at.len() - 1];
    let child = match node {
        Value::Object(map) => {
            let child = map
                .entry(key.to_string())
                .or_insert_with(|| container_for(next_key));
            if revived {
                *child = container_for(next_key);
            }
            child
        }
        Value::Array(items) => {
            let index = array_index(key).ok_or_else(|| conflict("array", parent_path))?;
            if index >= items.len() {
                pad_to(items, index, parent_path)?;
                items.push(container_for(next_key));
            } else if revived {
                items[index] = container_for(next_key);
            }
            &mut items[index]
        }
        other => return Err(conflict(node_kind(other), parent_path)),
    };

    if !is_container(child) {
        return Err(conflict(node_kind(child), at));
    }
    Ok(child)
}

/// Store `value` under `key`; true when it replaced a container
fn insert(node: &mut Value, key: &str, value: Value, path: &KeyPath) -> Result<bool, MappingError> {
    let parent_path = &path.keys()[..path.len() - 1];
    let previous = match node {
        Value::Object(map) => map.insert(key.to_string(), value),
        Value::Array(items) => {
            let index = array_index(key).ok_or_else(|| conflict("array", parent_path))?;
            if index < items.len() {
                Some(std::mem::replace(&mut items[index], value))
            } else {
                pad_to(items, index, parent_path)?;
                items.push(value);
                None
            }
        }
        other => return Err(conflict(node_kind(other), parent_path)),
    };
    Ok(previous.as_ref().is_some_and(is_container))
}

fn conflict(kind: &'static str, at: &[String]) -> MappingError {
    MappingError::PathConflict {
        kind,
        path: at.iter().map(String::as_str).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(keys: &[&str]) -> KeyPath {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_get() {
        let tree = json!({"a": [{"b": 1}]});
        assert_eq!(get(&tree, &path(&["a", "0", "b"])), Some(&json!(1)));
        assert_eq!(get(&tree, &path(&["a", "1"])), None);
        assert_eq!(get(&tree, &path(&["a", "x"])), None);
        assert_eq!(get(&tree, &KeyPath::new()), Some(&tree));
    }

    #[test]
    fn test_write_creates_objects() {
        let mut tree = json!({});
        let mut writer = TreeWriter::new(&mut tree);
        writer.write(&path(&["a", "b", "c"]), json!(1)).unwrap();
        writer.finish();
        assert_eq!(tree, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_write_creates_arrays_for_indices() {
        let mut tree = json!({});
        let mut writer = TreeWriter::new(&mut tree);
        writer.write(&path(&["list", "0"]), json!("x")).unwrap();
        writer.write(&path(&["list", "1"]), json!("y")).unwrap();
        writer.write(&path(&["list", "3", "z"]), json!(true)).unwrap();
        writer.finish();
        assert_eq!(tree, json!({"list": ["x", "y", null, {"z": true}]}));
    }

    #[test]
    fn test_write_replaces_existing() {
        let mut tree = json!({"a": 1, "b": [1, 2]});
        let mut writer = TreeWriter::new(&mut tree);
        writer.write(&path(&["a"]), json!(2)).unwrap();
        writer.write(&path(&["b", "0"]), json!(9)).unwrap();
        writer.finish();
        assert_eq!(tree, json!({"a": 2, "b": [9, 2]}));
    }

    #[test]
    fn test_write_through_leaf_conflicts() {
        let mut tree = json!({"a": 1});
        let mut writer = TreeWriter::new(&mut tree);
        let err = writer.write(&path(&["a", "b"]), json!(2)).unwrap_err();
        assert_eq!(err.to_string(), "cannot write through leaf at a");
    }

    #[test]
    fn test_write_named_key_into_array_conflicts() {
        let mut tree = json!({"a": [1]});
        let mut writer = TreeWriter::new(&mut tree);
        let err = writer.write(&path(&["a", "name"]), json!(2)).unwrap_err();
        assert_eq!(err.to_string(), "cannot write through array at a");
    }

    #[test]
    fn test_write_empty_path() {
        let mut tree = json!({});
        let mut writer = TreeWriter::new(&mut tree);
        assert_eq!(writer.write(&KeyPath::new(), json!(1)), Err(MappingError::EmptyPath));
    }

    #[test]
    fn test_remove_object_member_keeps_order() {
        let mut tree = json!({"a": 1, "b": 2, "c": 3});
        let mut writer = TreeWriter::new(&mut tree);
        assert_eq!(writer.remove(&path(&["a"])), Some(json!(1)));
        writer.write(&path(&["a"]), json!(4)).unwrap();
        writer.finish();
        let keys: Vec<&String> = tree.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_removed_array_slots_are_compacted() {
        let mut tree = json!({"items": [1, 2, 3, 4]});
        let mut writer = TreeWriter::new(&mut tree);
        writer.remove(&path(&["items", "1"]));
        writer.remove(&path(&["items", "3"]));
        assert!(writer.is_vacated(&path(&["items", "1"])));
        assert_eq!(writer.root(), &json!({"items": [1, null, 3, null]}));
        writer.finish();
        assert_eq!(tree, json!({"items": [1, 3]}));
    }

    #[test]
    fn test_refilled_slot_survives_compaction() {
        let mut tree = json!([1, 2]);
        let mut writer = TreeWriter::new(&mut tree);
        writer.remove(&path(&["0"]));
        writer.write(&path(&["0"]), json!("one")).unwrap();
        writer.remove(&path(&["1"]));
        writer.finish();
        assert_eq!(tree, json!(["one"]));
    }

    #[test]
    fn test_writing_through_vacated_slot_revives_it() {
        let mut tree = json!({"a": [[], 5]});
        let mut writer = TreeWriter::new(&mut tree);
        writer.remove(&path(&["a", "0"]));
        writer.write(&path(&["a", "0", "x"]), json!(1)).unwrap();
        writer.finish();
        assert_eq!(tree, json!({"a": [{"x": 1}, 5]}));
    }

    #[test]
    fn test_compaction_orders_indices_numerically() {
        let mut tree = json!([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        let mut writer = TreeWriter::new(&mut tree);
        writer.remove(&path(&["2"]));
        writer.remove(&path(&["10"]));
        writer.remove(&path(&["9"]));
        writer.finish();
        assert_eq!(tree, json!([0, 1, 3, 4, 5, 6, 7, 8, 11]));
    }

    #[test]
    fn test_oversized_gap_is_refused() {
        let mut tree = json!({"list": [1]});
        let mut writer = TreeWriter::new(&mut tree);
        let err = writer
            .write(&path(&["list", "1000000000000000000"]), json!(2))
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::IndexTooFar {
                index: 1_000_000_000_000_000_000,
                path: path(&["list"]),
            }
        );
        let err = writer
            .write(&path(&["list", "99999999999", "x"]), json!(2))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "array index 99999999999 is too far past the end of the array at list"
        );
        writer.finish();
        assert_eq!(tree, json!({"list": [1]}));
    }

    #[test]
    fn test_gap_limit_is_relative_to_length() {
        let mut tree = json!([]);
        let mut writer = TreeWriter::new(&mut tree);
        let first = MAX_INDEX_GAP.to_string();
        let second = (2 * MAX_INDEX_GAP + 1).to_string();
        writer.write(&path(&[first.as_str()]), json!(1)).unwrap();
        writer.write(&path(&[second.as_str()]), json!(2)).unwrap();
        let third = (4 * MAX_INDEX_GAP).to_string();
        assert!(writer.write(&path(&[third.as_str()]), json!(3)).is_err());
        writer.finish();
        assert_eq!(tree.as_array().map(Vec::len), Some(2 * MAX_INDEX_GAP + 2));
    }

    #[test]
    fn test_compaction_keeps_written_indices() {
        let mut tree = json!({"a": ["x", "y"]});
        let mut writer = TreeWriter::new(&mut tree);
        let moved = writer.remove(&path(&["a", "0"])).unwrap();
        writer.write(&path(&["a", "5"]), moved).unwrap();
        writer.finish();
        assert_eq!(tree, json!({"a": [null, "y", null, null, null, "x"]}));
    }

    #[test]
    fn test_compaction_past_written_indices() {
        let mut tree = json!({"a": ["x", {}, "z", "w"]});
        let mut writer = TreeWriter::new(&mut tree);
        writer.remove(&path(&["a", "0"]));
        writer.remove(&path(&["a", "3"]));
        writer.write(&path(&["a", "1", "deep"]), json!(true)).unwrap();
        writer.finish();
        assert_eq!(tree, json!({"a": [null, {"deep": true}, "z"]}));
    }

    #[test]
    fn test_nested_arrays_compact_inside_out() {
        let mut tree = json!([[1, 2, 3], "drop", [4, 5]]);
        let mut writer = TreeWriter::new(&mut tree);
        writer.remove(&path(&["1"]));
        writer.remove(&path(&["0", "1"]));
        writer.remove(&path(&["2", "0"]));
        writer.finish();
        assert_eq!(tree, json!([[1, 3], [5]]));
    }

    #[test]
    fn test_remove_missing() {
        let mut tree = json!({"a": [1]});
        let mut writer = TreeWriter::new(&mut tree);
        assert_eq!(writer.remove(&path(&["b"])), None);
        assert_eq!(writer.remove(&path(&["a", "5"])), None);
        assert_eq!(writer.remove(&KeyPath::new()), None);
    }
}
