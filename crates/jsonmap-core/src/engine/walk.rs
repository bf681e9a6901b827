//! Depth-first leaf traversal
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use crate::path::KeyPath;
use serde_json::Value;

pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// A node with no enumerable children: a scalar or an empty container
pub fn is_leaf(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => true,
    }
}

/// Visit every leaf below `root` in document order.
///
/// Object members come in insertion order and array elements in index order.
/// The root itself is never visited, even when it is an empty container.
pub fn for_each_leaf<'v, E, F>(root: &'v Value, mut visit: F) -> Result<(), E>
where
    F: FnMut(&KeyPath, &'v Value) -> Result<(), E>,
{
    let mut path = KeyPath::new();
    walk_children(root, &mut path, &mut visit)
}

fn walk_children<'v, E, F>(node: &'v Value, path: &mut KeyPath, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&KeyPath, &'v Value) -> Result<(), E>,
{
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(key.as_str());
                let result = walk_node(child, path, visit);
                path.pop();
                result?;
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(index.to_string());
                let result = walk_node(child, path, visit);
                path.pop();
                result?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn walk_node<'v, E, F>(node: &'v Value, path: &mut KeyPath, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&KeyPath, &'v Value) -> Result<(), E>,
{
    if is_leaf(node) {
        visit(path, node)
    } else {
        walk_children(node, path, visit)
    }
}

/// Collect every leaf with its key-path, in document order
pub fn leaves(root: &Value) -> Vec<(KeyPath, &Value)> {
    let mut found = Vec::new();
    let _ = for_each_leaf(root, |path, value| {
        found.push((path.clone(), value));
        Ok::<(), std::convert::Infallible>(())
    });
    found
}

/// Key-paths of every leaf, in document order
pub fn leaf_paths(root: &Value) -> Vec<KeyPath> {
    leaves(root).into_iter().map(|(path, _)| path).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_order() {
        let tree = json!({"b": 1, "a": {"y": [10, 20], "x": null}, "c": "s"});
        let paths: Vec<String> = leaf_paths(&tree).iter().map(ToString::to_string).collect();
        assert_eq!(paths, vec!["b", "a.y[0]", "a.y[1]", "a.x", "c"]);
    }

    #[test]
    fn test_empty_containers_are_leaves() {
        let tree = json!({"list": [], "map": {}, "full": [{}]});
        let found = leaves(&tree);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0], (KeyPath::from(["list"]), &json!([])));
        assert_eq!(found[1], (KeyPath::from(["map"]), &json!({})));
        assert_eq!(found[2], (KeyPath::from(["full", "0"]), &json!({})));
    }

    #[test]
    fn test_root_is_never_visited() {
        assert!(leaves(&json!({})).is_empty());
        assert!(leaves(&json!([])).is_empty());
        assert!(leaves(&json!(7)).is_empty());
    }

    #[test]
    fn test_visit_error_stops_walk() {
        let tree = json!({"a": 1, "b": 2, "c": 3});
        let mut seen = Vec::new();
        let result = for_each_leaf(&tree, |path, _| {
            seen.push(path.to_string());
            if path.keys()[0] == "b" {
                Err("stop")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("stop"));
        assert_eq!(seen, vec!["a", "b"]);
    }
}
