//! Canonical key-paths
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use super::error::PathError;
use super::parser::{is_identifier_name, is_reserved_word, Parser};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered list of string keys locating a node from the root of a tree
///
/// Array positions are stored as their decimal string form, so `["items", "0"]`
/// addresses the first element of the `items` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Create an empty key-path (the root)
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a key
    pub fn push(&mut self, key: impl Into<String>) {
        self.0.push(key.into());
    }

    /// Remove and return the last key
    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    /// Return a new key-path extended by `key`
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut keys = Vec::with_capacity(self.0.len() + 1);
        keys.extend(self.0.iter().cloned());
        keys.push(key.into());
        Self(keys)
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Split into the parent keys and the last key
    pub fn split_last(&self) -> Option<(&String, &[String])> {
        self.0.split_last()
    }

    /// Whether `prefix` addresses this node or one of its ancestors
    pub fn starts_with(&self, prefix: &KeyPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Largest position written as a bare number; beyond it `f64` loses precision.
const MAX_SAFE_INDEX: u64 = 1 << 53;

/// Interpret `key` as an array position
///
/// Only canonical decimal forms count: `"0"` and `"12"` are indices, `"01"`,
/// `"+1"` and `"-1"` are not.
pub fn array_index(key: &str) -> Option<usize> {
    let bytes = key.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    key.parse().ok()
}

impl AsRef<[String]> for KeyPath {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

impl From<Vec<&str>> for KeyPath {
    fn from(keys: Vec<&str>) -> Self {
        keys.into_iter().collect()
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(keys: [&str; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a KeyPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for KeyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::new(s)?.parse()
    }
}

/// Renders the key-path as an access expression that parses back to it.
///
/// Identifier-like keys use dot notation, array positions use `[n]` and
/// everything else a quoted bracket. The empty key-path renders as `""`.
impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            let dotted = is_identifier_name(key) && (i > 0 || !is_reserved_word(key));
            if dotted {
                if i > 0 {
                    f.write_str(".")?;
                }
                f.write_str(key)?;
            } else if array_index(key).is_some_and(|index| (index as u64) < MAX_SAFE_INDEX) {
                write!(f, "[{}]", key)?;
            } else {
                let quoted = serde_json::to_string(key).map_err(|_| fmt::Error)?;
                write!(f, "[{}]", quoted)?;
            }
        }
        Ok(())
    }
}
