//! Reference-map rules: deciding whether and where a leaf is written
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use crate::path::{parse_path, KeyPath, PathError};
use serde_json::Value;

/// Result of evaluating a reference-map rule for one leaf
#[derive(Debug, Clone, PartialEq)]
pub enum RefTarget {
    /// The rule does not apply; the leaf is left alone
    NoMatch,
    /// Write the leaf at this key-path
    Path(KeyPath),
    /// A destination described as JSON, checked by the walker.
    ///
    /// Arrays of strings and numbers are key-paths, `null` and `false` mean
    /// no match, anything else is a rule contract violation.
    Json(Value),
}

impl RefTarget {
    /// Whether the rule declined the leaf, either outright or with a JSON `null`/`false`
    pub fn is_no_match(&self) -> bool {
        matches!(
            self,
            RefTarget::NoMatch | RefTarget::Json(Value::Null) | RefTarget::Json(Value::Bool(false))
        )
    }
}

impl From<KeyPath> for RefTarget {
    fn from(path: KeyPath) -> Self {
        RefTarget::Path(path)
    }
}

impl From<Option<KeyPath>> for RefTarget {
    fn from(path: Option<KeyPath>) -> Self {
        path.map_or(RefTarget::NoMatch, RefTarget::Path)
    }
}

impl From<Value> for RefTarget {
    fn from(value: Value) -> Self {
        RefTarget::Json(value)
    }
}

/// Maps the key-path of a source leaf to its destination
pub trait RefMap: Send + Sync {
    fn resolve(&self, source: &KeyPath) -> RefTarget;
}

impl<F, R> RefMap for F
where
    F: Fn(&KeyPath) -> R + Send + Sync,
    R: Into<RefTarget>,
{
    fn resolve(&self, source: &KeyPath) -> RefTarget {
        self(source).into()
    }
}

/// Matches exactly one source key-path and relocates it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    from: KeyPath,
    to: KeyPath,
}

impl PathRule {
    pub fn new(from: KeyPath, to: KeyPath) -> Self {
        Self { from, to }
    }

    pub fn from_path(&self) -> &KeyPath {
        &self.from
    }

    pub fn to_path(&self) -> &KeyPath {
        &self.to
    }
}

impl RefMap for PathRule {
    fn resolve(&self, source: &KeyPath) -> RefTarget {
        if *source == self.from {
            RefTarget::Path(self.to.clone())
        } else {
            RefTarget::NoMatch
        }
    }
}

/// Build a rule from path expressions; without `to` the leaf keeps its path
pub fn path_rule(from: &str, to: Option<&str>) -> Result<PathRule, PathError> {
    let from = parse_path(from)?;
    let to = match to {
        Some(expression) => parse_path(expression)?,
        None => from.clone(),
    };
    Ok(PathRule::new(from, to))
}

/// Build a rule from key-paths that are already canonical
pub fn ref_rule(from: KeyPath, to: Option<KeyPath>) -> PathRule {
    let to = to.unwrap_or_else(|| from.clone());
    PathRule::new(from, to)
}

/// Matches every leaf and keeps its key-path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllRule;

impl RefMap for AllRule {
    fn resolve(&self, source: &KeyPath) -> RefTarget {
        RefTarget::Path(source.clone())
    }
}

pub fn all_rule() -> AllRule {
    AllRule
}

/// Candidate rules tried in order; the first one that matches wins
#[derive(Default)]
pub struct FirstMatch {
    rules: Vec<Box<dyn RefMap>>,
}

impl FirstMatch {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a lower-priority candidate
    pub fn or(mut self, rule: impl RefMap + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RefMap for FirstMatch {
    fn resolve(&self, source: &KeyPath) -> RefTarget {
        for (index, rule) in self.rules.iter().enumerate() {
            let target = rule.resolve(source);
            if !target.is_no_match() {
                log::trace!("rule {} matched {}", index, source);
                return target;
            }
        }
        RefTarget::NoMatch
    }
}

impl std::fmt::Debug for FirstMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstMatch")
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Aggregate boxed rules into a [`FirstMatch`]
pub fn first_match(rules: Vec<Box<dyn RefMap>>) -> FirstMatch {
    FirstMatch { rules }
}
