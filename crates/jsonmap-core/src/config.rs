//! Declarative mapping documents
//!
//! Rule tables can live in configuration instead of code. A document names a
//! mode, a reference-map rule (or a list of them, tried in order) and an
//! optional value-map chain:
//!
//! ```json
//! {
//!   "mode": "map",
//!   "ref": [{"path": "color", "to": "hue"}, {"ref": ["shade"]}, "all"],
//!   "values": [{"equals": 1, "replace": "orange"}, {"skip_if": "blue"}]
//! }
//! ```
//!
//! A composition lists whole documents as stages:
//! `{"compose": "transform", "stages": [...]}`.
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use crate::engine::{compose_map, compose_transform, Mapping, MappingError, MappingMode};
use crate::error::{Error, Result};
use crate::path::KeyPath;
use crate::rules::{
    all_rule, first_match, path_rule, ref_rule, skip_if_equals, value_equals, RefMap, ValueMap,
    ValueMaps,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// A single mapping or a composition, as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingDocument {
    Compose {
        compose: MappingMode,
        stages: Vec<Value>,
    },
    Single {
        #[serde(default)]
        mode: MappingMode,
        #[serde(rename = "ref", default)]
        ref_map: Value,
        #[serde(default)]
        values: Value,
    },
}

const SINGLE_KEYS: &[&str] = &["mode", "ref", "values"];
const COMPOSE_KEYS: &[&str] = &["compose", "stages"];

impl MappingDocument {
    /// Parse a document from JSON text
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input).map_err(|e| Error::Json {
            message: format!("Failed to parse mapping document: {}", e),
            source: e,
        })?;
        Self::from_value(value)
    }

    /// Read and parse a document from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
            message: format!("Failed to read mapping document from {:?}", path),
            source: e,
        })?;
        log::debug!("loaded mapping document from {:?}", path);
        Self::from_json_str(&content)
    }

    /// Interpret an already-parsed JSON value as a document
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(fields) = &value else {
            return Err(MappingError::not_an_object(&value).into());
        };

        let known = if fields.contains_key("compose") {
            COMPOSE_KEYS
        } else {
            SINGLE_KEYS
        };
        for key in fields.keys().filter(|key| !known.contains(&key.as_str())) {
            log::warn!("ignoring unknown mapping document key '{}'", key);
        }

        serde_json::from_value(value).map_err(|e| Error::Json {
            message: format!("Failed to parse mapping document: {}", e),
            source: e,
        })
    }

    /// Mode of the mapping this document builds
    pub fn mode(&self) -> MappingMode {
        match self {
            MappingDocument::Compose { compose, .. } => *compose,
            MappingDocument::Single { mode, .. } => *mode,
        }
    }

    /// Build the mapping function the document describes
    pub fn build(&self) -> Result<Mapping> {
        match self {
            MappingDocument::Single {
                mode,
                ref_map,
                values,
            } => {
                let ref_map = build_ref_map(ref_map)?;
                let value_maps = build_value_maps(values)?;
                Ok(Mapping::from_boxed(*mode, ref_map, value_maps))
            }
            MappingDocument::Compose { compose, stages } => build_composition(*compose, stages),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RefRuleSpec {
    Path {
        path: String,
        #[serde(default)]
        to: Option<String>,
    },
    Ref {
        #[serde(rename = "ref")]
        from: KeyPath,
        #[serde(default)]
        to: Option<KeyPath>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueRuleSpec {
    Replace { equals: Value, replace: Value },
    SkipIf { skip_if: Value },
}

/// Build one reference-map rule; `None` when `rule` has no rule shape
fn ref_rule_from(rule: &Value) -> Result<Option<Box<dyn RefMap>>> {
    if rule.as_str() == Some("all") {
        return Ok(Some(Box::new(all_rule())));
    }
    if !rule.is_object() {
        return Ok(None);
    }
    match RefRuleSpec::deserialize(rule) {
        Ok(RefRuleSpec::Path { path, to }) => Ok(Some(Box::new(path_rule(&path, to.as_deref())?))),
        Ok(RefRuleSpec::Ref { from, to }) => Ok(Some(Box::new(ref_rule(from, to)))),
        Err(_) => Ok(None),
    }
}

fn build_ref_map(spec: &Value) -> Result<Box<dyn RefMap>> {
    if let Value::Array(items) = spec {
        let mut rules = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let rule =
                ref_rule_from(item)?.ok_or_else(|| MappingError::not_callable(index, item))?;
            rules.push(rule);
        }
        return Ok(Box::new(first_match(rules)));
    }

    Ok(ref_rule_from(spec)?.ok_or_else(|| MappingError::not_a_function(spec))?)
}

fn value_rule_from(rule: &Value) -> Option<Box<dyn ValueMap>> {
    if !rule.is_object() {
        return None;
    }
    match ValueRuleSpec::deserialize(rule).ok()? {
        ValueRuleSpec::Replace { equals, replace } => Some(Box::new(value_equals(equals, replace))),
        ValueRuleSpec::SkipIf { skip_if } => Some(Box::new(skip_if_equals(skip_if))),
    }
}

fn build_value_maps(spec: &Value) -> Result<ValueMaps> {
    match spec {
        Value::Null => Ok(ValueMaps::none()),
        Value::Array(items) => {
            let mut rules = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let rule =
                    value_rule_from(item).ok_or_else(|| MappingError::not_callable(index, item))?;
                rules.push(rule);
            }
            Ok(ValueMaps::many(rules))
        }
        other => {
            let rule =
                value_rule_from(other).ok_or_else(|| MappingError::not_an_array_or_function(other))?;
            Ok(ValueMaps::from(rule))
        }
    }
}

fn build_composition(mode: MappingMode, stages: &[Value]) -> Result<Mapping> {
    log::debug!("composing {} {} stages", stages.len(), mode);
    let mut maps = Vec::new();
    let mut transforms = Vec::new();

    for (index, stage) in stages.iter().enumerate() {
        let document = stage_document(mode, index, stage)?;
        match document.build()? {
            Mapping::Map(function) => maps.push(function),
            Mapping::Transform(function) => transforms.push(function),
        }
    }

    Ok(match mode {
        MappingMode::Map => Mapping::Map(Box::new(compose_map(maps))),
        MappingMode::Transform => Mapping::Transform(Box::new(compose_transform(transforms))),
    })
}

fn stage_document(mode: MappingMode, index: usize, stage: &Value) -> Result<MappingDocument> {
    if !stage.is_object() {
        return Err(MappingError::not_callable(index, stage).into());
    }
    match MappingDocument::from_value(stage.clone()) {
        Ok(document) if document.mode() == mode => Ok(document),
        _ => Err(MappingError::not_callable(index, stage).into()),
    }
}
