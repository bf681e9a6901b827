//! Mapping functions: one reference-map rule plus a chain of value-map rules
//!
//! A [`MapFn`] copies matched leaves into a fresh destination tree; a
//! [`TransformFn`] relocates them inside the tree it is given. Both walk the
//! source once, in document order.
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use super::error::MappingError;
use super::tree::{self, TreeWriter};
use super::walk::{for_each_leaf, is_container, is_leaf, leaf_paths};
use crate::path::parser::number_key as float_key;
use crate::path::KeyPath;
use crate::rules::{first_match, RefMap, RefTarget, ValueMap, ValueMaps, ValueOutcome};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Whether a mapping builds a new tree or rewrites its input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingMode {
    #[default]
    Map,
    Transform,
}

impl fmt::Display for MappingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingMode::Map => write!(f, "map"),
            MappingMode::Transform => write!(f, "transform"),
        }
    }
}

/// Produces a destination tree from a source tree
pub trait MapFunction: Send + Sync {
    /// Map `source` into `destination`, extending whatever it already holds
    fn map_onto(&self, source: &Value, destination: Value) -> Result<Value, MappingError>;

    /// Map `source` into a new empty object
    fn map(&self, source: &Value) -> Result<Value, MappingError> {
        self.map_onto(source, Value::Object(Map::new()))
    }
}

/// Rewrites a tree in place
pub trait TransformFunction: Send + Sync {
    fn transform(&self, source: &mut Value) -> Result<(), MappingError>;
}

pub(crate) fn ensure_container(value: &Value) -> Result<(), MappingError> {
    if is_container(value) {
        Ok(())
    } else {
        Err(MappingError::not_an_object(value))
    }
}

/// Turn a JSON destination produced by a dynamic rule into a key-path
fn key_path_from_json(value: Value) -> Result<Option<KeyPath>, MappingError> {
    let items = match value {
        Value::Null | Value::Bool(false) => return Ok(None),
        Value::Array(items) => items,
        other => return Err(MappingError::not_an_array(&other)),
    };

    let mut path = KeyPath::new();
    for item in &items {
        match item {
            Value::String(key) => path.push(key.as_str()),
            Value::Number(number) => path.push(number_key(number)),
            _ => return Err(MappingError::not_an_array(&Value::Array(items.clone()))),
        }
    }
    Ok(Some(path))
}

fn number_key(number: &serde_json::Number) -> String {
    if let Some(n) = number.as_u64() {
        n.to_string()
    } else if let Some(n) = number.as_i64() {
        n.to_string()
    } else {
        float_key(number.as_f64().unwrap_or(f64::NAN))
    }
}

/// The rules shared by both mapping flavors
struct RuleSet {
    ref_map: Box<dyn RefMap>,
    value_maps: Vec<Box<dyn ValueMap>>,
}

impl RuleSet {
    fn new(ref_map: Box<dyn RefMap>, value_maps: ValueMaps) -> Self {
        Self {
            ref_map,
            value_maps: value_maps.into_vec(),
        }
    }

    /// Destination of the leaf at `source`, or `None` when no rule applies
    fn destination(&self, source: &KeyPath) -> Result<Option<KeyPath>, MappingError> {
        match self.ref_map.resolve(source) {
            RefTarget::NoMatch => Ok(None),
            RefTarget::Path(path) => Ok(Some(path)),
            RefTarget::Json(value) => key_path_from_json(value),
        }
    }

    /// Run the value chain; `None` when a rule aborted
    fn map_value(&self, value: Value) -> Option<Value> {
        let mut current = value;
        for rule in &self.value_maps {
            match rule.apply(current) {
                ValueOutcome::Keep(next) => current = next,
                ValueOutcome::Abort => return None,
            }
        }
        Some(current)
    }
}

#[derive(Debug, Default)]
struct WalkStats {
    visited: usize,
    skipped: usize,
    aborted: usize,
    written: usize,
}

impl WalkStats {
    fn log(&self, mode: MappingMode) {
        log::debug!(
            "{} walk finished: {} leaves visited, {} skipped, {} aborted, {} written",
            mode,
            self.visited,
            self.skipped,
            self.aborted,
            self.written
        );
    }
}

/// Copies matched leaves into a destination tree; the source is left untouched
pub struct MapFn {
    rules: RuleSet,
}

impl MapFn {
    pub fn new(ref_map: impl RefMap + 'static, value_maps: impl Into<ValueMaps>) -> Self {
        Self {
            rules: RuleSet::new(Box::new(ref_map), value_maps.into()),
        }
    }
}

impl MapFunction for MapFn {
    fn map_onto(&self, source: &Value, mut destination: Value) -> Result<Value, MappingError> {
        ensure_container(source)?;
        ensure_container(&destination)?;

        let mut stats = WalkStats::default();
        let mut writer = TreeWriter::new(&mut destination);

        let result: Result<(), MappingError> = for_each_leaf(source, |path, value| {
            stats.visited += 1;
            let Some(target) = self.rules.destination(path)? else {
                stats.skipped += 1;
                return Ok(());
            };
            match self.rules.map_value(value.clone()) {
                Some(mapped) => {
                    log::trace!("writing {} to {}", path, target);
                    writer.write(&target, mapped)?;
                    stats.written += 1;
                }
                None => {
                    log::trace!("value map aborted {}", path);
                    stats.aborted += 1;
                }
            }
            Ok(())
        });

        writer.finish();
        stats.log(MappingMode::Map);
        result.map(|()| destination)
    }
}

/// Relocates matched leaves within the tree it is given
pub struct TransformFn {
    rules: RuleSet,
}

impl TransformFn {
    pub fn new(ref_map: impl RefMap + 'static, value_maps: impl Into<ValueMaps>) -> Self {
        Self {
            rules: RuleSet::new(Box::new(ref_map), value_maps.into()),
        }
    }

    fn transform_leaf(
        &self,
        writer: &mut TreeWriter<'_>,
        path: &KeyPath,
        stats: &mut WalkStats,
    ) -> Result<(), MappingError> {
        // Earlier writes may have replaced or removed this leaf.
        if writer.is_vacated(path) {
            return Ok(());
        }
        let current = match tree::get(writer.root(), path) {
            Some(value) if is_leaf(value) => value,
            _ => {
                log::trace!("{} no longer holds a leaf", path);
                return Ok(());
            }
        };
        stats.visited += 1;

        let Some(target) = self.rules.destination(path)? else {
            stats.skipped += 1;
            return Ok(());
        };
        let Some(mapped) = self.rules.map_value(current.clone()) else {
            log::trace!("value map aborted {}", path);
            stats.aborted += 1;
            return Ok(());
        };

        log::trace!("moving {} to {}", path, target);
        writer.remove(path);
        writer.write(&target, mapped)?;
        stats.written += 1;
        Ok(())
    }
}

impl TransformFunction for TransformFn {
    fn transform(&self, source: &mut Value) -> Result<(), MappingError> {
        ensure_container(source)?;

        let paths = leaf_paths(source);
        let mut stats = WalkStats::default();
        let mut writer = TreeWriter::new(source);

        let result = paths
            .iter()
            .try_for_each(|path| self.transform_leaf(&mut writer, path, &mut stats));

        writer.finish();
        stats.log(MappingMode::Transform);
        result
    }
}

/// A reusable mapping function of either flavor
pub enum Mapping {
    Map(Box<dyn MapFunction>),
    Transform(Box<dyn TransformFunction>),
}

impl Mapping {
    /// Shorthand for a [`MapFn`]
    pub fn map(ref_map: impl RefMap + 'static, value_maps: impl Into<ValueMaps>) -> Self {
        Mapping::Map(Box::new(MapFn::new(ref_map, value_maps)))
    }

    /// Shorthand for a [`TransformFn`]
    pub fn transform(ref_map: impl RefMap + 'static, value_maps: impl Into<ValueMaps>) -> Self {
        Mapping::Transform(Box::new(TransformFn::new(ref_map, value_maps)))
    }

    pub(crate) fn from_boxed(
        mode: MappingMode,
        ref_map: Box<dyn RefMap>,
        value_maps: ValueMaps,
    ) -> Self {
        let rules = RuleSet::new(ref_map, value_maps);
        match mode {
            MappingMode::Map => Mapping::Map(Box::new(MapFn { rules })),
            MappingMode::Transform => Mapping::Transform(Box::new(TransformFn { rules })),
        }
    }

    pub fn builder(mode: MappingMode) -> MappingBuilder {
        MappingBuilder::new(mode)
    }

    pub fn mode(&self) -> MappingMode {
        match self {
            Mapping::Map(_) => MappingMode::Map,
            Mapping::Transform(_) => MappingMode::Transform,
        }
    }

    /// Run the mapping.
    ///
    /// A map returns a new tree and drops `source`; a transform returns
    /// `source` itself, rewritten.
    pub fn apply(&self, source: Value) -> Result<Value, MappingError> {
        match self {
            Mapping::Map(function) => function.map(&source),
            Mapping::Transform(function) => {
                let mut source = source;
                function.transform(&mut source)?;
                Ok(source)
            }
        }
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mapping::{:?}", self.mode())
    }
}

/// Build a mapping function of the given flavor
pub fn build_mapping(
    mode: MappingMode,
    ref_map: impl RefMap + 'static,
    value_maps: impl Into<ValueMaps>,
) -> Mapping {
    match mode {
        MappingMode::Map => Mapping::map(ref_map, value_maps),
        MappingMode::Transform => Mapping::transform(ref_map, value_maps),
    }
}

/// Builder for mappings assembled step by step
///
/// Each [`ref_map`](Self::ref_map) call adds a lower-priority candidate rule
/// and each [`value_map`](Self::value_map) call appends to the value chain.
pub struct MappingBuilder {
    mode: MappingMode,
    ref_maps: Vec<Box<dyn RefMap>>,
    value_maps: Vec<Box<dyn ValueMap>>,
}

impl MappingBuilder {
    pub fn new(mode: MappingMode) -> Self {
        Self {
            mode,
            ref_maps: Vec::new(),
            value_maps: Vec::new(),
        }
    }

    pub fn ref_map(mut self, rule: impl RefMap + 'static) -> Self {
        self.ref_maps.push(Box::new(rule));
        self
    }

    pub fn value_map(mut self, rule: impl ValueMap + 'static) -> Self {
        self.value_maps.push(Box::new(rule));
        self
    }

    /// Build the mapping; at least one reference-map rule is required
    pub fn build(mut self) -> Result<Mapping, MappingError> {
        let ref_map: Box<dyn RefMap> = match self.ref_maps.len() {
            0 => return Err(MappingError::not_a_function(&Value::Null)),
            1 => self.ref_maps.remove(0),
            _ => Box::new(first_match(self.ref_maps)),
        };
        Ok(Mapping::from_boxed(
            self.mode,
            ref_map,
            ValueMaps::many(self.value_maps),
        ))
    }
}
