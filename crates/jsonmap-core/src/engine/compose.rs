//! Chaining mapping functions of one flavor
//!
//! Composed maps all read the original source; each stage extends the tree the
//! previous stage produced. Composed transforms form a pipeline over one tree.
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use super::error::MappingError;
use super::mapping::{ensure_container, MapFunction, TransformFunction};
use serde_json::Value;

/// Several map functions run against the same source, left to right
#[derive(Default)]
pub struct ComposedMap {
    stages: Vec<Box<dyn MapFunction>>,
}

impl ComposedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage
    pub fn then(mut self, stage: impl MapFunction + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl MapFunction for ComposedMap {
    fn map_onto(&self, source: &Value, destination: Value) -> Result<Value, MappingError> {
        ensure_container(source)?;
        self.stages
            .iter()
            .enumerate()
            .try_fold(destination, |tree, (index, stage)| {
                log::trace!("running map stage {}", index);
                stage.map_onto(source, tree)
            })
    }
}

/// Several transform functions applied one after another to the same tree
#[derive(Default)]
pub struct ComposedTransform {
    stages: Vec<Box<dyn TransformFunction>>,
}

impl ComposedTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage
    pub fn then(mut self, stage: impl TransformFunction + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl TransformFunction for ComposedTransform {
    fn transform(&self, source: &mut Value) -> Result<(), MappingError> {
        ensure_container(source)?;
        for (index, stage) in self.stages.iter().enumerate() {
            log::trace!("running transform stage {}", index);
            stage.transform(source)?;
        }
        Ok(())
    }
}

impl MapFunction for Box<dyn MapFunction> {
    fn map_onto(&self, source: &Value, destination: Value) -> Result<Value, MappingError> {
        (**self).map_onto(source, destination)
    }
}

impl TransformFunction for Box<dyn TransformFunction> {
    fn transform(&self, source: &mut Value) -> Result<(), MappingError> {
        (**self).transform(source)
    }
}

/// Compose map functions; the result maps like any single stage
pub fn compose_map(stages: Vec<Box<dyn MapFunction>>) -> ComposedMap {
    ComposedMap { stages }
}

/// Compose transform functions into a pipeline
pub fn compose_transform(stages: Vec<Box<dyn TransformFunction>>) -> ComposedTransform {
    ComposedTransform { stages }
}
