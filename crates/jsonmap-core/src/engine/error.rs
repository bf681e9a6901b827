//! Error types for building and running mappings
//!
//! Messages follow one stable shape, `<problem>: <offending value>`, with the
//! value printed as compact JSON.
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use crate::path::KeyPath;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// A reference-map rule was missing or is not a rule
    #[error("not a function: {found}")]
    NotAFunction { found: String },

    /// The value-map position held neither a rule nor a list of rules
    #[error("not an array or function: {found}")]
    NotAnArrayOrFunction { found: String },

    /// An element of a rule or stage list is not callable
    #[error("index {index} is not a function: {found}")]
    NotCallable { index: usize, found: String },

    /// The tree handed to a mapping (or a map seed) is not a container
    #[error("not an object: {found}")]
    NotAnObject { found: String },

    /// A reference-map rule produced something that is not a key-path
    #[error("not an array: {found}")]
    NotAnArray { found: String },

    /// A destination key-path runs through a node that cannot hold it
    #[error("cannot write through {kind} at {path}")]
    PathConflict { kind: &'static str, path: KeyPath },

    /// A destination index lies too far past the end of its array to pad
    #[error("array index {index} is too far past the end of the array at {path}")]
    IndexTooFar { index: usize, path: KeyPath },

    /// A reference-map rule asked for the tree root itself
    #[error("cannot write to an empty key-path")]
    EmptyPath,
}

impl MappingError {
    pub fn not_a_function(found: &Value) -> Self {
        Self::NotAFunction { found: found.to_string() }
    }

    pub fn not_an_array_or_function(found: &Value) -> Self {
        Self::NotAnArrayOrFunction { found: found.to_string() }
    }

    pub fn not_callable(index: usize, found: &Value) -> Self {
        Self::NotCallable { index, found: found.to_string() }
    }

    pub fn not_an_object(found: &Value) -> Self {
        Self::NotAnObject { found: found.to_string() }
    }

    pub fn not_an_array(found: &Value) -> Self {
        Self::NotAnArray { found: found.to_string() }
    }

    /// Whether the error was raised while building rather than running a mapping
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::NotAFunction { .. } | Self::NotAnArrayOrFunction { .. } | Self::NotCallable { .. }
        )
    }
}
