//! Mapping engine
//!
//! Walks the leaves of a JSON tree, asks the reference-map rule where each one
//! goes, threads its value through the value-map chain and writes the result,
//! either into a new tree ([`MapFn`]) or back into the input ([`TransformFn`]).
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

pub mod compose;
pub mod error;
pub mod mapping;
pub mod tree;
pub mod walk;

pub use compose::{compose_map, compose_transform, ComposedMap, ComposedTransform};
pub use error::MappingError;
pub use mapping::{
    build_mapping, MapFn, MapFunction, Mapping, MappingBuilder, MappingMode, TransformFn,
    TransformFunction,
};
pub use walk::{for_each_leaf, is_leaf, leaf_paths, leaves};
