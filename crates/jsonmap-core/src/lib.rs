//! Jsonmap Core - Rule-driven restructuring of JSON trees
//!
//! This crate walks every leaf of a JSON value, decides through a
//! reference-map rule whether and where the leaf should go, threads its value
//! through a chain of value-map rules and writes the result, either into a new
//! tree or back into the input.
//!
//! # Main Components
//!
//! - **Paths**: access expressions such as `items[0]["full name"]` parsed into
//!   canonical [`KeyPath`]s
//! - **Rules**: reference-map and value-map builders; plain closures work too
//! - **Engine**: map (copy into a new tree) and transform (rewrite in place)
//!   functions, plus composition of either kind
//! - **Config**: mapping documents that describe rules as JSON
//!
//! # Example
//!
//! ```
//! use jsonmap_core::{build_mapping, path_rule, skip_if_equals, MappingMode};
//! use serde_json::json;
//!
//! fn example() -> jsonmap_core::Result<()> {
//!     let mapping = build_mapping(
//!         MappingMode::Map,
//!         path_rule("color", Some("palette.hue"))?,
//!         skip_if_equals(json!("blue")),
//!     );
//!     let result = mapping.apply(json!({"color": "orange", "shade": "amber"}))?;
//!     assert_eq!(result, json!({"palette": {"hue": "orange"}}));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

pub mod config;
pub mod engine;
pub mod error;
pub mod path;
pub mod rules;

// Re-export main types for convenience
pub use config::MappingDocument;
pub use engine::{
    build_mapping, compose_map, compose_transform, ComposedMap, ComposedTransform, MapFn,
    MapFunction, Mapping, MappingBuilder, MappingError, MappingMode, TransformFn,
    TransformFunction,
};
pub use error::{Error, ErrorKind, Result};
pub use path::{parse_path, KeyPath, PathError};
pub use rules::{
    all_rule, first_match, json_eq, path_rule, ref_rule, skip_if_equals, value_equals, AllRule,
    FirstMatch, PathRule, RefMap, RefTarget, SkipIfEquals, ValueEquals, ValueMap, ValueMaps,
    ValueOutcome,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
