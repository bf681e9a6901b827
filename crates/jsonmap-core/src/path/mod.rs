//! Path expressions and canonical key-paths
//!
//! This module turns access expressions such as `color.hue`, `items[0]` or
//! `color["1"]` into [`KeyPath`]s, the ordered string keys the mapping engine
//! uses to address leaves.
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod key_path;
pub mod parser;


pub use error::PathError;
pub use key_path::{array_index, KeyPath};
pub use parser::Parser;

/// Parse a path expression into its canonical key-path
pub fn parse_path(expression: &str) -> Result<KeyPath, PathError> {
    Parser::new(expression)?.parse()
}
