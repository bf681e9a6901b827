//! Error types for path expression parsing
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Failure to turn a path expression into a key-path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The expression was empty or only whitespace
    #[error("path cannot be empty")]
    Empty,

    /// The expression is not a single member-access chain
    #[error("couldn't convert path to reference list: {input:?} ({reason} at position {position})")]
    Syntax {
        /// The full expression text
        input: String,
        /// Byte offset where parsing stopped
        position: usize,
        /// Short description of what went wrong
        reason: String,
    },
}

impl PathError {
    /// Create a syntax error at `position` of `input`
    pub fn syntax(input: impl Into<String>, position: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            input: input.into(),
            position,
            reason: reason.into(),
        }
    }

    /// The offending expression, if there was one
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Syntax { input, .. } => Some(input),
        }
    }

    /// Get the error message with a caret under the failing position
    pub fn detailed_message(&self) -> String {
        match self {
            Self::Empty => self.to_string(),
            Self::Syntax { input, position, .. } => {
                let mut result = self.to_string();
                result.push_str(&format!("\nInput: {}", input));
                let column = input
                    .char_indices()
                    .take_while(|(offset, _)| offset < position)
                    .count();
                result.push_str(&format!("\n       {}^", " ".repeat(column)));
                result
            }
        }
    }
}
