//! Error types for the jsonmap core library
//!
//! Path and mapping failures keep their own error types; [`Error`] wraps them
//! together with the JSON and IO failures of loading mapping documents.
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use crate::engine::MappingError;
use crate::path::PathError;
use std::fmt;
use thiserror::Error;

/// Main error type for jsonmap operations
#[derive(Error, Debug)]
pub enum Error {
    /// A path expression could not be parsed
    #[error(transparent)]
    Path(#[from] PathError),

    /// A mapping could not be built or failed while running
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors while reading a mapping document
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad path expression
    Path,
    /// Bad rule, stage or mapping document
    Construction,
    /// Failure while a mapping ran
    Runtime,
    /// Malformed JSON
    Json,
    /// Unreadable document
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Path(_) => ErrorKind::Path,
            Error::Mapping(err) if err.is_construction_error() => ErrorKind::Construction,
            Error::Mapping(_) => ErrorKind::Runtime,
            Error::Json { .. } => ErrorKind::Json,
            Error::Io { .. } => ErrorKind::Io,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Path => write!(f, "path"),
            ErrorKind::Construction => write!(f, "construction"),
            ErrorKind::Runtime => write!(f, "runtime"),
            ErrorKind::Json => write!(f, "json"),
            ErrorKind::Io => write!(f, "io"),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err = Error::from(MappingError::not_an_object(&json!(1)));
        assert_eq!(err.to_string(), "not an object: 1");
        assert_eq!(err.kind(), ErrorKind::Runtime);

        let err = Error::from(PathError::Empty);
        assert_eq!(err.to_string(), "path cannot be empty");
        assert_eq!(err.kind(), ErrorKind::Path);
    }

    #[test]
    fn test_construction_kind() {
        let err = Error::from(MappingError::not_callable(0, &json!(3)));
        assert_eq!(err.kind(), ErrorKind::Construction);
        assert_eq!(err.kind().to_string(), "construction");
    }

    #[test]
    fn test_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(parse_err);
        assert!(err.to_string().starts_with("JSON error: "));
        assert_eq!(err.kind(), ErrorKind::Json);
    }
}
