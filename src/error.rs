//! Error types for encoding, decoding and document I/O.
//!
//! Every failure is surfaced to the immediate caller as one [`Error`] value.
//! Nothing is retried and there is no partial-result fallback.
//!
//! ## Error Categories
//!
//! - **Type mismatches**: an atom constructor was given input it cannot represent
//! - **Parse errors**: malformed canonical text, reported with byte offset, line and column
//! - **Format mismatches**: a notation applied to a variant it does not support
//! - **Unsupported notations**: an unknown notation name
//! - **Invalid paths**: a document path without the `.ifamily` extension
//! - **I/O errors**: storage failures while reading or writing documents
//!
//! ## Examples
//!
//! ```rust
//! use ifamily::{decode, Error};
//!
//! let result = decode("@date(\"2024-01-01\"");
//! assert!(matches!(result, Err(Error::Parse { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A constructor was given a value that cannot represent the target type
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Malformed canonical text
    #[error("Parse error at offset {offset} (line {line}, column {col}): {msg}")]
    Parse {
        offset: usize,
        line: usize,
        col: usize,
        msg: String,
    },

    /// A notation was applied to a variant it cannot render
    #[error("Notation '{notation}' cannot render a {found} value")]
    FormatMismatch { notation: String, found: String },

    /// Unknown notation name
    #[error("Unsupported notation: {0}")]
    UnsupportedNotation(String),

    /// Document path does not carry the required extension
    #[error("Invalid path '{path}': documents must use the {extension} extension")]
    InvalidPath { path: String, extension: String },

    /// Storage failure while reading or writing a document
    #[error("IO error on '{path}': {msg}")]
    Io { path: String, msg: String },

    /// Custom error raised through serde
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ifamily::Error;
    ///
    /// let err = Error::type_mismatch("date", "\"not-a-date\"");
    /// assert!(err.to_string().contains("expected date"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a parse error at the given byte offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ifamily::Error;
    ///
    /// let err = Error::parse(12, 1, 13, "expected ')'");
    /// assert!(err.to_string().contains("offset 12"));
    /// ```
    pub fn parse(offset: usize, line: usize, col: usize, msg: &str) -> Self {
        Error::Parse {
            offset,
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a format mismatch error.
    pub fn format_mismatch(notation: &str, found: &str) -> Self {
        Error::FormatMismatch {
            notation: notation.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported notation error.
    pub fn unsupported_notation(name: &str) -> Self {
        Error::UnsupportedNotation(name.to_string())
    }

    /// Creates an invalid path error.
    pub fn invalid_path(path: &str, extension: &str) -> Self {
        Error::InvalidPath {
            path: path.to_string(),
            extension: extension.to_string(),
        }
    }

    /// Creates an I/O error for a failed read or write.
    pub fn io(path: &str, msg: &str) -> Self {
        Error::Io {
            path: path.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the byte offset of a parse error.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Parse { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
