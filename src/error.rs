//! Error types for corpcode
//!
//! This module defines all error types used throughout the library.
//! Every error is fatal: a conversion either completes or aborts with one of these.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using corpcode Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for corpcode operations
#[derive(Error, Debug)]
pub enum Error {
    /// The input is missing, unreadable, or not well-formed XML
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A `<list>` record lacks one of its required children
    #[error("missing field: <{field}> not found in record #{record}")]
    MissingField {
        /// Name of the absent child element
        field: &'static str,
        /// 1-based position of the record in document order
        record: usize,
    },

    /// A record's `<stock_code>` is present but holds no text
    #[error("empty field: <{field}> has no text in record #{record}")]
    EmptyField {
        /// Name of the empty child element
        field: &'static str,
        /// 1-based position of the record in document order
        record: usize,
    },

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// JSON rendering or reading error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The output file could not be written
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        /// Destination that was being written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// XML parsing error with context
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// File the document was read from
    pub location: Option<String>,
    /// Byte offset into the document
    pub position: Option<usize>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            position: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the byte position
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        if let Some(pos) = self.position {
            write!(f, "\n\nPosition: byte {}", pos)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl Error {
    /// Attach a file location to a parse error; other variants pass through
    pub(crate) fn at_location(self, location: impl Into<String>) -> Self {
        match self {
            Error::Parse(err) if err.location.is_none() => {
                Error::Parse(err.with_location(location))
            }
            other => other,
        }
    }
}
