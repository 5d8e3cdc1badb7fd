//! Resource loading utilities
//!
//! This module reads input documents into memory, enforcing size limits.
//! A file that is missing or unreadable is reported as a parse error.

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Resource loader for input documents
#[derive(Debug, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Get the limits in effect
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Load a file as a string
    pub fn load(&self, path: &Path) -> Result<String> {
        let unreadable = |e: std::io::Error| {
            Error::Parse(
                ParseError::new(format!("failed to read input file: {}", e))
                    .with_location(path.display().to_string()),
            )
        };

        // Refuse oversized files before pulling them into memory
        let metadata = fs::metadata(path).map_err(unreadable)?;
        self.limits
            .check_xml_size(usize::try_from(metadata.len()).unwrap_or(usize::MAX))?;

        let content = fs::read_to_string(path).map_err(unreadable)?;
        self.limits.check_xml_size(content.len())?;

        debug!(path = %path.display(), bytes = content.len(), "loaded input document");
        Ok(content)
    }
}
