//! Limits and constraints for document loading
//!
//! The whole input is held in memory as a tree, so these limits bound
//! how much of it we are willing to build.

use crate::error::{Error, Result};

/// Limits applied while loading and parsing an input document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_xml_depth: usize,

    /// Maximum XML file size in bytes
    pub max_xml_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 1000,
            max_xml_size: 512 * 1024 * 1024, // 512 MB
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_xml_depth = depth;
        self
    }

    /// Set the maximum input size
    pub fn with_max_size(mut self, size: usize) -> Self {
        self.max_xml_size = size;
        self
    }

    /// Check if XML depth is within limits
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            Err(Error::LimitExceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if XML size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert!(limits.check_xml_depth(1000).is_ok());
        assert!(limits.check_xml_depth(1001).is_err());
    }

    #[test]
    fn test_size_check() {
        let limits = Limits::new().with_max_size(10);
        assert!(limits.check_xml_size(10).is_ok());
        let err = limits.check_xml_size(11).unwrap_err();
        assert!(err.to_string().contains("11 bytes exceeds maximum 10 bytes"));
    }
}
