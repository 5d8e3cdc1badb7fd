//! Company registry
//!
//! The registry is the only data structure a conversion builds: an
//! insertion-ordered map from company name to the fields kept for it.

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fields kept for one company. Serializes in declaration order.
///
/// `corp_code` and `modify_date` are `None` when their element holds no
/// text, and render as JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// DART corporation code, as written in the source
    pub corp_code: Option<String>,
    /// Listing code with surrounding whitespace removed
    pub stock_code: String,
    /// Last modification date, as written in the source
    pub modify_date: Option<String>,
}

impl Company {
    /// Create a company record with every field present
    pub fn new(
        corp_code: impl Into<String>,
        stock_code: impl Into<String>,
        modify_date: impl Into<String>,
    ) -> Self {
        Self {
            corp_code: Some(corp_code.into()),
            stock_code: stock_code.into(),
            modify_date: Some(modify_date.into()),
        }
    }
}

/// Ordered mapping from `corp_name` to [`Company`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    companies: IndexMap<String, Company>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a company, replacing any previous entry with the same name.
    ///
    /// A replaced key keeps the position of its first insertion. Returns the
    /// displaced value, if there was one.
    pub fn insert(&mut self, corp_name: impl Into<String>, company: Company) -> Option<Company> {
        self.companies.insert(corp_name.into(), company)
    }

    /// Look up a company by exact name
    pub fn get(&self, corp_name: &str) -> Option<&Company> {
        self.companies.get(corp_name)
    }

    /// Number of distinct company names
    pub fn len(&self) -> usize {
        self.companies.len()
    }

    /// Check whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Iterate over entries in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Company)> {
        self.companies.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over company names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.companies.keys().map(|k| k.as_str())
    }

    /// Render as 2-space indented JSON with non-ASCII left unescaped
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a registry back from its JSON rendering
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
