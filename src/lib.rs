//! # corpcode
//!
//! Converts a DART `CORPCODE.xml` corporate registry into a JSON object keyed
//! by company name.
//!
//! Every `<list>` element anywhere below the document root is one company
//! record. Each record must carry `<corp_name>`, `<corp_code>`,
//! `<stock_code>` and `<modify_date>` children. The output maps `corp_name`
//! to the remaining three fields, with `stock_code` trimmed. When two records
//! share a name, the later one wins.
//!
//! ## Example
//!
//! ```rust
//! use corpcode::converters::parse_str;
//!
//! let registry = parse_str(
//!     "<result><list>\
//!        <corp_code>00126380</corp_code>\
//!        <corp_name>삼성전자</corp_name>\
//!        <stock_code> 005930 </stock_code>\
//!        <modify_date>20230110</modify_date>\
//!      </list></result>",
//! )?;
//!
//! assert_eq!(registry.get("삼성전자").unwrap().stock_code, "005930");
//! # Ok::<(), corpcode::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Input
pub mod loaders;
pub mod documents;

// Conversion and output
pub mod registry;
pub mod converters;
pub mod exports;

// Re-exports for convenience
pub use converters::{convert, convert_with, parse, ConvertOptions, ConvertSummary};
pub use documents::Document;
pub use error::{Error, Result};
pub use registry::{Company, Registry};

/// Version of the corpcode library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
