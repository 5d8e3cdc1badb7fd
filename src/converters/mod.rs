//! Registry conversion
//!
//! [`parse`] turns a document into a [`Registry`] without touching the
//! filesystem. [`convert`] wraps it with loading and export: it reads the
//! input file, parses every `<list>` record, and writes the JSON output.
//!
//! Conversion is fail-fast. A malformed document or a record without one of
//! its required children aborts the run before any output is written.

mod records;

pub use records::{extract_record, RECORD_TAG, REQUIRED_FIELDS};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::documents::Document;
use crate::error::Result;
use crate::exports::write_json;
use crate::limits::Limits;
use crate::loaders::Loader;
use crate::registry::Registry;

/// Default input file name
pub const DEFAULT_INPUT: &str = "CORPCODE.xml";

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "companies.json";

/// Options for a conversion run
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// XML registry to read
    pub input: PathBuf,
    /// JSON file to create or replace
    pub output: PathBuf,
    /// Limits applied while loading the input
    pub limits: Limits,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            limits: Limits::default(),
        }
    }
}

impl ConvertOptions {
    /// Create options for the given paths
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Default::default()
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Number of `<list>` records read
    pub records: usize,
    /// Number of distinct company names written
    pub companies: usize,
    /// Records whose name was already present and replaced the earlier entry
    pub duplicates: usize,
    /// File the registry was written to
    pub output: PathBuf,
}

/// Build the registry from every `<list>` element below the root.
///
/// Records sharing a `corp_name` overwrite each other; the last one wins.
pub fn parse(doc: &Document) -> Result<Registry> {
    parse_counted(doc).map(|(registry, _)| registry)
}

/// Parse an XML string into a registry
pub fn parse_str(xml: &str) -> Result<Registry> {
    parse(&Document::from_string(xml)?)
}

fn parse_counted(doc: &Document) -> Result<(Registry, usize)> {
    let mut registry = Registry::new();
    let mut records = 0;

    for element in doc.descendants(RECORD_TAG) {
        records += 1;
        let (corp_name, company) = extract_record(element, records)?;
        if let Some(previous) = registry.insert(corp_name.clone(), company) {
            debug!(
                corp_name = %corp_name,
                replaced_corp_code = ?previous.corp_code,
                "duplicate company name, keeping the later record"
            );
        }
    }

    Ok((registry, records))
}

/// Convert the XML registry at `input` into JSON at `output`
pub fn convert(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<ConvertSummary> {
    convert_with(&ConvertOptions::new(input.as_ref(), output.as_ref()))
}

/// Convert using explicit options
pub fn convert_with(options: &ConvertOptions) -> Result<ConvertSummary> {
    let loader = Loader::new().with_limits(options.limits.clone());

    let content = loader.load(&options.input)?;
    let doc = Document::parse_with_limits(&content, loader.limits())
        .map_err(|e| e.at_location(options.input.display().to_string()))?;
    drop(content);

    let (registry, records) = parse_counted(&doc)?;
    drop(doc);

    write_json(&options.output, &registry)?;

    let summary = ConvertSummary {
        records,
        companies: registry.len(),
        duplicates: records - registry.len(),
        output: options.output.clone(),
    };
    info!(
        input = %options.input.display(),
        output = %summary.output.display(),
        records = summary.records,
        companies = summary.companies,
        duplicates = summary.duplicates,
        "conversion complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::registry::Company;
    use pretty_assertions::assert_eq;

    fn record(name: &str, code: &str, stock: &str, date: &str) -> String {
        format!(
            "<list><corp_code>{code}</corp_code><corp_name>{name}</corp_name>\
             <stock_code>{stock}</stock_code><modify_date>{date}</modify_date></list>"
        )
    }

    #[test]
    fn test_parse_two_records() {
        let xml = format!(
            "<result>{}{}</result>",
            record("Acme", "001", " 12345 ", "20200101"),
            record("Beta", "002", "67890", "20200102"),
        );
        let registry = parse_str(&xml).unwrap();

        let mut expected = Registry::new();
        expected.insert("Acme", Company::new("001", "12345", "20200101"));
        expected.insert("Beta", Company::new("002", "67890", "20200102"));
        assert_eq!(registry, expected);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Acme", "Beta"]);
    }

    #[test]
    fn test_parse_duplicate_last_wins() {
        let xml = format!(
            "<result>{}{}</result>",
            record("Acme", "001", "111", "20200101"),
            record("Acme", "001", "222", "20200101"),
        );
        let registry = parse_str(&xml).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Acme").unwrap().stock_code, "222");
    }

    #[test]
    fn test_parse_empty_root() {
        assert!(parse_str("<result/>").unwrap().is_empty());
        assert!(parse_str("<result>\n</result>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_finds_nested_records() {
        let xml = format!(
            "<result><group><inner>{}</inner></group>{}</result>",
            record("Acme", "001", "1", "20200101"),
            record("Beta", "002", "2", "20200102"),
        );
        assert_eq!(parse_str(&xml).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_aborts_on_missing_field() {
        let xml = format!(
            "<result>{}<list><corp_name>Beta</corp_name><stock_code>2</stock_code>\
             <modify_date>20200102</modify_date></list></result>",
            record("Acme", "001", "1", "20200101"),
        );
        match parse_str(&xml) {
            Err(Error::MissingField { field, record }) => {
                assert_eq!(field, "corp_code");
                assert_eq!(record, 2);
            }
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ignores_namespaced_records() {
        let acme = record("Acme", "001", "1", "20200101");

        let defaulted = format!("<result xmlns=\"urn:x\">{acme}</result>");
        assert!(parse_str(&defaulted).unwrap().is_empty());

        let prefixed = format!(
            "<result xmlns:d=\"urn:d\">\
             <d:list><corp_name>Beta</corp_name></d:list>{acme}</result>"
        );
        let registry = parse_str(&prefixed).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Acme"]);
    }

    #[test]
    fn test_parse_aborts_on_empty_stock_code() {
        let xml = format!(
            "<result>{}<list><corp_name>A</corp_name><corp_code/><stock_code/>\
             <modify_date/></list></result>",
            record("Acme", "001", "1", "20200101"),
        );
        assert!(matches!(
            parse_str(&xml),
            Err(Error::EmptyField { field: "stock_code", record: 2 })
        ));
    }

    #[test]
    fn test_default_options() {
        let options = ConvertOptions::default();
        assert_eq!(options.input, PathBuf::from("CORPCODE.xml"));
        assert_eq!(options.output, PathBuf::from("companies.json"));
    }

    #[test]
    fn test_convert_reports_summary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("CORPCODE.xml");
        let output = dir.path().join("companies.json");
        std::fs::write(
            &input,
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<result>{}{}{}</result>",
                record("Acme", "001", "1", "20200101"),
                record("Beta", "002", "2", "20200102"),
                record("Acme", "003", "3", "20200103"),
            ),
        )
        .unwrap();

        let summary = convert(&input, &output).unwrap();
        assert_eq!(
            summary,
            ConvertSummary {
                records: 3,
                companies: 2,
                duplicates: 1,
                output: output.clone(),
            }
        );
        assert!(output.exists());
    }

    #[test]
    fn test_convert_malformed_input_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("CORPCODE.xml");
        std::fs::write(&input, "<result><list></result>").unwrap();

        match convert(&input, dir.path().join("companies.json")) {
            Err(Error::Parse(e)) => {
                assert!(e.location.unwrap().ends_with("CORPCODE.xml"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
