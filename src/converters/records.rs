//! Record extraction
//!
//! Projects one `<list>` element onto a `(corp_name, Company)` pair.

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::registry::Company;

/// Tag of the elements holding one company each
pub const RECORD_TAG: &str = "list";

/// Child elements every record must carry
pub const REQUIRED_FIELDS: [&str; 4] = ["corp_name", "corp_code", "stock_code", "modify_date"];

/// Extract the registry key and value from a record element.
///
/// `record` is the 1-based position of the element in document order and
/// is only used for error reporting. A `<stock_code>` with no text cannot be
/// trimmed and aborts the record; the other fields keep `None`.
pub fn extract_record(element: &Element, record: usize) -> Result<(String, Company)> {
    let corp_name = field_text(element, "corp_name", record)?;
    let corp_code = field_text(element, "corp_code", record)?;
    let stock_code = field_text(element, "stock_code", record)?.ok_or(Error::EmptyField {
        field: "stock_code",
        record,
    })?;
    let modify_date = field_text(element, "modify_date", record)?;

    Ok((
        corp_name.unwrap_or_default(),
        Company {
            corp_code,
            stock_code: stock_code.trim().to_string(),
            modify_date,
        },
    ))
}

/// Text of the first direct child named `field`, `None` when it holds none
fn field_text(element: &Element, field: &'static str, record: usize) -> Result<Option<String>> {
    element
        .find_child(field)
        .map(|child| child.text.clone())
        .ok_or(Error::MissingField { field, record })
}
