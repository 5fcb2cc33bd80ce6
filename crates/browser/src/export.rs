//! CSV export of browser rows.

use evocrm_core::{CrmError, CrmResult};
use serde::Serialize;

use crate::record::Record;
use crate::view::Column;

/// A downloadable file produced by an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

impl ExportFile {
    pub fn csv(base_name: &str, body: String) -> Self {
        Self {
            file_name: format!("{base_name}.csv"),
            content_type: "text/csv",
            body,
        }
    }
}

/// Serialize rows under a header of column labels. Fields containing a
/// comma, quote or line break are quoted with embedded quotes doubled.
/// Lines are separated by `\n` with no terminator after the last row.
pub fn to_csv<'a, T, I>(rows: I, columns: &[Column]) -> CrmResult<String>
where
    T: Record + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|c| c.label.as_str()))
        .map_err(|e| CrmError::Export(e.to_string()))?;

    for row in rows {
        writer
            .write_record(columns.iter().map(|c| row.field_text(&c.key)))
            .map_err(|e| CrmError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CrmError::Export(e.to_string()))?;
    let mut body = String::from_utf8(bytes).map_err(|e| CrmError::Export(e.to_string()))?;
    if body.ends_with('\n') {
        body.pop();
    }
    Ok(body)
}
