//! Rebuild GFF3-like text from query rows.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::naming::unique_output_path;
use crate::store::{QueryResult, Row};
use crate::types::{FixedField, GffError, GffResult};

/// Header token standing in for every attribute column.
pub const ATTRIBUTES_HEADER: &str = "Attributes";

/// Tab-separated header: selected fixed columns in canonical order, then a
/// single `Attributes` token if any attribute column was selected.
pub fn build_header<S: AsRef<str>>(columns: &[S]) -> String {
    let mut header: Vec<&str> = FixedField::ALL
        .iter()
        .map(|f| f.column())
        .filter(|name| columns.iter().any(|c| c.as_ref() == *name))
        .collect();
    if columns
        .iter()
        .any(|c| FixedField::from_column(c.as_ref()).is_none())
    {
        header.push(ATTRIBUTES_HEADER);
    }
    header.join("\t")
}

/// Format one row: fixed values in canonical order, then `key=value;` for
/// each remaining column whose value is not the sentinel.
///
/// Attribute columns default to the sentinel, so a key the record never had
/// and a key stored with the value `.` read back the same. Both are left out
/// of the clause: `Note=.` in the input does not survive a round trip.
pub fn format_row(row: &Row) -> String {
    let mut remaining = row.clone();
    let mut fields: Vec<String> = Vec::new();
    for field in FixedField::ALL {
        if let Some(value) = remaining.take(field.column()) {
            fields.push(value.to_string());
        }
    }

    let attributes: String = remaining
        .cells
        .iter()
        .filter(|(_, value)| !value.is_sentinel())
        .map(|(key, value)| format!("{key}={value};"))
        .collect();
    if !attributes.is_empty() {
        fields.push(attributes);
    }

    fields.join("\t")
}

/// Format every row, one per line.
pub fn format_rows(rows: &[Row]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(format_row(row).trim_end_matches('\t'));
        out.push('\n');
    }
    out
}

/// Whole output document: `#`-prefixed header line followed by the rows.
pub fn render(result: &QueryResult) -> String {
    format!("#{}\n{}", build_header(result.columns.as_slice()), format_rows(&result.rows))
}

/// Render a result and write it to a fresh file in `dir`. The document is
/// built in full before the file is created, and an existing file is never
/// overwritten.
pub fn write_output(dir: &Path, desired: &str, result: &QueryResult) -> GffResult<PathBuf> {
    let mut components = Path::new(desired).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return Err(GffError::InvalidInput(format!(
            "output name '{desired}' must be a plain file name"
        )));
    }

    let document = render(result);
    let path = unique_output_path(dir, desired)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)?;
    file.write_all(document.as_bytes())?;
    tracing::info!("Wrote {} rows to {}", result.rows.len(), path.display());
    Ok(path)
}
