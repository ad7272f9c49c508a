//! GFF3 line parsing.

use crate::types::{GffError, GffResult, NumericField, Record};

/// Number of tab-separated columns in a GFF3 data line.
pub const GFF3_COLUMNS: usize = 9;

/// Directive that ends the annotation section of a GFF3 file.
pub const FASTA_DIRECTIVE: &str = "##FASTA";

/// What a single input line holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Comment, directive or blank line.
    Skip,
    /// Start of the embedded FASTA section; nothing after it is annotation.
    FastaStart,
    /// A feature line.
    Feature(Record),
}

/// Classify and parse one line. `line_no` is 1-based and used for error messages.
pub fn parse_line(raw: &str, line_no: usize) -> GffResult<Line> {
    let line = raw.trim_end();
    if line.starts_with(FASTA_DIRECTIVE) {
        return Ok(Line::FastaStart);
    }
    if line.starts_with('#') || line.trim().is_empty() {
        return Ok(Line::Skip);
    }
    parse_record(line, line_no).map(Line::Feature)
}

/// Parse a feature line into a [`Record`]. Fields past the ninth are ignored.
pub fn parse_record(line: &str, line_no: usize) -> GffResult<Record> {
    let fields: Vec<&str> = line.split('\t').take(GFF3_COLUMNS).collect();
    if fields.len() < GFF3_COLUMNS {
        return Err(GffError::MalformedRecord {
            line: line_no,
            reason: format!(
                "expected {GFF3_COLUMNS} tab-separated fields, found {}",
                fields.len()
            ),
        });
    }

    let integer = |idx: usize, name: &str| {
        NumericField::parse_integer(fields[idx]).ok_or_else(|| GffError::MalformedRecord {
            line: line_no,
            reason: format!("{name} must be an integer or '.', got '{}'", fields[idx]),
        })
    };

    let score = NumericField::parse_real(fields[5]).ok_or_else(|| GffError::MalformedRecord {
        line: line_no,
        reason: format!("score must be a number or '.', got '{}'", fields[5]),
    })?;

    let mut record = Record {
        seqid: fields[0].to_string(),
        source: fields[1].to_string(),
        feature_type: fields[2].to_string(),
        beginning: integer(3, "beginning")?,
        end: integer(4, "end")?,
        score,
        strand: fields[6].to_string(),
        phase: integer(7, "phase")?,
        attributes: Vec::new(),
    };

    for (key, value) in parse_attributes(fields[8]) {
        record.set_attribute(key, value);
    }

    Ok(record)
}

/// Split a GFF3 attribute column into `(key, value)` pairs.
///
/// Segments are separated by `;` and split on their first `=`. Segments
/// without `=` or with an empty key are skipped. Repeated keys are all
/// yielded in order.
pub fn parse_attributes(column: &str) -> impl Iterator<Item = (&str, &str)> {
    column.split(';').filter_map(|segment| {
        let (key, value) = segment.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key, value.trim()))
    })
}
