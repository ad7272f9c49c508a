//! Core data types for GFF3 records, fixed columns, and errors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder meaning "field not specified", valid in every column.
pub const SENTINEL: &str = ".";

/// The eight fixed GFF3 columns, in canonical file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedField {
    Seqid,
    Source,
    Type,
    Beginning,
    End,
    Score,
    Strand,
    Phase,
}

impl FixedField {
    /// All fixed fields in canonical order.
    pub const ALL: [FixedField; 8] = [
        FixedField::Seqid,
        FixedField::Source,
        FixedField::Type,
        FixedField::Beginning,
        FixedField::End,
        FixedField::Score,
        FixedField::Strand,
        FixedField::Phase,
    ];

    /// Column name in the store.
    pub fn column(self) -> &'static str {
        match self {
            FixedField::Seqid => "seqid",
            FixedField::Source => "source",
            FixedField::Type => "type",
            FixedField::Beginning => "beginning",
            FixedField::End => "end",
            FixedField::Score => "score",
            FixedField::Strand => "strand",
            FixedField::Phase => "phase",
        }
    }

    /// Declared SQL type. Advisory only: numeric columns also hold the sentinel text.
    pub fn sql_type(self) -> &'static str {
        match self {
            FixedField::Beginning | FixedField::End | FixedField::Phase => "INTEGER",
            FixedField::Score => "REAL",
            _ => "TEXT",
        }
    }

    /// Look up a fixed field by column name (case-insensitive, as SQLite identifiers are).
    pub fn from_column(name: &str) -> Option<FixedField> {
        Self::ALL
            .into_iter()
            .find(|f| f.column().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for FixedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A numerically typed GFF3 field that may also hold the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Integer(i64),
    Real(f64),
    Sentinel,
}

impl NumericField {
    /// Parse an integer column value (`beginning`, `end`, `phase`).
    pub fn parse_integer(raw: &str) -> Option<Self> {
        if raw == SENTINEL {
            return Some(Self::Sentinel);
        }
        raw.parse().ok().map(Self::Integer)
    }

    /// Parse a real column value (`score`).
    pub fn parse_real(raw: &str) -> Option<Self> {
        if raw == SENTINEL {
            return Some(Self::Sentinel);
        }
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self::Real)
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel)
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericField::Integer(v) => write!(f, "{v}"),
            NumericField::Real(v) => write!(f, "{v:?}"),
            NumericField::Sentinel => f.write_str(SENTINEL),
        }
    }
}

/// One annotation feature: a GFF3 data line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub seqid: String,
    pub source: String,
    pub feature_type: String,
    pub beginning: NumericField,
    pub end: NumericField,
    pub score: NumericField,
    pub strand: String,
    pub phase: NumericField,
    /// Attribute pairs in file order. Keys are unique.
    pub attributes: Vec<(String, String)>,
}

impl Record {
    /// Set an attribute, replacing an earlier value for the same key.
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    /// Get an attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Errors that can occur while ingesting or querying.
#[derive(thiserror::Error, Debug)]
pub enum GffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown column '{column}' in table {table}")]
    UnknownColumn { table: String, column: String },

    #[error("Invalid region '{0}': expected BEGIN-END with BEGIN < END")]
    InvalidRegion(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Attribute '{key}' conflicts with existing column '{existing}' in table {table}")]
    SchemaConflict {
        table: String,
        key: String,
        existing: String,
    },
}

/// Convenience result type.
pub type GffResult<T> = Result<T, GffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_sentinel() {
        assert_eq!(NumericField::parse_integer("."), Some(NumericField::Sentinel));
        assert_eq!(NumericField::parse_real("."), Some(NumericField::Sentinel));
        assert_eq!(NumericField::Sentinel.to_string(), ".");
    }

    #[test]
    fn test_numeric_parse() {
        assert_eq!(NumericField::parse_integer("150"), Some(NumericField::Integer(150)));
        assert_eq!(NumericField::parse_integer("1.5"), None);
        assert_eq!(NumericField::parse_real("0.5"), Some(NumericField::Real(0.5)));
        assert_eq!(NumericField::parse_real("NaN"), None);
        assert_eq!(NumericField::parse_real("abc"), None);
    }

    #[test]
    fn test_real_display_keeps_decimal_point() {
        assert_eq!(NumericField::Real(1.0).to_string(), "1.0");
        assert_eq!(NumericField::Real(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_fixed_field_lookup() {
        assert_eq!(FixedField::from_column("End"), Some(FixedField::End));
        assert_eq!(FixedField::from_column("type"), Some(FixedField::Type));
        assert_eq!(FixedField::from_column("ID"), None);
        assert_eq!(FixedField::Score.sql_type(), "REAL");
    }

    #[test]
    fn test_set_attribute_last_wins() {
        let mut record = Record {
            seqid: "chr1".into(),
            source: ".".into(),
            feature_type: "gene".into(),
            beginning: NumericField::Integer(1),
            end: NumericField::Integer(2),
            score: NumericField::Sentinel,
            strand: "+".into(),
            phase: NumericField::Sentinel,
            attributes: Vec::new(),
        };
        record.set_attribute("Note", "a");
        record.set_attribute("ID", "g1");
        record.set_attribute("Note", "b");
        assert_eq!(record.attributes.len(), 2);
        assert_eq!(record.attribute("Note"), Some("b"));
        assert_eq!(record.attributes[0].0, "Note");
    }
}
