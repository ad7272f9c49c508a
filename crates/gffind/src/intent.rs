//! Structured query intent handed to the core by a front end.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::predicate::RegionFilter;
use crate::types::{FixedField, GffError, GffResult};

/// A column group the caller wants back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnField {
    Fixed(FixedField),
    /// Both `beginning` and `end`.
    Region,
    /// A named attribute column.
    Attribute(String),
}

/// Everything one invocation asks the core to do.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryIntent {
    /// GFF3 file to ingest.
    pub ingest: Option<PathBuf>,
    /// Desired name for the table built from `ingest`.
    pub build_name: Option<String>,
    /// Table to query.
    pub query_table_name: Option<String>,
    /// Desired stem of the result file.
    pub output_name: Option<String>,
    /// Exact-match filters on fixed columns.
    pub field_filters: BTreeMap<FixedField, String>,
    /// Exact-match filters on attribute columns, in request order.
    pub attribute_filters: Vec<(String, String)>,
    pub region_filter: Option<RegionFilter>,
    pub return_fields: Vec<ReturnField>,
    pub return_all: bool,
    pub list_tables: bool,
    pub remove_table: Option<String>,
    pub help: bool,
}

impl QueryIntent {
    /// Whether anything in the intent shapes a query.
    pub fn has_query_criteria(&self) -> bool {
        self.query_table_name.is_some()
            || self.output_name.is_some()
            || !self.field_filters.is_empty()
            || !self.attribute_filters.is_empty()
            || self.region_filter.is_some()
            || !self.return_fields.is_empty()
    }

    /// A query runs when everything is requested, or when there are query
    /// criteria and the run is not a bare table removal.
    pub fn wants_query(&self) -> bool {
        self.return_all
            || (self.has_query_criteria()
                && (self.ingest.is_some() || self.remove_table.is_none()))
    }
}

/// Parse `key=value;key2=value2` into attribute filters.
///
/// Empty segments are skipped; a segment without `=` or with an empty key is
/// rejected.
pub fn parse_attribute_filters(text: &str) -> GffResult<Vec<(String, String)>> {
    let mut filters = Vec::new();
    for segment in text.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((key, value)) = segment.split_once('=') else {
            return Err(GffError::InvalidInput(format!(
                "attribute filter '{segment}' is not key=value"
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(GffError::InvalidInput(format!(
                "attribute filter '{segment}' has an empty key"
            )));
        }
        filters.push((key.to_string(), value.trim().to_string()));
    }
    Ok(filters)
}

/// Parse `key;key2` into attribute return fields.
pub fn parse_attribute_list(text: &str) -> Vec<ReturnField> {
    text.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|key| ReturnField::Attribute(key.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_filters() {
        let filters = parse_attribute_filters("ID=gene1; Name=foo;").unwrap();
        assert_eq!(
            filters,
            vec![
                ("ID".to_string(), "gene1".to_string()),
                ("Name".to_string(), "foo".to_string())
            ]
        );
    }

    #[test]
    fn test_attribute_filter_value_keeps_equals() {
        let filters = parse_attribute_filters("Note=a=b").unwrap();
        assert_eq!(filters[0].1, "a=b");
    }

    #[test]
    fn test_attribute_filter_without_equals() {
        assert!(matches!(
            parse_attribute_filters("ID"),
            Err(GffError::InvalidInput(_))
        ));
        assert!(parse_attribute_filters("=x").is_err());
    }

    #[test]
    fn test_attribute_list() {
        assert_eq!(
            parse_attribute_list("ID;;Name"),
            vec![
                ReturnField::Attribute("ID".into()),
                ReturnField::Attribute("Name".into())
            ]
        );
    }

    #[test]
    fn test_wants_query() {
        let mut intent = QueryIntent::default();
        assert!(!intent.wants_query());

        intent.ingest = Some(PathBuf::from("a.gff3"));
        assert!(!intent.wants_query());

        intent.field_filters.insert(FixedField::Seqid, "chr1".into());
        assert!(intent.wants_query());

        let removal = QueryIntent {
            remove_table: Some("gff".into()),
            output_name: Some("out".into()),
            ..Default::default()
        };
        assert!(!removal.wants_query());

        let all = QueryIntent {
            remove_table: Some("gff".into()),
            return_all: true,
            ..Default::default()
        };
        assert!(all.wants_query());
    }
}
