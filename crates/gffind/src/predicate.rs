//! Predicate compiler: turns a query intent into a condition tree.
//!
//! Conditions are plain data; the store renders them into parameterized SQL,
//! so filter values never become part of the statement text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::intent::QueryIntent;
use crate::types::{FixedField, GffError, GffResult};

/// Interval relation between a stored feature and the query range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionMode {
    /// Feature lies inside the range.
    Contained,
    /// Feature starts inside the range and runs past its end.
    Beginning,
    /// Feature starts before the range and ends inside it.
    End,
    /// Feature covers the whole range.
    Span,
}

impl fmt::Display for RegionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionMode::Contained => "contained",
            RegionMode::Beginning => "region-beginning",
            RegionMode::End => "region-end",
            RegionMode::Span => "span",
        };
        f.write_str(name)
    }
}

/// A region predicate: mode plus query range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFilter {
    pub mode: RegionMode,
    pub beg: i64,
    pub end: i64,
}

impl RegionFilter {
    /// Build a region filter. Requires `beg < end`.
    pub fn new(mode: RegionMode, beg: i64, end: i64) -> GffResult<Self> {
        if beg >= end {
            return Err(GffError::InvalidRegion(format!("{beg}-{end}")));
        }
        Ok(Self { mode, beg, end })
    }

    /// Parse a `BEGIN-END` range string.
    pub fn parse(mode: RegionMode, range: &str) -> GffResult<Self> {
        let invalid = || GffError::InvalidRegion(range.to_string());
        let (beg, end) = range.trim().split_once('-').ok_or_else(invalid)?;
        let beg: i64 = beg.trim().parse().map_err(|_| invalid())?;
        let end: i64 = end.trim().parse().map_err(|_| invalid())?;
        Self::new(mode, beg, end).map_err(|_| invalid())
    }

    /// Strict interval comparison over the `beginning` and `end` columns.
    pub fn condition(&self) -> Condition {
        use CompareOp::{Gt, Lt};
        use FixedField::{Beginning, End};

        let (beg, end) = (self.beg, self.end);
        let terms = match self.mode {
            RegionMode::Contained => vec![
                Condition::integer(Beginning, Gt, beg),
                Condition::integer(End, Lt, end),
            ],
            RegionMode::Beginning => vec![
                Condition::integer(Beginning, Gt, beg),
                Condition::integer(Beginning, Lt, end),
                Condition::integer(End, Gt, end),
            ],
            RegionMode::End => vec![
                Condition::integer(Beginning, Lt, beg),
                Condition::integer(End, Lt, end),
                Condition::integer(End, Gt, beg),
            ],
            RegionMode::Span => vec![
                Condition::integer(Beginning, Lt, beg),
                Condition::integer(End, Gt, end),
            ],
        };
        Condition::And(terms)
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Lt,
    Gt,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
        }
    }
}

/// A literal compared against a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Text(String),
}

/// Boolean condition over stored rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// Matches every row.
    True,
    Compare {
        column: String,
        op: CompareOp,
        value: Literal,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    /// `column = 'value'`.
    pub fn text_eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Compare {
            column: column.into(),
            op: CompareOp::Eq,
            value: Literal::Text(value.into()),
        }
    }

    fn integer(field: FixedField, op: CompareOp, value: i64) -> Self {
        Condition::Compare {
            column: field.column().to_string(),
            op,
            value: Literal::Integer(value),
        }
    }

    /// Conjunction of `terms`, collapsing trivial cases.
    pub fn all(terms: Vec<Condition>) -> Self {
        let mut terms: Vec<Condition> = terms
            .into_iter()
            .filter(|t| !matches!(t, Condition::True))
            .collect();
        match terms.len() {
            0 => Condition::True,
            1 => terms.remove(0),
            _ => Condition::And(terms),
        }
    }

    /// Every column name referenced by the condition, in first-use order.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::True => {}
            Condition::Compare { column, .. } => {
                if !out.contains(&column.as_str()) {
                    out.push(column);
                }
            }
            Condition::And(terms) | Condition::Or(terms) => {
                for term in terms {
                    term.collect_columns(out);
                }
            }
        }
    }
}

/// Compile the filter part of an intent. Fixed-field equalities come first
/// in canonical order, then the region predicate, then attribute equalities;
/// all are ANDed. An intent without filters compiles to [`Condition::True`].
pub fn compile(intent: &QueryIntent) -> Condition {
    let mut terms: Vec<Condition> = intent
        .field_filters
        .iter()
        .map(|(field, value)| Condition::text_eq(field.column(), value.as_str()))
        .collect();

    if let Some(region) = &intent.region_filter {
        terms.push(region.condition());
    }

    terms.extend(
        intent
            .attribute_filters
            .iter()
            .map(|(key, value)| Condition::text_eq(key.as_str(), value.as_str())),
    );

    Condition::all(terms)
}
