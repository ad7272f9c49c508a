//! SQLite-backed schema store with additive attribute columns.
//!
//! Every table has the eight fixed GFF3 columns plus one `TEXT` column per
//! attribute key seen so far. Numeric columns accept either a number or the
//! sentinel text. Rows are written one statement at a time on an autocommit
//! connection, so an interrupted ingestion keeps every row inserted before
//! the failure.

use std::fmt;
use std::path::Path;

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde::Serialize;

use crate::naming::unique_name_by;
use crate::predicate::{Condition, Literal};
use crate::projection::Projection;
use crate::types::{FixedField, GffError, GffResult, NumericField, Record, SENTINEL};

/// Known attribute columns of one table. Fixed columns are implicit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    attributes: Vec<String>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute columns in creation order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Exact attribute-column membership.
    pub fn contains(&self, key: &str) -> bool {
        self.attributes.iter().any(|c| c == key)
    }

    /// Stored spelling of a column, fixed or attribute, matched the way
    /// SQLite matches identifiers (ASCII case-insensitive).
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some(field) = FixedField::from_column(name) {
            return Some(field.column());
        }
        self.attributes
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    fn push(&mut self, key: &str) {
        self.attributes.push(key.to_string());
    }
}

/// Handle to a table: its name and the columns it is known to have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GffTable {
    name: String,
    columns: ColumnSet,
}

impl GffTable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }
}

/// A value read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CellValue {
    /// True for the sentinel text or a missing value.
    pub fn is_sentinel(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s == SENTINEL,
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str(SENTINEL),
            CellValue::Integer(v) => write!(f, "{v}"),
            CellValue::Real(v) => write!(f, "{v:?}"),
            CellValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<ValueRef<'_>> for CellValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => CellValue::Null,
            ValueRef::Integer(v) => CellValue::Integer(v),
            ValueRef::Real(v) => CellValue::Real(v),
            ValueRef::Text(t) | ValueRef::Blob(t) => {
                CellValue::Text(String::from_utf8_lossy(t).into_owned())
            }
        }
    }
}

/// One result row: column name to value, in select order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    pub cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// Remove a column from the row and return its value.
    pub fn take(&mut self, column: &str) -> Option<CellValue> {
        let idx = self.cells.iter().position(|(name, _)| name == column)?;
        Some(self.cells.remove(idx).1)
    }
}

/// Rows plus the column names the statement produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Table overview for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub attribute_columns: Vec<String>,
    pub rows: u64,
}

/// The relational store: one SQLite file holding every table.
pub struct GffDatabase {
    conn: Connection,
}

impl GffDatabase {
    /// Open or create a store file.
    pub fn open(path: &Path) -> GffResult<Self> {
        if path.exists() {
            tracing::info!("Opening existing store: {}", path.display());
        } else {
            tracing::info!("Creating new store: {}", path.display());
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// A throwaway store that lives in memory.
    pub fn open_in_memory() -> GffResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Names of all user tables, sorted.
    pub fn list_tables(&self) -> GffResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Create a table with the fixed columns. A taken name gets a numeric
    /// suffix (`gff`, `gff2`, `gff3`, ...).
    pub fn create_table(&self, desired: &str) -> GffResult<GffTable> {
        let desired = desired.trim();
        if desired.is_empty() {
            return Err(GffError::InvalidInput("table name must not be empty".into()));
        }
        if desired.to_ascii_lowercase().starts_with("sqlite_") {
            return Err(GffError::InvalidInput(format!(
                "table name '{desired}' uses the reserved sqlite_ prefix"
            )));
        }

        let existing = self.list_tables()?;
        let name = unique_name_by(desired, |candidate| {
            existing.iter().any(|t| t.eq_ignore_ascii_case(candidate))
        });

        let columns = FixedField::ALL
            .iter()
            .map(|f| {
                format!(
                    "{} {} DEFAULT '{SENTINEL}'",
                    quote_ident(f.column()),
                    f.sql_type()
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        self.conn
            .execute(&format!("CREATE TABLE {} ({columns})", quote_ident(&name)), [])?;

        if name != desired {
            tracing::info!("Table {desired} exists, created {name} instead");
        } else {
            tracing::info!("Created table {name}");
        }
        Ok(GffTable {
            name,
            columns: ColumnSet::new(),
        })
    }

    /// Open an existing table and load its attribute columns.
    pub fn open_table(&self, name: &str) -> GffResult<GffTable> {
        let stored = self
            .list_tables()?
            .into_iter()
            .find(|t| t.eq_ignore_ascii_case(name))
            .ok_or_else(|| GffError::UnknownTable(name.to_string()))?;

        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let mut columns = ColumnSet::new();
        for column in stmt.query_map([&stored], |row| row.get::<_, String>(0))? {
            let column = column?;
            if FixedField::from_column(&column).is_none() {
                columns.push(&column);
            }
        }
        Ok(GffTable {
            name: stored,
            columns,
        })
    }

    /// Add an attribute column if the table lacks it. Returns whether a
    /// column was added.
    pub fn ensure_column(&self, table: &mut GffTable, key: &str) -> GffResult<bool> {
        if table.columns.contains(key) {
            return Ok(false);
        }
        if key.is_empty() {
            return Err(GffError::InvalidInput("attribute key must not be empty".into()));
        }
        if let Some(existing) = table.columns.resolve(key) {
            return Err(GffError::SchemaConflict {
                table: table.name.clone(),
                key: key.to_string(),
                existing: existing.to_string(),
            });
        }

        self.conn.execute(
            &format!(
                "ALTER TABLE {} ADD COLUMN {} TEXT DEFAULT '{SENTINEL}'",
                quote_ident(&table.name),
                quote_ident(key)
            ),
            [],
        )?;
        table.columns.push(key);
        tracing::debug!("Added column {key} to {}", table.name);
        Ok(true)
    }

    /// Insert one record. Every attribute key must already be a column.
    pub fn insert_record(&self, table: &GffTable, record: &Record) -> GffResult<()> {
        let mut names: Vec<&str> = FixedField::ALL.iter().map(|f| f.column()).collect();
        let mut values: Vec<Value> = vec![
            Value::Text(record.seqid.clone()),
            Value::Text(record.source.clone()),
            Value::Text(record.feature_type.clone()),
            numeric_value(&record.beginning),
            numeric_value(&record.end),
            numeric_value(&record.score),
            Value::Text(record.strand.clone()),
            numeric_value(&record.phase),
        ];

        for (key, value) in &record.attributes {
            if !table.columns.contains(key) {
                return Err(GffError::UnknownColumn {
                    table: table.name.clone(),
                    column: key.clone(),
                });
            }
            names.push(key);
            values.push(Value::Text(value.clone()));
        }

        let column_list = names
            .iter()
            .map(|n| quote_ident(n))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=values.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({column_list}) VALUES ({placeholders})",
            quote_ident(&table.name)
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.execute(params_from_iter(values.iter()))?;
        Ok(())
    }

    /// Run a filtered, projected query. Rows come back in insertion order.
    pub fn run_query(
        &self,
        table: &GffTable,
        projection: &Projection,
        condition: &Condition,
    ) -> GffResult<QueryResult> {
        let select = match projection.columns() {
            None => "*".to_string(),
            Some(cols) => cols
                .iter()
                .map(|c| resolve_column(table, c).map(quote_ident))
                .collect::<GffResult<Vec<_>>>()?
                .join(", "),
        };
        for column in condition.columns() {
            resolve_column(table, column)?;
        }

        let mut where_sql = String::new();
        let mut params: Vec<Value> = Vec::new();
        render_condition(condition, &mut where_sql, &mut params);

        let sql = format!(
            "SELECT {select} FROM {} WHERE {where_sql} ORDER BY rowid",
            quote_ident(&table.name)
        );
        tracing::debug!("Query: {sql} ({} parameters)", params.len());

        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = Vec::new();
        let mut cursor = stmt.query(params_from_iter(params.iter()))?;
        while let Some(row) = cursor.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for (idx, name) in columns.iter().enumerate() {
                cells.push((name.clone(), CellValue::from(row.get_ref(idx)?)));
            }
            rows.push(Row { cells });
        }

        Ok(QueryResult { columns, rows })
    }

    /// Drop a table.
    pub fn drop_table(&self, name: &str) -> GffResult<()> {
        let table = self.open_table(name)?;
        self.conn
            .execute(&format!("DROP TABLE {}", quote_ident(&table.name)), [])?;
        tracing::info!("Dropped table {}", table.name);
        Ok(())
    }

    /// Row count and attribute columns of a table.
    pub fn table_summary(&self, name: &str) -> GffResult<TableSummary> {
        let table = self.open_table(name)?;
        let rows: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(&table.name)),
            [],
            |row| row.get(0),
        )?;
        Ok(TableSummary {
            name: table.name,
            attribute_columns: table.columns.attributes,
            rows: rows.max(0) as u64,
        })
    }
}

fn resolve_column<'a>(table: &'a GffTable, column: &str) -> GffResult<&'a str> {
    table
        .columns
        .resolve(column)
        .ok_or_else(|| GffError::UnknownColumn {
            table: table.name.clone(),
            column: column.to_string(),
        })
}

fn numeric_value(field: &NumericField) -> Value {
    match field {
        NumericField::Integer(v) => Value::Integer(*v),
        NumericField::Real(v) => Value::Real(*v),
        NumericField::Sentinel => Value::Text(SENTINEL.to_string()),
    }
}

/// Quote an SQL identifier.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Append the SQL for `condition` to `sql`, pushing bound values to `params`.
fn render_condition(condition: &Condition, sql: &mut String, params: &mut Vec<Value>) {
    match condition {
        Condition::True => sql.push('1'),
        Condition::Compare { column, op, value } => {
            params.push(match value {
                Literal::Integer(v) => Value::Integer(*v),
                Literal::Text(v) => Value::Text(v.clone()),
            });
            sql.push_str(&format!(
                "{} {} ?{}",
                quote_ident(column),
                op.as_sql(),
                params.len()
            ));
        }
        Condition::And(terms) | Condition::Or(terms) => {
            if terms.is_empty() {
                // Empty AND is true, empty OR is false.
                sql.push(if matches!(condition, Condition::And(_)) { '1' } else { '0' });
                return;
            }
            let joiner = if matches!(condition, Condition::And(_)) {
                " AND "
            } else {
                " OR "
            };
            for (i, term) in terms.iter().enumerate() {
                if i > 0 {
                    sql.push_str(joiner);
                }
                sql.push('(');
                render_condition(term, sql, params);
                sql.push(')');
            }
        }
    }
}
