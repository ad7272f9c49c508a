//! gffind: GFF3 annotations in a SQLite store whose attribute columns grow as
//! new keys appear, queried by field, attribute and region and written back
//! as GFF3-like text.

pub mod format;
pub mod ingest;
pub mod intent;
pub mod naming;
pub mod parser;
pub mod predicate;
pub mod projection;
pub mod session;
pub mod store;
pub mod types;

pub use format::{build_header, format_rows, render, write_output};
pub use ingest::{ingest_file, ingest_reader, IngestReport};
pub use intent::{parse_attribute_filters, parse_attribute_list, QueryIntent, ReturnField};
pub use naming::{generate_unique_name, DEFAULT_OUTPUT, DEFAULT_TABLE};
pub use predicate::{compile, CompareOp, Condition, Literal, RegionFilter, RegionMode};
pub use projection::{build_projection, Projection};
pub use session::{GffSession, Outcome};
pub use store::{CellValue, GffDatabase, GffTable, QueryResult, Row, TableSummary};
pub use types::*;
