//! Runs a [`QueryIntent`] against a store.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::format::write_output;
use crate::ingest::{ingest_file, IngestReport};
use crate::intent::QueryIntent;
use crate::naming::{DEFAULT_OUTPUT, DEFAULT_TABLE};
use crate::predicate::compile;
use crate::projection::build_projection;
use crate::store::{GffDatabase, QueryResult};
use crate::types::GffResult;

/// One completed step of an intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    HelpRequested,
    Tables { names: Vec<String> },
    Ingested(IngestReport),
    Removed { table: String },
    Queried { table: String, rows: usize, path: PathBuf },
}

/// A store plus the directory result files are written to.
pub struct GffSession {
    db: GffDatabase,
    output_dir: PathBuf,
}

impl GffSession {
    pub fn new(db: GffDatabase, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            output_dir: output_dir.into(),
        }
    }

    pub fn database(&self) -> &GffDatabase {
        &self.db
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute every step the intent asks for, in order: help, table
    /// listing, ingestion, removal, query. Help and listing end the run.
    /// The first failing step aborts the rest. An intent that ingests and
    /// queries without naming a table queries the table it just built, not
    /// `gff`.
    pub fn execute(&self, intent: &QueryIntent) -> GffResult<Vec<Outcome>> {
        if intent.help {
            return Ok(vec![Outcome::HelpRequested]);
        }
        if intent.list_tables {
            return Ok(vec![Outcome::Tables {
                names: self.db.list_tables()?,
            }]);
        }

        let mut outcomes = Vec::new();
        let mut built: Option<String> = None;

        if let Some(path) = &intent.ingest {
            let desired = intent.build_name.as_deref().unwrap_or(DEFAULT_TABLE);
            let report = ingest_file(&self.db, path, desired)?;
            built = Some(report.table.clone());
            outcomes.push(Outcome::Ingested(report));
        }

        if let Some(table) = &intent.remove_table {
            self.db.drop_table(table)?;
            outcomes.push(Outcome::Removed {
                table: table.clone(),
            });
        }

        if intent.wants_query() {
            let table = intent
                .query_table_name
                .clone()
                .or(built)
                .unwrap_or_else(|| DEFAULT_TABLE.to_string());
            let result = self.query(&table, intent)?;
            let desired = intent.output_name.as_deref().unwrap_or(DEFAULT_OUTPUT);
            let path = write_output(&self.output_dir, desired, &result)?;
            outcomes.push(Outcome::Queried {
                table,
                rows: result.rows.len(),
                path,
            });
        }

        Ok(outcomes)
    }

    /// Run the filter and projection of `intent` against `table` without
    /// writing anything.
    pub fn query(&self, table: &str, intent: &QueryIntent) -> GffResult<QueryResult> {
        let table = self.db.open_table(table)?;
        let projection = build_projection(&intent.return_fields, intent.return_all);
        let condition = compile(intent);
        self.db.run_query(&table, &projection, &condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::ReturnField;
    use crate::types::{FixedField, GffError};

    const SAMPLE: &str = "##gff-version 3
chr1\tRefSeq\tgene\t150\t180\t.\t+\t.\tID=gene1;Name=foo
chr1\tRefSeq\tgene\t150\t250\t.\t-\t.\tID=gene2;Name=bar
chr2\tRefSeq\tgene\t50\t150\t.\t+\t.\tID=gene3
";

    fn setup() -> (tempfile::TempDir, GffSession, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sample.gff3");
        std::fs::write(&input, SAMPLE).unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        let session = GffSession::new(GffDatabase::open_in_memory().unwrap(), &out);
        (dir, session, input)
    }

    #[test]
    fn test_help_short_circuits() {
        let (_dir, session, input) = setup();
        let intent = QueryIntent {
            help: true,
            ingest: Some(input),
            ..Default::default()
        };
        assert_eq!(session.execute(&intent).unwrap(), vec![Outcome::HelpRequested]);
        assert!(session.database().list_tables().unwrap().is_empty());
    }

    #[test]
    fn test_parse_only_does_not_query() {
        let (_dir, session, input) = setup();
        let intent = QueryIntent {
            ingest: Some(input),
            ..Default::default()
        };
        let outcomes = session.execute(&intent).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(&outcomes[0], Outcome::Ingested(r) if r.rows == 3));
        assert_eq!(std::fs::read_dir(session.output_dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_ingest_then_query_uses_new_table() {
        let (_dir, session, input) = setup();
        let mut intent = QueryIntent {
            ingest: Some(input),
            build_name: Some("ann".into()),
            ..Default::default()
        };
        intent.field_filters.insert(FixedField::Strand, "+".into());

        let outcomes = session.execute(&intent).unwrap();
        let Outcome::Queried { table, rows, path } = &outcomes[1] else {
            panic!("expected query outcome, got {outcomes:?}");
        };
        assert_eq!(table, "ann");
        assert_eq!(*rows, 2);
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("#seqid\tsource\ttype\tbeginning\tend\tscore\tstrand\tphase\tAttributes\n"));
        assert!(text.contains("chr1\tRefSeq\tgene\t150\t180\t.\t+\t.\tID=gene1;Name=foo;\n"));
        assert!(text.contains("chr2\tRefSeq\tgene\t50\t150\t.\t+\t.\tID=gene3;\n"));
    }

    #[test]
    fn test_attribute_selection_returns_record() {
        let (_dir, session, input) = setup();
        session
            .execute(&QueryIntent {
                ingest: Some(input),
                ..Default::default()
            })
            .unwrap();

        let intent = QueryIntent {
            attribute_filters: vec![("ID".into(), "gene1".into())],
            return_fields: vec![
                ReturnField::Fixed(FixedField::Seqid),
                ReturnField::Attribute("Name".into()),
            ],
            ..Default::default()
        };
        let result = session.query("gff", &intent).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(crate::format::render(&result), "#seqid\tAttributes\nchr1\tName=foo;\n");
    }

    #[test]
    fn test_remove_then_unknown_table() {
        let (_dir, session, input) = setup();
        session
            .execute(&QueryIntent {
                ingest: Some(input),
                ..Default::default()
            })
            .unwrap();

        let outcomes = session
            .execute(&QueryIntent {
                remove_table: Some("gff".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(outcomes, vec![Outcome::Removed { table: "gff".into() }]);

        let err = session
            .execute(&QueryIntent {
                return_all: true,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, GffError::UnknownTable(name) if name == "gff"));
    }

    #[test]
    fn test_list_tables() {
        let (_dir, session, input) = setup();
        for _ in 0..2 {
            session
                .execute(&QueryIntent {
                    ingest: Some(input.clone()),
                    ..Default::default()
                })
                .unwrap();
        }
        let outcomes = session
            .execute(&QueryIntent {
                list_tables: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(
            outcomes,
            vec![Outcome::Tables {
                names: vec!["gff".into(), "gff2".into()]
            }]
        );
    }
}
