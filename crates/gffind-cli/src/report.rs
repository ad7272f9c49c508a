//! User-facing messages for completed steps.

use gffind::{GffDatabase, GffResult, Outcome};

/// Message printed for an outcome. Help has no message; the caller prints
/// usage instead.
pub fn describe(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::HelpRequested => None,
        Outcome::Tables { names } => {
            let mut msg = String::from("Tables built:");
            for name in names {
                msg.push('\n');
                msg.push_str(name);
            }
            Some(msg)
        }
        Outcome::Ingested(report) => Some(format!(
            "Created table {} with {} entries.",
            report.table, report.rows
        )),
        Outcome::Removed { table } => Some(format!("Deleted table {table}")),
        Outcome::Queried { path, .. } => Some(format!("File {} created.", path.display())),
    }
}

/// Every table with its attribute columns and row count, for `gffind info`.
pub fn summaries_json(db: &GffDatabase) -> GffResult<serde_json::Value> {
    let mut tables = Vec::new();
    for name in db.list_tables()? {
        tables.push(db.table_summary(&name)?);
    }
    Ok(serde_json::json!({
        "table_count": tables.len(),
        "tables": tables,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gffind::{ingest_reader, IngestReport};
    use std::path::PathBuf;

    #[test]
    fn test_messages() {
        let ingested = Outcome::Ingested(IngestReport {
            table: "gff2".into(),
            rows: 10,
            columns_added: 1,
        });
        assert_eq!(
            describe(&ingested).as_deref(),
            Some("Created table gff2 with 10 entries.")
        );
        assert_eq!(
            describe(&Outcome::Removed { table: "gff".into() }).as_deref(),
            Some("Deleted table gff")
        );
        assert_eq!(
            describe(&Outcome::Queried {
                table: "gff".into(),
                rows: 0,
                path: PathBuf::from("gff_search_results.txt"),
            })
            .as_deref(),
            Some("File gff_search_results.txt created.")
        );
        assert!(describe(&Outcome::HelpRequested).is_none());
    }

    #[test]
    fn test_table_listing() {
        let outcome = Outcome::Tables {
            names: vec!["gff".into(), "gff2".into()],
        };
        assert_eq!(describe(&outcome).as_deref(), Some("Tables built:\ngff\ngff2"));
        let empty = Outcome::Tables { names: Vec::new() };
        assert_eq!(describe(&empty).as_deref(), Some("Tables built:"));
    }

    #[test]
    fn test_summaries_json() {
        let db = GffDatabase::open_in_memory().unwrap();
        let text = "chr1\t.\tgene\t1\t5\t.\t+\t.\tID=a;Name=x\n";
        ingest_reader(&db, text.as_bytes(), "gff").unwrap();

        let info = summaries_json(&db).unwrap();
        assert_eq!(info["table_count"], 1);
        assert_eq!(info["tables"][0]["name"], "gff");
        assert_eq!(info["tables"][0]["rows"], 1);
        assert_eq!(info["tables"][0]["attribute_columns"][1], "Name");
    }
}
