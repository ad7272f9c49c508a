//! gffind entry point.

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use gffind::{GffDatabase, GffSession, QueryIntent};
use gffind_cli::config::resolve_db_path;
use gffind_cli::report::{describe, summaries_json};
use gffind_cli::QueryArgs;

#[derive(Parser)]
#[command(
    name = "gffind",
    about = "Parse GFF3 annotations into a SQLite store and query them by field, attribute and region",
    version,
    after_help = "Run 'gffind <command> --help' for details on each command."
)]
struct Cli {
    /// Path to the SQLite store (default: $GFFIND_DB, then ./gffdb.sqlite).
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a GFF3 file into a new table.
    Parse {
        /// GFF3 file to ingest.
        file: PathBuf,

        /// Table name (numeric suffix added if taken).
        #[arg(long, short)]
        build: Option<String>,
    },

    /// Query a table and write matching features to a file.
    Query(QueryArgs),

    /// List the tables in the store.
    Tables,

    /// Drop a table.
    Remove {
        /// Table to drop.
        table: String,
    },

    /// Print a JSON summary of every table.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   gffind completions bash > ~/.local/share/bash-completion/completions/gffind
    ///   gffind completions zsh > ~/.zfunc/_gffind
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Some(command) => command,
        None => {
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let intent = match command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "gffind", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Info => {
            let db = open_db(cli.db.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&summaries_json(&db)?)?);
            return Ok(());
        }
        Commands::Parse { file, build } => QueryIntent {
            ingest: Some(file),
            build_name: build,
            ..Default::default()
        },
        Commands::Query(args) => args.into_intent()?,
        Commands::Tables => QueryIntent {
            list_tables: true,
            ..Default::default()
        },
        Commands::Remove { table } => QueryIntent {
            remove_table: Some(table),
            ..Default::default()
        },
    };

    let session = GffSession::new(open_db(cli.db.as_deref())?, ".");
    for outcome in session.execute(&intent)? {
        match describe(&outcome) {
            Some(msg) => println!("{msg}"),
            None => Cli::command().print_help()?,
        }
    }
    Ok(())
}

fn open_db(explicit: Option<&str>) -> Result<GffDatabase> {
    let path = resolve_db_path(explicit);
    tracing::debug!("Store: {}", path.display());
    Ok(GffDatabase::open(&path)?)
}
