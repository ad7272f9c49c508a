//! gffind command-line front end: argument mapping, configuration and
//! result reporting around the `gffind` core.

pub mod args;
pub mod config;
pub mod report;

pub use args::{QueryArgs, ReturnArg};
pub use config::resolve_db_path;
