//! Unique name generation for tables and output files.

use std::path::{Path, PathBuf};

/// Default table name for a parse run.
pub const DEFAULT_TABLE: &str = "gff";

/// Default stem for query result files.
pub const DEFAULT_OUTPUT: &str = "gff_search_results";

/// Extension appended to result files.
pub const OUTPUT_EXTENSION: &str = "txt";

/// Return `desired` if unused, else `desired2`, `desired3`, ...
pub fn generate_unique_name<S: AsRef<str>>(desired: &str, existing: &[S]) -> String {
    unique_name_by(desired, |candidate| {
        existing.iter().any(|name| name.as_ref() == candidate)
    })
}

/// Like [`generate_unique_name`], with a caller-supplied "is taken" test.
pub fn unique_name_by<F>(desired: &str, mut taken: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let mut name = desired.to_string();
    let mut suffix = 1u64;
    while taken(&name) {
        suffix += 1;
        name = format!("{desired}{suffix}");
    }
    name
}

/// Pick a result file path in `dir` that does not collide with any existing
/// file, comparing extension-stripped names.
pub fn unique_output_path(dir: &Path, desired: &str) -> std::io::Result<PathBuf> {
    let mut stems = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_string());
        }
    }
    let name = generate_unique_name(desired, &stems);
    Ok(dir.join(format!("{name}.{OUTPUT_EXTENSION}")))
}
