//! Configuration loading and resolution.

use std::path::PathBuf;

/// Environment variable naming the store file.
pub const DB_ENV: &str = "GFFIND_DB";

/// Store file used when nothing else is configured.
pub const DEFAULT_DB_FILE: &str = "gffdb.sqlite";

/// Resolve the store path: explicit flag, then `GFFIND_DB`, then
/// `gffdb.sqlite` in the working directory.
pub fn resolve_db_path(explicit: Option<&str>) -> PathBuf {
    resolve_with(explicit, std::env::var(DB_ENV).ok())
}

fn resolve_with(explicit: Option<&str>, env_path: Option<String>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Some(path) = env_path.filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_DB_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins() {
        let path = resolve_with(Some("a.sqlite"), Some("b.sqlite".into()));
        assert_eq!(path, PathBuf::from("a.sqlite"));
    }

    #[test]
    fn test_env_then_default() {
        assert_eq!(
            resolve_with(None, Some("b.sqlite".into())),
            PathBuf::from("b.sqlite")
        );
        assert_eq!(resolve_with(None, Some("  ".into())), PathBuf::from(DEFAULT_DB_FILE));
        assert_eq!(resolve_with(None, None), PathBuf::from(DEFAULT_DB_FILE));
    }
}
