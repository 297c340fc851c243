//! Filesystem path normalization.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
///
/// # Example
/// ```ignore
/// use crate::utils::path::normalize_path;
/// let root = normalize_path(Path::new("./media"));
/// ```
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_missing_relative() {
        let normalized = normalize_path(Path::new("no/such/media"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("no/such/media"));
    }

    #[test]
    fn test_normalize_resolves_dots() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("media")).unwrap();

        let dotted = temp.path().join("media/../media/.");
        let expected = temp.path().canonicalize().unwrap().join("media");
        assert_eq!(normalize_path(&dotted), expected);
    }
}
