//! Native upload paths.

use std::path::{Path, PathBuf};

/// Resolve a path below the uploads prefix to a file under `root`.
///
/// `rest` is already decoded and trimmed. Rejects anything that escapes
/// `root`, including through symlinks.
pub fn resolve_upload(rest: &str, root: &Path) -> Option<PathBuf> {
    if rest.is_empty() || rest.split('/').any(|segment| segment == "..") {
        return None;
    }

    let canonical = root.join(rest).canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    canonical.is_file().then_some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_upload() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("media");
        fs::create_dir_all(root.join("2024")).unwrap();
        fs::write(root.join("2024/a.png"), b"png").unwrap();
        fs::write(temp.path().join("secret.txt"), b"no").unwrap();

        let resolved = resolve_upload("2024/a.png", &root).unwrap();
        assert!(resolved.ends_with("2024/a.png"));

        assert!(resolve_upload("2024", &root).is_none());
        assert!(resolve_upload("", &root).is_none());
        assert!(resolve_upload("missing.png", &root).is_none());
        assert!(resolve_upload("../secret.txt", &root).is_none());
        assert!(resolve_upload("2024/../../secret.txt", &root).is_none());
    }
}
