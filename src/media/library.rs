//! Manifest-backed media library.
//!
//! The manifest lives inside the library root and lists every asset:
//!
//! ```toml
//! [[asset]]
//! id = 42
//! file = "2024/05/photo.jpg"
//! mime_type = "image/jpeg"   # optional, guessed from the extension
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::{AssetId, AssetResolver, MediaError, ResolvedAsset};
use crate::{log, utils::mime};

/// One `[[asset]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    pub id: u64,
    /// Path relative to the library root.
    pub file: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl ManifestEntry {
    /// Declared MIME type, or a guess from the file extension.
    pub fn mime_type(&self) -> String {
        match &self.mime_type {
            Some(mime) if !mime.trim().is_empty() => mime.trim().to_string(),
            _ => essence(mime::from_path(Path::new(&self.file))).to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default, rename = "asset")]
    assets: Vec<ManifestEntry>,
}

/// Assets stored under a single root directory.
#[derive(Debug, Clone, Default)]
pub struct MediaLibrary {
    root: PathBuf,
    assets: FxHashMap<AssetId, ManifestEntry>,
}

impl MediaLibrary {
    /// Load the library from `root` and its manifest.
    ///
    /// A missing manifest yields an empty library (with a warning).
    pub fn load(root: &Path, manifest: &Path) -> Result<Self, MediaError> {
        if !manifest.exists() {
            log!("warning"; "media manifest `{}` not found, library is empty", manifest.display());
            return Ok(Self::from_entries(root, Vec::new()));
        }

        let content = fs::read_to_string(manifest)
            .map_err(|err| MediaError::Io(manifest.to_path_buf(), err))?;
        let parsed: Manifest = toml::from_str(&content)
            .map_err(|err| MediaError::Manifest(manifest.to_path_buf(), err))?;

        Ok(Self::from_entries(root, parsed.assets))
    }

    /// Build from entries in order; on duplicate ids the later entry wins.
    pub fn from_entries(root: &Path, entries: Vec<ManifestEntry>) -> Self {
        let mut assets = FxHashMap::default();
        for entry in entries {
            let id = AssetId::new(entry.id);
            if let Some(previous) = assets.insert(id, entry) {
                log!("warning"; "duplicate asset id {} (`{}` replaced)", id, previous.file);
            }
        }
        Self {
            root: root.to_path_buf(),
            assets,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetResolver for MediaLibrary {
    fn resolve(&self, id: AssetId) -> ResolvedAsset {
        let Some(entry) = self.assets.get(&id) else {
            return ResolvedAsset::missing();
        };

        let path = self.root.join(&entry.file);
        ResolvedAsset {
            file_path: path.is_file().then_some(path),
            mime_type: entry.mime_type(),
        }
    }

    fn stored_file(&self, id: AssetId) -> Option<String> {
        self.assets.get(&id).map(|entry| entry.file.clone())
    }
}

/// Strip parameters (`; charset=...`) from a MIME type.
fn essence(mime: &str) -> &str {
    mime.split(';').next().unwrap_or(mime).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(id: u64, file: &str) -> ManifestEntry {
        ManifestEntry {
            id,
            file: file.into(),
            mime_type: None,
        }
    }

    #[test]
    fn test_mime_guessed_from_extension() {
        assert_eq!(entry(1, "a/photo.JPG").mime_type(), "image/jpeg");
        assert_eq!(entry(1, "a/photo.jpg").mime_type(), "image/jpeg");
        assert_eq!(entry(1, "notes.txt").mime_type(), "text/plain");

        let declared = ManifestEntry {
            mime_type: Some("image/png".into()),
            ..entry(1, "blob")
        };
        assert_eq!(declared.mime_type(), "image/png");
    }

    #[test]
    fn test_load_manifest() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("photo.png"), b"png").unwrap();
        fs::write(
            root.join("media.toml"),
            "[[asset]]\nid = 7\nfile = \"photo.png\"\n\n[[asset]]\nid = 8\nfile = \"gone.pdf\"\n",
        )
        .unwrap();

        let library = MediaLibrary::load(root, &root.join("media.toml")).unwrap();
        assert_eq!(library.len(), 2);

        let photo = library.resolve(AssetId::new(7));
        assert_eq!(photo.file_path, Some(root.join("photo.png")));
        assert_eq!(photo.mime_type, "image/png");
        assert!(photo.is_image());

        // Listed but absent on disk
        let gone = library.resolve(AssetId::new(8));
        assert!(gone.file_path.is_none());
        assert_eq!(gone.mime_type, "application/pdf");

        assert_eq!(library.resolve(AssetId::new(9)), ResolvedAsset::missing());
    }

    #[test]
    fn test_duplicate_ids_later_wins() {
        let entries = vec![entry(1, "a.png"), entry(1, "b.png")];
        let library = MediaLibrary::from_entries(Path::new("/media"), entries);
        assert_eq!(library.len(), 1);
        assert_eq!(library.stored_file(AssetId::new(1)).as_deref(), Some("b.png"));
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let temp = TempDir::new().unwrap();
        let library = MediaLibrary::load(temp.path(), &temp.path().join("media.toml")).unwrap();
        assert!(library.is_empty());
    }

    #[test]
    fn test_invalid_manifest() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("media.toml");
        fs::write(&manifest, "[[asset]]\nid = \"x\"").unwrap();

        let err = MediaLibrary::load(temp.path(), &manifest).unwrap_err();
        assert!(matches!(err, MediaError::Manifest(..)));
    }
}
