//! `[media]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [media]
//! root = "media"          # Library directory (relative to the config file, `~` expanded)
//! manifest = "media.toml" # Asset list, relative to `root`
//! uploads = "uploads"     # URL prefix for native files
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Media library settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub root: PathBuf,
    pub manifest: PathBuf,
    pub uploads: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: "media".into(),
            manifest: "media.toml".into(),
            uploads: "uploads".into(),
        }
    }
}

impl MediaConfig {
    /// Absolute manifest path (call after paths are normalized).
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest)
    }

    /// Expand `~` and resolve `root` against the project root.
    pub fn normalize(&mut self, project_root: &Path) {
        let raw = self.root.to_string_lossy();
        let expanded = PathBuf::from(shellexpand::tilde(&raw).into_owned());
        let root = if expanded.is_relative() {
            project_root.join(expanded)
        } else {
            expanded
        };
        self.root = crate::utils::path::normalize_path(&root);
    }
}
