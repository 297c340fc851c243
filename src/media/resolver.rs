//! Asset lookup contract.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::MediaError;
use crate::utils::mime;

/// Opaque positive key into the media library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(u64);

impl AssetId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetId {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| MediaError::InvalidId(s.to_string()))
    }
}

/// What the library knows about an asset at serve time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedAsset {
    /// Absolute path of the stored file, `None` if it cannot be served.
    pub file_path: Option<PathBuf>,
    /// MIME type; empty for unknown assets.
    pub mime_type: String,
}

impl ResolvedAsset {
    /// Unknown asset: no file, no type.
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn is_image(&self) -> bool {
        mime::is_image(&self.mime_type)
    }
}

/// Resolves asset ids against storage.
///
/// Implementations must return the *original* storage location; URL
/// rewriting never applies at this layer.
pub trait AssetResolver: Send + Sync {
    fn resolve(&self, id: AssetId) -> ResolvedAsset;

    /// File path relative to the library root, as recorded in storage.
    fn stored_file(&self, id: AssetId) -> Option<String>;
}
