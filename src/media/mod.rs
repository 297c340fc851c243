//! Media storage collaborator.
//!
//! - [`resolver`]: the `AssetResolver` contract (id → file path + MIME type)
//! - [`library`]: manifest-backed implementation rooted at a directory
//! - [`metadata`]: the per-attachment metadata record

mod library;
mod metadata;
mod resolver;

use std::path::PathBuf;

use thiserror::Error;

pub use library::{ManifestEntry, MediaLibrary};
pub use metadata::{AttachmentMetadata, SizeMetadata};
pub use resolver::{AssetId, AssetResolver, ResolvedAsset};

/// Media library errors
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid media manifest `{0}`")]
    Manifest(PathBuf, #[source] toml::de::Error),

    #[error("invalid asset id `{0}`")]
    InvalidId(String),
}
