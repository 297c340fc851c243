//! Stored attachment metadata.
//!
//! Mirrors what a media host records per upload: the original file and
//! dimensions, plus one entry per intermediate size the image would produce.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sizes::SizeRegistry;
use crate::transcode::layout;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    /// Stored file, relative to the library root.
    pub file: String,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    #[serde(default)]
    pub sizes: BTreeMap<String, SizeMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeMetadata {
    /// Intermediate file name, relative to the original's directory.
    pub file: String,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
}

impl AttachmentMetadata {
    /// Build the record for a stored file.
    ///
    /// Non-images (or images whose header cannot be read) get zero
    /// dimensions and no sizes.
    pub fn generate(file: &str, path: &Path, mime_type: &str, registry: &SizeRegistry) -> Self {
        let dimensions = crate::utils::mime::is_image(mime_type)
            .then(|| image::image_dimensions(path).ok())
            .flatten();

        let Some((width, height)) = dimensions else {
            return Self {
                file: file.to_string(),
                width: 0,
                height: 0,
                mime_type: mime_type.to_string(),
                sizes: BTreeMap::new(),
            };
        };

        let sizes = registry
            .definitions()
            .into_iter()
            .filter_map(|size| {
                let planned = layout::plan(width, height, size)?;
                let entry = SizeMetadata {
                    file: intermediate_name(file, planned.width, planned.height),
                    width: planned.width,
                    height: planned.height,
                    mime_type: mime_type.to_string(),
                };
                Some((size.name.clone(), entry))
            })
            .collect();

        Self {
            file: file.to_string(),
            width,
            height,
            mime_type: mime_type.to_string(),
            sizes,
        }
    }
}

/// `2024/05/photo.jpg` at 150x150 → `photo-150x150.jpg`
fn intermediate_name(file: &str, width: u32, height: u32) -> String {
    let path = Path::new(file);
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{stem}-{width}x{height}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{width}x{height}"),
    }
}
