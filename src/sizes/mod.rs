//! Named image size definitions.
//!
//! A size maps a name (e.g. `thumbnail`) to a bounding box and a crop policy.
//! The registry is built once at startup from the built-in sizes plus the
//! `[sizes.*]` tables of the config file, and is read-only afterwards.
//!
//! # Merge order
//!
//! ```text
//! builtin sizes  →  [sizes.*] from config  →  registry
//!                   (later registration wins on name collision)
//! ```

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Size name that means "original dimensions".
pub const FULL: &str = "full";

/// Size name used by themes for featured images.
pub const POST_THUMBNAIL: &str = "post-thumbnail";

/// A named width/height/crop policy.
///
/// A zero width or height leaves that dimension unconstrained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeDefinition {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub crop: bool,
}

impl SizeDefinition {
    pub fn new(name: impl Into<String>, width: u32, height: u32, crop: bool) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            crop,
        }
    }

    /// Whether `name` can appear in an `asset/<size>/<id>` route.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }

    /// Whether applying this size can change the image at all.
    #[inline]
    pub fn constrains(&self) -> bool {
        self.width > 0 || self.height > 0
    }
}

impl fmt::Display for SizeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dim = |v: u32| if v == 0 { "*".to_string() } else { v.to_string() };
        write!(f, "{}x{}", dim(self.width), dim(self.height))?;
        if self.crop {
            write!(f, " (crop)")?;
        }
        Ok(())
    }
}

/// Built-in sizes, registered before any host-declared size.
pub fn builtin_sizes() -> Vec<SizeDefinition> {
    vec![
        SizeDefinition::new("thumbnail", 150, 150, true),
        SizeDefinition::new("medium", 300, 300, false),
        SizeDefinition::new("medium_large", 768, 0, false),
        SizeDefinition::new("large", 1024, 1024, false),
        SizeDefinition::new("1536x1536", 1536, 1536, false),
        SizeDefinition::new("2048x2048", 2048, 2048, false),
    ]
}

/// Lookup table of size definitions by name.
#[derive(Debug, Clone, Default)]
pub struct SizeRegistry {
    sizes: FxHashMap<String, SizeDefinition>,
}

impl SizeRegistry {
    /// Empty registry. Every lookup falls through to "no resize".
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with [`builtin_sizes`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.extend(builtin_sizes());
        registry
    }

    /// Register a size, replacing any previous size of the same name.
    pub fn register(&mut self, size: SizeDefinition) {
        self.sizes.insert(size.name.clone(), size);
    }

    /// Register sizes in order; later entries win.
    pub fn extend(&mut self, sizes: impl IntoIterator<Item = SizeDefinition>) {
        for size in sizes {
            self.register(size);
        }
    }

    pub fn get(&self, name: &str) -> Option<&SizeDefinition> {
        self.sizes.get(name)
    }

    /// All definitions, sorted by name.
    pub fn definitions(&self) -> Vec<&SizeDefinition> {
        let mut all: Vec<_> = self.sizes.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
