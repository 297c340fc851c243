//! Payloads of the URL generation filters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::media::AssetId;

/// Requested image size: a registered name, or explicit dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeArg {
    Named(String),
    Dimensions(Vec<u32>),
}

impl SizeArg {
    /// The size as a single path segment; dimensions reduce to their
    /// first element. `None` for empty or zero sizes.
    pub fn first(&self) -> Option<String> {
        let segment = match self {
            Self::Named(name) => name.trim().to_string(),
            Self::Dimensions(dims) => dims.first()?.to_string(),
        };
        match segment.as_str() {
            "" | "0" => None,
            _ => Some(segment),
        }
    }
}

impl From<&str> for SizeArg {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl fmt::Display for SizeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Dimensions(dims) => {
                let dims: Vec<_> = dims.iter().map(u32::to_string).collect();
                write!(f, "{}", dims.join("x"))
            }
        }
    }
}

/// URL and dimensions of an image at some size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSrc {
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// `true` when this is a resized intermediate, not the original.
    pub intermediate: bool,
}

/// Arguments of the `image_src` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSrcArgs {
    pub id: AssetId,
    pub size: SizeArg,
}
