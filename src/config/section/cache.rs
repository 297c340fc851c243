//! `[cache]` section configuration.
//!
//! ```toml
//! [cache]
//! max_age = 86400   # Cache-Control max-age for asset responses
//! ```
//!
//! When unset, asset responses are cached for a year.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Replaces the default max-age through the `cache_expires` filter.
    pub max_age: Option<u64>,
}
