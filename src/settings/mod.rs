//! Key-value settings consumed at request time.
//!
//! The store is an external collaborator: the router only asks for a named
//! option and supplies its own default. Values are read on every request,
//! so a reloaded `[settings]` table takes effect on the next asset served.

use rustc_hash::FxHashMap;

use crate::utils::mime::types;

/// Encode quality used when `webp_quality` is unset.
pub const DEFAULT_QUALITY: u8 = 80;

/// Setting keys.
pub mod keys {
    pub const WEBP_QUALITY: &str = "webp_quality";
    pub const FULL_IMAGE_LIMIT: &str = "full_image_limit";
    pub const FEATURED_IMAGE_LIMIT: &str = "featured_image_limit";
    pub const TARGET_FORMAT: &str = "target_format";
}

/// Named option lookup.
pub trait SettingsStore: Send + Sync {
    /// Raw value of `key`, or `None` if it was never set.
    fn get_value(&self, key: &str) -> Option<String>;

    /// Value of `key`, or `default` when unset.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get_value(key).unwrap_or_else(|| default.to_string())
    }

    /// Value of `key` when set to a non-empty string.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_value(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Settings read from the `[settings]` table of the live config handle.
///
/// Every call loads the current config, so a reload is picked up without
/// restarting the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveSettings;

impl SettingsStore for LiveSettings {
    fn get_value(&self, key: &str) -> Option<String> {
        lookup(&crate::config::cfg().settings, key)
    }
}

/// In-memory settings, handy for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: FxHashMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }
}

impl SettingsStore for MemorySettings {
    fn get_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Stringify a scalar entry of a settings table; arrays and tables are ignored.
fn lookup(table: &toml::Table, key: &str) -> Option<String> {
    match table.get(key)? {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

// ============================================================================
// Transcode settings
// ============================================================================

/// Output format for transcoded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    WebP,
    Avif,
}

impl TargetFormat {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim() {
            types::WEBP => Some(Self::WebP),
            types::AVIF => Some(Self::Avif),
            _ => None,
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            Self::WebP => types::WEBP,
            Self::Avif => types::AVIF,
        }
    }
}

/// Per-request encode settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeSettings {
    pub target_format: TargetFormat,
    /// 0-100
    pub quality: u8,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            target_format: TargetFormat::WebP,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl TranscodeSettings {
    /// Read from the store, falling back to defaults for unset or
    /// unparseable values.
    pub fn from_store(store: &dyn SettingsStore) -> Self {
        let raw = store.get_or(keys::WEBP_QUALITY, &DEFAULT_QUALITY.to_string());
        let quality = match raw.trim().parse::<u32>() {
            Ok(q) => q.min(100) as u8,
            Err(_) => {
                let key = keys::WEBP_QUALITY;
                crate::debug!("settings"; "invalid {} `{}`, using {}", key, raw, DEFAULT_QUALITY);
                DEFAULT_QUALITY
            }
        };

        let target_format = match store.get_non_empty(keys::TARGET_FORMAT) {
            Some(raw) => TargetFormat::from_mime(&raw).unwrap_or_else(|| {
                let key = keys::TARGET_FORMAT;
                crate::debug!("settings"; "unsupported {} `{}`, using webp", key, raw);
                TargetFormat::WebP
            }),
            None => TargetFormat::WebP,
        };

        Self {
            target_format,
            quality,
        }
    }
}
