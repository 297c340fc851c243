//! Server configuration management for `fastimg.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── serve      # [serve]
//! │   ├── media      # [media]
//! │   ├── cache      # [cache]
//! │   └── sizes      # [sizes.<name>]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── handle     # Global config handle
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section          | Purpose                                        |
//! |------------------|------------------------------------------------|
//! | `[serve]`        | HTTP server (interface, port, base URL)        |
//! | `[media]`        | Media library root, manifest, uploads prefix   |
//! | `[cache]`        | Cache-Control max-age override                 |
//! | `[sizes.<name>]` | Custom image sizes, merged over the built-ins  |
//! | `[settings]`     | Runtime options (`webp_quality`, limits, ...)  |

pub mod section;
pub mod types;
mod util;

use util::{find_config_file, is_http_url};

pub use section::{CacheConfig, MediaConfig, ServeConfig, SizeConfig};
pub use types::{ConfigDiagnostics, ConfigError, cfg, init_config, reload_config};

use crate::{
    cli::{Cli, Commands},
    debug, log,
    sizes::{SizeDefinition, SizeRegistry},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing fastimg.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    /// Custom sizes, registered after the built-ins
    #[serde(default)]
    pub sizes: BTreeMap<String, SizeConfig>,

    /// Free-form runtime settings
    #[serde(default)]
    pub settings: toml::Table,
}

impl AppConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file; without one, the
    /// defaults apply and the current directory is the project root.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        let mut config = if exists {
            Self::from_path(&config_path)?
        } else {
            debug!("config"; "{} not found, using defaults", cli.config.display());
            Self::default()
        };

        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(cli);
        config.validate()?;

        Ok(config)
    }

    /// Resolve config file path: explicit or found upward from cwd.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        match find_config_file(&cli.config) {
            Some(path) => Ok((path, true)),
            None => Ok((cwd.join(&cli.config), false)),
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let root = crate::utils::path::normalize_path(&root);

        self.config_path = crate::utils::path::normalize_path(&self.config_path);
        self.media.normalize(&root);
        self.root = root;
        self.apply_command_options(cli);
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Public origin for generated URLs.
    pub fn base_url(&self) -> String {
        self.serve.base_url()
    }

    /// Built-in sizes with the `[sizes.*]` tables registered over them.
    pub fn size_registry(&self) -> SizeRegistry {
        let mut registry = SizeRegistry::with_builtins();
        registry.extend(
            self.sizes
                .iter()
                .map(|(name, size)| size.to_definition(name)),
        );
        registry
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        match &cli.command {
            Commands::Serve { interface, port } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Sizes | Commands::Url { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        if self.serve.workers == 0 {
            diag.error("serve.workers", "must be at least 1");
        }

        if let Some(url) = &self.serve.base_url
            && !is_http_url(url)
        {
            diag.error_with_hint(
                "serve.base_url",
                format!("`{url}` is not an absolute http(s) URL"),
                "use a full origin such as \"https://cdn.example.com\"",
            );
        }

        if self.media.uploads.trim_matches('/').is_empty() {
            diag.error("media.uploads", "must not be empty");
        }

        for name in self.sizes.keys() {
            if !SizeDefinition::is_valid_name(name) {
                diag.error_with_hint(
                    format!("sizes.{name}"),
                    "size names appear in URLs",
                    "use letters, digits, `-` and `_` only",
                );
            }
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AppConfig {
    let (parsed, ignored) = AppConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
