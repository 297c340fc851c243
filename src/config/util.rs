//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Check that `url_str` is an absolute http(s) URL.
///
/// # Examples
/// ```ignore
/// is_http_url("https://cdn.example.com")      -> true
/// is_http_url("http://localhost:5277/media")  -> true
/// is_http_url("ftp://example.com")            -> false
/// is_http_url("example.com")                  -> false
/// ```
pub fn is_http_url(url_str: &str) -> bool {
    url::Url::parse(url_str)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /srv/site/media/2024/   ← cwd
/// /srv/site/fastimg.toml  ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

// ============================================================================
// tests
// ============================================================================
