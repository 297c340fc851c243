//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement, so
//! edits to the `[settings]` table take effect on the next request.

use crate::config::AppConfig;
use anyhow::Result;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<AppConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(AppConfig::default()));

/// Global hash of the current config file content.
static CONFIG_HASH: AtomicU64 = AtomicU64::new(0);

#[inline]
pub fn cfg() -> Arc<AppConfig> {
    CONFIG.load_full()
}

/// Reload config from disk if content changed.
///
/// Returns `Ok(true)` if config was updated, `Ok(false)` if unchanged or
/// there is no config file. A file that fails to load is not retried until
/// its content changes again.
pub fn reload_config() -> Result<bool> {
    use std::fs;

    let c = cfg();
    let Some(cli) = c.cli else {
        return Ok(false);
    };
    if !c.config_path.is_file() {
        return Ok(false);
    }

    let content = fs::read_to_string(&c.config_path)?;
    let new_hash = crate::utils::hash::compute(content.as_bytes());

    if !mark_seen(&CONFIG_HASH, new_hash) {
        return Ok(false);
    }

    let new_config = AppConfig::load(cli)?;
    CONFIG.store(Arc::new(new_config));

    Ok(true)
}

/// Record `hash` as seen. Returns `true` if it differs from the last one.
fn mark_seen(seen: &AtomicU64, hash: u64) -> bool {
    seen.swap(hash, Ordering::Relaxed) != hash
}

#[inline]
pub fn init_config(config: AppConfig) -> Arc<AppConfig> {
    use std::fs;

    if config.config_path.exists()
        && let Ok(content) = fs::read_to_string(&config.config_path)
    {
        let hash = crate::utils::hash::compute(content.as_bytes());
        CONFIG_HASH.store(hash, Ordering::Relaxed);
    }

    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
