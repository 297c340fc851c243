//! `fastimg sizes`: print the size registry.

use owo_colors::OwoColorize;

use crate::config::AppConfig;

pub fn list_sizes(config: &AppConfig) {
    let registry = config.size_registry();
    let width = registry
        .definitions()
        .iter()
        .map(|size| size.name.len())
        .max()
        .unwrap_or(0);

    for size in registry.definitions() {
        let custom = config.sizes.contains_key(&size.name);
        let origin = if custom { "config" } else { "builtin" };
        println!("{:<width$}  {}  {}", size.name.bold(), size, origin.dimmed());
    }
}
