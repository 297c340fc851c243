//! Configuration section definitions.
//!
//! Each module corresponds to a section in `fastimg.toml`:
//!
//! | Module   | TOML Section     | Purpose                              |
//! |----------|------------------|--------------------------------------|
//! | `serve`  | `[serve]`        | HTTP server, base URL, workers       |
//! | `media`  | `[media]`        | Library root, manifest, uploads path |
//! | `cache`  | `[cache]`        | Cache-Control max-age                |
//! | `sizes`  | `[sizes.<name>]` | Custom image sizes                   |
//!
//! The free-form `[settings]` table is read through `settings::LiveSettings`.

mod cache;
mod media;
mod serve;
mod sizes;

pub use cache::CacheConfig;
pub use media::MediaConfig;
pub use serve::ServeConfig;
pub use sizes::SizeConfig;
